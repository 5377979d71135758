//! Declarative drawing instructions for the matrix and the bar chart.
//!
//! Layout (`matrix_layout`, `aggregation`) decides *what* goes where; this
//! module turns it into an ordered list of [`DrawCommand`]s, and any backend
//! implementing [`DrawSurface`] can replay them. Nothing here touches a
//! graphics context, so drawings can be compared directly in tests.

use serde::Serialize;

use crate::aggregation::{dataset_style, format_percent, Series};
use crate::constants::*;
use crate::matrix_layout::{Grid, MatrixCell, Rect, ReportMeta};
use crate::types::Status;

// ── Instruction set ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fill {
    Solid {
        color: &'static str,
    },
    Gradient {
        direction: GradientDirection,
        from: &'static str,
        to: &'static str,
    },
}

impl Fill {
    pub fn solid(color: &'static str) -> Self {
        Fill::Solid { color }
    }

    pub fn vertical((from, to): (&'static str, &'static str)) -> Self {
        Fill::Gradient {
            direction: GradientDirection::Vertical,
            from,
            to,
        }
    }

    pub fn horizontal((from, to): (&'static str, &'static str)) -> Self {
        Fill::Gradient {
            direction: GradientDirection::Horizontal,
            from,
            to,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Font {
    pub size: f64,
    pub bold: bool,
}

impl Font {
    pub fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    pub fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        fill: Fill,
    },
    StrokeRect {
        rect: Rect,
        color: &'static str,
        width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: Font,
        align: TextAlign,
        color: &'static str,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: &'static str,
        width: f64,
    },
}

/// A sized canvas and the commands to paint on it, in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Drawing {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    fn fill(&mut self, rect: Rect, fill: Fill) {
        self.commands.push(DrawCommand::FillRect { rect, fill });
    }

    fn stroke(&mut self, rect: Rect, color: &'static str, width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn text(
        &mut self,
        x: f64,
        y: f64,
        text: impl Into<String>,
        font: Font,
        align: TextAlign,
        color: &'static str,
    ) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.into(),
            font,
            align,
            color,
        });
    }

    fn line(
        &mut self,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        color: &'static str,
        width: f64,
    ) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        });
    }

    /// All text strings, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Drawing backend.
pub trait DrawSurface {
    fn begin(&mut self, width: f64, height: f64);
    fn fill_rect(&mut self, rect: &Rect, fill: &Fill);
    fn stroke_rect(&mut self, rect: &Rect, color: &str, width: f64);
    fn text(&mut self, x: f64, y: f64, text: &str, font: Font, align: TextAlign, color: &str);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
    fn finish(&mut self) {}
}

/// Feed a drawing to a backend, command by command.
pub fn replay<S: DrawSurface + ?Sized>(drawing: &Drawing, surface: &mut S) {
    surface.begin(drawing.width, drawing.height);
    for command in &drawing.commands {
        match command {
            DrawCommand::FillRect { rect, fill } => surface.fill_rect(rect, fill),
            DrawCommand::StrokeRect { rect, color, width } => {
                surface.stroke_rect(rect, color, *width)
            }
            DrawCommand::Text {
                x,
                y,
                text,
                font,
                align,
                color,
            } => surface.text(*x, *y, text, *font, *align, color),
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => surface.line((*x1, *y1), (*x2, *y2), color, *width),
        }
    }
    surface.finish();
}

// ── Text wrapping ───────────────────────────────────────────────────

/// Greedy word wrap using a fixed glyph advance of [`WRAP_CHAR_WIDTH`].
///
/// A word is appended while `(line + word + " ")` still fits in `max_width`;
/// otherwise the current line is emitted and the word starts a new one.
/// Empty lines are never emitted.
pub fn wrap_words(text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        let test_len = line.chars().count() + word.chars().count() + 1;
        if test_len as f64 * WRAP_CHAR_WIDTH > max_width {
            let done = line.trim_end();
            if !done.is_empty() {
                lines.push(done.to_string());
            }
            line = format!("{} ", word);
        } else {
            line.push_str(word);
            line.push(' ');
        }
    }
    let last = line.trim_end();
    if !last.is_empty() {
        lines.push(last.to_string());
    }
    lines
}

// ── Matrix ──────────────────────────────────────────────────────────

pub fn status_fill(status: Status, superseded: bool) -> Fill {
    match status {
        Status::Mastered if superseded => Fill::vertical(SUPERSEDED_GRADIENT),
        Status::Mastered => Fill::vertical(MASTERED_GRADIENT),
        Status::Emergent => Fill::vertical(EMERGENT_GRADIENT),
        Status::NotUsed => Fill::solid(COLOR_BACKGROUND),
    }
}

fn draw_cell(d: &mut Drawing, cell: &MatrixCell) {
    let r = cell.rect;
    d.fill(
        Rect::new(r.x + 1.0, r.y + 1.0, r.width - 2.0, r.height - 2.0),
        status_fill(cell.status, cell.superseded),
    );
    d.stroke(r, COLOR_BORDER, 1.0);
    d.text(
        r.x + 5.0,
        r.y + 15.0,
        cell.column.to_string(),
        Font::bold(12.0),
        TextAlign::Left,
        COLOR_TEXT,
    );
    for (i, line) in wrap_words(&cell.name, r.width - 10.0).into_iter().enumerate() {
        d.text(
            r.x + 5.0,
            r.y + 30.0 + i as f64 * 12.0,
            line,
            Font::regular(10.0),
            TextAlign::Left,
            COLOR_TEXT,
        );
    }
}

/// Legend rows: (label, swatch fill colour).
fn legend_entries(grid: &Grid) -> Vec<(&'static str, &'static str)> {
    let mut entries = vec![
        (Status::NotUsed.label(), COLOR_BACKGROUND),
        (Status::Emergent.label(), EMERGENT_GRADIENT.0),
        (Status::Mastered.label(), MASTERED_GRADIENT.0),
    ];
    if grid.has_superseded() {
        entries.push(("Superado", SUPERSEDED_GRADIENT.0));
    }
    entries
}

fn draw_legend(d: &mut Drawing, grid: &Grid, x: f64, y: f64) {
    let entries = legend_entries(grid);
    let frame = Rect::new(
        x - 5.0,
        y - 5.0,
        LEGEND_WIDTH,
        LEGEND_SPACING * entries.len() as f64 + 10.0,
    );
    d.fill(frame, Fill::solid(COLOR_LEGEND_BACKGROUND));
    d.stroke(frame, COLOR_BORDER, 1.0);

    for (i, (label, color)) in entries.into_iter().enumerate() {
        let row_y = y + i as f64 * LEGEND_SPACING;
        d.text(
            x + LEGEND_BOX_SIZE + 10.0,
            row_y + 12.0,
            label,
            Font::bold(12.0),
            TextAlign::Left,
            COLOR_TEXT,
        );
        d.stroke(
            Rect::new(x, row_y, LEGEND_BOX_SIZE, LEGEND_BOX_SIZE),
            COLOR_TEXT,
            1.0,
        );
        d.fill(
            Rect::new(
                x + 1.0,
                row_y + 1.0,
                LEGEND_BOX_SIZE - 2.0,
                LEGEND_BOX_SIZE - 2.0,
            ),
            Fill::solid(color),
        );
    }
}

/// Full matrix drawing on the A4-landscape canvas.
pub fn matrix_drawing(grid: &Grid, meta: &ReportMeta) -> Drawing {
    let mut d = Drawing::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let center = CANVAS_WIDTH / 2.0;
    let g = &grid.geometry;

    d.fill(
        Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        Fill::solid(COLOR_BACKGROUND),
    );

    d.text(center, 30.0, MATRIX_TITLE, Font::bold(20.0), TextAlign::Center, COLOR_PRIMARY);
    let date_line = format!("Data da avaliação: {}", meta.date);
    match meta.display_name() {
        Some(name) => {
            d.text(
                center,
                50.0,
                format!("Paciente: {}", name),
                Font::regular(14.0),
                TextAlign::Center,
                COLOR_TEXT,
            );
            d.text(center, 70.0, date_line, Font::regular(14.0), TextAlign::Center, COLOR_TEXT);
        }
        None => d.text(center, 55.0, date_line, Font::regular(14.0), TextAlign::Center, COLOR_TEXT),
    }

    for row in &grid.levels {
        let r = row.header;
        d.fill(r, Fill::vertical((COLOR_PRIMARY, COLOR_ACCENT)));
        d.stroke(r, COLOR_BACKGROUND, 1.0);
        d.text(
            r.width / 2.0,
            r.y + 25.0,
            row.name.as_str(),
            Font::bold(14.0),
            TextAlign::Center,
            COLOR_LIGHT_TEXT,
        );
        for (i, line) in wrap_words(&row.description, r.width - 20.0).into_iter().enumerate() {
            d.text(
                r.width / 2.0,
                r.y + 45.0 + i as f64 * 15.0,
                line,
                Font::regular(12.0),
                TextAlign::Center,
                COLOR_LIGHT_TEXT,
            );
        }
    }

    for section in &grid.sections {
        let band = section.band;
        d.fill(band, Fill::horizontal((COLOR_SECONDARY, COLOR_ACCENT)));
        d.text(
            band.x + band.width / 2.0,
            band.y + 22.0,
            section.name.as_str(),
            Font::bold(14.0),
            TextAlign::Center,
            COLOR_LIGHT_TEXT,
        );
    }

    for cell in &grid.cells {
        draw_cell(&mut d, cell);
    }

    let divider_bottom = g.grid_bottom + g.section_header_height;
    if let Some((_, rest)) = grid.sections.split_last() {
        for section in rest {
            let x = section.x + section.width + g.section_gap / 2.0;
            d.line((x, g.matrix_top), (x, divider_bottom), COLOR_PRIMARY, 2.0);
        }
    }

    draw_legend(
        &mut d,
        grid,
        CANVAS_WIDTH - LEGEND_OFFSET_X,
        CANVAS_HEIGHT - LEGEND_OFFSET_Y,
    );

    d.text(
        center,
        CANVAS_HEIGHT - 10.0,
        MATRIX_FOOTER,
        Font::regular(12.0),
        TextAlign::Center,
        COLOR_WATERMARK,
    );
    d
}

// ── Bar chart ───────────────────────────────────────────────────────

const CHART_WIDTH: f64 = 960.0;
const CHART_HEIGHT: f64 = 440.0;
const CHART_LEFT: f64 = 70.0;
const CHART_RIGHT: f64 = 20.0;
const CHART_TOP: f64 = 70.0;
const CHART_BOTTOM: f64 = 60.0;
const CHART_GRID_COLOR: &str = "#E5E5E5";

/// Stacked 100% bar chart, one bar per question.
pub fn chart_drawing(series: &Series) -> Drawing {
    let mut d = Drawing::new(CHART_WIDTH, CHART_HEIGHT);
    let plot_w = CHART_WIDTH - CHART_LEFT - CHART_RIGHT;
    let plot_h = CHART_HEIGHT - CHART_TOP - CHART_BOTTOM;
    let base_y = CHART_TOP + plot_h;

    d.fill(
        Rect::new(0.0, 0.0, CHART_WIDTH, CHART_HEIGHT),
        Fill::solid(COLOR_BACKGROUND),
    );
    d.text(CHART_WIDTH / 2.0, 24.0, CHART_TITLE, Font::bold(14.0), TextAlign::Center, COLOR_TEXT);

    // Legend row
    let mut lx = CHART_LEFT;
    for status in Status::ALL {
        let (label, (fill, border)) = dataset_style(status);
        let swatch = Rect::new(lx, 38.0, 12.0, 12.0);
        d.fill(swatch, Fill::solid(fill));
        d.stroke(swatch, border, 1.0);
        d.text(lx + 18.0, 48.0, label, Font::regular(11.0), TextAlign::Left, COLOR_TEXT);
        lx += 18.0 + label.chars().count() as f64 * 6.0 + 24.0;
    }

    // Y axis: 0..=100 in steps of 20
    for step in 0..=5 {
        let pct = step as f64 * 20.0;
        let y = base_y - pct / 100.0 * plot_h;
        d.line((CHART_LEFT, y), (CHART_LEFT + plot_w, y), CHART_GRID_COLOR, 1.0);
        d.text(
            CHART_LEFT - 8.0,
            y + 4.0,
            format!("{}%", pct),
            Font::regular(10.0),
            TextAlign::Center,
            COLOR_TEXT,
        );
    }
    d.text(
        CHART_LEFT - 40.0,
        CHART_TOP - 10.0,
        "Percentual",
        Font::regular(11.0),
        TextAlign::Left,
        COLOR_TEXT,
    );
    d.text(
        CHART_LEFT + plot_w / 2.0,
        CHART_HEIGHT - 12.0,
        "Pergunta (Seção.Número)",
        Font::regular(11.0),
        TextAlign::Center,
        COLOR_TEXT,
    );

    let n = series.entries.len().max(1) as f64;
    let slot = plot_w / n;
    let bar_w = slot * 0.7;
    for (i, entry) in series.entries.iter().enumerate() {
        let x = CHART_LEFT + i as f64 * slot + (slot - bar_w) / 2.0;
        let mut top = base_y;
        for status in Status::ALL {
            let pct = entry.percentages.get(status).clamp(0.0, 100.0);
            if pct <= 0.0 {
                continue;
            }
            let h = pct / 100.0 * plot_h;
            top -= h;
            let (_, (fill, border)) = dataset_style(status);
            let bar = Rect::new(x, top, bar_w, h);
            d.fill(bar, Fill::solid(fill));
            d.stroke(bar, border, 1.0);
        }
        d.text(
            x + bar_w / 2.0,
            base_y + 16.0,
            entry.question_id.to_string(),
            Font::regular(10.0),
            TextAlign::Center,
            COLOR_TEXT,
        );
    }
    d.line((CHART_LEFT, base_y), (CHART_LEFT + plot_w, base_y), COLOR_TEXT, 1.0);
    d
}

/// Tooltip-style summary lines, one per question: `"C.1: Dominado 25.0% (1), ..."`.
pub fn chart_summary(series: &Series) -> Vec<String> {
    series
        .entries
        .iter()
        .map(|e| {
            let parts: Vec<String> = Status::ALL
                .iter()
                .map(|&s| {
                    let (label, _) = dataset_style(s);
                    format!(
                        "{} {} ({})",
                        label,
                        format_percent(e.percentages.get(s)),
                        e.count(s)
                    )
                })
                .collect();
            format!("{}: {}", e.question_id, parts.join(", "))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{build_series, DenominatorPolicy};
    use crate::catalog::Catalog;
    use crate::matrix_layout::build_matrix_with_meta;
    use crate::responses::Responses;
    use crate::response_key::ResponseKey;
    use crate::types::QuestionId;

    #[test]
    fn test_wrap_words() {
        // 50px cells wrap at 10 characters including the trailing space
        assert_eq!(wrap_words("Protesta", 50.0), vec!["Protesta"]);
        assert_eq!(
            wrap_words("Solicita Objetos Ausentes", 50.0),
            vec!["Solicita", "Objetos", "Ausentes"]
        );
        assert_eq!(wrap_words("Faz escolhas", 50.0), vec!["Faz", "escolhas"]);
        assert_eq!(wrap_words("", 50.0), Vec::<String>::new());
    }

    #[test]
    fn test_wrap_long_first_word_has_no_blank_line() {
        let lines = wrap_words("Comportamento pré-intencional", 50.0);
        assert_eq!(lines, vec!["Comportamento", "pré-intencional"]);
    }

    #[test]
    fn test_status_fills() {
        assert_eq!(status_fill(Status::NotUsed, false), Fill::solid("#FFFFFF"));
        assert_eq!(status_fill(Status::NotUsed, true), Fill::solid("#FFFFFF"));
        assert_eq!(status_fill(Status::Mastered, false), Fill::vertical(MASTERED_GRADIENT));
        assert_eq!(status_fill(Status::Mastered, true), Fill::vertical(SUPERSEDED_GRADIENT));
        assert_eq!(status_fill(Status::Emergent, true), Fill::vertical(EMERGENT_GRADIENT));
    }

    #[test]
    fn test_matrix_drawing_texts() {
        let catalog = Catalog::standard();
        let meta = ReportMeta::new(Some("Ana".into()), "01/05/2024");
        let grid = build_matrix_with_meta(None, &catalog, &meta);
        let drawing = matrix_drawing(&grid, &meta);
        let texts: Vec<&str> = drawing.texts().collect();
        assert_eq!(texts[0], "PANVE");
        assert_eq!(texts[1], "Paciente: Ana");
        assert_eq!(texts[2], "Data da avaliação: 01/05/2024");
        assert!(texts.contains(&"Nível 7"));
        assert!(texts.contains(&"Informação"));
        assert!(texts.contains(&"C17"));
        assert!(texts.contains(&"Dominado"));
        assert!(!texts.contains(&"Superado"));
        assert_eq!(*texts.last().unwrap(), MATRIX_FOOTER);

        let dividers = drawing
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(dividers, 3);
    }

    #[test]
    fn test_superseded_legend_entry() {
        let catalog = Catalog::standard();
        let mut responses = Responses::new();
        for id in ["A.1", "A.2", "A.3"] {
            responses.record(
                QuestionId::parse(id).unwrap(),
                ResponseKey::parse("c:b"),
                Status::Mastered,
            );
        }
        let meta = ReportMeta::default();
        let grid = build_matrix_with_meta(Some(&responses), &catalog, &meta);
        let drawing = matrix_drawing(&grid, &meta);
        assert!(drawing.texts().any(|t| t == "Superado"));
        assert!(drawing.commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillRect { fill, .. } if *fill == Fill::vertical(SUPERSEDED_GRADIENT)
        )));
    }

    #[test]
    fn test_chart_drawing_bars() {
        let catalog = Catalog::standard();
        let series = build_series(None, &catalog, DenominatorPolicy::Evaluated);
        let drawing = chart_drawing(&series);
        let grey_bars = drawing
            .commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::FillRect {
                        fill: Fill::Solid { color: "#DDDDDD" },
                        ..
                    }
                )
            })
            .count();
        // one legend swatch + one bar per question
        assert_eq!(grey_bars, 1 + 24);
        assert!(drawing.texts().any(|t| t == "C.17"));
        assert!(drawing.texts().any(|t| t == "100%"));
    }

    #[test]
    fn test_chart_summary() {
        let catalog = Catalog::standard();
        let mut responses = Responses::new();
        let c1 = QuestionId::parse("C.1").unwrap();
        for (k, s) in [
            ("k1", Status::Mastered),
            ("k2", Status::Emergent),
            ("k3", Status::NotUsed),
        ] {
            responses.record(c1, ResponseKey::parse(k), s);
        }
        let series = build_series(Some(&responses), &catalog, DenominatorPolicy::Evaluated);
        let summary = chart_summary(&series);
        assert_eq!(
            summary[7],
            "C.1: Dominado 33.3% (1), Emergente 33.3% (1), Não Usado/Não Respondido 33.3% (1)"
        );
    }

    struct Recorder(Vec<String>);

    impl DrawSurface for Recorder {
        fn begin(&mut self, width: f64, height: f64) {
            self.0.push(format!("begin {}x{}", width, height));
        }
        fn fill_rect(&mut self, _: &Rect, _: &Fill) {
            self.0.push("fill".into());
        }
        fn stroke_rect(&mut self, _: &Rect, _: &str, _: f64) {
            self.0.push("stroke".into());
        }
        fn text(&mut self, _: f64, _: f64, text: &str, _: Font, _: TextAlign, _: &str) {
            self.0.push(format!("text {}", text));
        }
        fn line(&mut self, _: (f64, f64), _: (f64, f64), _: &str, _: f64) {
            self.0.push("line".into());
        }
        fn finish(&mut self) {
            self.0.push("finish".into());
        }
    }

    #[test]
    fn test_replay_preserves_order() {
        let grid = build_matrix_with_meta(None, &Catalog::standard(), &ReportMeta::default());
        let drawing = matrix_drawing(&grid, &ReportMeta::default());
        let mut rec = Recorder(Vec::new());
        replay(&drawing, &mut rec);
        assert_eq!(rec.0.first().unwrap(), "begin 1150x794");
        assert_eq!(rec.0[1], "fill");
        assert_eq!(rec.0[2], "text PANVE");
        assert_eq!(rec.0.last().unwrap(), "finish");
        assert_eq!(rec.0.len(), drawing.commands.len() + 2);
    }
}
