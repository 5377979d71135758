//! SVG backend for [`Drawing`]s.
//!
//! Gradients are collected into `<defs>` as they are first seen and
//! referenced by id; the document is assembled in [`SvgSurface::into_string`].

use std::collections::BTreeMap;

use crate::aggregation::Series;
use crate::draw::{self, DrawSurface, Drawing, Fill, Font, GradientDirection, TextAlign};
use crate::matrix_layout::{Grid, Rect, ReportMeta};

const FONT_FAMILY: &str = "Arial, sans-serif";

#[derive(Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    gradients: BTreeMap<(bool, String, String), String>,
    body: String,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn paint(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid { color } => escape(color),
            Fill::Gradient { direction, from, to } => {
                let key = (
                    *direction == GradientDirection::Vertical,
                    from.to_string(),
                    to.to_string(),
                );
                let next = format!("grad{}", self.gradients.len());
                let id = self.gradients.entry(key).or_insert(next);
                format!("url(#{})", id)
            }
        }
    }

    pub fn into_string(self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"##,
            w = self.width,
            h = self.height
        ));
        svg.push('\n');
        if !self.gradients.is_empty() {
            svg.push_str("<defs>\n");
            for ((vertical, from, to), id) in &self.gradients {
                let (x2, y2) = if *vertical { (0, 1) } else { (1, 0) };
                svg.push_str(&format!(
                    r##"<linearGradient id="{id}" x1="0" y1="0" x2="{x2}" y2="{y2}"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></linearGradient>"##,
                    from = escape(from),
                    to = escape(to),
                ));
                svg.push('\n');
            }
            svg.push_str("</defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawSurface for SvgSurface {
    fn begin(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn fill_rect(&mut self, rect: &Rect, fill: &Fill) {
        let paint = self.paint(fill);
        self.body.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"##,
            rect.x, rect.y, rect.width, rect.height, paint
        ));
        self.body.push('\n');
    }

    fn stroke_rect(&mut self, rect: &Rect, color: &str, width: f64) {
        self.body.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"##,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            escape(color),
            width
        ));
        self.body.push('\n');
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: Font, align: TextAlign, color: &str) {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
        };
        let weight = if font.bold { "bold" } else { "normal" };
        self.body.push_str(&format!(
            r##"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}" fill="{}">{}</text>"##,
            x,
            y,
            FONT_FAMILY,
            font.size,
            weight,
            anchor,
            escape(color),
            escape(text)
        ));
        self.body.push('\n');
    }

    fn line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), color: &str, width: f64) {
        self.body.push_str(&format!(
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"##,
            x1,
            y1,
            x2,
            y2,
            escape(color),
            width
        ));
        self.body.push('\n');
    }
}

pub fn render(drawing: &Drawing) -> String {
    let mut surface = SvgSurface::new();
    draw::replay(drawing, &mut surface);
    surface.into_string()
}

pub fn matrix_svg(grid: &Grid, meta: &ReportMeta) -> String {
    render(&draw::matrix_drawing(grid, meta))
}

pub fn chart_svg(series: &Series) -> String {
    render(&draw::chart_drawing(series))
}
