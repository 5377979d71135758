//! Communication matrix assembly: resolved grid plus layout geometry.
//!
//! ## Layout
//!
//! ```text
//!  x=0        x=100
//!  +----------+-- Recusar --+-- Obter ---------+-- Social ---- ... +
//!  | Nível 1  | A1          | A2               | A3                |
//!  | Nível 2  | B1          | B2 B3            | B4                |
//!  | Nível 3  | C1          | C2 C3 C4 ... C7  | C8 ... C13        |
//!  |   ...    |  (C columns repeat on levels 3..7)                  |
//!  +----------+-------------+------------------+-------------------+
//!             | section name bands (SECTION_HEADER_HEIGHT)         |
//! ```
//!
//! A section's width is the size of its largest level group (columns sharing
//! a level span) times [`CELL_WIDTH`]; sections are separated by
//! [`SECTION_GAP`]. Within a section each column is placed by its index inside
//! its own level group.
//!
//! The grid is purely descriptive. Drawing happens in [`crate::draw`].

use serde::Serialize;

use crate::catalog::{Catalog, ColumnSpec};
use crate::constants::*;
use crate::responses::Responses;
use crate::status_resolver::resolve_cell;
use crate::types::*;

/// Header text for a rendered matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub patient_name: Option<String>,
    pub date: String,
}

impl ReportMeta {
    pub fn new(patient_name: Option<String>, date: impl Into<String>) -> Self {
        Self {
            patient_name,
            date: date.into(),
        }
    }

    /// Meta dated with today's local date, `dd/mm/yyyy`.
    pub fn dated_today(patient_name: Option<String>) -> Self {
        Self::new(patient_name, chrono::Local::now().format("%d/%m/%Y").to_string())
    }

    /// Patient line text, if one should be printed.
    pub fn display_name(&self) -> Option<&str> {
        self.patient_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != DEFAULT_REPORT_NAME)
    }

    pub fn matrix_top(&self) -> f64 {
        if self.display_name().is_some() {
            MATRIX_TOP_WITH_PATIENT
        } else {
            MATRIX_TOP_DEFAULT
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Whether every question of a questionnaire section has a mastered answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectionDominance {
    pub a: bool,
    pub b: bool,
    pub c: bool,
}

impl SectionDominance {
    pub fn get(&self, section: QuestionnaireSection) -> bool {
        match section {
            QuestionnaireSection::A => self.a,
            QuestionnaireSection::B => self.b,
            QuestionnaireSection::C => self.c,
        }
    }

    /// Whether a mastered cell at `level` gets the superseded treatment:
    /// level 1 when A is dominated, level 2 when B is dominated.
    pub fn supersedes(&self, level: Level) -> bool {
        match level.number() {
            1 => self.a,
            2 => self.b,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Geometry {
    pub cell_width: f64,
    pub cell_height: f64,
    pub header_width: f64,
    pub section_gap: f64,
    pub section_header_height: f64,
    pub matrix_top: f64,
    /// Right edge of the last section.
    pub grid_right: f64,
    /// Bottom edge of the last level row (top of the section bands).
    pub grid_bottom: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelRow {
    pub level: Level,
    pub name: String,
    pub description: String,
    pub header: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionLayout {
    pub id: MatrixSection,
    pub name: String,
    pub x: f64,
    pub width: f64,
    /// Name band under the grid.
    pub band: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatrixCell {
    pub column: ColumnId,
    pub name: String,
    pub section: MatrixSection,
    pub level: Level,
    pub status: Status,
    /// Presentation hint only; `status` is unchanged.
    pub superseded: bool,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    pub levels: Vec<LevelRow>,
    pub sections: Vec<SectionLayout>,
    pub cells: Vec<MatrixCell>,
    pub dominance: SectionDominance,
    pub geometry: Geometry,
}

impl Grid {
    pub fn cell(&self, column: ColumnId, level: Level) -> Option<&MatrixCell> {
        self.cells
            .iter()
            .find(|c| c.column == column && c.level == level)
    }

    pub fn status(&self, column: ColumnId, level: Level) -> Option<Status> {
        self.cell(column, level).map(|c| c.status)
    }

    /// `(column, level, status)` for every defined cell, in drawing order.
    pub fn statuses(&self) -> impl Iterator<Item = (ColumnId, Level, Status)> + '_ {
        self.cells.iter().map(|c| (c.column, c.level, c.status))
    }

    pub fn cells_at(&self, level: Level) -> impl Iterator<Item = &MatrixCell> {
        self.cells.iter().filter(move |c| c.level == level)
    }

    pub fn has_superseded(&self) -> bool {
        self.cells.iter().any(|c| c.superseded)
    }

    pub fn section(&self, id: MatrixSection) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Columns of a section bucketed by level span, in first-seen order.
fn level_groups<'a>(
    columns: impl Iterator<Item = &'a ColumnSpec>,
) -> Vec<(LevelSpan, Vec<&'a ColumnSpec>)> {
    let mut groups: Vec<(LevelSpan, Vec<&ColumnSpec>)> = Vec::new();
    for col in columns {
        match groups.iter_mut().find(|(span, _)| *span == col.levels) {
            Some((_, members)) => members.push(col),
            None => groups.push((col.levels, vec![col])),
        }
    }
    groups
}

/// Dominance flags over the catalog's questions for each questionnaire section.
///
/// A section is dominated when it has at least one question and every one of
/// them has a `mastered` answer anywhere in its map (any level for C).
pub fn section_dominance(responses: Option<&Responses>, catalog: &Catalog) -> SectionDominance {
    let Some(responses) = responses else {
        return SectionDominance::default();
    };
    let dominated = |section: QuestionnaireSection| {
        let mut questions = catalog.questions_in(section).peekable();
        questions.peek().is_some()
            && questions.all(|q| responses.question(q.id).is_some_and(|r| r.has_mastered()))
    };
    SectionDominance {
        a: dominated(QuestionnaireSection::A),
        b: dominated(QuestionnaireSection::B),
        c: dominated(QuestionnaireSection::C),
    }
}

/// Build the matrix with no patient header.
pub fn build_matrix(responses: Option<&Responses>, catalog: &Catalog) -> Grid {
    build_matrix_with_meta(responses, catalog, &ReportMeta::default())
}

/// Resolve every (column, level) cell the catalog permits and lay out the grid.
///
/// `responses == None` gives a grid whose every cell is `NotUsed`.
pub fn build_matrix_with_meta(
    responses: Option<&Responses>,
    catalog: &Catalog,
    meta: &ReportMeta,
) -> Grid {
    let top = meta.matrix_top();
    let dominance = section_dominance(responses, catalog);

    let levels: Vec<LevelRow> = catalog
        .levels
        .iter()
        .map(|info| LevelRow {
            level: info.level,
            name: info.name.clone(),
            description: info.description.clone(),
            header: Rect::new(
                0.0,
                top + info.level.index() as f64 * CELL_HEIGHT,
                HEADER_WIDTH,
                CELL_HEIGHT,
            ),
        })
        .collect();

    let grid_bottom = top + LEVEL_COUNT as f64 * CELL_HEIGHT;
    let mut sections = Vec::with_capacity(catalog.sections.len());
    let mut cells = Vec::with_capacity(catalog.columns.len() * 2);
    let mut x = HEADER_WIDTH;

    for (i, section) in catalog.sections.iter().enumerate() {
        let groups = level_groups(catalog.columns_in(section.id));
        let max_columns = groups.iter().map(|(_, g)| g.len()).max().unwrap_or(0);
        let width = max_columns as f64 * CELL_WIDTH;

        for (_, group) in &groups {
            for (col_index, col) in group.iter().enumerate() {
                let cell_x = x + col_index as f64 * CELL_WIDTH;
                for level in col.levels.levels() {
                    let status = resolve_cell(responses, col.id, level);
                    cells.push(MatrixCell {
                        column: col.id,
                        name: col.name.clone(),
                        section: section.id,
                        level,
                        status,
                        superseded: status == Status::Mastered && dominance.supersedes(level),
                        rect: Rect::new(
                            cell_x,
                            top + level.index() as f64 * CELL_HEIGHT,
                            CELL_WIDTH,
                            CELL_HEIGHT,
                        ),
                    });
                }
            }
        }

        sections.push(SectionLayout {
            id: section.id,
            name: section.name.clone(),
            x,
            width,
            band: Rect::new(x, grid_bottom, width, SECTION_HEADER_HEIGHT),
        });
        x += width;
        if i + 1 < catalog.sections.len() {
            x += SECTION_GAP;
        }
    }

    tracing::debug!(
        cells = cells.len(),
        mastered = cells.iter().filter(|c| c.status == Status::Mastered).count(),
        emergent = cells.iter().filter(|c| c.status == Status::Emergent).count(),
        dominated_a = dominance.a,
        dominated_b = dominance.b,
        dominated_c = dominance.c,
        "built communication matrix"
    );

    Grid {
        levels,
        sections,
        cells,
        dominance,
        geometry: Geometry {
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            header_width: HEADER_WIDTH,
            section_gap: SECTION_GAP,
            section_header_height: SECTION_HEADER_HEIGHT,
            matrix_top: top,
            grid_right: x,
            grid_bottom,
        },
    }
}
