//! Matrix geometry, palette and identifier constants.
//!
//! Geometry values are in canvas pixels and describe the A4-landscape
//! communication matrix:
//! - 7 level rows of [`CELL_HEIGHT`] below a title block
//! - a [`HEADER_WIDTH`] level-name column on the left
//! - 4 matrix sections laid out left-to-right, [`SECTION_GAP`] apart
//! - a [`SECTION_HEADER_HEIGHT`] band naming each section under the grid

/// Number of communication levels (rows of the matrix).
pub const LEVEL_COUNT: usize = 7;

/// First level whose questions live in questionnaire section C.
pub const FIRST_SYMBOLIC_LEVEL: u8 = 3;

/// Questions per questionnaire section.
pub const SECTION_A_QUESTION_COUNT: u8 = 3;
pub const SECTION_B_QUESTION_COUNT: u8 = 4;
pub const SECTION_C_QUESTION_COUNT: u8 = 17;

/// Total number of questions across sections A, B and C.
pub const QUESTION_COUNT: usize = 24;

/// Roman numerals for levels 1..=7, indexed by `level - 1`.
pub const ROMAN_NUMERALS: [&str; LEVEL_COUNT] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Word used in section-C key prefixes (`"Nível III:"`).
pub const LEVEL_KEY_WORD: &str = "Nível";

// ── Geometry ────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: f64 = 1150.0;
pub const CANVAS_HEIGHT: f64 = 794.0;
pub const CELL_WIDTH: f64 = 60.0;
pub const CELL_HEIGHT: f64 = 70.0;
pub const HEADER_WIDTH: f64 = 100.0;
pub const SECTION_HEADER_HEIGHT: f64 = 35.0;
pub const SECTION_GAP: f64 = 10.0;

/// Top edge of the grid when a patient name line is shown.
pub const MATRIX_TOP_WITH_PATIENT: f64 = 95.0;
/// Top edge of the grid when only the date line is shown.
pub const MATRIX_TOP_DEFAULT: f64 = 80.0;

/// Legend anchor, measured from the bottom-right canvas corner.
pub const LEGEND_OFFSET_X: f64 = 170.0;
pub const LEGEND_OFFSET_Y: f64 = 120.0;
pub const LEGEND_BOX_SIZE: f64 = 16.0;
pub const LEGEND_SPACING: f64 = 25.0;
pub const LEGEND_WIDTH: f64 = 150.0;

/// Approximate glyph advance used for word wrapping.
pub const WRAP_CHAR_WIDTH: f64 = 5.0;

// ── Palette ─────────────────────────────────────────────────────────

pub const COLOR_PRIMARY: &str = "#1E6F5C";
pub const COLOR_SECONDARY: &str = "#29BB89";
pub const COLOR_ACCENT: &str = "#289672";
pub const COLOR_BACKGROUND: &str = "#FFFFFF";
pub const COLOR_TEXT: &str = "#333333";
pub const COLOR_LIGHT_TEXT: &str = "#FFFFFF";
pub const COLOR_BORDER: &str = "#DDDDDD";
pub const COLOR_WATERMARK: &str = "rgba(0, 0, 0, 0.1)";
pub const COLOR_LEGEND_BACKGROUND: &str = "rgba(255, 255, 255, 0.8)";

/// Matrix cell gradients (top, bottom).
pub const MASTERED_GRADIENT: (&str, &str) = ("#48CFAD", "#A7FFEB");
pub const EMERGENT_GRADIENT: (&str, &str) = ("#FFCE54", "#FFE082");
pub const SUPERSEDED_GRADIENT: (&str, &str) = ("#9ED9C8", "#E0F5EF");

/// Bar chart colours (fill, border).
pub const CHART_MASTERED: (&str, &str) = ("#48CFAD", "#3DAA8B");
pub const CHART_EMERGENT: (&str, &str) = ("#FFCE54", "#E0B545");
pub const CHART_NOT_USED: (&str, &str) = ("#DDDDDD", "#B0B0B0");

// ── Text ────────────────────────────────────────────────────────────

pub const MATRIX_TITLE: &str = "PANVE";
pub const MATRIX_FOOTER: &str = "PANVE - Avaliação de Habilidades Comunicativas";
pub const DEFAULT_REPORT_NAME: &str = "Avaliação de Comunicação";
pub const CHART_TITLE: &str = "Percentual de Status por Pergunta (Seção/Nível)";
