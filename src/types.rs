//! Core value types shared by the resolver, layout engine and reporter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::*;

// ── Status ──

/// Resolved mastery of a behavior, a question or a matrix cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Mastered,
    Emergent,
    NotUsed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Mastered, Status::Emergent, Status::NotUsed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Mastered => "mastered",
            Status::Emergent => "emergent",
            Status::NotUsed => "not-used",
        }
    }

    /// Exact match against the wire spelling. Anything else is not a status.
    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "mastered" => Some(Status::Mastered),
            "emergent" => Some(Status::Emergent),
            "not-used" => Some(Status::NotUsed),
            _ => None,
        }
    }

    /// Legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Mastered => "Dominado",
            Status::Emergent => "Emergente",
            Status::NotUsed => "Não usado",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Level ──

/// Communication level 1..=7 (pre-intentional through language).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const ALL: [Level; LEVEL_COUNT] = [
        Level(1),
        Level(2),
        Level(3),
        Level(4),
        Level(5),
        Level(6),
        Level(7),
    ];

    pub fn new(n: u8) -> Option<Level> {
        if (1..=LEVEL_COUNT as u8).contains(&n) {
            Some(Level(n))
        } else {
            None
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Zero-based row index in the matrix.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn roman(&self) -> &'static str {
        ROMAN_NUMERALS[self.index()]
    }

    /// Case-insensitive roman numeral lookup (`"iii"` and `"III"` both give level 3).
    pub fn from_roman(token: &str) -> Option<Level> {
        ROMAN_NUMERALS
            .iter()
            .position(|r| r.eq_ignore_ascii_case(token))
            .map(|i| Level(i as u8 + 1))
    }

    /// Questionnaire section whose questions describe this level.
    pub fn questionnaire_section(&self) -> QuestionnaireSection {
        match self.0 {
            1 => QuestionnaireSection::A,
            2 => QuestionnaireSection::B,
            _ => QuestionnaireSection::C,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Level::new(n).ok_or_else(|| format!("level must be 1..={}, got {}", LEVEL_COUNT, n))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Level span ──

/// Rows a matrix column occupies: one level, or an inclusive range.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LevelSpan {
    Single(Level),
    Range { from: Level, to: Level },
}

impl LevelSpan {
    pub fn contains(&self, level: Level) -> bool {
        match *self {
            LevelSpan::Single(l) => l == level,
            LevelSpan::Range { from, to } => from <= level && level <= to,
        }
    }

    pub fn first(&self) -> Level {
        match *self {
            LevelSpan::Single(l) => l,
            LevelSpan::Range { from, .. } => from,
        }
    }

    pub fn last(&self) -> Level {
        match *self {
            LevelSpan::Single(l) => l,
            LevelSpan::Range { to, .. } => to,
        }
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> {
        let (first, last) = (self.first().number(), self.last().number());
        (first..=last).filter_map(Level::new)
    }

    pub fn parse(s: &str) -> Option<LevelSpan> {
        match s.split_once('-') {
            None => s.trim().parse().ok().and_then(Level::new).map(LevelSpan::Single),
            Some((a, b)) => {
                let from = a.trim().parse().ok().and_then(Level::new)?;
                let to = b.trim().parse().ok().and_then(Level::new)?;
                if from > to {
                    return None;
                }
                if from == to {
                    Some(LevelSpan::Single(from))
                } else {
                    Some(LevelSpan::Range { from, to })
                }
            }
        }
    }
}

impl TryFrom<String> for LevelSpan {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        LevelSpan::parse(&s).ok_or_else(|| format!("invalid level span {:?}", s))
    }
}

impl From<LevelSpan> for String {
    fn from(span: LevelSpan) -> String {
        span.to_string()
    }
}

impl fmt::Display for LevelSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpan::Single(l) => write!(f, "{}", l),
            LevelSpan::Range { from, to } => write!(f, "{}-{}", from, to),
        }
    }
}

// ── Questionnaire sections ──

/// Data-entry grouping of questions: A (level 1), B (level 2), C (levels 3-7).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum QuestionnaireSection {
    A,
    B,
    C,
}

impl QuestionnaireSection {
    pub const ALL: [QuestionnaireSection; 3] = [
        QuestionnaireSection::A,
        QuestionnaireSection::B,
        QuestionnaireSection::C,
    ];

    pub fn letter(&self) -> char {
        match self {
            QuestionnaireSection::A => 'A',
            QuestionnaireSection::B => 'B',
            QuestionnaireSection::C => 'C',
        }
    }

    pub fn from_letter(c: char) -> Option<QuestionnaireSection> {
        match c {
            'A' => Some(QuestionnaireSection::A),
            'B' => Some(QuestionnaireSection::B),
            'C' => Some(QuestionnaireSection::C),
            _ => None,
        }
    }

    /// Field name of this section inside `Assessment.responses`.
    pub fn json_key(&self) -> &'static str {
        match self {
            QuestionnaireSection::A => "sectionA",
            QuestionnaireSection::B => "sectionB",
            QuestionnaireSection::C => "sectionC",
        }
    }

    pub fn question_count(&self) -> u8 {
        match self {
            QuestionnaireSection::A => SECTION_A_QUESTION_COUNT,
            QuestionnaireSection::B => SECTION_B_QUESTION_COUNT,
            QuestionnaireSection::C => SECTION_C_QUESTION_COUNT,
        }
    }

    /// Levels this section's questions are scored at.
    pub fn level_span(&self) -> LevelSpan {
        match self {
            QuestionnaireSection::A => LevelSpan::Single(Level(1)),
            QuestionnaireSection::B => LevelSpan::Single(Level(2)),
            QuestionnaireSection::C => LevelSpan::Range {
                from: Level(FIRST_SYMBOLIC_LEVEL),
                to: Level(LEVEL_COUNT as u8),
            },
        }
    }

    /// Whether keys in this section carry a `Nível <roman>:` prefix.
    pub fn has_level_prefix(&self) -> bool {
        matches!(self, QuestionnaireSection::C)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> {
        let section = *self;
        (1..=self.question_count()).map(move |number| QuestionId { section, number })
    }
}

// ── Question and column ids ──

/// Question identifier such as `"A.1"` or `"C.14"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId {
    pub section: QuestionnaireSection,
    pub number: u8,
}

impl QuestionId {
    pub fn new(section: QuestionnaireSection, number: u8) -> Self {
        Self { section, number }
    }

    pub fn parse(s: &str) -> Option<QuestionId> {
        let (letter, number) = s.split_once('.')?;
        let mut chars = letter.chars();
        let section = QuestionnaireSection::from_letter(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        let number: u8 = number.parse().ok()?;
        if number == 0 {
            return None;
        }
        Some(QuestionId { section, number })
    }

    /// Canonical order A.1..A.3, B.1..B.4, C.1..C.17.
    pub fn canonical() -> Vec<QuestionId> {
        QuestionnaireSection::ALL
            .iter()
            .flat_map(|s| s.question_ids())
            .collect()
    }

    /// Matrix column backed by this question.
    pub fn column_id(&self) -> ColumnId {
        ColumnId {
            section: self.section,
            number: self.number,
        }
    }
}

impl TryFrom<String> for QuestionId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        QuestionId::parse(&s).ok_or_else(|| format!("invalid question id {:?}", s))
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> String {
        id.to_string()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section.letter(), self.number)
    }
}

/// Matrix column identifier such as `"A1"` or `"C14"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnId {
    pub section: QuestionnaireSection,
    pub number: u8,
}

impl ColumnId {
    pub fn new(section: QuestionnaireSection, number: u8) -> Self {
        Self { section, number }
    }

    pub fn parse(s: &str) -> Option<ColumnId> {
        let mut chars = s.chars();
        let section = QuestionnaireSection::from_letter(chars.next()?)?;
        let number: u8 = chars.as_str().parse().ok()?;
        if number == 0 {
            return None;
        }
        Some(ColumnId { section, number })
    }

    /// Question looked up for this column: the numeric suffix within the same section.
    pub fn question_id(&self) -> QuestionId {
        QuestionId {
            section: self.section,
            number: self.number,
        }
    }
}

impl TryFrom<String> for ColumnId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ColumnId::parse(&s).ok_or_else(|| format!("invalid column id {:?}", s))
    }
}

impl From<ColumnId> for String {
    fn from(id: ColumnId) -> String {
        id.to_string()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section.letter(), self.number)
    }
}

// ── Matrix sections ──

/// Semantic grouping of communicative functions, orthogonal to questionnaire sections.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixSection {
    Recusar,
    Obter,
    Social,
    Informacao,
}

impl MatrixSection {
    pub const ALL: [MatrixSection; 4] = [
        MatrixSection::Recusar,
        MatrixSection::Obter,
        MatrixSection::Social,
        MatrixSection::Informacao,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixSection::Recusar => "recusar",
            MatrixSection::Obter => "obter",
            MatrixSection::Social => "social",
            MatrixSection::Informacao => "informacao",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MatrixSection::Recusar => "Recusar",
            MatrixSection::Obter => "Obter",
            MatrixSection::Social => "Social",
            MatrixSection::Informacao => "Informação",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_spelling() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("Mastered"), None);
        assert_eq!(Status::parse(""), None);
        assert_eq!(
            serde_json::to_string(&Status::NotUsed).unwrap(),
            "\"not-used\""
        );
    }

    #[test]
    fn test_level_roman() {
        assert_eq!(Level::from_roman("III"), Level::new(3));
        assert_eq!(Level::from_roman("vii"), Level::new(7));
        assert_eq!(Level::from_roman("VIII"), None);
        assert_eq!(Level::new(4).unwrap().roman(), "IV");
        assert_eq!(Level::new(0), None);
        assert_eq!(Level::new(8), None);
    }

    #[test]
    fn test_level_span_parse() {
        let span = LevelSpan::parse("3-7").unwrap();
        assert_eq!(span.levels().count(), 5);
        assert!(span.contains(Level::new(5).unwrap()));
        assert!(!span.contains(Level::new(2).unwrap()));
        assert_eq!(span.to_string(), "3-7");
        assert_eq!(LevelSpan::parse("2"), Some(LevelSpan::Single(Level::new(2).unwrap())));
        assert_eq!(LevelSpan::parse("7-3"), None);
        assert_eq!(LevelSpan::parse("0"), None);
    }

    #[test]
    fn test_question_and_column_ids() {
        let q = QuestionId::parse("C.14").unwrap();
        assert_eq!(q.section, QuestionnaireSection::C);
        assert_eq!(q.number, 14);
        assert_eq!(q.to_string(), "C.14");
        assert_eq!(q.column_id().to_string(), "C14");
        assert_eq!(ColumnId::parse("B3").unwrap().question_id().to_string(), "B.3");
        assert_eq!(QuestionId::parse("D.1"), None);
        assert_eq!(QuestionId::parse("A.0"), None);
        assert_eq!(QuestionId::parse("AB.1"), None);
        assert_eq!(ColumnId::parse("A"), None);
    }

    #[test]
    fn test_canonical_order() {
        let ids: Vec<String> = QuestionId::canonical().iter().map(|q| q.to_string()).collect();
        assert_eq!(ids.len(), QUESTION_COUNT);
        assert_eq!(ids[0], "A.1");
        assert_eq!(ids[3], "B.1");
        assert_eq!(ids[7], "C.1");
        assert_eq!(ids[23], "C.17");
    }
}
