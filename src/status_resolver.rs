//! Per-cell status resolution by majority vote.
//!
//! `resolve_status` counts `mastered` and `emergent` answers among the keys a
//! [`LevelFilter`] admits and returns:
//! - `Mastered` if mastered > emergent
//! - `Emergent` if emergent > mastered
//! - `NotUsed` otherwise, including 0/0
//!
//! An absent question map resolves to `NotUsed`.

use serde::Serialize;

use crate::responses::{QuestionResponses, Responses};
use crate::response_key::ResponseKey;
use crate::types::{ColumnId, Level, QuestionnaireSection, Status};

/// Which behavior keys take part in a vote.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelFilter {
    /// Every key (sections A and B).
    All,
    /// Only keys carrying this level prefix (section C).
    Level(Level),
}

impl LevelFilter {
    pub fn matches(&self, key: &ResponseKey) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Level(level) => key.level() == Some(*level),
        }
    }

    /// Filter used for a column of `section` drawn at `level`.
    pub fn for_cell(section: QuestionnaireSection, level: Level) -> LevelFilter {
        if section.has_level_prefix() {
            LevelFilter::Level(level)
        } else {
            LevelFilter::All
        }
    }
}

/// Vote counts for one question under one filter.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct StatusCounts {
    pub mastered: u32,
    pub emergent: u32,
}

impl StatusCounts {
    pub fn resolve(&self) -> Status {
        if self.mastered > self.emergent {
            Status::Mastered
        } else if self.emergent > self.mastered {
            Status::Emergent
        } else {
            Status::NotUsed
        }
    }
}

/// Full per-status tally, shared with the aggregation report.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct StatusTally {
    pub mastered: u32,
    pub emergent: u32,
    pub not_used: u32,
    /// Keys whose value is not one of the three statuses (e.g. a cleared checkbox).
    pub other: u32,
}

impl StatusTally {
    /// Keys holding one of the three statuses.
    pub fn evaluated(&self) -> u32 {
        self.mastered + self.emergent + self.not_used
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            mastered: self.mastered,
            emergent: self.emergent,
        }
    }
}

/// Count every answer of a question whose key passes `filter`.
pub fn tally_statuses(question: Option<&QuestionResponses>, filter: LevelFilter) -> StatusTally {
    let mut tally = StatusTally::default();
    let Some(question) = question else {
        return tally;
    };
    for (key, answer) in question.iter() {
        if !filter.matches(key) {
            continue;
        }
        match answer.status() {
            Some(Status::Mastered) => tally.mastered += 1,
            Some(Status::Emergent) => tally.emergent += 1,
            Some(Status::NotUsed) => tally.not_used += 1,
            None => tally.other += 1,
        }
    }
    tally
}

pub fn count_statuses(question: Option<&QuestionResponses>, filter: LevelFilter) -> StatusCounts {
    tally_statuses(question, filter).counts()
}

/// Majority vote over the filtered answers of one question.
pub fn resolve_status(question: Option<&QuestionResponses>, filter: LevelFilter) -> Status {
    count_statuses(question, filter).resolve()
}

/// Resolve the matrix cell (`column`, `level`).
///
/// The column's question is found by its numeric suffix in its own
/// questionnaire section. Cells outside the section's level span, and
/// missing responses, resolve to `NotUsed`.
pub fn resolve_cell(responses: Option<&Responses>, column: ColumnId, level: Level) -> Status {
    let Some(responses) = responses else {
        return Status::NotUsed;
    };
    if !column.section.level_span().contains(level) {
        return Status::NotUsed;
    }
    let question = responses.question(column.question_id());
    resolve_status(question, LevelFilter::for_cell(column.section, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(pairs: &[(&str, &str)]) -> QuestionResponses {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_majority_vote() {
        let q = question(&[("a:1", "mastered"), ("a:2", "mastered"), ("a:3", "emergent")]);
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::Mastered);

        let q = question(&[("a:1", "mastered"), ("a:2", "emergent"), ("a:3", "emergent")]);
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::Emergent);
    }

    #[test]
    fn test_ties_resolve_not_used() {
        let q = question(&[("a:1", "mastered"), ("a:2", "emergent")]);
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::NotUsed);

        let q = question(&[("a:1", "not-used"), ("a:2", "")]);
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::NotUsed);

        assert_eq!(resolve_status(None, LevelFilter::All), Status::NotUsed);
        assert_eq!(
            resolve_status(Some(&QuestionResponses::new()), LevelFilter::All),
            Status::NotUsed
        );
    }

    #[test]
    fn test_not_used_answers_do_not_vote() {
        let q = question(&[
            ("a:1", "emergent"),
            ("a:2", "not-used"),
            ("a:3", "not-used"),
            ("a:4", "not-used"),
        ]);
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::Emergent);
    }

    #[test]
    fn test_level_filter() {
        let q = question(&[
            ("Nível III:cat:beh1", "emergent"),
            ("Nível IV:cat:beh2", "mastered"),
        ]);
        let at = |n| LevelFilter::Level(Level::new(n).unwrap());
        assert_eq!(resolve_status(Some(&q), at(3)), Status::Emergent);
        assert_eq!(resolve_status(Some(&q), at(4)), Status::Mastered);
        for n in 5..=7 {
            assert_eq!(resolve_status(Some(&q), at(n)), Status::NotUsed);
        }
        assert_eq!(resolve_status(Some(&q), LevelFilter::All), Status::NotUsed);
    }

    #[test]
    fn test_tally() {
        let q = question(&[
            ("a:1", "mastered"),
            ("a:2", "emergent"),
            ("a:3", "not-used"),
            ("a:4", ""),
            ("a:5", "unknown"),
        ]);
        let tally = tally_statuses(Some(&q), LevelFilter::All);
        assert_eq!(
            tally,
            StatusTally {
                mastered: 1,
                emergent: 1,
                not_used: 1,
                other: 2
            }
        );
        assert_eq!(tally.evaluated(), 3);
    }

    #[test]
    fn test_resolve_cell_out_of_span() {
        let mut responses = Responses::new();
        responses.record(
            crate::types::QuestionId::parse("A.1").unwrap(),
            ResponseKey::parse("cat:beh"),
            Status::Mastered,
        );
        let a1 = ColumnId::parse("A1").unwrap();
        assert_eq!(resolve_cell(Some(&responses), a1, Level::new(1).unwrap()), Status::Mastered);
        assert_eq!(resolve_cell(Some(&responses), a1, Level::new(2).unwrap()), Status::NotUsed);
        assert_eq!(resolve_cell(None, a1, Level::new(1).unwrap()), Status::NotUsed);
    }
}
