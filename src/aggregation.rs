//! Per-question status percentages for the stacked bar chart.
//!
//! Two denominator policies are supported:
//!
//! | Policy | Denominator | Empty / absent question |
//! |--------|-------------|-------------------------|
//! | [`DenominatorPolicy::Evaluated`] (default) | keys holding one of the three statuses | 0 / 0 / 100 |
//! | [`DenominatorPolicy::Possible`] | catalog possible-behavior count | 0 / 0 / 100 |
//!
//! Under `Evaluated` the three shares of an assessed question sum to 100 and
//! "assessed as not-used" stays distinct from "not assessed". `Possible` is
//! the older chart behavior: everything not counted as mastered or emergent
//! is not-used, followed by a remainder correction to force a 100 total.
//!
//! Values are left unrounded. Formatting to one decimal place and the
//! tooltip's percent → count conversion are done by the helpers at the end
//! of this module, at the rendering boundary.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::constants::*;
use crate::responses::Responses;
use crate::status_resolver::{tally_statuses, LevelFilter, StatusTally};
use crate::types::{QuestionId, Status};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominatorPolicy {
    #[default]
    Evaluated,
    Possible,
}

impl DenominatorPolicy {
    pub fn parse(s: &str) -> Option<DenominatorPolicy> {
        match s.to_ascii_lowercase().as_str() {
            "evaluated" => Some(DenominatorPolicy::Evaluated),
            "possible" => Some(DenominatorPolicy::Possible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DenominatorPolicy::Evaluated => "evaluated",
            DenominatorPolicy::Possible => "possible",
        }
    }
}

/// Three-way split for one question, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Percentages {
    pub mastered: f64,
    pub emergent: f64,
    pub not_used: f64,
}

impl Percentages {
    pub const ALL_NOT_USED: Percentages = Percentages {
        mastered: 0.0,
        emergent: 0.0,
        not_used: 100.0,
    };

    pub fn get(&self, status: Status) -> f64 {
        match status {
            Status::Mastered => self.mastered,
            Status::Emergent => self.emergent,
            Status::NotUsed => self.not_used,
        }
    }

    pub fn total(&self) -> f64 {
        self.mastered + self.emergent + self.not_used
    }
}

/// Shares over the evaluated keys. No evaluated keys means fully not-used.
pub fn evaluated_percentages(tally: &StatusTally) -> Percentages {
    let evaluated = tally.evaluated();
    if evaluated == 0 {
        return Percentages::ALL_NOT_USED;
    }
    let d = evaluated as f64;
    Percentages {
        mastered: tally.mastered as f64 / d * 100.0,
        emergent: tally.emergent as f64 / d * 100.0,
        not_used: tally.not_used as f64 / d * 100.0,
    }
}

/// Shares over the catalog's possible-behavior count, with remainder correction.
pub fn possible_percentages(tally: Option<&StatusTally>, possible: u32) -> Percentages {
    let Some(tally) = tally else {
        return Percentages::ALL_NOT_USED;
    };
    if possible == 0 {
        return Percentages::ALL_NOT_USED;
    }
    let total = possible as f64;
    let responded = (tally.mastered + tally.emergent) as f64;
    let not_used_count = total - responded;

    let mut mastered = tally.mastered as f64 / total * 100.0;
    let mut emergent = tally.emergent as f64 / total * 100.0;
    let mut not_used = not_used_count / total * 100.0;

    let sum = mastered + emergent + not_used;
    if sum > 100.0 {
        let diff = sum - 100.0;
        if mastered >= emergent && mastered >= not_used {
            mastered -= diff;
        } else if emergent >= mastered && emergent >= not_used {
            emergent -= diff;
        } else {
            not_used -= diff;
        }
    } else if sum < 100.0 && not_used_count >= 0.0 {
        not_used += 100.0 - sum;
    }

    Percentages {
        mastered: mastered.max(0.0),
        emergent: emergent.max(0.0),
        not_used: not_used.max(0.0),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub question_id: QuestionId,
    pub title: String,
    #[serde(flatten)]
    pub percentages: Percentages,
    /// Denominator used: evaluated key count or possible-behavior count.
    pub denominator: u32,
}

impl SeriesEntry {
    /// Count behind a displayed share, as the chart tooltip reports it.
    pub fn count(&self, status: Status) -> u32 {
        reverse_count(self.percentages.get(status), self.denominator)
    }
}

/// One stacked-bar dataset for the charting surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartDataset {
    pub status: Status,
    pub label: &'static str,
    pub data: Vec<f64>,
    pub background: &'static str,
    pub border: &'static str,
}

/// Chart legend label and (fill, border) colours for a status.
pub fn dataset_style(status: Status) -> (&'static str, (&'static str, &'static str)) {
    match status {
        Status::Mastered => ("Dominado", CHART_MASTERED),
        Status::Emergent => ("Emergente", CHART_EMERGENT),
        Status::NotUsed => ("Não Usado/Não Respondido", CHART_NOT_USED),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub policy: DenominatorPolicy,
    pub entries: Vec<SeriesEntry>,
}

impl Series {
    pub fn entry(&self, id: QuestionId) -> Option<&SeriesEntry> {
        self.entries.iter().find(|e| e.question_id == id)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.question_id.to_string()).collect()
    }

    /// Datasets in stacking order: mastered, emergent, not-used.
    pub fn datasets(&self) -> Vec<ChartDataset> {
        Status::ALL
            .iter()
            .map(|&status| {
                let (label, (background, border)) = dataset_style(status);
                ChartDataset {
                    status,
                    label,
                    data: self
                        .entries
                        .iter()
                        .map(|e| e.percentages.get(status))
                        .collect(),
                    background,
                    border,
                }
            })
            .collect()
    }
}

/// Build the chart series for every catalog question, in canonical order.
pub fn build_series(
    responses: Option<&Responses>,
    catalog: &Catalog,
    policy: DenominatorPolicy,
) -> Series {
    let mut questions: Vec<_> = catalog.questions.iter().collect();
    questions.sort_by_key(|q| q.id);

    let entries: Vec<SeriesEntry> = questions
        .into_iter()
        .map(|q| {
            let answers = responses.and_then(|r| r.question(q.id));
            let tally = answers.map(|a| tally_statuses(Some(a), LevelFilter::All));
            let (percentages, denominator) = match policy {
                DenominatorPolicy::Evaluated => {
                    let tally = tally.unwrap_or_default();
                    (evaluated_percentages(&tally), tally.evaluated())
                }
                DenominatorPolicy::Possible => (
                    possible_percentages(tally.as_ref(), q.possible_behaviors),
                    q.possible_behaviors,
                ),
            };
            SeriesEntry {
                question_id: q.id,
                title: q.title.clone(),
                percentages,
                denominator,
            }
        })
        .collect();

    tracing::debug!(
        policy = policy.as_str(),
        questions = entries.len(),
        "built status series"
    );

    Series { policy, entries }
}

// ── Rendering-boundary helpers ──────────────────────────────────────

/// One decimal place and a percent sign: `33.333…` → `"33.3%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn tooltip_label(dataset_label: &str, value: f64) -> String {
    if dataset_label.is_empty() {
        format_percent(value)
    } else {
        format!("{}: {}", dataset_label, format_percent(value))
    }
}

/// Recover a behavior count from a share: `round(percent / 100 * denominator)`.
pub fn reverse_count(percent: f64, denominator: u32) -> u32 {
    (percent / 100.0 * denominator as f64).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_key::ResponseKey;

    fn tally(mastered: u32, emergent: u32, not_used: u32) -> StatusTally {
        StatusTally {
            mastered,
            emergent,
            not_used,
            other: 0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_evaluated_thirds() {
        let p = evaluated_percentages(&tally(1, 1, 1));
        assert!(approx(p.mastered, 100.0 / 3.0));
        assert!(approx(p.emergent, 100.0 / 3.0));
        assert!(approx(p.not_used, 100.0 / 3.0));
        assert!(approx(p.total(), 100.0));
    }

    #[test]
    fn test_evaluated_empty_is_not_used() {
        assert_eq!(evaluated_percentages(&tally(0, 0, 0)), Percentages::ALL_NOT_USED);
        let only_cleared = StatusTally {
            other: 4,
            ..StatusTally::default()
        };
        assert_eq!(evaluated_percentages(&only_cleared), Percentages::ALL_NOT_USED);
    }

    #[test]
    fn test_possible_policy() {
        let p = possible_percentages(Some(&tally(1, 1, 0)), 4);
        assert!(approx(p.mastered, 25.0));
        assert!(approx(p.emergent, 25.0));
        assert!(approx(p.not_used, 50.0));

        assert_eq!(possible_percentages(None, 4), Percentages::ALL_NOT_USED);
        assert_eq!(possible_percentages(Some(&tally(2, 0, 0)), 0), Percentages::ALL_NOT_USED);
    }

    #[test]
    fn test_possible_policy_overflow_clamps() {
        // More answers than the catalog says are possible
        let p = possible_percentages(Some(&tally(3, 2, 0)), 4);
        assert!(p.not_used >= 0.0);
        assert!(p.mastered >= 0.0 && p.emergent >= 0.0);
    }

    #[test]
    fn test_build_series_order_and_policy() {
        let catalog = Catalog::standard();
        let mut responses = Responses::new();
        let b2 = QuestionId::parse("B.2").unwrap();
        responses.record(b2, ResponseKey::parse("k:1"), Status::Mastered);
        responses.record(b2, ResponseKey::parse("k:2"), Status::Emergent);

        let series = build_series(Some(&responses), &catalog, DenominatorPolicy::Evaluated);
        assert_eq!(series.entries.len(), 24);
        assert_eq!(series.labels()[0], "A.1");
        assert_eq!(series.labels()[23], "C.17");
        let entry = series.entry(b2).unwrap();
        assert!(approx(entry.percentages.mastered, 50.0));
        assert_eq!(entry.denominator, 2);
        assert_eq!(entry.count(Status::Mastered), 1);

        let series = build_series(Some(&responses), &catalog, DenominatorPolicy::Possible);
        let entry = series.entry(b2).unwrap();
        assert_eq!(entry.denominator, 6);
        assert!(approx(entry.percentages.not_used, 400.0 / 6.0));
        assert_eq!(entry.count(Status::NotUsed), 4);
    }

    #[test]
    fn test_datasets() {
        let series = build_series(None, &Catalog::standard(), DenominatorPolicy::Evaluated);
        let datasets = series.datasets();
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[0].label, "Dominado");
        assert_eq!(datasets[0].background, "#48CFAD");
        assert_eq!(datasets[0].border, "#3DAA8B");
        assert_eq!(datasets[1].background, "#FFCE54");
        assert_eq!(datasets[2].border, "#B0B0B0");
        assert!(datasets[2].data.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_percent(100.0 / 3.0), "33.3%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(tooltip_label("Emergente", 12.26), "Emergente: 12.3%");
        assert_eq!(tooltip_label("", 50.0), "50.0%");
        assert_eq!(reverse_count(100.0 / 3.0, 3), 1);
        assert_eq!(reverse_count(66.7, 6), 4);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(DenominatorPolicy::parse("Possible"), Some(DenominatorPolicy::Possible));
        assert_eq!(DenominatorPolicy::parse("evaluated"), Some(DenominatorPolicy::Evaluated));
        assert_eq!(DenominatorPolicy::parse("other"), None);
    }
}
