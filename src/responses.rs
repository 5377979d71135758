//! Assessment responses: the nested section → question → behavior map.
//!
//! Decoding is total. Any value that is not an object where an object is
//! expected decodes as an empty map, non-string answers are dropped, and
//! unknown section fields are ignored. Unknown question ids are kept so the
//! record round-trips, but nothing downstream renders or counts them.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PanveError;
use crate::response_key::ResponseKey;
use crate::types::{QuestionId, QuestionnaireSection, Status};

// ── Answer ──

/// Raw value stored under a behavior key.
///
/// The entry forms write `""` when a checkbox is cleared, so values outside
/// the three statuses do occur and are preserved as [`Answer::Other`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Answer {
    Status(Status),
    Other(String),
}

impl Answer {
    pub fn parse(s: &str) -> Answer {
        match Status::parse(s) {
            Some(status) => Answer::Status(status),
            None => Answer::Other(s.to_string()),
        }
    }

    pub fn status(&self) -> Option<Status> {
        match self {
            Answer::Status(s) => Some(*s),
            Answer::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Answer::Status(s) => s.as_str(),
            Answer::Other(s) => s,
        }
    }
}

impl From<Status> for Answer {
    fn from(status: Status) -> Self {
        Answer::Status(status)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::parse(s)
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Question responses ──

/// Answers for one question, keyed by behavior key (ordered by wire text).
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct QuestionResponses {
    answers: BTreeMap<ResponseKey, Answer>,
}

impl QuestionResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a question map. Non-objects give an empty map.
    pub fn from_json(value: &Value) -> Self {
        let mut answers = BTreeMap::new();
        if let Value::Object(map) = value {
            for (raw_key, raw_value) in map {
                if let Value::String(s) = raw_value {
                    answers.insert(ResponseKey::parse(raw_key), Answer::parse(s));
                }
            }
        }
        Self { answers }
    }

    pub fn insert(&mut self, key: ResponseKey, answer: impl Into<Answer>) {
        self.answers.insert(key, answer.into());
    }

    /// Insert from wire strings, as the entry forms do.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.answers.insert(ResponseKey::parse(key), Answer::parse(value));
    }

    pub fn get(&self, key: &ResponseKey) -> Option<&Answer> {
        self.answers.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResponseKey, &Answer)> {
        self.answers.iter()
    }

    /// Number of keys present, whatever their value.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True when any behavior of this question, at any level, is mastered.
    pub fn has_mastered(&self) -> bool {
        self.answers
            .values()
            .any(|a| a.status() == Some(Status::Mastered))
    }
}

impl<K: Into<ResponseKey>, A: Into<Answer>> FromIterator<(K, A)> for QuestionResponses {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(k, a)| (k.into(), a.into()))
                .collect(),
        }
    }
}

// ── Section responses ──

/// Question id → answers for one questionnaire section.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct SectionResponses {
    questions: BTreeMap<String, QuestionResponses>,
}

impl SectionResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Self {
        let mut questions = BTreeMap::new();
        if let Value::Object(map) = value {
            for (id, q) in map {
                questions.insert(id.clone(), QuestionResponses::from_json(q));
            }
        }
        Self { questions }
    }

    pub fn get(&self, id: QuestionId) -> Option<&QuestionResponses> {
        self.questions.get(&id.to_string())
    }

    pub fn insert(&mut self, id: QuestionId, responses: QuestionResponses) {
        self.questions.insert(id.to_string(), responses);
    }

    pub fn entry(&mut self, id: QuestionId) -> &mut QuestionResponses {
        self.questions.entry(id.to_string()).or_default()
    }

    /// Raw ids present, including ones outside the catalog.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// ── Responses ──

/// `Assessment.responses`: the sole input to the matrix and the report.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Responses {
    pub section_a: SectionResponses,
    pub section_b: SectionResponses,
    pub section_c: SectionResponses,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `{sectionA, sectionB, sectionC}`. Never fails.
    pub fn from_json(value: &Value) -> Self {
        let section = |s: QuestionnaireSection| {
            value
                .get(s.json_key())
                .map(SectionResponses::from_json)
                .unwrap_or_default()
        };
        Self {
            section_a: section(QuestionnaireSection::A),
            section_b: section(QuestionnaireSection::B),
            section_c: section(QuestionnaireSection::C),
        }
    }

    /// Decode a stored assessment (`{"responses": {...}, ...}`) or a bare
    /// responses object.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(match value.get("responses") {
            Some(inner) => Responses::from_json(inner),
            None => Responses::from_json(&value),
        })
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PanveError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn section(&self, section: QuestionnaireSection) -> &SectionResponses {
        match section {
            QuestionnaireSection::A => &self.section_a,
            QuestionnaireSection::B => &self.section_b,
            QuestionnaireSection::C => &self.section_c,
        }
    }

    pub fn section_mut(&mut self, section: QuestionnaireSection) -> &mut SectionResponses {
        match section {
            QuestionnaireSection::A => &mut self.section_a,
            QuestionnaireSection::B => &mut self.section_b,
            QuestionnaireSection::C => &mut self.section_c,
        }
    }

    /// Replace one whole section, as each questionnaire page does when it completes.
    pub fn replace_section(&mut self, section: QuestionnaireSection, responses: SectionResponses) {
        *self.section_mut(section) = responses;
    }

    pub fn question(&self, id: QuestionId) -> Option<&QuestionResponses> {
        self.section(id.section).get(id)
    }

    /// Record one answer.
    pub fn record(&mut self, id: QuestionId, key: ResponseKey, status: Status) {
        self.section_mut(id.section).entry(id).insert(key, status);
    }
}

impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(QuestionnaireSection::ALL.len()))?;
        for section in QuestionnaireSection::ALL {
            map.serialize_entry(section.json_key(), self.section(section))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Responses::from_json(&value))
    }
}
