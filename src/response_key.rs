//! Structured behavior keys.
//!
//! The data-entry forms store each answer under a composite string:
//! - sections A/B: `"<category>:<behavior>"`
//! - section C: `"Nível <roman>:<category>:<behavior>"` (levels III..VII)
//!
//! [`ResponseKey`] keeps the wire string as its identity and carries the
//! parsed parts alongside it. Two keys are equal only when their wire strings
//! are, so `"Nível III:x:y"` and `"Nível Nível III:x:y"` stay distinct answers
//! and every key writes back byte for byte. Parsing accepts `NÍVEL`/`nivel`
//! in any case, a case-insensitive numeral, and reads through the doubled
//! `"Nível Nível III:"` prefix the section-C form writes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::constants::LEVEL_KEY_WORD;
use crate::types::Level;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResponseKey {
    raw: String,
    level: Option<Level>,
    category: String,
    behavior: String,
}

impl ResponseKey {
    /// Build a key in the canonical wire shape.
    pub fn new(
        level: Option<Level>,
        category: impl Into<String>,
        behavior: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let behavior = behavior.into();
        let mut raw = String::new();
        if let Some(level) = level {
            raw.push_str(&format!("{} {}:", LEVEL_KEY_WORD, level.roman()));
        }
        if category.is_empty() && level.is_none() {
            raw.push_str(&behavior);
        } else {
            raw.push_str(&format!("{}:{}", category, behavior));
        }
        Self {
            raw,
            level,
            category,
            behavior,
        }
    }

    /// Key without a level prefix (sections A and B).
    pub fn unleveled(category: impl Into<String>, behavior: impl Into<String>) -> Self {
        Self::new(None, category, behavior)
    }

    /// Parse a wire key. Never fails: unrecognised prefixes stay part of the category.
    pub fn parse(raw: &str) -> Self {
        let (level, rest) = split_level_prefix(raw);
        let (category, behavior) = match rest.split_once(':') {
            Some((c, b)) => (c, b),
            None => ("", rest),
        };
        Self {
            raw: raw.to_string(),
            level,
            category: category.to_string(),
            behavior: behavior.to_string(),
        }
    }

    /// The wire string, exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }
}

impl PartialEq for ResponseKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ResponseKey {}

impl PartialOrd for ResponseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResponseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for ResponseKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

/// Strip one `Nível` word plus following whitespace, if present.
fn strip_level_word(s: &str) -> Option<&str> {
    let word_len: usize = s.chars().take(5).map(char::len_utf8).sum();
    let word = &s[..word_len];
    let lowered = word.to_lowercase();
    if lowered != "nível" && lowered != "nivel" {
        return None;
    }
    let rest = &s[word_len..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }
    Some(trimmed)
}

fn split_level_prefix(raw: &str) -> (Option<Level>, &str) {
    let mut cursor = raw;
    while let Some(after) = strip_level_word(cursor) {
        if let Some((token, tail)) = after.split_once(':') {
            if let Some(level) = Level::from_roman(token.trim()) {
                return (Some(level), tail);
            }
        }
        if strip_level_word(after).is_none() {
            break;
        }
        cursor = after;
    }
    (None, raw)
}

impl From<String> for ResponseKey {
    fn from(raw: String) -> Self {
        ResponseKey::parse(&raw)
    }
}

impl From<&str> for ResponseKey {
    fn from(raw: &str) -> Self {
        ResponseKey::parse(raw)
    }
}

impl From<ResponseKey> for String {
    fn from(key: ResponseKey) -> String {
        key.to_string()
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
