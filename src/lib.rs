//! # PANVE: Communication Matrix and Status Aggregation
//!
//! Derives a 7-level communication matrix from a completed PANVE
//! assessment, draws it, and aggregates per-question status percentages for
//! a stacked bar chart.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Decode | [`responses`], [`response_key`] | Total decoding of `{sectionA, sectionB, sectionC}` answer maps and structured `"Nível III:category:behavior"` keys |
//! | Resolve | [`status_resolver`] | Majority rule per (column, level): strict majority of mastered vs emergent, ties are `not-used` |
//! | Layout | [`matrix_layout`] | 92-cell grid over the [`catalog`], section widths, superseded hints |
//! | Aggregate | [`aggregation`] | Mastered / emergent / not-used shares per question under a [`aggregation::DenominatorPolicy`] |
//! | Draw | [`draw`], [`svg`], [`terminal`] | Declarative draw commands replayed onto an SVG or text surface |
//!
//! ## Questionnaire sections
//!
//! - **A** (3 questions) feeds level 1, pre-intentional behavior.
//! - **B** (4 questions) feeds level 2, intentional behavior.
//! - **C** (17 questions) feeds levels 3-7; each answer key carries the level
//!   as a roman numeral and only answers for the cell's level are counted.
//!
//! Matrix building and aggregation never fail: absent or malformed input
//! renders as an empty assessment. Only the I/O edges return
//! [`error::PanveError`].

pub mod aggregation;
pub mod catalog;
pub mod constants;
pub mod draw;
pub mod env_config;
pub mod error;
pub mod matrix_layout;
pub mod response_key;
pub mod responses;
pub mod server;
pub mod status_resolver;
pub mod svg;
pub mod terminal;
pub mod types;
