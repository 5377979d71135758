//! Errors at the I/O boundary.
//!
//! Matrix building, status resolution and aggregation are total and never
//! return these. Only loading catalogs or response files and writing
//! rendered output can fail.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PanveError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog parsed but is internally inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl PanveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PanveError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PanveError>;
