//! Shared environment configuration for the PANVE binaries.
//!
//! Consolidates the `PANVE_BASE_PATH`, `PANVE_PORT`, `PANVE_CATALOG` and
//! `PANVE_LOG` reads shared by `panve-server` and `panve-render`.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::catalog::Catalog;
use crate::error::Result;

pub const DEFAULT_LOG_FILTER: &str = "panve=info";
pub const DEFAULT_PORT: u16 = 9000;

/// Install the fmt subscriber, filtered by `PANVE_LOG` (default `panve=info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("PANVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Read `PANVE_BASE_PATH` (default `"."`) and chdir into it. Exits on failure.
pub fn init_base_path() -> PathBuf {
    let base_path = std::env::var("PANVE_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    if let Err(e) = std::env::set_current_dir(&path) {
        eprintln!("Failed to change directory to {}: {}", base_path, e);
        std::process::exit(1);
    }
    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!(cwd = %cwd.display(), "working directory");
    }
    path
}

/// Read `PANVE_PORT` (default 9000).
pub fn server_port() -> u16 {
    parse_port(std::env::var("PANVE_PORT").ok().as_deref())
}

fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Load the catalog named by `PANVE_CATALOG`, or the built-in one when unset.
pub fn catalog_from_env() -> Result<Catalog> {
    match std::env::var("PANVE_CATALOG") {
        Ok(path) if !path.trim().is_empty() => Catalog::load(path.trim()),
        _ => Ok(Catalog::standard()),
    }
}
