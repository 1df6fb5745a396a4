//! Error types for record retrieval and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from fetching or decoding the record source.
///
/// Row-level problems (bad salary, bad year) are not errors; they are
/// filtered out during validation.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}
