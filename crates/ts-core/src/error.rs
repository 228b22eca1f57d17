//! Error types for tariffstat

use std::path::PathBuf;

use thiserror::Error;

/// tariffstat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer/reader error outside of industry ingestion
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An industry source could not be read or is malformed.
    #[error("data load error for industry `{industry}` ({}): {reason}", .path.display())]
    DataLoad {
        /// Industry key from the mapping.
        industry: String,
        /// Source that failed.
        path: PathBuf,
        /// What went wrong, including row/column when known.
        reason: String,
    },

    /// A required column is missing or a derived column has not been built yet.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Insufficient or degenerate data for model fitting.
    #[error("Regression error: {0}")]
    Regression(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Build a [`Error::DataLoad`] for an industry source.
    pub fn data_load(
        industry: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DataLoad { industry: industry.into(), path: path.into(), reason: reason.into() }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
