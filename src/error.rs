//! Error types for saving and exporting snapshots

use thiserror::Error;

/// Failure of a remote save attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("No spreadsheet endpoint URL configured")]
    MissingEndpoint,

    #[error("Client name is required before saving")]
    MissingClientName,

    /// Non-success status or network fault. Both collapse into this variant.
    #[error("Save request failed: {0}")]
    Transport(String),
}

impl SaveError {
    /// True when the save was rejected locally, before any network I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, SaveError::MissingEndpoint | SaveError::MissingClientName)
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed export: {0}")]
    Malformed(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
