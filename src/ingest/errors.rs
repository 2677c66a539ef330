use std::path::PathBuf;
use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

/// Failures while turning one slice into CSV tables
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON or a missing required field
    #[error("Malformed slice {path}: {source}")]
    MalformedSlice {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A header can't be written without at least one row
    #[error("No rows to write for {0}")]
    EmptyTable(String),

    #[error("Slice file name has no suffix: {0}")]
    UnnamedSlice(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
