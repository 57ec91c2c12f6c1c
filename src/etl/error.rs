use std::path::PathBuf;
use thiserror::Error;

/// Errors that fail the processing of a single input file.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog file {0:?} contains no record")]
    EmptyCatalogFile(PathBuf),

    #[error("Missing field '{field}' in {path:?} at line {line}")]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    #[error("Invalid value {value:?} for field '{field}' in {path:?} at line {line}")]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Timestamp {ts} out of range in {path:?} at line {line}")]
    InvalidTimestamp { path: PathBuf, line: usize, ts: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl EtlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }
}
