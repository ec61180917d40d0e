//! Auditor error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid mapping entry '{name}': {reason}")]
    InvalidMapping { name: String, reason: &'static str },
    #[error("no such file or directory: {0}")]
    MissingPath(PathBuf),
}
