use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading normalization resources.
///
/// Normalizing a document never fails; only setup does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    #[error("no built-in stopword list for language {0:?}")]
    UnknownLanguage(String),
    #[error("failed to read {}: {reason}", path.display())]
    Resource { path: PathBuf, reason: String },
    #[error("malformed entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
