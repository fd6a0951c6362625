use std::path::PathBuf;

use annotate::AnnotateError;
use thiserror::Error;

use crate::id::DocumentId;

/// Errors produced while resolving, reading, annotating or caching corpus
/// documents.
///
/// Query and corpus-level failures are returned before a stream starts.
/// Document-level failures surface as a single `Err` item of the stream and
/// iteration continues with the next document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CorpusError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("corpus unavailable at {}: {reason}", root.display())]
    CorpusUnavailable { root: PathBuf, reason: String },
    #[error("failed to read document {id}: {reason}")]
    DocumentRead { id: DocumentId, reason: String },
    #[error("document {id} has no extractable content: {reason}")]
    UnparseableDocument { id: DocumentId, reason: String },
    #[error("cache target {} exists and is not a directory", path.display())]
    InvalidTarget { path: PathBuf },
    #[error("corrupt cache entry {id}: {reason}")]
    CorruptCacheEntry { id: DocumentId, reason: String },
    #[error("failed to write cache entry {}: {reason}", path.display())]
    CacheWrite { path: PathBuf, reason: String },
    #[error("annotation of {id} failed: {source}")]
    Annotate {
        id: DocumentId,
        source: AnnotateError,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CorpusError {
    /// Document the error is attributed to, if it is a per-document failure.
    pub fn document_id(&self) -> Option<&DocumentId> {
        match self {
            CorpusError::DocumentRead { id, .. }
            | CorpusError::UnparseableDocument { id, .. }
            | CorpusError::CorruptCacheEntry { id, .. }
            | CorpusError::Annotate { id, .. } => Some(id),
            _ => None,
        }
    }
}
