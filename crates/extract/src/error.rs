use thiserror::Error;

/// Errors that can occur while extracting text from a raw document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The document has no recoverable main-content region.
    #[error("unparseable document: {0}")]
    Unparseable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
