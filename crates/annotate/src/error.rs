use thiserror::Error;

/// Errors raised while tagging sentences or loading tagger resources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnnotateError {
    /// The tagger returned a different number of tokens than it was given.
    #[error("tagger returned {actual} tokens for a sentence of {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    /// The tagger reordered or rewrote a token.
    #[error("tagger changed token {position}: expected {expected:?}, got {actual:?}")]
    TokenMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
    #[error("tagger produced an empty tag for token {position}")]
    EmptyTag { position: usize },
    #[error("lexicon error: {0}")]
    Lexicon(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while encoding or decoding a cache entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    #[error("entry too short: {0} bytes")]
    Truncated(usize),
    #[error("not an annotated document entry (bad magic)")]
    BadMagic,
    #[error("unsupported entry schema version {0}")]
    UnsupportedVersion(u16),
    #[error("unknown compression codec tag {0}")]
    UnknownCodec(u8),
    #[error("compression failure: {0}")]
    Compression(String),
    #[error("encode failure: {0}")]
    Encode(String),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("{0} trailing bytes after entry body")]
    TrailingBytes(usize),
}
