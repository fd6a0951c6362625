//! Category-aware corpus readers.
//!
//! A corpus is a directory tree `<root>/<category>/<document>`. This crate
//! resolves queries against that tree and exposes two readers sharing one
//! [`CorpusSource`] contract:
//!
//! - [`RawCorpusSource`] reads raw HTML and derives paragraphs, sentences,
//!   tagged tokens and words on the fly.
//! - [`CachedCorpusSource`] reads annotated documents back from an
//!   [`AnnotationCache`] without touching the raw corpus.
//!
//! [`Preprocessor`] connects the two: it annotates every raw document once
//! and stores the result in the cache.
//!
//! Every stage is a lazy iterator of `Result` items. Query problems fail up
//! front; a document that cannot be read fails as one item and the stream
//! moves on; a document without extractable content is skipped with a
//! warning.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use annotate::{Annotator, LexiconTagger};
//! use corpus::{AnnotationCache, CachedCorpusSource, CorpusIndex, CorpusSource,
//!     Preprocessor, Query, RawCorpusSource};
//! use extract::TextExtractor;
//!
//! # fn main() -> Result<(), corpus::CorpusError> {
//! let raw = RawCorpusSource::new(
//!     CorpusIndex::open("corpus")?,
//!     TextExtractor::default(),
//!     Annotator::new(Arc::new(LexiconTagger::new("rus"))),
//! );
//! let cache = AnnotationCache::open("corpus_cache")?;
//! let preprocessor = Preprocessor::new(raw, cache.clone());
//! for path in preprocessor.transform(&Query::categories(["news"]))? {
//!     println!("wrote {}", path?.display());
//! }
//!
//! let cached = CachedCorpusSource::new(cache)?;
//! let words = cached.words(&Query::all())?.filter_map(Result::ok).count();
//! println!("{words} words cached");
//! # Ok(())
//! # }
//! ```

mod cache;
mod cached;
mod config;
mod error;
mod id;
mod index;
mod preprocess;
mod raw;
mod source;

pub use crate::cache::AnnotationCache;
pub use crate::cached::CachedCorpusSource;
pub use crate::config::{
    CacheConfig, CorpusConfig, DEFAULT_CACHE_EXTENSION, DEFAULT_CAT_PATTERN, DEFAULT_DOC_PATTERN,
};
pub use crate::error::CorpusError;
pub use crate::id::{DocumentId, Query};
pub use crate::index::CorpusIndex;
pub use crate::preprocess::Preprocessor;
pub use crate::raw::RawCorpusSource;
pub use crate::source::{CorpusSource, Stream};
