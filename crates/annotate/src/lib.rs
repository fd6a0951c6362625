//! Corpus annotation layer.
//!
//! Owns the annotated document model and everything needed to produce and
//! persist it:
//!
//! - [`AnnotatedDocument`]: paragraphs → sentences → [`TaggedToken`]s, the unit
//!   the annotation cache stores.
//! - [`PosTagger`]: the collaborator seam for part-of-speech tagging, with
//!   [`LexiconTagger`] as a deterministic default.
//! - [`Annotator`]: applies a tagger per sentence and rejects any output that
//!   drops, merges, reorders or rewrites tokens.
//! - [`encode_entry`] / [`decode_entry`]: the versioned binary entry format,
//!   optionally zstd compressed.
//! - [`source_digest`]: SHA-256 of raw source bytes, stored with each entry so
//!   stale annotations can be detected.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use annotate::{decode_entry, encode_entry, Annotator, AnnotatedDocument, CacheEntry,
//!     CompressionConfig, LexiconTagger};
//!
//! let annotator = Annotator::new(Arc::new(LexiconTagger::new("rus")));
//! let sentence: Vec<String> = ["Он", "шел", "домой", "."].map(String::from).to_vec();
//! let doc = AnnotatedDocument::new(vec![vec![annotator.tag(&sentence).unwrap()]]);
//!
//! let entry = CacheEntry { source_digest: None, document: doc.clone() };
//! let bytes = encode_entry(&entry, &CompressionConfig::default()).unwrap();
//! assert_eq!(decode_entry(&bytes).unwrap().document, doc);
//! ```

mod annotator;
mod codec;
mod digest;
mod error;
mod tagger;
mod types;

pub use crate::annotator::Annotator;
pub use crate::codec::{
    decode_entry, encode_document, encode_entry, CacheEntry, CompressionCodec, CompressionConfig,
    CACHE_SCHEMA_VERSION,
};
pub use crate::digest::source_digest;
pub use crate::error::{AnnotateError, CodecError};
pub use crate::tagger::{LexiconTagger, PosTagger, TaggerConfig};
pub use crate::types::{AnnotatedDocument, Paragraph, Sentence, TaggedToken};
