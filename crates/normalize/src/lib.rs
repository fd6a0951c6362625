//! Token normalization for annotated documents.
//!
//! [`Normalizer`] turns an [`AnnotatedDocument`](annotate::AnnotatedDocument)
//! into a flat list of lowercase lemmas ready for vectorization:
//!
//! - tokens made only of Unicode punctuation are dropped,
//! - tokens in the language's [`StopwordSet`] are dropped,
//! - the rest are lemmatized by a [`Lemmatizer`] using the word class their
//!   tag maps to ([`WordNetPos::from_tag`]) and lowercased.
//!
//! The normalizer implements [`Transformer`], so it composes with stages that
//! do learn state; its `fit` is a no-op.
//!
//! ```
//! use std::sync::Arc;
//! use annotate::{AnnotatedDocument, TaggedToken};
//! use normalize::{IdentityLemmatizer, Normalizer, StopwordSet};
//!
//! let normalizer = Normalizer::new(
//!     StopwordSet::builtin("russian").unwrap(),
//!     Arc::new(IdentityLemmatizer),
//! );
//! let doc = AnnotatedDocument::new(vec![vec![vec![
//!     TaggedToken::new("Он", "SPRO"),
//!     TaggedToken::new("шел", "V"),
//!     TaggedToken::new(".", "NONLEX"),
//! ]]]);
//! assert_eq!(normalizer.normalize(&doc), vec!["шел"]);
//! ```

mod config;
mod error;
mod lemmatizer;
mod normalizer;
mod pos;
mod stopwords;
mod transformer;

pub use crate::config::NormalizeConfig;
pub use crate::error::NormalizeError;
pub use crate::lemmatizer::{DictionaryLemmatizer, IdentityLemmatizer, Lemmatizer};
pub use crate::normalizer::Normalizer;
pub use crate::pos::WordNetPos;
pub use crate::stopwords::{StopwordSet, BUILTIN_LANGUAGES};
pub use crate::transformer::Transformer;
