//! Corpus text extraction layer.
//!
//! Turns one raw HTML document into readable text in four chained, lazy
//! stages:
//!
//! 1. [`TextExtractor::clean`] keeps only the main-content region of the page
//!    (boilerplate such as navigation, sidebars and comments is dropped).
//! 2. [`TextExtractor::extract_paragraphs`] walks the cleaned markup in
//!    document order and yields the text of every `h1`..`h6`, `p` and `li`.
//! 3. [`TextExtractor::split_sentences`] and
//! 4. [`TextExtractor::split_tokens`] delegate to pluggable
//!    [`SentenceSplitter`] / [`WordTokenizer`] collaborators.
//!
//! No I/O happens here. Reading files and deciding what to do with an
//! [`ExtractError::Unparseable`] document is the caller's business.
//!
//! ## Example
//!
//! ```
//! use extract::TextExtractor;
//!
//! let extractor = TextExtractor::default();
//! let cleaned = extractor.clean("<p>Он шел домой.</p>").unwrap();
//! let paras: Vec<String> = extractor.extract_paragraphs(&cleaned).collect();
//! assert_eq!(paras, vec!["Он шел домой."]);
//! assert_eq!(extractor.split_tokens(&paras[0]), vec!["Он", "шел", "домой", "."]);
//! ```

use std::sync::Arc;

mod clean;
mod config;
mod error;
mod html;
mod paragraphs;
mod segment;
mod whitespace;

pub use crate::clean::CleanedHtml;
pub use crate::config::{ExtractConfig, DEFAULT_TAGS};
pub use crate::error::ExtractError;
pub use crate::paragraphs::Paragraphs;
pub use crate::segment::{
    SentenceSplitter, UnicodeSentenceSplitter, WordPunctTokenizer, WordTokenizer,
};
pub use crate::whitespace::collapse_whitespace;

/// Cleans documents and peels them into paragraphs, sentences and tokens.
#[derive(Clone)]
pub struct TextExtractor {
    config: ExtractConfig,
    sentences: Arc<dyn SentenceSplitter>,
    words: Arc<dyn WordTokenizer>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            config: ExtractConfig::default(),
            sentences: Arc::new(UnicodeSentenceSplitter),
            words: Arc::new(WordPunctTokenizer),
        }
    }
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TextExtractor {
    /// Builds an extractor with the default segmenters.
    pub fn new(config: ExtractConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Replaces the sentence splitter.
    pub fn with_sentence_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.sentences = splitter;
        self
    }

    /// Replaces the word tokenizer.
    pub fn with_word_tokenizer(mut self, tokenizer: Arc<dyn WordTokenizer>) -> Self {
        self.words = tokenizer;
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Reduces raw HTML to its main-content region.
    ///
    /// Fails with [`ExtractError::Unparseable`] when the document holds no
    /// text outside boilerplate.
    pub fn clean(&self, raw_html: &str) -> Result<CleanedHtml, ExtractError> {
        clean::clean(raw_html, &self.config)
    }

    /// Text of each configured structural tag, in document order.
    pub fn extract_paragraphs(&self, cleaned: &CleanedHtml) -> Paragraphs {
        Paragraphs::new(
            cleaned,
            self.config.tags.clone(),
            self.config.collapse_whitespace,
        )
    }

    pub fn split_sentences(&self, paragraph: &str) -> Vec<String> {
        self.sentences.split(paragraph)
    }

    pub fn split_tokens(&self, sentence: &str) -> Vec<String> {
        self.words.tokenize(sentence)
    }
}
