//! Sentence and word segmentation collaborators.
//!
//! The pipeline only orchestrates segmentation; the splitting itself is
//! pluggable through [`SentenceSplitter`] and [`WordTokenizer`]. Both must be
//! pure: the same input always yields the same segments.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Splits a paragraph into sentences, in order.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, paragraph: &str) -> Vec<String>;
}

/// Splits a sentence into tokens, in order.
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Vec<String>;
}

/// Sentence splitter based on the Unicode (UAX #29) sentence boundary rules.
///
/// Boundaries are language independent, so it works for Cyrillic and Latin
/// text alike. Segments are trimmed and blank segments dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split(&self, paragraph: &str) -> Vec<String> {
        paragraph
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Tokenizer that separates runs of word characters from runs of
/// punctuation: `\w+|[^\w\s]+`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPunctTokenizer;

static WORD_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").expect("word/punct pattern compiles"));

impl WordTokenizer for WordPunctTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        WORD_PUNCT
            .find_iter(sentence)
            .map(|m| m.as_str().to_owned())
            .collect()
    }
}
