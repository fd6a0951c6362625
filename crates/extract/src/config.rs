//! Configuration for the extraction stage.
//!
//! [`ExtractConfig`] controls which structural tags become paragraphs and how
//! aggressively [`clean`](crate::TextExtractor::clean) keeps content around the
//! best-scoring container.
//!
//! # Examples
//!
//! ```rust
//! use extract::ExtractConfig;
//!
//! let config = ExtractConfig::default();
//! assert_eq!(config.tags.len(), 8);
//! assert!(config.collapse_whitespace);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Structural tags scanned for paragraph text, in no particular priority.
pub const DEFAULT_TAGS: [&str; 8] = ["h1", "h2", "h3", "h4", "h5", "h6", "p", "li"];

/// Runtime configuration for [`TextExtractor`](crate::TextExtractor).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    /// Element names whose text content is yielded as a paragraph.
    pub tags: Vec<String>,

    /// Collapse runs of whitespace inside each paragraph to a single space
    /// and trim the edges.
    pub collapse_whitespace: bool,

    /// Minimum number of characters a block needs before it contributes to
    /// the score of its container.
    pub min_paragraph_chars: usize,

    /// Fraction of the best container's score a sibling must reach to be kept
    /// next to it. Must lie in `0.0..=1.0`.
    pub sibling_threshold: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_string()).collect(),
            collapse_whitespace: true,
            min_paragraph_chars: 25,
            sibling_threshold: 0.2,
        }
    }
}

impl ExtractConfig {
    /// Checks the configuration before any document is processed.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.tags.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "at least one paragraph tag is required".into(),
            ));
        }
        if let Some(bad) = self
            .tags
            .iter()
            .find(|t| t.is_empty() || !t.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
        {
            return Err(ExtractError::InvalidConfig(format!(
                "tag {bad:?} must be a lowercase element name"
            )));
        }
        if !(0.0..=1.0).contains(&self.sibling_threshold) {
            return Err(ExtractError::InvalidConfig(format!(
                "sibling_threshold {} outside 0.0..=1.0",
                self.sibling_threshold
            )));
        }
        Ok(())
    }
}
