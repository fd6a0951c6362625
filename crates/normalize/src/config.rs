use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Normalization resources, resolved once when the [`Normalizer`](crate::Normalizer)
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Selects the built-in stopword list unless `stopwords_path` is set.
    pub language: String,
    pub stopwords_path: Option<PathBuf>,
    pub extra_stopwords: Vec<String>,
    /// `form<TAB>pos<TAB>lemma` dictionary; tokens pass through unchanged
    /// when absent.
    pub lemma_dictionary: Option<PathBuf>,
    /// Also drop tokens whose lemma is a stopword.
    pub drop_stopword_lemmas: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            language: "russian".to_string(),
            stopwords_path: None,
            extra_stopwords: Vec::new(),
            lemma_dictionary: None,
            drop_stopword_lemmas: true,
        }
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.language.trim().is_empty() {
            return Err(NormalizeError::InvalidConfig(
                "language must not be empty".into(),
            ));
        }
        Ok(())
    }
}
