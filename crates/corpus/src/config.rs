use std::path::PathBuf;

use annotate::{CompressionCodec, CompressionConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Raw documents: `<category>/<name>.txt`, one directory level deep.
pub const DEFAULT_DOC_PATTERN: &str = r"^[\w\s]+/[\w\s\-]+\.txt$";
/// Category is the first path segment.
pub const DEFAULT_CAT_PATTERN: &str = r"^([\w\s]+)/.*";
pub const DEFAULT_CACHE_EXTENSION: &str = "cache";

/// Where a corpus lives and which files belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub root: PathBuf,
    /// Regex over `/`-separated relative paths selecting documents.
    pub doc_pattern: String,
    /// Regex whose first capture group yields a document's category.
    pub cat_pattern: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("corpus"),
            doc_pattern: DEFAULT_DOC_PATTERN.to_string(),
            cat_pattern: DEFAULT_CAT_PATTERN.to_string(),
        }
    }
}

impl CorpusConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.root.as_os_str().is_empty() {
            return Err(CorpusError::InvalidConfig(
                "corpus root must not be empty".into(),
            ));
        }
        compile_pattern("doc_pattern", &self.doc_pattern)?;
        let cat = compile_pattern("cat_pattern", &self.cat_pattern)?;
        if cat.captures_len() < 2 {
            return Err(CorpusError::InvalidConfig(
                "cat_pattern needs a capture group for the category".into(),
            ));
        }
        Ok(())
    }
}

/// Annotation cache location and entry encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub root: PathBuf,
    /// Extension of entry files, without the dot.
    pub extension: String,
    pub compression: CompressionConfig,
    /// Skip re-annotating documents whose cached source digest still matches.
    pub reuse_fresh: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("corpus_cache"),
            extension: DEFAULT_CACHE_EXTENSION.to_string(),
            compression: CompressionConfig::default(),
            reuse_fresh: false,
        }
    }
}

impl CacheConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.root.as_os_str().is_empty() {
            return Err(CorpusError::InvalidConfig(
                "cache root must not be empty".into(),
            ));
        }
        if self.extension.is_empty() || !self.extension.chars().all(char::is_alphanumeric) {
            return Err(CorpusError::InvalidConfig(format!(
                "cache extension must be non-empty and alphanumeric, got {:?}",
                self.extension
            )));
        }
        if self.compression.codec == CompressionCodec::Zstd
            && !(1..=22).contains(&self.compression.level)
        {
            return Err(CorpusError::InvalidConfig(format!(
                "zstd level must be within 1..=22, got {}",
                self.compression.level
            )));
        }
        Ok(())
    }

    /// Document pattern matching cache entries laid out like their sources.
    pub fn doc_pattern(&self) -> String {
        entry_pattern(&self.extension)
    }
}

pub(crate) fn entry_pattern(extension: &str) -> String {
    format!(r"^[\w\s]+/[\w\s\-]+\.{}$", regex::escape(extension))
}

pub(crate) fn compile_pattern(name: &str, pattern: &str) -> Result<Regex, CorpusError> {
    Regex::new(pattern)
        .map_err(|e| CorpusError::InvalidConfig(format!("{name} is not a valid regex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        CorpusConfig::default().validate().expect("corpus defaults");
        CacheConfig::default().validate().expect("cache defaults");
    }

    #[test]
    fn bad_patterns_are_rejected() {
        let cfg = CorpusConfig {
            doc_pattern: "([".into(),
            ..CorpusConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CorpusError::InvalidConfig(_))));

        let cfg = CorpusConfig {
            cat_pattern: r"^[\w]+/.*".into(),
            ..CorpusConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CorpusError::InvalidConfig(_))));
    }

    #[test]
    fn cache_extension_and_level_are_checked() {
        let cfg = CacheConfig {
            extension: "tar.gz".into(),
            ..CacheConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = CacheConfig {
            compression: CompressionConfig::default().with_level(40),
            ..CacheConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = CacheConfig {
            compression: CompressionConfig::new(CompressionCodec::None, 40),
            ..CacheConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cache_pattern_follows_extension() {
        let cfg = CacheConfig {
            extension: "pickle".into(),
            ..CacheConfig::default()
        };
        let re = Regex::new(&cfg.doc_pattern()).expect("regex");
        assert!(re.is_match("A/doc1.pickle"));
        assert!(!re.is_match("A/doc1.txt"));
        assert!(!re.is_match("doc1.pickle"));
    }
}
