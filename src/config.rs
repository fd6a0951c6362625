//! YAML configuration for the whole pipeline.
//!
//! One file configures every stage. Sections may be omitted; each falls back
//! to its stage defaults.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "news corpus"
//! log_level: "info"
//! log_format: "json"
//!
//! corpus:
//!   root: "data/corpus"
//!   doc_pattern: '^[\w\s]+/[\w\s\-]+\.txt$'
//!   cat_pattern: '^([\w\s]+)/.*'
//!
//! cache:
//!   root: "data/corpus_cache"
//!   extension: "cache"
//!   compression:
//!     codec: "zstd"
//!     level: 3
//!   reuse_fresh: true
//!
//! extract:
//!   tags: ["h1", "h2", "h3", "h4", "h5", "h6", "p", "li"]
//!   collapse_whitespace: true
//!   min_paragraph_chars: 25
//!
//! annotate:
//!   language: "rus"
//!   default_tag: "S"
//!   lexicon_path: "data/lexicon.tsv"
//!
//! normalize:
//!   language: "russian"
//!   extra_stopwords: ["это"]
//!   lemma_dictionary: "data/lemmas.tsv"
//! ```

use std::fs;
use std::path::Path;

use annotate::TaggerConfig;
use corpus::{CacheConfig, CorpusConfig};
use extract::ExtractConfig;
use normalize::NormalizeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// How the binary renders log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Top-level configuration for the corpus pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub annotate: TaggerConfig,

    #[serde(default)]
    pub normalize: NormalizeConfig,
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the version and every stage section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        self.corpus.validate().map_err(stage("corpus"))?;
        self.cache.validate().map_err(stage("cache"))?;
        self.extract.validate().map_err(stage("extract"))?;
        self.annotate.validate().map_err(stage("annotate"))?;
        self.normalize.validate().map_err(stage("normalize"))?;
        if self.corpus.root == self.cache.root {
            return Err(ConfigLoadError::Validation(
                "cache.root must differ from corpus.root".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            corpus: CorpusConfig::default(),
            cache: CacheConfig::default(),
            extract: ExtractConfig::default(),
            annotate: TaggerConfig::default(),
            normalize: NormalizeConfig::default(),
        }
    }
}

fn stage<E: std::fmt::Display>(name: &'static str) -> impl Fn(E) -> ConfigLoadError {
    move |err| ConfigLoadError::Validation(format!("{name}: {err}"))
}

fn default_log_level() -> String {
    "info".to_string()
}
