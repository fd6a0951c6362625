use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::NormalizeError;
use crate::pos::WordNetPos;

/// Reduces a token to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str, pos: WordNetPos) -> String;
}

/// Returns every token unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, token: &str, _pos: WordNetPos) -> String {
        token.to_string()
    }
}

/// Lemma lookup keyed by lowercase form and word class. Unknown forms come
/// back unchanged.
///
/// The text format is one entry per line, `form<TAB>pos<TAB>lemma`, with
/// `pos` one of `n v a r`. Blank lines and lines starting with `#` are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    entries: HashMap<(WordNetPos, String), String>,
}

impl DictionaryLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NormalizeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| NormalizeError::Resource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut dict = Self::new();
        let loaded = dict.load(BufReader::new(file)).map_err(|err| match err {
            NormalizeError::Resource { reason, .. } => NormalizeError::Resource {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        debug!(path = %path.display(), entries = loaded, "lemma_dictionary_loaded");
        Ok(dict)
    }

    /// Adds entries from `reader`, returning how many were read.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize, NormalizeError> {
        let mut loaded = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| NormalizeError::Resource {
                path: Default::default(),
                reason: e.to_string(),
            })?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: &str| NormalizeError::Malformed {
                line: idx + 1,
                reason: reason.to_string(),
            };
            let mut fields = line.split('\t');
            let (Some(form), Some(pos), Some(lemma), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed("expected form<TAB>pos<TAB>lemma"));
            };
            let pos = WordNetPos::from_code(pos.trim())
                .ok_or_else(|| malformed("pos must be one of n, v, a, r"))?;
            if form.is_empty() || lemma.is_empty() {
                return Err(malformed("form and lemma must be non-empty"));
            }
            self.insert(form, pos, lemma);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn insert(&mut self, form: &str, pos: WordNetPos, lemma: &str) {
        self.entries
            .insert((pos, form.to_lowercase()), lemma.to_string());
    }

    pub fn with_entry(mut self, form: &str, pos: WordNetPos, lemma: &str) -> Self {
        self.insert(form, pos, lemma);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, token: &str, pos: WordNetPos) -> String {
        self.entries
            .get(&(pos, token.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }
}
