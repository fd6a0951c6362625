use std::fmt;

use serde::{Deserialize, Serialize};

/// The four open word classes a lemmatizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordNetPos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordNetPos {
    /// Maps a tagger's part-of-speech tag onto a word class. Anything not in
    /// the table is treated as a noun.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "S" => WordNetPos::Noun,
            "V" => WordNetPos::Verb,
            "ADV" => WordNetPos::Adverb,
            "A" => WordNetPos::Adjective,
            _ => WordNetPos::Noun,
        }
    }

    /// Single-letter code (`n`, `v`, `a`, `r`).
    pub fn code(self) -> char {
        match self {
            WordNetPos::Noun => 'n',
            WordNetPos::Verb => 'v',
            WordNetPos::Adjective => 'a',
            WordNetPos::Adverb => 'r',
        }
    }

    /// Parses a single-letter code; `s` (satellite adjective) reads as `a`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(WordNetPos::Noun),
            "v" => Some(WordNetPos::Verb),
            "a" | "s" => Some(WordNetPos::Adjective),
            "r" => Some(WordNetPos::Adverb),
            _ => None,
        }
    }
}

impl fmt::Display for WordNetPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
