//! Part-of-speech tagger collaborators.
//!
//! [`PosTagger`] is the seam where a real statistical tagger plugs in. The
//! crate ships [`LexiconTagger`], a deterministic best-effort tagger: exact
//! lexicon hits first, then the longest matching suffix rule, then a default
//! tag. It never leaves a token untagged.
//!
//! Tags follow the Russian National Corpus tagset used by the normalizer
//! (`S`, `A`, `V`, `ADV`, `PR`, `CONJ`, `PART`, `SPRO`, `NUM`, `NONLEX`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::error::AnnotateError;
use crate::types::TaggedToken;

/// Tags a sentence of tokens. Implementations must return exactly one tagged
/// token per input token, in input order, with the token text unchanged.
pub trait PosTagger: Send + Sync {
    /// Language code the tagger was built for (for example `rus`).
    fn language(&self) -> &str;

    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken>;
}

/// Configuration for [`LexiconTagger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub language: String,
    /// Tag for tokens no rule recognises.
    pub default_tag: String,
    /// Tag for tokens made only of punctuation or symbols.
    pub punct_tag: String,
    /// Tag for tokens made only of digits.
    pub number_tag: String,
    /// Optional `form<TAB>tag` file merged over the built-in lexicon.
    pub lexicon_path: Option<PathBuf>,
    /// Load the built-in lexicon and suffix rules for `language`.
    pub builtin_rules: bool,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            language: "rus".into(),
            default_tag: "S".into(),
            punct_tag: "NONLEX".into(),
            number_tag: "NUM".into(),
            lexicon_path: None,
            builtin_rules: true,
        }
    }
}

impl TaggerConfig {
    pub fn validate(&self) -> Result<(), AnnotateError> {
        for (field, value) in [
            ("language", &self.language),
            ("default_tag", &self.default_tag),
            ("punct_tag", &self.punct_tag),
            ("number_tag", &self.number_tag),
        ] {
            if value.trim().is_empty() {
                return Err(AnnotateError::InvalidConfig(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

const RUSSIAN_LEXICON: &[(&str, &str)] = &[
    ("в", "PR"), ("во", "PR"), ("на", "PR"), ("с", "PR"), ("со", "PR"), ("к", "PR"),
    ("ко", "PR"), ("по", "PR"), ("из", "PR"), ("у", "PR"), ("о", "PR"), ("об", "PR"),
    ("от", "PR"), ("за", "PR"), ("для", "PR"), ("до", "PR"), ("без", "PR"), ("под", "PR"),
    ("над", "PR"), ("при", "PR"), ("про", "PR"), ("через", "PR"), ("между", "PR"),
    ("и", "CONJ"), ("а", "CONJ"), ("но", "CONJ"), ("или", "CONJ"), ("что", "CONJ"),
    ("как", "CONJ"), ("если", "CONJ"), ("чтобы", "CONJ"), ("когда", "CONJ"), ("да", "CONJ"),
    ("не", "PART"), ("ни", "PART"), ("же", "PART"), ("ли", "PART"), ("бы", "PART"),
    ("вот", "PART"), ("только", "PART"), ("даже", "PART"),
    ("я", "SPRO"), ("ты", "SPRO"), ("он", "SPRO"), ("она", "SPRO"), ("оно", "SPRO"),
    ("мы", "SPRO"), ("вы", "SPRO"), ("они", "SPRO"), ("его", "SPRO"), ("ее", "SPRO"),
    ("их", "SPRO"), ("меня", "SPRO"), ("тебя", "SPRO"), ("нас", "SPRO"), ("вас", "SPRO"),
    ("домой", "ADV"), ("очень", "ADV"), ("тоже", "ADV"), ("также", "ADV"), ("уже", "ADV"),
    ("еще", "ADV"), ("здесь", "ADV"), ("там", "ADV"), ("тут", "ADV"), ("теперь", "ADV"),
    ("всегда", "ADV"), ("никогда", "ADV"), ("сегодня", "ADV"), ("вчера", "ADV"),
    ("завтра", "ADV"), ("быстро", "ADV"), ("медленно", "ADV"),
];

const RUSSIAN_SUFFIXES: &[(&str, &str)] = &[
    ("ться", "V"), ("тся", "V"), ("ть", "V"), ("ти", "V"), ("ешь", "V"), ("ишь", "V"),
    ("ет", "V"), ("ит", "V"), ("ют", "V"), ("ут", "V"), ("ат", "V"), ("ят", "V"),
    ("ал", "V"), ("ала", "V"), ("али", "V"), ("ил", "V"), ("ила", "V"), ("или", "V"),
    ("ел", "V"), ("ела", "V"), ("ели", "V"), ("ого", "A"), ("его", "A"), ("ому", "A"),
    ("ему", "A"), ("ый", "A"), ("ий", "A"), ("ая", "A"), ("яя", "A"), ("ое", "A"),
    ("ые", "A"), ("ие", "A"), ("ых", "A"), ("ую", "A"), ("ски", "ADV"),
];

/// Deterministic dictionary-and-suffix tagger.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    language: String,
    lexicon: HashMap<String, String>,
    /// Sorted longest first so the most specific rule wins.
    suffixes: Vec<(String, String)>,
    default_tag: String,
    punct_tag: String,
    number_tag: String,
}

impl LexiconTagger {
    /// Tagger with the built-in rules for `language` and default tags.
    pub fn new(language: impl Into<String>) -> Self {
        let cfg = TaggerConfig {
            language: language.into(),
            ..TaggerConfig::default()
        };
        Self::with_rules(&cfg)
    }

    /// Builds a tagger from configuration, loading the optional lexicon file.
    pub fn from_config(cfg: &TaggerConfig) -> Result<Self, AnnotateError> {
        cfg.validate()?;
        let mut tagger = Self::with_rules(cfg);
        if let Some(path) = &cfg.lexicon_path {
            let file = File::open(path).map_err(|e| {
                AnnotateError::Lexicon(format!("cannot open {}: {e}", path.display()))
            })?;
            let loaded = tagger.load_lexicon(BufReader::new(file))?;
            tracing::debug!(path = %path.display(), entries = loaded, "lexicon_loaded");
        }
        Ok(tagger)
    }

    fn with_rules(cfg: &TaggerConfig) -> Self {
        let mut tagger = Self {
            language: cfg.language.clone(),
            lexicon: HashMap::new(),
            suffixes: Vec::new(),
            default_tag: cfg.default_tag.clone(),
            punct_tag: cfg.punct_tag.clone(),
            number_tag: cfg.number_tag.clone(),
        };
        if cfg.builtin_rules && matches!(cfg.language.as_str(), "rus" | "ru" | "russian") {
            for (form, tag) in RUSSIAN_LEXICON {
                tagger.lexicon.insert((*form).to_string(), (*tag).to_string());
            }
            for (suffix, tag) in RUSSIAN_SUFFIXES {
                tagger = tagger.with_suffix(*suffix, *tag);
            }
        }
        tagger
    }

    pub fn with_entry(mut self, form: &str, tag: impl Into<String>) -> Self {
        self.lexicon.insert(form.to_lowercase(), tag.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>, tag: impl Into<String>) -> Self {
        self.suffixes.push((suffix.into(), tag.into()));
        self.suffixes
            .sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        self
    }

    /// Merges `form<TAB>tag` lines into the lexicon. Blank lines and lines
    /// starting with `#` are ignored. Returns the number of entries read.
    pub fn load_lexicon<R: BufRead>(&mut self, reader: R) -> Result<usize, AnnotateError> {
        let mut loaded = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| AnnotateError::Lexicon(e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(form), Some(tag), None) if !form.is_empty() && !tag.trim().is_empty() => {
                    self.lexicon.insert(form.to_lowercase(), tag.trim().to_string());
                    loaded += 1;
                }
                _ => {
                    return Err(AnnotateError::Lexicon(format!(
                        "line {}: expected `form<TAB>tag`",
                        idx + 1
                    )))
                }
            }
        }
        Ok(loaded)
    }

    fn tag_token(&self, token: &str) -> &str {
        if !token.is_empty() && token.chars().all(|c| c.is_punctuation() || c.is_symbol()) {
            return &self.punct_tag;
        }
        if !token.is_empty() && token.chars().all(char::is_numeric) {
            return &self.number_tag;
        }
        let lower = token.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag;
        }
        let len = lower.chars().count();
        self.suffixes
            .iter()
            .find(|(suffix, _)| len > suffix.chars().count() + 1 && lower.ends_with(suffix.as_str()))
            .map_or(self.default_tag.as_str(), |(_, tag)| tag.as_str())
    }
}

impl PosTagger for LexiconTagger {
    fn language(&self) -> &str {
        &self.language
    }

    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|token| TaggedToken::new(token.clone(), self.tag_token(token)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tagger: &LexiconTagger, tokens: &[&str]) -> Vec<String> {
        let tokens: Vec<String> = tokens.iter().map(|t| (*t).to_string()).collect();
        tagger.tag(&tokens).into_iter().map(|t| t.tag).collect()
    }

    #[test]
    fn russian_rules_tag_a_simple_sentence() {
        let tagger = LexiconTagger::new("rus");
        assert_eq!(
            tags(&tagger, &["Он", "шел", "домой", "."]),
            vec!["SPRO", "S", "ADV", "NONLEX"]
        );
        assert_eq!(
            tags(&tagger, &["читать", "красивый", "2024", "«"]),
            vec!["V", "A", "NUM", "NONLEX"]
        );
    }

    #[test]
    fn unknown_tokens_get_the_default_tag() {
        let tagger = LexiconTagger::new("eng");
        assert_eq!(tags(&tagger, &["walked", ""]), vec!["S", "S"]);
    }

    #[test]
    fn lexicon_file_overrides_rules() {
        let mut tagger = LexiconTagger::new("rus");
        let loaded = tagger
            .load_lexicon("# comment\nшел\tV\n\nкот\tS\n".as_bytes())
            .expect("lexicon loads");
        assert_eq!(loaded, 2);
        assert_eq!(tags(&tagger, &["Шел"]), vec!["V"]);
    }

    #[test]
    fn malformed_lexicon_line_reports_position() {
        let mut tagger = LexiconTagger::new("rus");
        let err = tagger
            .load_lexicon("кот\tS\nбез-тега\n".as_bytes())
            .expect_err("second line is malformed");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn longest_suffix_wins() {
        let tagger = LexiconTagger::new("xx")
            .with_suffix("s", "PLURAL")
            .with_suffix("ness", "NOUN");
        assert_eq!(tags(&tagger, &["kindness", "cats"]), vec!["NOUN", "PLURAL"]);
    }

    #[test]
    fn config_rejects_empty_tags() {
        let cfg = TaggerConfig {
            default_tag: " ".into(),
            ..Default::default()
        };
        assert!(matches!(
            LexiconTagger::from_config(&cfg),
            Err(AnnotateError::InvalidConfig(_))
        ));
    }
}
