use std::sync::Arc;

use annotate::AnnotatedDocument;
use tracing::debug;
use unicode_categories::UnicodeCategories;

use crate::config::NormalizeConfig;
use crate::error::NormalizeError;
use crate::lemmatizer::{DictionaryLemmatizer, IdentityLemmatizer, Lemmatizer};
use crate::pos::WordNetPos;
use crate::stopwords::StopwordSet;
use crate::transformer::Transformer;

/// Flattens annotated documents into lowercase lemmas, dropping punctuation
/// and stopwords.
#[derive(Clone)]
pub struct Normalizer {
    stopwords: StopwordSet,
    lemmatizer: Arc<dyn Lemmatizer>,
    drop_stopword_lemmas: bool,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("language", &self.stopwords.language())
            .field("stopwords", &self.stopwords.len())
            .field("drop_stopword_lemmas", &self.drop_stopword_lemmas)
            .finish_non_exhaustive()
    }
}

impl Normalizer {
    pub fn new(stopwords: StopwordSet, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self {
            stopwords,
            lemmatizer,
            drop_stopword_lemmas: true,
        }
    }

    /// Loads stopwords and the lemma dictionary named by `cfg`.
    pub fn from_config(cfg: &NormalizeConfig) -> Result<Self, NormalizeError> {
        cfg.validate()?;
        let mut stopwords = match &cfg.stopwords_path {
            Some(path) => StopwordSet::from_path(&cfg.language, path)?,
            None => StopwordSet::builtin(&cfg.language)?,
        };
        stopwords.extend(&cfg.extra_stopwords);
        let lemmatizer: Arc<dyn Lemmatizer> = match &cfg.lemma_dictionary {
            Some(path) => Arc::new(DictionaryLemmatizer::from_path(path)?),
            None => Arc::new(IdentityLemmatizer),
        };
        debug!(
            language = %cfg.language,
            stopwords = stopwords.len(),
            "normalizer_ready"
        );
        Ok(Self::new(stopwords, lemmatizer).with_drop_stopword_lemmas(cfg.drop_stopword_lemmas))
    }

    pub fn with_drop_stopword_lemmas(mut self, enabled: bool) -> Self {
        self.drop_stopword_lemmas = enabled;
        self
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// True when every character is Unicode punctuation. The empty token
    /// counts as punctuation.
    pub fn is_punct(&self, token: &str) -> bool {
        token.chars().all(|c| c.is_punctuation())
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lemma of `token` for the word class its tag maps to.
    pub fn lemmatize(&self, token: &str, tag: &str) -> String {
        self.lemmatizer.lemmatize(token, WordNetPos::from_tag(tag))
    }

    /// Lowercase lemmas of the kept tokens, in document order.
    pub fn normalize(&self, document: &AnnotatedDocument) -> Vec<String> {
        let out: Vec<String> = document
            .tagged()
            .filter(|t| !self.is_punct(&t.token) && !self.is_stopword(&t.token))
            .map(|t| self.lemmatize(&t.token, &t.tag).to_lowercase())
            .filter(|lemma| !(self.drop_stopword_lemmas && self.is_stopword(lemma)))
            .collect();
        debug!(
            tokens_in = document.token_count(),
            tokens_out = out.len(),
            "normalize_document"
        );
        out
    }

    /// Normalizes a stream of fallible documents, passing errors through.
    pub fn try_transform<'a, I, E>(
        &'a self,
        documents: I,
    ) -> impl Iterator<Item = Result<Vec<String>, E>> + 'a
    where
        I: IntoIterator<Item = Result<AnnotatedDocument, E>>,
        I::IntoIter: 'a,
    {
        documents
            .into_iter()
            .map(move |doc| doc.map(|doc| self.normalize(&doc)))
    }
}

impl Transformer for Normalizer {
    type Input = AnnotatedDocument;
    type Output = Vec<String>;

    fn transform_one(&self, input: AnnotatedDocument) -> Vec<String> {
        self.normalize(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate::TaggedToken;

    fn doc(tokens: &[(&str, &str)]) -> AnnotatedDocument {
        AnnotatedDocument::new(vec![vec![tokens
            .iter()
            .map(|(w, t)| TaggedToken::new(*w, *t))
            .collect()]])
    }

    fn russian() -> Normalizer {
        Normalizer::new(
            StopwordSet::builtin("russian").expect("stopwords"),
            Arc::new(IdentityLemmatizer),
        )
    }

    #[test]
    fn drops_punctuation_and_stopwords() {
        let out = russian().normalize(&doc(&[
            ("Он", "SPRO"),
            ("шел", "V"),
            ("Домой", "ADV"),
            (".", "NONLEX"),
        ]));
        assert_eq!(out, vec!["шел", "домой"]);
    }

    #[test]
    fn punctuation_only_document_is_empty() {
        let out = russian().normalize(&doc(&[
            ("...", "NONLEX"),
            ("«", "NONLEX"),
            ("!?", "NONLEX"),
            ("", "NONLEX"),
        ]));
        assert!(out.is_empty());
    }

    #[test]
    fn mixed_tokens_are_not_punctuation() {
        let n = russian();
        assert!(n.is_punct("—"));
        assert!(!n.is_punct("a."));
        assert!(!n.is_punct("+"));
        assert!(!n.is_punct("42"));
    }

    #[test]
    fn lemmas_follow_mapped_word_class() {
        let dict = DictionaryLemmatizer::new()
            .with_entry("Стали", WordNetPos::Verb, "стать")
            .with_entry("стали", WordNetPos::Noun, "Сталь");
        let n = Normalizer::new(StopwordSet::default(), Arc::new(dict));
        assert_eq!(n.lemmatize("стали", "V"), "стать");
        assert_eq!(n.lemmatize("стали", "S"), "Сталь");
        assert_eq!(n.lemmatize("стали", "UNKNOWN"), "Сталь");
        assert_eq!(n.normalize(&doc(&[("стали", "S")])), vec!["сталь"]);
    }

    #[test]
    fn stopword_lemmas_are_dropped() {
        let dict = DictionaryLemmatizer::new().with_entry("его", WordNetPos::Noun, "он");
        let stopwords = StopwordSet::new("test", ["он"]);
        let n = Normalizer::new(stopwords.clone(), Arc::new(dict.clone()));
        assert!(n.normalize(&doc(&[("его", "S")])).is_empty());

        let keep = Normalizer::new(stopwords, Arc::new(dict)).with_drop_stopword_lemmas(false);
        assert_eq!(keep.normalize(&doc(&[("его", "S")])), vec!["он"]);
    }

    #[test]
    fn boundaries_are_flattened_in_order() {
        let document = AnnotatedDocument::new(vec![
            vec![
                vec![TaggedToken::new("пять", "NUM")],
                vec![TaggedToken::new("красный", "A")],
            ],
            vec![vec![TaggedToken::new("дом", "S")]],
        ]);
        assert_eq!(
            russian().normalize(&document),
            vec!["пять", "красный", "дом"]
        );
    }

    #[test]
    fn fit_is_a_no_op_and_transform_is_lazy() {
        let n = russian().fit(Vec::<AnnotatedDocument>::new());
        let docs = vec![doc(&[("дом", "S")]), doc(&[(",", "NONLEX")])];
        let mut out = n.transform(docs);
        assert_eq!(out.next(), Some(vec!["дом".to_string()]));
        assert_eq!(out.next(), Some(Vec::new()));
        assert_eq!(out.next(), None);
    }

    #[test]
    fn try_transform_forwards_errors() {
        let n = russian();
        let items: Vec<Result<AnnotatedDocument, String>> =
            vec![Ok(doc(&[("дом", "S")])), Err("broken".into())];
        let out: Vec<_> = n.try_transform(items).collect();
        assert_eq!(out, vec![Ok(vec!["дом".to_string()]), Err("broken".to_string())]);
    }

    #[test]
    fn built_from_config() {
        let cfg = NormalizeConfig {
            extra_stopwords: vec!["дом".into()],
            ..NormalizeConfig::default()
        };
        let n = Normalizer::from_config(&cfg).expect("normalizer");
        assert!(n.is_stopword("Дом"));
        assert!(n.is_stopword("и"));

        let bad = NormalizeConfig {
            language: "klingon".into(),
            ..NormalizeConfig::default()
        };
        assert!(matches!(
            Normalizer::from_config(&bad),
            Err(NormalizeError::UnknownLanguage(_))
        ));
    }
}
