use std::sync::Arc;

use crate::error::AnnotateError;
use crate::tagger::PosTagger;
use crate::types::{Paragraph, Sentence};

/// Applies a [`PosTagger`] one sentence at a time and enforces the shape
/// contract: one tagged token per input token, same order, same text.
#[derive(Clone)]
pub struct Annotator {
    tagger: Arc<dyn PosTagger>,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("language", &self.tagger.language())
            .finish()
    }
}

impl Annotator {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn language(&self) -> &str {
        self.tagger.language()
    }

    /// Tags a single sentence.
    pub fn tag(&self, sentence: &[String]) -> Result<Sentence, AnnotateError> {
        let tagged = self.tagger.tag(sentence);
        if tagged.len() != sentence.len() {
            return Err(AnnotateError::ShapeMismatch {
                expected: sentence.len(),
                actual: tagged.len(),
            });
        }
        for (position, (input, output)) in sentence.iter().zip(&tagged).enumerate() {
            if *input != output.token {
                return Err(AnnotateError::TokenMismatch {
                    position,
                    expected: input.clone(),
                    actual: output.token.clone(),
                });
            }
            if output.tag.is_empty() {
                return Err(AnnotateError::EmptyTag { position });
            }
        }
        Ok(tagged)
    }

    /// Tags every sentence of a paragraph, keeping sentence boundaries.
    pub fn tag_paragraph<I>(&self, sentences: I) -> Result<Paragraph, AnnotateError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        sentences
            .into_iter()
            .map(|sentence| self.tag(&sentence))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::LexiconTagger;
    use crate::types::TaggedToken;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    struct Dropping;
    impl PosTagger for Dropping {
        fn language(&self) -> &str {
            "xx"
        }
        fn tag(&self, tokens: &[String]) -> Vec<TaggedToken> {
            tokens.iter().skip(1).map(|t| TaggedToken::new(t.clone(), "X")).collect()
        }
    }

    struct Rewriting;
    impl PosTagger for Rewriting {
        fn language(&self) -> &str {
            "xx"
        }
        fn tag(&self, tokens: &[String]) -> Vec<TaggedToken> {
            tokens
                .iter()
                .map(|t| TaggedToken::new(t.to_lowercase(), "X"))
                .collect()
        }
    }

    #[test]
    fn tagging_preserves_count_and_order() {
        let annotator = Annotator::new(Arc::new(LexiconTagger::new("rus")));
        let sentence = tokens(&["Он", "шел", "домой", "."]);
        let tagged = annotator.tag(&sentence).expect("tags");
        let words: Vec<&str> = tagged.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(words, vec!["Он", "шел", "домой", "."]);
    }

    #[test]
    fn dropped_tokens_are_rejected() {
        let annotator = Annotator::new(Arc::new(Dropping));
        let err = annotator.tag(&tokens(&["a", "b"])).expect_err("shape check");
        assert_eq!(err, AnnotateError::ShapeMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn rewritten_tokens_are_rejected() {
        let annotator = Annotator::new(Arc::new(Rewriting));
        let err = annotator.tag(&tokens(&["ok", "Bad"])).expect_err("token check");
        assert!(matches!(err, AnnotateError::TokenMismatch { position: 1, .. }));
    }

    #[test]
    fn paragraph_keeps_sentence_boundaries() {
        let annotator = Annotator::new(Arc::new(LexiconTagger::new("rus")));
        let para = annotator
            .tag_paragraph(vec![tokens(&["Привет", "."]), tokens(&["Пока", "!"])])
            .expect("tags");
        assert_eq!(para.len(), 2);
        assert_eq!(para[0].len(), 2);
        assert_eq!(para[1][0].token, "Пока");
    }

    #[test]
    fn empty_sentence_tags_to_empty() {
        let annotator = Annotator::new(Arc::new(LexiconTagger::new("rus")));
        assert!(annotator.tag(&[]).expect("tags").is_empty());
    }
}
