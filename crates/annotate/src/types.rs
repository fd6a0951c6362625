use serde::{Deserialize, Serialize};

/// A surface token paired with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tag: tag.into(),
        }
    }
}

impl<T: Into<String>, U: Into<String>> From<(T, U)> for TaggedToken {
    fn from((token, tag): (T, U)) -> Self {
        Self::new(token, tag)
    }
}

/// Tagged tokens of one sentence, in order.
pub type Sentence = Vec<TaggedToken>;

/// Sentences of one paragraph, in order.
pub type Paragraph = Vec<Sentence>;

/// A document as paragraphs of sentences of tagged tokens.
///
/// This is the unit written to and read from the annotation cache. Every
/// level is ordered; an empty document (no paragraphs) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub paragraphs: Vec<Paragraph>,
}

impl AnnotatedDocument {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<Paragraph> {
        self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> + '_ {
        self.paragraphs.iter().flatten()
    }

    pub fn tagged(&self) -> impl Iterator<Item = &TaggedToken> + '_ {
        self.sentences().flatten()
    }

    /// Surface tokens with the tags dropped.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.tagged().map(|t| t.token.as_str())
    }

    pub fn token_count(&self) -> usize {
        self.sentences().map(Vec::len).sum()
    }
}

impl FromIterator<Paragraph> for AnnotatedDocument {
    fn from_iter<I: IntoIterator<Item = Paragraph>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for AnnotatedDocument {
    type Item = Paragraph;
    type IntoIter = std::vec::IntoIter<Paragraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.paragraphs.into_iter()
    }
}
