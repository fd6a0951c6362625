use std::path::PathBuf;

use annotate::{AnnotatedDocument, Paragraph, Sentence, TaggedToken};
use tracing::{debug, warn};

use crate::cache::AnnotationCache;
use crate::error::CorpusError;
use crate::id::{DocumentId, Query};
use crate::index::CorpusIndex;
use crate::source::{flatten_ok, CorpusSource, Stream};

/// Reads the annotation cache written by [`Preprocessor`](crate::Preprocessor)
/// and never touches the raw corpus.
///
/// Ids may be given either as cache entry ids (`A/doc1.cache`) or as the
/// source ids they were produced from (`A/doc1.txt`).
#[derive(Debug, Clone)]
pub struct CachedCorpusSource {
    index: CorpusIndex,
    cache: AnnotationCache,
}

impl CachedCorpusSource {
    /// Source over every entry below the cache root.
    pub fn new(cache: AnnotationCache) -> Result<Self, CorpusError> {
        let index = cache.index()?;
        Ok(Self { index, cache })
    }

    pub fn with_index(index: CorpusIndex, cache: AnnotationCache) -> Self {
        Self { index, cache }
    }

    pub fn cache(&self) -> &AnnotationCache {
        &self.cache
    }

    fn load_all(&self, query: &Query) -> Result<Stream<'_, AnnotatedDocument>, CorpusError> {
        let ids = self.resolve(query)?;
        debug!(documents = ids.len(), "cache_resolve");
        Ok(Box::new(ids.into_iter().map(move |id| {
            self.cache
                .load_id(&id)
                .inspect_err(|err| warn!(doc_id = %id, error = %err, "cache_load_failure"))
        })))
    }
}

impl CorpusSource for CachedCorpusSource {
    type Doc = AnnotatedDocument;
    type Para = Paragraph;
    type Sent = Sentence;

    fn index(&self) -> &CorpusIndex {
        &self.index
    }

    fn abspath(&self, id: &DocumentId) -> PathBuf {
        self.cache.path_for(id)
    }

    fn docs(&self, query: &Query) -> Result<Stream<'_, AnnotatedDocument>, CorpusError> {
        self.load_all(query)
    }

    fn paras(&self, query: &Query) -> Result<Stream<'_, Paragraph>, CorpusError> {
        Ok(flatten_ok(self.docs(query)?, AnnotatedDocument::into_paragraphs))
    }

    fn sents(&self, query: &Query) -> Result<Stream<'_, Sentence>, CorpusError> {
        Ok(flatten_ok(self.paras(query)?, |para| para))
    }

    fn tagged(&self, query: &Query) -> Result<Stream<'_, TaggedToken>, CorpusError> {
        Ok(flatten_ok(self.sents(query)?, |sent| sent))
    }

    fn words(&self, query: &Query) -> Result<Stream<'_, String>, CorpusError> {
        Ok(flatten_ok(self.tagged(query)?, |token| {
            std::iter::once(token.token)
        }))
    }
}
