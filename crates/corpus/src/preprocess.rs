use std::path::PathBuf;
use std::time::Instant;

use annotate::{source_digest, Paragraph};
use tracing::{debug, info, warn, Level};

use crate::cache::AnnotationCache;
use crate::error::CorpusError;
use crate::id::{DocumentId, Query};
use crate::raw::{decode_utf8, RawCorpusSource};
use crate::source::{CorpusSource, Stream};

/// Annotates raw documents and writes them to the cache, one entry per
/// source document.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    corpus: RawCorpusSource,
    cache: AnnotationCache,
}

impl Preprocessor {
    pub fn new(corpus: RawCorpusSource, cache: AnnotationCache) -> Self {
        Self { corpus, cache }
    }

    pub fn corpus(&self) -> &RawCorpusSource {
        &self.corpus
    }

    pub fn cache(&self) -> &AnnotationCache {
        &self.cache
    }

    /// Raw documents selected by `query`.
    pub fn fileids(&self, query: &Query) -> Result<Vec<DocumentId>, CorpusError> {
        self.corpus.resolve(query)
    }

    /// Where the entry for `id` is written.
    pub fn abspath(&self, id: &DocumentId) -> PathBuf {
        self.cache.path_for(id)
    }

    /// Tagged paragraphs of one raw document, produced lazily.
    pub fn tokenize(&self, id: &DocumentId) -> Result<Stream<'_, Paragraph>, CorpusError> {
        self.corpus.tagged_paras(&Query::ids([id]))
    }

    /// Annotates one document and stores it, returning the entry path.
    ///
    /// With `reuse_fresh` enabled an entry whose recorded source digest still
    /// matches is left as is.
    pub fn process(&self, id: &DocumentId) -> Result<PathBuf, CorpusError> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "corpus.process", doc_id = %id);
        let _guard = span.enter();

        match self.process_inner(id) {
            Ok((path, outcome)) => {
                let elapsed_micros = start.elapsed().as_micros();
                match outcome {
                    Outcome::Reused => {
                        debug!(path = %path.display(), elapsed_micros, "preprocess_reuse")
                    }
                    Outcome::Written { paragraphs, tokens } => info!(
                        path = %path.display(),
                        paragraphs,
                        tokens,
                        elapsed_micros,
                        "preprocess_success"
                    ),
                }
                Ok(path)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "preprocess_failure");
                Err(err)
            }
        }
    }

    /// Processes every selected document, lazily and in id order.
    ///
    /// The query is resolved first, then the cache root is created; a root
    /// that exists as a file fails with [`CorpusError::InvalidTarget`].
    pub fn transform(&self, query: &Query) -> Result<Stream<'_, PathBuf>, CorpusError> {
        let ids = self.fileids(query)?;
        self.cache.ensure_root()?;
        Ok(Box::new(ids.into_iter().map(move |id| self.process(&id))))
    }

    fn process_inner(&self, id: &DocumentId) -> Result<(PathBuf, Outcome), CorpusError> {
        let bytes = self.corpus.read_bytes(id)?;
        let digest = source_digest(&bytes);
        if self.cache.reuse_fresh() && self.cache.is_fresh(id, &digest) {
            return Ok((self.cache.path_for(id), Outcome::Reused));
        }
        let text = decode_utf8(id, bytes)?;
        let document = self.corpus.annotate(id, &text)?;
        let path = self.cache.store_with_digest(id, &document, &digest)?;
        Ok((
            path,
            Outcome::Written {
                paragraphs: document.paragraphs.len(),
                tokens: document.token_count(),
            },
        ))
    }
}

enum Outcome {
    Reused,
    Written { paragraphs: usize, tokens: usize },
}
