//! Workspace umbrella crate for the corpusline pipeline.
//!
//! Re-exports the four layers and wires them together from a single
//! [`PipelineConfig`]:
//!
//! ```text
//! CorpusIndex → RawCorpusSource → TextExtractor → Annotator → AnnotationCache   (write, once)
//! CorpusIndex → CachedCorpusSource → Normalizer → vectorizer                   (read, many)
//! ```
//!
//! Language resources (tagger lexicon, stopwords, lemma dictionary) are loaded
//! once in [`Pipeline::from_config`]; nothing is fetched lazily afterwards.

pub mod config;

pub use annotate::{
    AnnotateError, AnnotatedDocument, Annotator, CacheEntry, CodecError, CompressionCodec,
    CompressionConfig, LexiconTagger, Paragraph, PosTagger, Sentence, TaggedToken, TaggerConfig,
};
pub use config::{ConfigLoadError, LogFormat, PipelineConfig};
pub use corpus::{
    AnnotationCache, CacheConfig, CachedCorpusSource, CorpusConfig, CorpusError, CorpusIndex,
    CorpusSource, DocumentId, Preprocessor, Query, RawCorpusSource, Stream,
};
pub use extract::{
    CleanedHtml, ExtractConfig, ExtractError, SentenceSplitter, TextExtractor, WordTokenizer,
};
pub use normalize::{
    DictionaryLemmatizer, IdentityLemmatizer, Lemmatizer, NormalizeConfig, NormalizeError,
    Normalizer, StopwordSet, Transformer, WordNetPos,
};

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

/// Errors that can occur while assembling the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Extract(ExtractError),
    Annotate(AnnotateError),
    Corpus(CorpusError),
    Normalize(NormalizeError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Extract(err) => write!(f, "extraction setup failed: {err}"),
            PipelineError::Annotate(err) => write!(f, "annotation setup failed: {err}"),
            PipelineError::Corpus(err) => write!(f, "corpus failure: {err}"),
            PipelineError::Normalize(err) => write!(f, "normalization setup failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Extract(err) => Some(err),
            PipelineError::Annotate(err) => Some(err),
            PipelineError::Corpus(err) => Some(err),
            PipelineError::Normalize(err) => Some(err),
        }
    }
}

impl From<ExtractError> for PipelineError {
    fn from(value: ExtractError) -> Self {
        PipelineError::Extract(value)
    }
}

impl From<AnnotateError> for PipelineError {
    fn from(value: AnnotateError) -> Self {
        PipelineError::Annotate(value)
    }
}

impl From<CorpusError> for PipelineError {
    fn from(value: CorpusError) -> Self {
        PipelineError::Corpus(value)
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(value: NormalizeError) -> Self {
        PipelineError::Normalize(value)
    }
}

/// Every stage of the pipeline, built from one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    preprocessor: Preprocessor,
    cached: CachedCorpusSource,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn from_config(cfg: &PipelineConfig) -> Result<Self, PipelineError> {
        let extractor = TextExtractor::new(cfg.extract.clone())?;
        let tagger = LexiconTagger::from_config(&cfg.annotate)?;
        let annotator = Annotator::new(Arc::new(tagger));
        let raw = RawCorpusSource::new(CorpusIndex::new(&cfg.corpus)?, extractor, annotator);
        let cache = AnnotationCache::new(&cfg.cache)?;
        let cached = CachedCorpusSource::new(cache.clone())?;
        let normalizer = Normalizer::from_config(&cfg.normalize)?;
        info!(
            corpus_root = %cfg.corpus.root.display(),
            cache_root = %cfg.cache.root.display(),
            language = %cfg.annotate.language,
            "pipeline_ready"
        );
        Ok(Self {
            preprocessor: Preprocessor::new(raw, cache),
            cached,
            normalizer,
        })
    }

    pub fn raw(&self) -> &RawCorpusSource {
        self.preprocessor.corpus()
    }

    pub fn cache(&self) -> &AnnotationCache {
        self.preprocessor.cache()
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn cached(&self) -> &CachedCorpusSource {
        &self.cached
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Annotates and caches the selected raw documents, one path per item.
    pub fn preprocess(&self, query: &Query) -> Result<Stream<'_, PathBuf>, PipelineError> {
        Ok(self.preprocessor.transform(query)?)
    }

    /// Normalized token lists of the selected cached documents.
    pub fn normalized(&self, query: &Query) -> Result<Stream<'_, Vec<String>>, PipelineError> {
        let docs = self.cached.docs(query)?;
        Ok(Box::new(self.normalizer.try_transform(docs)))
    }
}
