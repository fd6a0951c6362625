use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use annotate::{decode_entry, encode_document, AnnotatedDocument, CacheEntry, CompressionConfig};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::{entry_pattern, CacheConfig, CorpusConfig, DEFAULT_CAT_PATTERN};
use crate::error::CorpusError;
use crate::id::DocumentId;
use crate::index::CorpusIndex;

/// Persistent store of annotated documents, laid out like the raw corpus:
/// `A/doc1.txt` is cached at `<root>/A/doc1.<extension>`.
///
/// Entries are written to a temporary file next to the target and renamed
/// into place, so a reader never observes a half-written entry.
#[derive(Debug, Clone)]
pub struct AnnotationCache {
    root: PathBuf,
    extension: String,
    compression: CompressionConfig,
    reuse_fresh: bool,
}

impl AnnotationCache {
    pub fn new(cfg: &CacheConfig) -> Result<Self, CorpusError> {
        cfg.validate()?;
        Ok(Self {
            root: cfg.root.clone(),
            extension: cfg.extension.clone(),
            compression: cfg.compression,
            reuse_fresh: cfg.reuse_fresh,
        })
    }

    /// Cache with default settings rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CorpusError> {
        Self::new(&CacheConfig::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn reuse_fresh(&self) -> bool {
        self.reuse_fresh
    }

    /// Id of the entry for a source document, relative to the cache root.
    pub fn entry_id(&self, id: &DocumentId) -> DocumentId {
        id.with_extension(&self.extension)
    }

    /// Deterministic entry location for a source document. Passing an entry
    /// id yields the same path.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.entry_id(id).to_path(&self.root)
    }

    /// Index enumerating the entries currently in the cache.
    pub fn index(&self) -> Result<CorpusIndex, CorpusError> {
        CorpusIndex::new(&CorpusConfig {
            root: self.root.clone(),
            doc_pattern: entry_pattern(&self.extension),
            cat_pattern: DEFAULT_CAT_PATTERN.to_string(),
        })
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        id.is_contained() && self.path_for(id).is_file()
    }

    /// Writes `document` for `id`, replacing any previous entry.
    pub fn store(&self, id: &DocumentId, document: &AnnotatedDocument) -> Result<PathBuf, CorpusError> {
        self.write_entry(id, document, None)
    }

    /// Like [`store`](Self::store), recording the digest of the source the
    /// document was annotated from.
    pub fn store_with_digest(
        &self,
        id: &DocumentId,
        document: &AnnotatedDocument,
        source_digest: &str,
    ) -> Result<PathBuf, CorpusError> {
        self.write_entry(id, document, Some(source_digest))
    }

    /// Reads the document stored at `path`.
    pub fn load(&self, path: &Path) -> Result<AnnotatedDocument, CorpusError> {
        self.load_entry(path).map(|entry| entry.document)
    }

    /// Reads the document cached for `id`.
    pub fn load_id(&self, id: &DocumentId) -> Result<AnnotatedDocument, CorpusError> {
        if !id.is_contained() {
            return Err(CorpusError::DocumentRead {
                id: self.entry_id(id),
                reason: "id points outside the cache root".into(),
            });
        }
        self.load(&self.path_for(id))
    }

    /// Reads a full entry, digest included.
    pub fn load_entry(&self, path: &Path) -> Result<CacheEntry, CorpusError> {
        let id = self.id_for_path(path);
        let bytes = fs::read(path).map_err(|e| CorpusError::DocumentRead {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        decode_entry(&bytes).map_err(|e| CorpusError::CorruptCacheEntry {
            id,
            reason: e.to_string(),
        })
    }

    /// True when an entry for `id` exists, decodes, and was built from a
    /// source with this digest.
    pub fn is_fresh(&self, id: &DocumentId, source_digest: &str) -> bool {
        let path = self.path_for(id);
        if !id.is_contained() || !path.is_file() {
            return false;
        }
        match self.load_entry(&path) {
            Ok(entry) => entry.source_digest.as_deref() == Some(source_digest),
            Err(err) => {
                debug!(doc_id = %id, error = %err, "cache_entry_unreadable");
                false
            }
        }
    }

    /// Creates the cache root, refusing a root that is not a directory.
    pub fn ensure_root(&self) -> Result<(), CorpusError> {
        ensure_dir(&self.root)
    }

    fn write_entry(
        &self,
        id: &DocumentId,
        document: &AnnotatedDocument,
        source_digest: Option<&str>,
    ) -> Result<PathBuf, CorpusError> {
        let target = self.path_for(id);
        if !id.is_contained() {
            return Err(CorpusError::CacheWrite {
                path: target,
                reason: "document id points outside the cache root".into(),
            });
        }
        let parent = target.parent().unwrap_or(&self.root);
        ensure_dir(parent)?;

        let bytes = encode_document(document, source_digest, &self.compression).map_err(|e| {
            CorpusError::CacheWrite {
                path: target.clone(),
                reason: e.to_string(),
            }
        })?;
        let write_err = |e: std::io::Error| CorpusError::CacheWrite {
            path: target.clone(),
            reason: e.to_string(),
        };
        let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&target).map_err(|e| write_err(e.error))?;

        debug!(
            doc_id = %id,
            path = %target.display(),
            bytes = bytes.len(),
            "cache_store"
        );
        Ok(target)
    }

    fn id_for_path(&self, path: &Path) -> DocumentId {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        DocumentId::new(segments.join("/"))
    }
}

/// Creates `dir` and its ancestors. Any existing non-directory along the way
/// is an [`CorpusError::InvalidTarget`].
fn ensure_dir(dir: &Path) -> Result<(), CorpusError> {
    if dir.is_dir() {
        return Ok(());
    }
    if let Some(blocker) = dir.ancestors().find(|p| p.exists() && !p.is_dir()) {
        return Err(CorpusError::InvalidTarget {
            path: blocker.to_path_buf(),
        });
    }
    fs::create_dir_all(dir).map_err(|e| CorpusError::CacheWrite {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}
