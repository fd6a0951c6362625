//! Shared fixtures for the integration tests: throwaway corpora on disk and
//! a pipeline configured to read and cache them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use corpusline::{Pipeline, PipelineConfig};
use tempfile::TempDir;

pub const DOC1: &str = "<p>Он шел домой.</p>";

pub const DOC2: &str = "<html><body><h1>Вечер</h1>\
<p>Было темно, и на улице никого не было.</p>\
<p>Он шел домой через парк, а ветер шумел в деревьях.</p>\
</body></html>";

pub const DOC3: &str = "<ul><li>Первый пункт списка.</li><li>Второй пункт, последний.</li></ul>";

/// Source and cache trees living in one temporary directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    /// `A/doc1.txt`, `A/doc2.txt`, `B/doc3.txt`.
    pub fn with_standard_corpus() -> Self {
        let ws = Self::new();
        ws.write("A/doc1.txt", DOC1);
        ws.write("A/doc2.txt", DOC2);
        ws.write("B/doc3.txt", DOC3);
        ws
    }

    pub fn source_root(&self) -> PathBuf {
        self.dir.path().join("corpus")
    }

    pub fn cache_root(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn write(&self, rel: &str, body: &str) -> PathBuf {
        self.write_bytes(rel, body.as_bytes())
    }

    pub fn write_bytes(&self, rel: &str, body: &[u8]) -> PathBuf {
        let path = self.source_root().join(rel);
        create_parent(&path);
        fs::write(&path, body).expect("write source");
        path
    }

    pub fn config(&self) -> PipelineConfig {
        let mut cfg = PipelineConfig::default();
        cfg.corpus.root = self.source_root();
        cfg.cache.root = self.cache_root();
        cfg
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(&self.config()).expect("pipeline")
    }
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
