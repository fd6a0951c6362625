use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::config::{compile_pattern, CorpusConfig};
use crate::error::CorpusError;
use crate::id::{DocumentId, Query};

/// Maps document ids and categories onto files below a corpus root.
///
/// The layout is `<root>/<category>/<file>`. Listings are taken fresh on every
/// call, sorted by id and skip hidden entries.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    root: PathBuf,
    doc_pattern: Regex,
    cat_pattern: Regex,
}

impl CorpusIndex {
    pub fn new(cfg: &CorpusConfig) -> Result<Self, CorpusError> {
        cfg.validate()?;
        Ok(Self {
            root: cfg.root.clone(),
            doc_pattern: compile_pattern("doc_pattern", &cfg.doc_pattern)?,
            cat_pattern: compile_pattern("cat_pattern", &cfg.cat_pattern)?,
        })
    }

    /// Index with the default `<category>/<name>.txt` layout.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CorpusError> {
        Self::new(&CorpusConfig::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every document below the root matching the document pattern.
    pub fn fileids(&self) -> Result<Vec<DocumentId>, CorpusError> {
        let mut ids = Vec::new();
        for (category, dir) in self.list_dir(&self.root)? {
            if !dir.is_dir() {
                continue;
            }
            for (name, path) in self.list_dir(&dir)? {
                if !path.is_file() {
                    continue;
                }
                let relative = format!("{category}/{name}");
                if self.doc_pattern.is_match(&relative) {
                    ids.push(DocumentId::new(relative));
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Distinct categories of all documents, sorted.
    pub fn categories(&self) -> Result<Vec<String>, CorpusError> {
        let categories: BTreeSet<String> = self
            .fileids()?
            .iter()
            .filter_map(|id| self.category_of(id))
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Category captured by the category pattern, if it matches.
    pub fn category_of(&self, id: &DocumentId) -> Option<String> {
        self.cat_pattern
            .captures(id.as_str())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Documents whose category is one of `categories`.
    pub fn fileids_for<S: AsRef<str>>(
        &self,
        categories: &[S],
    ) -> Result<Vec<DocumentId>, CorpusError> {
        let ids = self.fileids()?;
        Ok(ids
            .into_iter()
            .filter(|id| {
                self.category_of(id)
                    .is_some_and(|cat| categories.iter().any(|c| c.as_ref() == cat))
            })
            .collect())
    }

    /// Turns a query into the ordered list of ids to visit.
    ///
    /// Explicit ids come back unchanged without touching the filesystem; an
    /// id that would leave the root (`..`, absolute paths) is rejected.
    pub fn resolve(&self, query: &Query) -> Result<Vec<DocumentId>, CorpusError> {
        match (query.ids.is_empty(), query.categories.is_empty()) {
            (false, false) => Err(CorpusError::InvalidQuery(
                "specify document ids or categories, not both".into(),
            )),
            (false, true) => {
                if let Some(bad) = query.ids.iter().find(|id| !id.is_contained()) {
                    return Err(CorpusError::InvalidQuery(format!(
                        "document id {bad:?} points outside the corpus root"
                    )));
                }
                Ok(query.ids.clone())
            }
            (true, false) => self.fileids_for(query.categories.as_slice()),
            (true, true) => self.fileids(),
        }
    }

    /// Absolute location of a document. Existence is not checked.
    pub fn abspath(&self, id: &DocumentId) -> PathBuf {
        id.to_path(&self.root)
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, CorpusError> {
        let entries = fs::read_dir(dir).map_err(|e| CorpusError::CorpusUnavailable {
            root: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CorpusError::CorpusUnavailable {
                root: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!(path = %entry.path().display(), "corpus_skip_non_utf8");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            out.push((name, entry.path()));
        }
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        for (rel, body) in [
            ("A/doc1.txt", "<p>one</p>"),
            ("A/doc2.txt", "<p>two</p>"),
            ("B/doc3.txt", "<p>three</p>"),
            ("B/notes.md", "ignored"),
            ("B/.hidden.txt", "ignored"),
            (".git/x.txt", "ignored"),
        ] {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, body).expect("write");
        }
        fs::write(dir.path().join("top.txt"), "ignored").expect("write");
        dir
    }

    fn ids(list: &[&str]) -> Vec<DocumentId> {
        list.iter().map(|s| DocumentId::new(*s)).collect()
    }

    #[test]
    fn lists_matching_documents_sorted() {
        let dir = corpus();
        let index = CorpusIndex::open(dir.path()).expect("index");
        assert_eq!(
            index.fileids().expect("fileids"),
            ids(&["A/doc1.txt", "A/doc2.txt", "B/doc3.txt"])
        );
        assert_eq!(index.categories().expect("categories"), vec!["A", "B"]);
    }

    #[test]
    fn resolve_by_category() {
        let dir = corpus();
        let index = CorpusIndex::open(dir.path()).expect("index");
        let resolved = index.resolve(&Query::categories(["A"])).expect("resolve");
        assert_eq!(resolved, ids(&["A/doc1.txt", "A/doc2.txt"]));
        assert!(index
            .resolve(&Query::categories(["missing"]))
            .expect("resolve")
            .is_empty());
    }

    #[test]
    fn explicit_ids_are_echoed() {
        let index = CorpusIndex::open("/definitely/not/here").expect("index");
        let query = Query::ids(["Z/nothing.txt", "A/doc1.txt"]);
        assert_eq!(
            index.resolve(&query).expect("resolve"),
            ids(&["Z/nothing.txt", "A/doc1.txt"])
        );
    }

    #[test]
    fn ids_escaping_the_root_are_rejected() {
        let index = CorpusIndex::open("/definitely/not/here").expect("index");
        for bad in ["A/../../escape.txt", "/etc/passwd"] {
            let query = Query::ids(["A/doc1.txt", bad]);
            assert!(matches!(index.resolve(&query), Err(CorpusError::InvalidQuery(_))));
        }
    }

    #[test]
    fn ids_and_categories_together_are_rejected() {
        let index = CorpusIndex::open("/unused").expect("index");
        let query = Query {
            ids: ids(&["A/doc1.txt"]),
            categories: vec!["A".into()],
        };
        assert!(matches!(
            index.resolve(&query),
            Err(CorpusError::InvalidQuery(_))
        ));
    }

    #[test]
    fn missing_root_is_unavailable() {
        let dir = TempDir::new().expect("tempdir");
        let index = CorpusIndex::open(dir.path().join("gone")).expect("index");
        assert!(matches!(
            index.resolve(&Query::all()),
            Err(CorpusError::CorpusUnavailable { .. })
        ));
    }

    #[test]
    fn listing_sees_new_files() {
        let dir = corpus();
        let index = CorpusIndex::open(dir.path()).expect("index");
        assert_eq!(index.fileids().expect("fileids").len(), 3);
        fs::write(dir.path().join("B/doc4.txt"), "<p>four</p>").expect("write");
        assert_eq!(index.fileids().expect("fileids").len(), 4);
    }

    #[test]
    fn abspath_joins_root() {
        let index = CorpusIndex::open("/corpus").expect("index");
        assert_eq!(
            index.abspath(&DocumentId::new("A/doc1.txt")),
            Path::new("/corpus").join("A").join("doc1.txt")
        );
    }
}
