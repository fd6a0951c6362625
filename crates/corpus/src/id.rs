use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Relative path of a document below its corpus root, `/`-separated.
///
/// The first segment names the document's category: `news/2024-01.txt`
/// belongs to `news`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps a relative id. Platform separators are normalized to `/`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if std::path::MAIN_SEPARATOR != '/' && id.contains(std::path::MAIN_SEPARATOR) {
            return Self(id.replace(std::path::MAIN_SEPARATOR, "/"));
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Leading directory segment, when the id has one.
    pub fn category(&self) -> Option<&str> {
        self.0
            .split_once('/')
            .map(|(head, _)| head)
            .filter(|head| !head.is_empty())
    }

    /// Everything before the last `/`.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name without its final extension. Dotfiles keep their name.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Same location with the extension replaced.
    pub fn with_extension(&self, extension: &str) -> DocumentId {
        let file = format!("{}.{}", self.stem(), extension);
        match self.parent() {
            Some(parent) => DocumentId(format!("{parent}/{file}")),
            None => DocumentId(file),
        }
    }

    /// True when the id names a location below whatever root it is joined
    /// to: relative, with no `..`, `.` or drive-prefix components.
    pub fn is_contained(&self) -> bool {
        !self.0.is_empty()
            && Path::new(&self.0)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
            && !self.0.split('/').any(|segment| segment == "." || segment == "..")
    }

    /// Joins the id's segments onto `root`. Callers check
    /// [`is_contained`](Self::is_contained) before touching the result.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&DocumentId> for DocumentId {
    fn from(id: &DocumentId) -> Self {
        id.clone()
    }
}

/// Selects documents from a corpus.
///
/// At most one of `ids` and `categories` may be non-empty; an empty query
/// selects the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub ids: Vec<DocumentId>,
    pub categories: Vec<String>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DocumentId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            categories: Vec::new(),
        }
    }

    pub fn categories<I, T>(categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            ids: Vec::new(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.ids.is_empty() && self.categories.is_empty()
    }
}
