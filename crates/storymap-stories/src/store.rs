//! Content stores: where story documents come from.
//!
//! The pipeline only needs two operations from its source: list the
//! document keys and read one document by key. [`FsContentStore`] reads a
//! directory of `.mdx`/`.md` files; [`MemoryContentStore`] holds documents
//! in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use storymap_core::{Error, Result};

/// Synchronous key → document lookup.
pub trait ContentStore {
    /// Keys of every story document. Order is not significant.
    fn list(&self) -> Result<Vec<String>>;

    /// Full text of the document stored under `key`.
    fn read(&self, key: &str) -> Result<String>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn list(&self) -> Result<Vec<String>> {
        (**self).list()
    }

    fn read(&self, key: &str) -> Result<String> {
        (**self).read(key)
    }
}

/// Default extensions recognized as story documents.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Story documents stored as files directly inside one directory.
///
/// Keys are file names (`maria.mdx`). Subdirectories are not searched.
/// A missing directory lists as empty.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsContentStore {
    /// Store over `root` accepting [`DEFAULT_EXTENSIONS`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    /// Replace the accepted extensions (without leading dots).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Directory being read.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of the document under `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl ContentStore for FsContentStore {
    fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            log::warn!("Story directory {} does not exist", self.root.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| Error::io_with_path(e, &self.root))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io_with_path(e, &self.root))?;
            let path = entry.path();
            if !path.is_file() || !self.accepts(&path) {
                continue;
            }
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => keys.push(name.to_string()),
                None => log::warn!("Skipping {}: file name is not valid UTF-8", path.display()),
            }
        }
        keys.sort();
        log::debug!("Found {} story documents in {}", keys.len(), self.root.display());
        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<String> {
        if key.contains(['/', '\\']) || key == ".." {
            return Err(Error::not_found(key));
        }
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(Error::not_found(key));
        }
        std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))
    }
}

/// In-memory documents keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    documents: BTreeMap<String, String>,
}

impl MemoryContentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.documents.insert(key.into(), raw.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_document(mut self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(key, raw);
        self
    }

    /// Remove a document, returning its text.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.documents.remove(key)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryContentStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            documents: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ContentStore for MemoryContentStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read(&self, key: &str) -> Result<String> {
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| Error::not_found(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn story_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("maria.mdx"), "---\ntitle: Maria\n---\nBody").unwrap();
        std::fs::write(dir.path().join("ana.md"), "---\ntitle: Ana\n---\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(dir.path().join("UPPER.MDX"), "---\ntitle: Upper\n---\n").unwrap();
        std::fs::create_dir(dir.path().join("nested.mdx")).unwrap();
        dir
    }

    // ------------------------------------------------------------------------
    // FsContentStore
    // ------------------------------------------------------------------------

    #[test]
    fn test_fs_list_filters_and_sorts() {
        let dir = story_dir();
        let store = FsContentStore::new(dir.path());
        assert_eq!(store.list().unwrap(), vec!["UPPER.MDX", "ana.md", "maria.mdx"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_fs_list_skips_non_utf8_file_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = story_dir();
        let name = OsStr::from_bytes(b"jos\xe9.mdx");
        std::fs::write(dir.path().join(name), "---\ntitle: Jose\n---\n").unwrap();

        let store = FsContentStore::new(dir.path());
        assert_eq!(store.list().unwrap(), vec!["UPPER.MDX", "ana.md", "maria.mdx"]);
    }

    #[test]
    fn test_fs_custom_extensions() {
        let dir = story_dir();
        let store = FsContentStore::new(dir.path()).with_extensions([".mdx"]);
        assert_eq!(store.list().unwrap(), vec!["UPPER.MDX", "maria.mdx"]);
    }

    #[test]
    fn test_fs_read() {
        let dir = story_dir();
        let store = FsContentStore::new(dir.path());
        assert_eq!(store.read("maria.mdx").unwrap(), "---\ntitle: Maria\n---\nBody");
    }

    #[test]
    fn test_fs_read_missing_is_not_found() {
        let dir = story_dir();
        let store = FsContentStore::new(dir.path());
        assert!(matches!(store.read("nobody.mdx"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_fs_read_rejects_path_traversal() {
        let dir = story_dir();
        let store = FsContentStore::new(dir.path().join("sub"));
        assert!(matches!(store.read("../maria.mdx"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_fs_missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }

    // ------------------------------------------------------------------------
    // MemoryContentStore
    // ------------------------------------------------------------------------

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryContentStore::new().with_document("b.mdx", "B");
        store.insert("a.mdx", "A");

        assert_eq!(store.len(), 2);
        assert_eq!(store.list().unwrap(), vec!["a.mdx", "b.mdx"]);
        assert_eq!(store.read("a.mdx").unwrap(), "A");
        assert_eq!(store.remove("a.mdx").as_deref(), Some("A"));
        assert!(store.read("a.mdx").is_err());
    }

    #[test]
    fn test_memory_store_from_iter() {
        let store: MemoryContentStore = [("x", "1"), ("y", "2")].into_iter().collect();
        assert_eq!(store.list().unwrap(), vec!["x", "y"]);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryContentStore::new().with_document("k", "v");
        let by_ref: &dyn ContentStore = &store;
        assert_eq!(by_ref.read("k").unwrap(), "v");
        assert_eq!((&store).list().unwrap(), vec!["k"]);
    }
}
