//! Document storage collaborators.
//!
//! The tagging workflow reads, writes, and enumerates notes only through the
//! [`DocumentStore`] trait. [`FsDocumentStore`] works on a directory of
//! markdown files; [`MemoryDocumentStore`] keeps notes in memory for tests and
//! embedding.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

use crate::utils::is_markdown_file;

/// Read/write/enumerate access to notes.
pub trait DocumentStore: Send + Sync {
    /// Returns the full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replaces the document at `path` with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write(&self, path: &Path, text: &str) -> Result<()>;

    /// Lists every markdown document in the store, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list_documents(&self) -> Result<Vec<PathBuf>>;
}

/// A store rooted at a directory on disk.
///
/// Relative paths are resolved against the root; absolute paths are used as
/// given. Writes go to a temporary file in the same directory which then
/// replaces the original, so a note is never left half-written.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

impl DocumentStore for FsDocumentStore {
    fn read(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full)
            .with_context(|| format!("Failed to read document: {}", full.display()))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let full = self.resolve(path);
        let parent = full
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
        tmp.write_all(text.as_bytes())
            .context("Failed to write temporary file")?;

        if let Ok(metadata) = std::fs::metadata(&full) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .context("Failed to copy document permissions")?;
        }

        tmp.persist(&full)
            .with_context(|| format!("Failed to replace document: {}", full.display()))?;

        tracing::info!(path = %full.display(), bytes = text.len(), "document written");
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(anyhow!("Not a directory: {}", self.root.display()));
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_markdown_file(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();
            paths.push(relative);
        }

        paths.sort();
        Ok(paths)
    }
}

/// An in-memory store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<PathBuf, String>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, replacing any existing one at the same path.
    #[must_use]
    pub fn with_document(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        if let Ok(mut docs) = self.documents.lock() {
            docs.insert(path.into(), text.into());
        }
        self
    }

    /// Returns a copy of the document at `path`, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.documents.lock().ok()?.get(path.as_ref()).cloned()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>>> {
        self.documents
            .lock()
            .map_err(|_| anyhow!("Document store lock poisoned"))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, path: &Path) -> Result<String> {
        self.lock()?
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("Document not found: {}", path.display()))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        self.lock()?.insert(path.to_path_buf(), text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .lock()?
            .keys()
            .filter(|p| is_markdown_file(p))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fs_store_reads_relative_paths_from_root() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "hello").unwrap();
        let store = FsDocumentStore::new(dir.path());
        assert_eq!(store.read(Path::new("a.md")).unwrap(), "hello");
    }

    #[test]
    fn fs_store_read_missing_reports_path() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        let err = store.read(Path::new("missing.md")).unwrap_err();
        assert!(format!("{err}").contains("missing.md"));
    }

    #[test]
    fn fs_store_write_replaces_content_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "old").unwrap();
        let store = FsDocumentStore::new(dir.path());

        store.write(Path::new("note.md"), "new content").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new content");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        FsDocumentStore::new(dir.path())
            .write(&path, "new")
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn fs_store_lists_markdown_sorted_and_skips_hidden() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::create_dir_all(root.join(".obsidian")).unwrap();
        std::fs::write(root.join("b.md"), "").unwrap();
        std::fs::write(root.join("a.md"), "").unwrap();
        std::fs::write(root.join("sub/c.MD"), "").unwrap();
        std::fs::write(root.join("image.png"), "").unwrap();
        std::fs::write(root.join(".obsidian/config.md"), "").unwrap();

        let listed = FsDocumentStore::new(root).list_documents().unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
                PathBuf::from("sub/c.MD")
            ]
        );
    }

    #[test]
    fn fs_store_list_on_missing_root_fails() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path().join("nope"));
        assert!(store.list_documents().is_err());
    }

    #[test]
    fn memory_store_round_trip_and_counts_writes() {
        let store = MemoryDocumentStore::new().with_document("x.md", "one");
        assert_eq!(store.read(Path::new("x.md")).unwrap(), "one");
        assert_eq!(store.write_count(), 0);

        store.write(Path::new("x.md"), "two").unwrap();
        assert_eq!(store.get("x.md").as_deref(), Some("two"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn memory_store_lists_only_markdown() {
        let store = MemoryDocumentStore::new()
            .with_document("b.md", "")
            .with_document("a.txt", "")
            .with_document("a.md", "");
        assert_eq!(
            store.list_documents().unwrap(),
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
    }

    #[test]
    fn memory_store_missing_document_is_error() {
        let store = MemoryDocumentStore::new();
        assert!(store.read(Path::new("nope.md")).is_err());
    }
}
