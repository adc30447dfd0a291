//! Key-value local storage
//!
//! Same surface as the browser's `localStorage`: synchronous, string keys,
//! string values.

use crate::error::CacheError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Synchronous string key-value store
#[cfg_attr(test, mockall::automock)]
pub trait LocalStorage: Send + Sync {
    /// Value under `key`, `None` when absent
    ///
    /// # Errors
    /// Storage-specific read failures.
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Storage-specific write failures.
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete `key`; absent keys are not an error
    ///
    /// # Errors
    /// Storage-specific write failures.
    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// Storage kept as one JSON object on disk
///
/// Items are held in memory and the whole object is rewritten through a
/// temp file + rename on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open `path`, starting empty if it does not exist
    ///
    /// A file that is not a JSON object of strings is discarded with a
    /// warning; it only ever held cached data.
    ///
    /// # Errors
    /// [`CacheError::Io`] when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let items = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable local storage");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CacheError::io_error(&path, e)),
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(items).map_err(|source| CacheError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| CacheError::io_error(dir, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::io_error(dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| CacheError::io_error(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| CacheError::io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::io_error(&self.path, e.error))?;
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut items = self.items.lock();
        let mut next = items.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *items = next;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        let mut items = self.items.lock();
        if !items.contains_key(key) {
            return Ok(());
        }
        let mut next = items.clone();
        next.remove(key);
        self.flush(&next)?;
        *items = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_basics() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("edit").unwrap(), None);

        storage.set_item("edit", "null").unwrap();
        assert_eq!(storage.get_item("edit").unwrap().as_deref(), Some("null"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("edit").unwrap();
        storage.remove_item("edit").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("projectList", "[]").unwrap();
        storage.set_item("edit", "{\"id\":\"t1\"}").unwrap();
        storage.remove_item("edit").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("projectList").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get_item("edit").unwrap(), None);
    }

    #[test]
    fn garbage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("taskMap").unwrap(), None);
    }
}
