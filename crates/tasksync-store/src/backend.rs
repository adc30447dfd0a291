//! Durable state backends
//!
//! A backend stores one whole [`StoreState`] document. `save` must be
//! all-or-nothing: after a failed save, `load` still returns the previous
//! document.

use crate::error::PersistenceError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tasksync_model::StoreState;

/// Whole-document persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Read the persisted document, `None` when nothing was stored yet
    async fn load(&self) -> Result<Option<StoreState>, PersistenceError>;

    /// Atomically replace the persisted document
    async fn save(&self, state: &StoreState) -> Result<(), PersistenceError>;
}

/// In-process backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Option<StoreState>>,
}

impl MemoryBackend {
    /// Empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `state`
    #[inline]
    #[must_use]
    pub fn with_state(state: StoreState) -> Self {
        Self {
            inner: Mutex::new(Some(state)),
        }
    }

    /// Copy of the stored document
    #[must_use]
    pub fn snapshot(&self) -> Option<StoreState> {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<StoreState>, PersistenceError> {
        Ok(self.snapshot())
    }

    async fn save(&self, state: &StoreState) -> Result<(), PersistenceError> {
        *self.inner.lock() = Some(state.clone());
        Ok(())
    }
}

/// JSON file backend
///
/// Writes go to a temp file in the target directory, are fsynced, then
/// renamed over the target, so readers never see a torn document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend persisting to `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateBackend for FileBackend {
    async fn load(&self) -> Result<Option<StoreState>, PersistenceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_state(&path))
            .await
            .map_err(|e| PersistenceError::Task(e.to_string()))?
    }

    async fn save(&self, state: &StoreState) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| PersistenceError::Task(e.to_string()))?
    }
}

fn read_state(path: &Path) -> Result<Option<StoreState>, PersistenceError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::io_error(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| PersistenceError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    use std::io::Write as _;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PersistenceError::io_error(dir, e))?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io_error(dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| PersistenceError::io_error(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PersistenceError::io_error(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| PersistenceError::io_error(path, e.error))?;

    Ok(())
}
