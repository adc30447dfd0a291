//! Typed view over [`LocalStorage`]
//!
//! Every value is JSON under a fixed key. Reads are lenient: a missing key
//! or an unparsable value yields the default, since the local store is
//! only a cache of the server. The outgoing patch queue is the exception:
//! an unreadable queue is moved aside before anything overwrites it.

use crate::error::CacheError;
use crate::storage::LocalStorage;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tasksync_model::{Patch, Project, StoreState, Task, TaskId};

/// Storage keys
pub mod keys {
    /// Task collection as an object keyed by task id
    pub const TASK_MAP: &str = "taskMap";
    /// Project list
    pub const PROJECT_LIST: &str = "projectList";
    /// In-progress edit state, opaque to the core
    pub const EDIT: &str = "edit";
    /// Opaque UI model cache
    pub const MODEL_CACHE: &str = "modelCache";
    /// Patches waiting to be sent
    pub const PENDING_PATCHES: &str = "pendingPatches";
    /// Raw copy of a queue that could not be decoded
    pub const UNREADABLE_PATCHES: &str = "pendingPatches.unreadable";
}

/// Tasks keyed by id, in the order they were last written
pub type TaskMap = IndexMap<TaskId, Task>;

/// Shared handle to the client's local cache
#[derive(Clone)]
pub struct LocalCache {
    storage: Arc<dyn LocalStorage>,
    queue_lock: Arc<Mutex<()>>,
    push_lock: Arc<tokio::sync::Mutex<()>>,
}

impl fmt::Debug for LocalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCache").finish_non_exhaustive()
    }
}

impl LocalCache {
    /// Cache over `storage`
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            queue_lock: Arc::new(Mutex::new(())),
            push_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Held for a whole send/acknowledge round trip; one push per cache
    pub(crate) async fn lock_push(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.push_lock.lock().await
    }

    /// Decoded value under `key`, `None` when absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "local storage read failed, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "unparsable cached value, treating as absent");
                None
            }
        }
    }

    /// Encode `value` as JSON under `key`
    ///
    /// # Errors
    /// Encoding or storage failures.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &raw)
    }

    /// Cached tasks keyed by id
    #[must_use]
    pub fn task_map(&self) -> TaskMap {
        self.read(keys::TASK_MAP).unwrap_or_default()
    }

    /// Cached projects
    #[must_use]
    pub fn project_list(&self) -> Vec<Project> {
        self.read(keys::PROJECT_LIST).unwrap_or_default()
    }

    /// Overwrite `taskMap` with `tasks`, re-indexed by id
    ///
    /// # Errors
    /// Encoding or storage failures.
    pub fn store_task_list(&self, tasks: Vec<Task>) -> Result<(), CacheError> {
        let map: TaskMap = tasks
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect();
        self.write(keys::TASK_MAP, &map)
    }

    /// Overwrite `taskMap` and `projectList` with a server snapshot
    ///
    /// # Errors
    /// Encoding or storage failures.
    pub fn store_snapshot(&self, state: StoreState) -> Result<(), CacheError> {
        self.write(keys::PROJECT_LIST, &state.project_list)?;
        self.store_task_list(state.todo_list)
    }

    /// Patches not yet acknowledged by the server, oldest first
    #[must_use]
    pub fn pending(&self) -> Vec<Patch> {
        let _guard = self.queue_lock.lock();
        self.read(keys::PENDING_PATCHES).unwrap_or_default()
    }

    /// Append one patch to the outgoing queue
    ///
    /// # Errors
    /// Encoding or storage failures.
    pub fn enqueue(&self, patch: Patch) -> Result<(), CacheError> {
        let _guard = self.queue_lock.lock();
        let mut queue = self.load_queue()?;
        queue.push(patch);
        self.write(keys::PENDING_PATCHES, &queue)
    }

    /// Drop `sent` from the front of the queue after the server accepted it
    ///
    /// Patches queued after the send started stay in the queue. If the queue
    /// no longer starts with `sent` it is left untouched.
    ///
    /// # Errors
    /// Storage failures.
    pub fn acknowledge(&self, sent: &[Patch]) -> Result<(), CacheError> {
        if sent.is_empty() {
            return Ok(());
        }

        let _guard = self.queue_lock.lock();
        let queue = self.load_queue()?;
        let Some(remaining) = queue.strip_prefix(sent) else {
            tracing::warn!(
                sent = sent.len(),
                queued = queue.len(),
                "queue does not start with the acknowledged batch, keeping it"
            );
            return Ok(());
        };

        if remaining.is_empty() {
            self.storage.remove_item(keys::PENDING_PATCHES)
        } else {
            self.write(keys::PENDING_PATCHES, remaining)
        }
    }

    // Caller holds `queue_lock`.
    fn load_queue(&self) -> Result<Vec<Patch>, CacheError> {
        let Some(raw) = self.storage.get_item(keys::PENDING_PATCHES)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(queue) => Ok(queue),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backup = keys::UNREADABLE_PATCHES,
                    "pending patch queue is unreadable, moving it aside"
                );
                self.storage.set_item(keys::UNREADABLE_PATCHES, &raw)?;
                Ok(Vec::new())
            }
        }
    }
}
