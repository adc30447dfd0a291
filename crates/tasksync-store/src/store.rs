//! Authoritative store
//!
//! One [`StoreState`] guarded by an async `RwLock`. Every mutation holds the
//! write lock across validation, merge and persistence, and swaps the
//! in-memory state only once the backend has accepted the new document.
//! Readers therefore always observe the last committed state.

use crate::backend::{MemoryBackend, StateBackend};
use crate::error::StoreError;
use std::fmt;
use std::sync::Arc;
use tasksync_merge::{MergeReport, PatchMerger, PolicyKind};
use tasksync_model::{Patch, StoreState, Task, TaskId};
use tokio::sync::RwLock;

/// Result of [`Store::apply_patches`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Committed state after the merge
    pub state: StoreState,
    /// Per-patch results
    pub report: MergeReport,
}

/// Server-side holder of the project list and task collection
pub struct Store {
    state: RwLock<StoreState>,
    backend: Arc<dyn StateBackend>,
    merger: PatchMerger,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("policy", &self.merger.policy())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open a store over `backend`
    ///
    /// Loads the persisted document. When nothing is stored yet, `seed`
    /// builds the initial state, which is persisted before the store is
    /// returned.
    ///
    /// # Errors
    /// - [`StoreError::Persistence`] if loading or the initial save fails
    /// - [`StoreError::Validation`] if the persisted document breaks the
    ///   collection invariants
    pub async fn open<F>(
        backend: Arc<dyn StateBackend>,
        merger: PatchMerger,
        seed: F,
    ) -> Result<Self, StoreError>
    where
        F: FnOnce() -> StoreState,
    {
        let state = match backend.load().await? {
            Some(state) => {
                state.validate()?;
                tracing::info!(
                    projects = state.project_list.len(),
                    tasks = state.todo_list.len(),
                    "loaded persisted state"
                );
                state
            }
            None => {
                let state = seed();
                state.validate()?;
                backend.save(&state).await?;
                tracing::info!(
                    projects = state.project_list.len(),
                    tasks = state.todo_list.len(),
                    "seeded empty store"
                );
                state
            }
        };

        Ok(Self {
            state: RwLock::new(state),
            backend,
            merger,
        })
    }

    /// Store over a [`MemoryBackend`] already holding `state`
    #[must_use]
    pub fn in_memory(state: StoreState, merger: PatchMerger) -> Self {
        Self {
            backend: Arc::new(MemoryBackend::with_state(state.clone())),
            state: RwLock::new(state),
            merger,
        }
    }

    /// Merge policy used by [`Store::apply_patches`]
    #[inline]
    #[must_use]
    pub fn merge_policy(&self) -> PolicyKind {
        self.merger.policy()
    }

    /// Snapshot of the last committed state
    pub async fn get_state(&self) -> StoreState {
        self.state.read().await.clone()
    }

    /// Replace both collections
    ///
    /// # Errors
    /// Validation failures leave the state untouched; so do persistence
    /// failures.
    pub async fn replace_state(&self, next: StoreState) -> Result<(), StoreError> {
        next.validate()?;

        let mut guard = self.state.write().await;
        self.backend.save(&next).await?;
        *guard = next;

        tracing::info!(
            projects = guard.project_list.len(),
            tasks = guard.todo_list.len(),
            "replaced state"
        );
        Ok(())
    }

    /// Look up one task
    ///
    /// # Errors
    /// [`StoreError::TaskNotFound`] when no task has this id.
    pub async fn get_task_by_id(&self, id: &TaskId) -> Result<Task, StoreError> {
        self.state
            .read()
            .await
            .task(id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
    }

    /// Merge `patches` into the task collection and commit the result
    ///
    /// The project list is carried over unchanged. A batch in which no
    /// patch was admitted commits nothing.
    ///
    /// # Errors
    /// [`StoreError::Persistence`] if the merged state could not be saved;
    /// the previous state stays current.
    pub async fn apply_patches(&self, patches: &[Patch]) -> Result<SyncOutcome, StoreError> {
        let mut guard = self.state.write().await;

        let outcome = self.merger.merge(guard.todo_list.clone(), patches);
        if outcome.report.applied == 0 {
            tracing::debug!(patches = patches.len(), "no patch admitted, nothing to commit");
            return Ok(SyncOutcome {
                state: guard.clone(),
                report: outcome.report,
            });
        }

        let next = StoreState::new(guard.project_list.clone(), outcome.tasks);
        self.backend.save(&next).await?;
        *guard = next;

        Ok(SyncOutcome {
            state: guard.clone(),
            report: outcome.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockStateBackend;
    use crate::error::PersistenceError;
    use pretty_assertions::assert_eq;
    use tasksync_model::{FieldChange, Timestamp};
    use tasksync_test_utils::{patch, sample_state, TaskBuilder};

    fn failing_backend() -> Arc<dyn StateBackend> {
        let mut backend = MockStateBackend::new();
        backend
            .expect_save()
            .returning(|_| Err(PersistenceError::Backend("disk full".into())));
        Arc::new(backend)
    }

    fn failing_store() -> Store {
        Store {
            state: RwLock::new(sample_state()),
            backend: failing_backend(),
            merger: PatchMerger::default(),
        }
    }

    #[tokio::test]
    async fn open_seeds_and_persists_empty_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::open(backend.clone(), PatchMerger::default(), sample_state)
            .await
            .unwrap();

        assert_eq!(store.get_state().await, sample_state());
        assert_eq!(backend.snapshot(), Some(sample_state()));
    }

    #[tokio::test]
    async fn open_prefers_persisted_state() {
        let persisted = StoreState::new(vec![], vec![TaskBuilder::new("only").build()]);
        let backend = Arc::new(MemoryBackend::with_state(persisted.clone()));

        let store = Store::open(backend, PatchMerger::default(), sample_state)
            .await
            .unwrap();
        assert_eq!(store.get_state().await, persisted);
    }

    #[tokio::test]
    async fn open_rejects_invalid_persisted_state() {
        let dup = TaskBuilder::new("t1").build();
        let backend = Arc::new(MemoryBackend::with_state(StoreState::new(
            vec![],
            vec![dup.clone(), dup],
        )));

        let err = Store::open(backend, PatchMerger::default(), StoreState::default)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn open_surfaces_load_failure() {
        let mut backend = MockStateBackend::new();
        backend
            .expect_load()
            .returning(|| Err(PersistenceError::Backend("unreachable".into())));
        backend.expect_save().never();

        let err = Store::open(Arc::new(backend), PatchMerger::default(), sample_state)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
    }

    #[tokio::test]
    async fn replace_then_get_round_trips() {
        let store = Store::in_memory(StoreState::default(), PatchMerger::default());
        store.replace_state(sample_state()).await.unwrap();
        assert_eq!(store.get_state().await, sample_state());
    }

    #[tokio::test]
    async fn invalid_replace_leaves_state_unchanged() {
        let store = Store::in_memory(sample_state(), PatchMerger::default());
        let dup = TaskBuilder::new("x").build();

        let err = store
            .replace_state(StoreState::new(vec![], vec![dup.clone(), dup]))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(store.get_state().await, sample_state());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_state() {
        let store = failing_store();

        let err = store.replace_state(StoreState::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.get_state().await, sample_state());

        let err = store
            .apply_patches(&[patch("t1", FieldChange::IsDone(true), 200)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert!(!store.get_task_by_id(&TaskId::from("t1")).await.unwrap().is_done);
    }

    #[tokio::test]
    async fn apply_patches_commits_tasks_only() {
        let store = Store::in_memory(sample_state(), PatchMerger::default());
        let outcome = store
            .apply_patches(&[
                patch("t1", FieldChange::IsDone(true), 200),
                patch("ghost", FieldChange::Title("x".into()), 200),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.report.applied, 1);
        assert_eq!(outcome.report.rejected.len(), 1);
        assert_eq!(outcome.state.project_list, sample_state().project_list);

        let t1 = store.get_task_by_id(&TaskId::from("t1")).await.unwrap();
        assert!(t1.is_done);
        assert_eq!(t1.modified_at, Timestamp::from_millis(200));
        assert_eq!(store.get_state().await, outcome.state);
    }

    #[tokio::test]
    async fn batch_without_admitted_patches_skips_save() {
        let mut backend = MockStateBackend::new();
        backend.expect_save().never();
        let store = Store {
            state: RwLock::new(sample_state()),
            backend: Arc::new(backend),
            merger: PatchMerger::default(),
        };

        let outcome = store
            .apply_patches(&[patch("ghost", FieldChange::IsDone(true), 1)])
            .await
            .unwrap();
        assert_eq!(outcome.state, sample_state());

        let outcome = store.apply_patches(&[]).await.unwrap();
        assert_eq!(outcome.state, sample_state());
        assert!(outcome.report.is_clean());
    }

    #[tokio::test]
    async fn unknown_task_lookup_is_not_found() {
        let store = Store::in_memory(sample_state(), PatchMerger::default());
        let err = store.get_task_by_id(&TaskId::from("nope")).await.unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }
}
