//! tasksync store
//!
//! Server-side authoritative state with atomic durable persistence.
//!
//! # Core Concepts
//!
//! - [`Store`]: owns the [`StoreState`](tasksync_model::StoreState) and
//!   serialises every mutation behind one async writer lock
//! - [`StateBackend`]: whole-document persistence seam
//! - [`FileBackend`]: JSON file replaced atomically through a temp file
//! - [`MemoryBackend`]: in-process backend for tests and ephemeral servers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tasksync_merge::PatchMerger;
//! use tasksync_model::{FixtureGenerator, Timestamp};
//! use tasksync_store::{FileBackend, Store};
//!
//! let backend = Arc::new(FileBackend::new("tasksync-db.json"));
//! let store = Store::open(backend, PatchMerger::default(), || {
//!     FixtureGenerator::new(42).generate(Timestamp::now())
//! })
//! .await?;
//! let outcome = store.apply_patches(&patches).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod backend;
mod error;
mod store;

pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use error::{PersistenceError, StoreError};
pub use store::{Store, SyncOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;
    use tasksync_merge::{PatchMerger, PolicyKind};
    use tasksync_model::{FieldChange, FixtureGenerator, Timestamp};
    use tasksync_test_utils::patch;

    #[tokio::test]
    async fn seeded_fixture_accepts_patches() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::open(
            backend.clone(),
            PatchMerger::from_kind(PolicyKind::RejectStale),
            || FixtureGenerator::new(3).generate(Timestamp::from_millis(1_000)),
        )
        .await
        .unwrap();

        let first = store.get_state().await.todo_list[0].id.clone();
        let outcome = store
            .apply_patches(&[patch(first.as_str(), FieldChange::SortIdx(99), 2_000)])
            .await
            .unwrap();

        assert!(outcome.report.is_clean());
        assert_eq!(backend.snapshot(), Some(outcome.state));
    }
}
