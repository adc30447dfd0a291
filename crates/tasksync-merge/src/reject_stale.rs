//! Stale-patch guard
//!
//! Same per-field overwrite as [`crate::LastWriteWins`], except a patch whose
//! `modifiedAt` is strictly older than the task's current `modifiedAt` is
//! skipped. Equal timestamps are applied so that replaying a batch is still
//! idempotent.

use crate::policy::{Admission, MergePolicy};
use crate::registry::PolicyKind;
use tasksync_model::{Patch, RejectReason, Task};

/// Last-write-wins with a timestamp guard
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectStale;

impl RejectStale {
    /// Create the policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MergePolicy for RejectStale {
    fn admit(&self, task: &Task, patch: &Patch) -> Admission {
        if patch.modified_at < task.modified_at {
            return Admission::Reject(RejectReason::Stale {
                patch_modified_at: patch.modified_at,
                task_modified_at: task.modified_at,
            });
        }
        Admission::Apply
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::RejectStale
    }
}
