//! Merge policy trait
//!
//! A policy sees one patch and the current state of its target task and
//! either admits it or rejects it with a reason. Lookup failures are the
//! merger's concern; policies only ever see existing tasks.

use crate::registry::PolicyKind;
use tasksync_model::{Patch, RejectReason, Task};

/// Verdict of a [`MergePolicy`] for one patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Overwrite the field and the task's `modifiedAt`
    Apply,
    /// Skip the patch
    Reject(RejectReason),
}

impl Admission {
    /// True when the patch will be applied
    #[inline]
    #[must_use]
    pub fn is_apply(&self) -> bool {
        matches!(self, Self::Apply)
    }
}

/// Conflict policy for field-level patches
///
/// Implementations must be pure: the same task and patch always yield the
/// same admission, so merges stay deterministic.
pub trait MergePolicy: Send + Sync + std::fmt::Debug {
    /// Decide whether `patch` may be applied to `task`
    fn admit(&self, task: &Task, patch: &Patch) -> Admission;

    /// Selector this policy was built from
    fn kind(&self) -> PolicyKind;

    /// Policy name (for logging)
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}
