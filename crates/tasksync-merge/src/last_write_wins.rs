//! Last-write-wins policy
//!
//! Every patch that reaches an existing task is applied, in batch order,
//! whatever its timestamp. This is the historical server behaviour: a
//! causally older patch can overwrite newer state.

use crate::policy::{Admission, MergePolicy};
use crate::registry::PolicyKind;
use tasksync_model::{Patch, Task};

/// Unconditional per-field overwrite
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl LastWriteWins {
    /// Create the policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MergePolicy for LastWriteWins {
    fn admit(&self, _task: &Task, _patch: &Patch) -> Admission {
        Admission::Apply
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::LastWriteWins
    }
}
