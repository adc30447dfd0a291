//! Patch merger
//!
//! Folds an ordered patch batch over a task collection:
//! 1. index tasks by id (insertion order kept for the output)
//! 2. walk patches in batch order
//! 3. unknown targets are recorded and skipped, the batch continues
//! 4. admitted patches overwrite one field plus the task's `modifiedAt`
//! 5. flatten the index back into a sequence

use crate::policy::{Admission, MergePolicy};
use crate::registry::PolicyKind;
use indexmap::IndexMap;
use std::sync::Arc;
use tasksync_model::{Patch, PatchRejection, Task, TaskId};

/// Counters and per-patch rejections of one merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Patches written into the collection
    pub applied: usize,
    /// Patches skipped, in batch order
    pub rejected: Vec<PatchRejection>,
}

impl MergeReport {
    /// Number of patches inspected
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.applied + self.rejected.len()
    }

    /// True when every patch was applied
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Result of [`PatchMerger::merge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Updated collection
    pub tasks: Vec<Task>,
    /// What happened to each patch
    pub report: MergeReport,
}

/// Applies patch batches under a [`MergePolicy`]
#[derive(Debug, Clone)]
pub struct PatchMerger {
    policy: Arc<dyn MergePolicy>,
}

impl Default for PatchMerger {
    fn default() -> Self {
        Self::from_kind(PolicyKind::default())
    }
}

impl PatchMerger {
    /// Merger using `policy`
    #[must_use]
    pub fn new(policy: impl MergePolicy + 'static) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Merger using the policy named by `kind`
    #[must_use]
    pub fn from_kind(kind: PolicyKind) -> Self {
        Self {
            policy: kind.build(),
        }
    }

    /// Active policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// Apply `patches` in order to `tasks`
    ///
    /// Existing tasks keep their relative order in the output. Fields not
    /// addressed by any admitted patch are left untouched.
    #[must_use]
    pub fn merge(&self, tasks: Vec<Task>, patches: &[Patch]) -> MergeOutcome {
        let mut report = MergeReport::default();
        if patches.is_empty() {
            return MergeOutcome { tasks, report };
        }

        let mut working: IndexMap<TaskId, Task> = tasks
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect();

        for (index, patch) in patches.iter().enumerate() {
            let Some(task) = working.get_mut(&patch.todo_id) else {
                tracing::debug!(index, todo_id = %patch.todo_id, "patch targets unknown task");
                report
                    .rejected
                    .push(PatchRejection::unknown_task(index, patch.todo_id.clone()));
                continue;
            };

            match self.policy.admit(task, patch) {
                Admission::Apply => {
                    task.apply(&patch.change);
                    task.modified_at = patch.modified_at;
                    report.applied += 1;
                }
                Admission::Reject(reason) => {
                    tracing::debug!(
                        index,
                        todo_id = %patch.todo_id,
                        key = %patch.key(),
                        %reason,
                        "patch rejected by policy"
                    );
                    report.rejected.push(PatchRejection {
                        index,
                        todo_id: patch.todo_id.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            policy = self.policy.name(),
            applied = report.applied,
            rejected = report.rejected.len(),
            "merged patch batch"
        );

        MergeOutcome {
            tasks: working.into_values().collect(),
            report,
        }
    }
}
