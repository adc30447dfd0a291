//! Per-patch rejection records
//!
//! A rejected patch is skipped and reported; it never aborts its batch.

use crate::ids::TaskId;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Why one patch was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum RejectReason {
    /// `todoId` does not name a task in the collection
    #[error("unknown task")]
    UnknownTask,

    /// Patch is older than the task's current state
    #[error("stale patch: patch modified at {patch_modified_at}, task modified at {task_modified_at}")]
    #[serde(rename_all = "camelCase")]
    Stale {
        /// Patch timestamp
        patch_modified_at: Timestamp,
        /// Task timestamp at merge time
        task_modified_at: Timestamp,
    },
}

/// A skipped patch, addressed by its position in the submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("patch #{index} on task {todo_id} rejected: {reason}")]
pub struct PatchRejection {
    /// Zero-based index in the batch
    pub index: usize,
    /// Target task
    pub todo_id: TaskId,
    /// Cause
    #[serde(flatten)]
    pub reason: RejectReason,
}

impl PatchRejection {
    /// Rejection for a patch whose task does not exist
    #[must_use]
    pub fn unknown_task(index: usize, todo_id: TaskId) -> Self {
        Self {
            index,
            todo_id,
            reason: RejectReason::UnknownTask,
        }
    }

    /// True when the target task was missing
    #[inline]
    #[must_use]
    pub fn is_unknown_task(&self) -> bool {
        matches!(self.reason, RejectReason::UnknownTask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_task_wire_shape() {
        let rejection = PatchRejection::unknown_task(2, TaskId::from("ghost"));
        assert_eq!(
            serde_json::to_value(&rejection).unwrap(),
            json!({"index": 2, "todoId": "ghost", "reason": "unknownTask"})
        );
        assert!(rejection.to_string().contains("ghost"));
    }

    #[test]
    fn stale_wire_shape_round_trips() {
        let rejection = PatchRejection {
            index: 0,
            todo_id: TaskId::from("t1"),
            reason: RejectReason::Stale {
                patch_modified_at: Timestamp::from_millis(5),
                task_modified_at: Timestamp::from_millis(9),
            },
        };
        let value = serde_json::to_value(&rejection).unwrap();
        assert_eq!(value["reason"], "stale");
        assert_eq!(value["patchModifiedAt"], 5);

        let back: PatchRejection = serde_json::from_value(value).unwrap();
        assert_eq!(back, rejection);
    }
}
