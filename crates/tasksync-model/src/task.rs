//! Task entity

use crate::ids::{ProjectId, TaskId};
use crate::patch::FieldChange;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A todo item
///
/// `project_id` is a soft reference: an empty id means "unassigned" and a
/// dangling id is tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    /// Immutable identifier
    pub id: TaskId,
    /// Free-text title
    pub title: String,
    /// Owning project, empty when unassigned
    pub project_id: ProjectId,
    /// Display order within the project, not necessarily unique
    pub sort_idx: i64,
    /// Completion flag
    pub is_done: bool,
    /// Creation time, secondary sort key
    pub created_at: Timestamp,
    /// Last modification time
    pub modified_at: Timestamp,
}

impl Task {
    /// Create an open task with a fresh id, stamped `now`
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        project_id: ProjectId,
        sort_idx: i64,
        now: Timestamp,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            project_id,
            sort_idx,
            is_done: false,
            created_at: now,
            modified_at: now,
        }
    }

    /// True when the task belongs to no project
    #[inline]
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.project_id.as_str().is_empty()
    }

    /// Overwrite the field named by `change`
    ///
    /// Only the addressed field is touched; `modified_at` is left to the caller.
    pub fn apply(&mut self, change: &FieldChange) {
        match change {
            FieldChange::Title(title) => self.title.clone_from(title),
            FieldChange::ProjectId(project_id) => self.project_id.clone_from(project_id),
            FieldChange::SortIdx(sort_idx) => self.sort_idx = *sort_idx,
            FieldChange::IsDone(is_done) => self.is_done = *is_done,
        }
    }
}
