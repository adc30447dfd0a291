//! Project entity

use crate::ids::ProjectId;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A named group of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    /// Immutable identifier
    pub id: ProjectId,
    /// Free-text title
    pub title: String,
    /// Display order among projects, not necessarily unique
    pub sort_idx: i64,
    /// Creation time
    pub created_at: Timestamp,
    /// Last modification time
    pub modified_at: Timestamp,
}

impl Project {
    /// Create a project with a fresh id, stamped `now`
    #[must_use]
    pub fn new(title: impl Into<String>, sort_idx: i64, now: Timestamp) -> Self {
        Self {
            id: ProjectId::generate(),
            title: title.into(),
            sort_idx,
            created_at: now,
            modified_at: now,
        }
    }
}
