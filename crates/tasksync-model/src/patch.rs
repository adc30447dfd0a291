//! Field-level patches
//!
//! On the wire a patch is `{todoId, key, value, modifiedAt}`. Decoding maps
//! `key`/`value` onto the closed [`FieldChange`] set, so an unknown field name
//! or a mistyped value never reaches the merge step.

use crate::error::ValidationError;
use crate::ids::{ProjectId, TaskId};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Names of the patchable task fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKey {
    /// `title`
    Title,
    /// `projectId`
    ProjectId,
    /// `sortIdx`
    SortIdx,
    /// `isDone`
    IsDone,
}

impl PatchKey {
    /// All patchable keys
    pub const ALL: [PatchKey; 4] = [Self::Title, Self::ProjectId, Self::SortIdx, Self::IsDone];

    /// Wire name of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ProjectId => "projectId",
            Self::SortIdx => "sortIdx",
            Self::IsDone => "isDone",
        }
    }
}

impl Display for PatchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPatchKey(s.to_string()))
    }
}

/// A typed new value for one task field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    /// New title
    Title(String),
    /// New owning project (empty id unassigns)
    ProjectId(ProjectId),
    /// New sort position
    SortIdx(i64),
    /// New completion flag
    IsDone(bool),
}

impl FieldChange {
    /// Field this change addresses
    #[must_use]
    pub fn key(&self) -> PatchKey {
        match self {
            Self::Title(_) => PatchKey::Title,
            Self::ProjectId(_) => PatchKey::ProjectId,
            Self::SortIdx(_) => PatchKey::SortIdx,
            Self::IsDone(_) => PatchKey::IsDone,
        }
    }

    /// Decode a raw `key`/`value` pair
    ///
    /// # Errors
    /// `UnknownPatchKey` for a non-patchable key, `PatchValueType` when the
    /// value has the wrong JSON type.
    pub fn decode(key: &str, value: &Value) -> Result<Self, ValidationError> {
        let key = PatchKey::from_str(key)?;
        let mismatch = |expected| ValidationError::patch_value_type(key.as_str(), expected, value);

        match key {
            PatchKey::Title => value
                .as_str()
                .map(|s| Self::Title(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            PatchKey::ProjectId => value
                .as_str()
                .map(|s| Self::ProjectId(ProjectId::from(s)))
                .ok_or_else(|| mismatch("a string")),
            PatchKey::SortIdx => value
                .as_i64()
                .map(Self::SortIdx)
                .ok_or_else(|| mismatch("an integer")),
            PatchKey::IsDone => value
                .as_bool()
                .map(Self::IsDone)
                .ok_or_else(|| mismatch("a boolean")),
        }
    }

    /// Encode the value half of the wire pair
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Title(title) => Value::from(title.as_str()),
            Self::ProjectId(project_id) => Value::from(project_id.as_str()),
            Self::SortIdx(sort_idx) => Value::from(*sort_idx),
            Self::IsDone(is_done) => Value::from(*is_done),
        }
    }
}

/// One field-level edit addressed to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WirePatch", into = "WirePatch")]
pub struct Patch {
    /// Target task
    pub todo_id: TaskId,
    /// Field and its new value
    pub change: FieldChange,
    /// Client time of the edit
    pub modified_at: Timestamp,
}

impl Patch {
    /// Create a new patch
    #[inline]
    #[must_use]
    pub fn new(todo_id: TaskId, change: FieldChange, modified_at: Timestamp) -> Self {
        Self {
            todo_id,
            change,
            modified_at,
        }
    }

    /// Field addressed by this patch
    #[inline]
    #[must_use]
    pub fn key(&self) -> PatchKey {
        self.change.key()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WirePatch {
    todo_id: TaskId,
    key: String,
    value: Value,
    modified_at: Timestamp,
}

impl TryFrom<WirePatch> for Patch {
    type Error = ValidationError;

    fn try_from(wire: WirePatch) -> Result<Self, Self::Error> {
        Ok(Self {
            change: FieldChange::decode(&wire.key, &wire.value)?,
            todo_id: wire.todo_id,
            modified_at: wire.modified_at,
        })
    }
}

impl From<Patch> for WirePatch {
    fn from(patch: Patch) -> Self {
        Self {
            key: patch.change.key().as_str().to_string(),
            value: patch.change.value(),
            todo_id: patch.todo_id,
            modified_at: patch.modified_at,
        }
    }
}
