//! Validation errors for incoming documents and patches

use crate::ids::{ProjectId, TaskId};

/// Malformed request data, rejected before any mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Two tasks in one collection share an id
    #[error("duplicate task id: {0}")]
    DuplicateTaskId(TaskId),

    /// Two projects in one collection share an id
    #[error("duplicate project id: {0}")]
    DuplicateProjectId(ProjectId),

    /// Patch names a field that is not patchable
    #[error("unknown patch key: '{0}'")]
    UnknownPatchKey(String),

    /// Patch value does not fit the field type
    #[error("invalid value for '{key}': expected {expected}, got {actual}")]
    PatchValueType {
        /// Field name
        key: String,
        /// Expected JSON type
        expected: &'static str,
        /// Received JSON value, rendered
        actual: String,
    },

    /// Body could not be decoded into the expected schema
    #[error("malformed body: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Create a type-mismatch error for a patch value
    pub fn patch_value_type(
        key: impl Into<String>,
        expected: &'static str,
        actual: &serde_json::Value,
    ) -> Self {
        Self::PatchValueType {
            key: key.into(),
            expected,
            actual: actual.to_string(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
