//! Error types for the store
//!
//! - Validation: rejected before any mutation
//! - Persistence: durable write failed, in-memory state untouched
//! - Lookup: a single task was not found

use std::path::PathBuf;
use tasksync_model::{TaskId, ValidationError};

/// Durable storage failure
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Persisted document could not be decoded
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        /// State file that failed to parse
        path: PathBuf,
        /// JSON decode error
        #[source]
        source: serde_json::Error,
    },

    /// State could not be encoded
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    /// Blocking persistence task panicked or was cancelled
    #[error("persistence task failed: {0}")]
    Task(String),

    /// Backend-specific failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl PersistenceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by [`crate::Store`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input failed validation; nothing was changed
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Durable write failed; the previous state is still current
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    /// No task with this id
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl StoreError {
    /// True for errors caused by the caller's input
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::TaskNotFound(_))
    }

    /// Short class name used in error bodies
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Persistence(_) => "PersistenceError",
            Self::TaskNotFound(_) => "NotFound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let err = StoreError::from(ValidationError::Malformed("x".into()));
        assert!(err.is_client_error());
        assert_eq!(err.kind(), "ValidationError");

        let err = StoreError::from(PersistenceError::Backend("disk full".into()));
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("disk full"));

        let err = StoreError::TaskNotFound(TaskId::from("t9"));
        assert_eq!(err.kind(), "NotFound");
    }
}
