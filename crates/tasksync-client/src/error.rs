//! Error types for the client

use std::path::PathBuf;

/// Local storage failure
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Backing file could not be written
    #[error("io error on {path}: {source}")]
    Io {
        /// Storage file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded for storage
    #[error("failed to encode '{key}': {source}")]
    Encode {
        /// Storage key being written
        key: String,
        /// JSON encode error
        #[source]
        source: serde_json::Error,
    },

    /// Storage refused the write (quota, read-only medium, ...)
    #[error("storage rejected '{key}': {reason}")]
    Rejected {
        /// Storage key being written
        key: String,
        /// Reason reported by the storage
        reason: String,
    },
}

impl CacheError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of one sync round trip
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Transport failure, including timeouts
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Decoded `{error, message}` body, or the raw body text
        message: String,
    },

    /// Server response could not be decoded
    #[error("failed to decode server response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response could not be written to the local cache
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl SyncError {
    /// True when a later attempt may succeed unchanged
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Cache(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}
