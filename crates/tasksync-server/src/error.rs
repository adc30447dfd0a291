//! Server startup errors

use std::path::PathBuf;

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File named by `--config`
        path: PathBuf,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ServerConfig`]
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File named by `--config`
        path: PathBuf,
        /// TOML decode error
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to bring the HTTP listener up
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Listener could not bind
    #[error("failed to bind listener: {0}")]
    Bind(#[from] warp::Error),
}
