//! tasksync HTTP server
//!
//! Exposes a [`Store`](tasksync_store::Store) over JSON endpoints.
//!
//! # Core Concepts
//!
//! - [`routes`]: the warp filter tree, with request logging and error recovery
//! - [`ServerConfig`]: defaults, TOML file and CLI flags
//! - [`telemetry`]: `tracing-subscriber` setup
//! - [`bind`]: listener with graceful shutdown
//!
//! # Example
//!
//! ```rust,ignore
//! let store = Arc::new(Store::in_memory(state, PatchMerger::default()));
//! let (addr, server) = tasksync_server::bind(store, config.bind, config.body_limit, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })?;
//! server.await;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod handlers;
mod reject;
mod routes;
mod server;
pub mod telemetry;

pub use config::{command, ServerConfig, DEFAULT_BODY_LIMIT};
pub use error::{ConfigError, ServerError};
pub use reject::{handle_rejection, ApiError};
pub use routes::routes;
pub use server::{bind, spawn_ephemeral};
pub use telemetry::LogFormat;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
