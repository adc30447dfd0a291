//! tasksync client
//!
//! Keeps a local copy of the server state, captures edits as patches and
//! reconciles them with the server.
//!
//! # Core Concepts
//!
//! - [`LocalStorage`]: `localStorage`-style key-value store
//!   ([`MemoryStorage`], [`FileStorage`])
//! - [`LocalCache`]: typed keys on top of storage, including the outgoing
//!   patch queue
//! - [`CacheBridge`]: initial flags for the UI runtime and the port event
//!   channel back into storage
//! - [`SyncClient`]: pushes queued patches to `POST /sync` and adopts the
//!   merged state
//!
//! # Example
//!
//! ```rust,ignore
//! let cache = LocalCache::new(Arc::new(FileStorage::open("local.json")?));
//! let mut bridge = CacheBridge::new(cache.clone());
//! let runtime = MyRuntime::start(bridge.load_flags());
//! bridge.attach(&runtime);
//!
//! let client = SyncClient::new(SyncClientConfig::default(), cache)?;
//! tokio::join!(bridge.run(shutdown.clone()), client.run(shutdown));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bridge;
mod cache;
mod error;
mod storage;
mod sync;

pub use bridge::{CacheBridge, InitFlags, OutboundPort, Port, PortEvent, PortListener, UiRuntime};
pub use cache::{keys, LocalCache, TaskMap};
pub use error::{CacheError, SyncError};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use sync::{SyncClient, SyncClientConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
