//! Bridge between the UI runtime and local storage
//!
//! # Startup
//!
//! [`CacheBridge::load_flags`] reads the cached keys into [`InitFlags`]
//! before the runtime is constructed. Absent or unreadable keys become
//! empty defaults.
//!
//! # Runtime
//!
//! The runtime exposes named outbound ports. [`CacheBridge::attach`]
//! subscribes a [`PortListener`] to every port it knows and skips (with a
//! warning) the ones the runtime lacks. Listeners only decode and enqueue;
//! the runtime never waits for storage. The bridge applies queued events
//! with [`CacheBridge::drain`] or [`CacheBridge::run`].

use crate::cache::{keys, LocalCache};
use crate::error::CacheError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::future::Future;
use tasksync_model::{Patch, Project, Task};
use tokio::sync::mpsc;

/// Initial state handed to the UI runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitFlags {
    /// Cached tasks as a sequence
    pub task_list: Vec<Task>,
    /// Cached projects
    pub project_list: Vec<Project>,
    /// In-progress edit, `null` when none
    pub edit: Value,
    /// Opaque UI model cache, `null` when none
    pub model_cache: Value,
}

/// Ports the bridge listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// Full task sequence snapshot
    CacheTaskList,
    /// Generic `[key, value]` write
    CacheKeyValue,
    /// One outgoing patch
    QueuePatch,
}

impl Port {
    /// Every port the bridge subscribes to
    pub const ALL: [Port; 3] = [Self::CacheTaskList, Self::CacheKeyValue, Self::QueuePatch];

    /// Port name as exposed by the runtime
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CacheTaskList => "cacheTaskList",
            Self::CacheKeyValue => "cacheKeyValue",
            Self::QueuePatch => "queuePatch",
        }
    }
}

impl Display for Port {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded port emission
#[derive(Debug, Clone, PartialEq)]
pub enum PortEvent {
    /// Replace `taskMap` with this snapshot
    CacheTaskList(Vec<Task>),
    /// Write `value` as JSON under `key`
    CacheKeyValue(String, Value),
    /// Append to `pendingPatches`
    QueuePatch(Patch),
}

impl PortEvent {
    /// Decode a raw emission of `port`
    ///
    /// # Errors
    /// When `payload` does not have the port's shape.
    pub fn decode(port: Port, payload: Value) -> Result<Self, serde_json::Error> {
        Ok(match port {
            Port::CacheTaskList => Self::CacheTaskList(serde_json::from_value(payload)?),
            Port::CacheKeyValue => {
                let (key, value) = serde_json::from_value(payload)?;
                Self::CacheKeyValue(key, value)
            }
            Port::QueuePatch => Self::QueuePatch(serde_json::from_value(payload)?),
        })
    }
}

/// Callback end handed to one runtime port
#[derive(Debug, Clone)]
pub struct PortListener {
    port: Port,
    tx: mpsc::UnboundedSender<PortEvent>,
}

impl PortListener {
    /// Port this listener is attached to
    #[inline]
    #[must_use]
    pub fn port(&self) -> Port {
        self.port
    }

    /// Accept one emission from the runtime
    ///
    /// Never blocks. Returns `false` when the payload was malformed or the
    /// bridge is gone, in which case the emission is dropped.
    pub fn notify(&self, payload: Value) -> bool {
        let event = match PortEvent::decode(self.port, payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(port = %self.port, error = %e, "dropping malformed port payload");
                return false;
            }
        };
        self.tx.send(event).is_ok()
    }
}

/// A named outbound channel of the UI runtime
pub trait OutboundPort {
    /// Register `listener` for every future emission
    fn subscribe(&self, listener: PortListener);
}

/// The UI runtime as seen by the bridge
pub trait UiRuntime {
    /// Port named `name`, if the runtime exposes it
    fn port(&self, name: &str) -> Option<&dyn OutboundPort>;
}

/// Moves state between the UI runtime and the local cache
#[derive(Debug)]
pub struct CacheBridge {
    cache: LocalCache,
    tx: mpsc::UnboundedSender<PortEvent>,
    rx: mpsc::UnboundedReceiver<PortEvent>,
}

impl CacheBridge {
    /// Bridge writing into `cache`
    #[must_use]
    pub fn new(cache: LocalCache) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { cache, tx, rx }
    }

    /// Underlying cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Read the runtime's initial flags from local storage
    #[must_use]
    pub fn load_flags(&self) -> InitFlags {
        InitFlags {
            task_list: self.cache.task_map().into_values().collect(),
            project_list: self.cache.project_list(),
            edit: self.cache.read(keys::EDIT).unwrap_or_default(),
            model_cache: self.cache.read(keys::MODEL_CACHE).unwrap_or_default(),
        }
    }

    /// Listener feeding this bridge for `port`
    #[must_use]
    pub fn listener(&self, port: Port) -> PortListener {
        PortListener {
            port,
            tx: self.tx.clone(),
        }
    }

    /// Subscribe to every known port `runtime` exposes
    ///
    /// Returns the ports actually attached.
    pub fn attach(&self, runtime: &dyn UiRuntime) -> Vec<Port> {
        let mut attached = Vec::with_capacity(Port::ALL.len());
        for port in Port::ALL {
            match runtime.port(port.name()) {
                Some(outbound) => {
                    outbound.subscribe(self.listener(port));
                    tracing::info!(%port, "attached to runtime port");
                    attached.push(port);
                }
                None => tracing::warn!(%port, "runtime does not expose port, skipping"),
            }
        }
        attached
    }

    /// Apply one event to local storage
    ///
    /// # Errors
    /// Encoding or storage failures.
    pub fn handle(&self, event: PortEvent) -> Result<(), CacheError> {
        match event {
            PortEvent::CacheTaskList(tasks) => {
                tracing::debug!(tasks = tasks.len(), "caching task list");
                self.cache.store_task_list(tasks)
            }
            PortEvent::CacheKeyValue(key, value) => {
                tracing::debug!(%key, "caching key");
                self.cache.write(&key, &value)
            }
            PortEvent::QueuePatch(patch) => {
                tracing::debug!(todo_id = %patch.todo_id, key = %patch.key(), "queueing patch");
                self.cache.enqueue(patch)
            }
        }
    }

    fn handle_logged(&self, event: PortEvent) -> bool {
        match self.handle(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "local cache write failed");
                false
            }
        }
    }

    /// Apply every queued event without waiting
    ///
    /// Returns the number of events written successfully.
    pub fn drain(&mut self) -> usize {
        let mut written = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.handle_logged(event) {
                written += 1;
            }
        }
        written
    }

    /// Apply events as they arrive until `shutdown` resolves
    ///
    /// Events already queued at shutdown are still applied.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                Some(event) = self.rx.recv() => {
                    self.handle_logged(event);
                }
            }
        }
        let flushed = self.drain();
        tracing::debug!(flushed, "cache bridge stopped");
    }
}
