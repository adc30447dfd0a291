//! Client side of the sync protocol
//!
//! `push` sends the pending patch queue to `POST /sync` and replaces the
//! cached snapshot with the merged state. `pull` only refreshes the
//! snapshot from `GET /db`. Neither retries; `run` simply tries again on
//! the next tick.

use crate::cache::LocalCache;
use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tasksync_model::api::{ErrorBody, SyncResponse};
use tasksync_model::{PatchRejection, StoreState};
use tokio::time::MissedTickBehavior;

/// Where and how often to sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncClientConfig {
    /// Server root, e.g. `http://127.0.0.1:3000`
    pub base_url: String,
    /// Delay between pushes in `run`, in milliseconds
    pub interval_ms: u64,
    /// Per-request timeout, in milliseconds
    pub timeout_ms: u64,
}

impl Default for SyncClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            interval_ms: 5_000,
            timeout_ms: 10_000,
        }
    }
}

impl SyncClientConfig {
    /// Config for `base_url` with default timings
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Push interval
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP sync client bound to one local cache
#[derive(Debug, Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    config: SyncClientConfig,
    cache: LocalCache,
}

impl SyncClient {
    /// Build a client
    ///
    /// # Errors
    /// [`SyncError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: SyncClientConfig, cache: LocalCache) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            cache,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn body(response: reqwest::Response) -> Result<Vec<u8>, SyncError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes).map_or_else(
            |_| String::from_utf8_lossy(&bytes).into_owned(),
            |body| format!("{}: {}", body.error, body.message),
        );
        Err(SyncError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Send pending patches and adopt the merged state
    ///
    /// On success exactly the patches that were sent leave the queue, and
    /// the server's warnings are returned. On failure the queue and the
    /// cached snapshot are untouched. Pushes over the same cache, from any
    /// clone of any client, run one at a time.
    ///
    /// # Errors
    /// Any [`SyncError`].
    pub async fn push(&self) -> Result<Vec<PatchRejection>, SyncError> {
        let _push = self.cache.lock_push().await;
        let pending = self.cache.pending();

        let response = self
            .http
            .post(self.url("sync"))
            .json(&pending)
            .send()
            .await?;
        let bytes = Self::body(response).await?;
        let (state, warnings) = serde_json::from_slice::<SyncResponse>(&bytes)
            .map_err(SyncError::Decode)?
            .into_parts();

        self.cache.store_snapshot(state)?;
        self.cache.acknowledge(&pending)?;

        for warning in &warnings {
            tracing::warn!(%warning, "server skipped patch");
        }
        tracing::info!(
            sent = pending.len(),
            skipped = warnings.len(),
            "pushed pending patches"
        );
        Ok(warnings)
    }

    /// Replace the cached snapshot with the server state
    ///
    /// # Errors
    /// Any [`SyncError`].
    pub async fn pull(&self) -> Result<StoreState, SyncError> {
        let response = self.http.get(self.url("db")).send().await?;
        let bytes = Self::body(response).await?;
        let state: StoreState = serde_json::from_slice(&bytes).map_err(SyncError::Decode)?;

        self.cache.store_snapshot(state.clone())?;
        tracing::info!(
            projects = state.project_list.len(),
            tasks = state.todo_list.len(),
            "pulled server state"
        );
        Ok(state)
    }

    /// Push on every interval tick until `shutdown` resolves
    ///
    /// Failures are logged and left for the next tick.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.push().await {
                        tracing::warn!(error = %e, retryable = e.is_retryable(), "sync failed, retrying next tick");
                    }
                }
            }
        }
        tracing::debug!("sync loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn default_timings() {
        let config = SyncClientConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn config_from_partial_json() {
        let config: SyncClientConfig =
            serde_json::from_str(r#"{"base_url": "http://sync.local/"}"#).unwrap();
        assert_eq!(config.interval_ms, 5_000);

        let client = SyncClient::new(config, LocalCache::new(Arc::new(MemoryStorage::new()))).unwrap();
        assert_eq!(client.url("sync"), "http://sync.local/sync");
    }
}
