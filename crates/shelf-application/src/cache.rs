//! Resource-keyed query cache.
//!
//! Read results are cached under resource-identity keys (`"products"` for the
//! collection, `products:{id}` for a single item). Mutations invalidate the
//! affected keys, so the next read of that scope triggers a fresh fetch.
//! Concurrent readers of one key share a single in-flight fetch, and a failed
//! refetch keeps the previous value in place (stale-while-error).

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock, broadcast};

use shelf_core::error::{Result, ShelfError};

/// Last-fetch status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Never fetched (or query disabled)
    #[default]
    Idle,
    /// A fetch for this key is in flight
    Loading,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed; any cached value predates the failure
    Error,
}

#[derive(Debug, Clone, Default)]
struct CacheEntry {
    value: Option<Value>,
    status: FetchStatus,
    stale: bool,
}

/// Snapshot returned to a query caller.
///
/// On failure `data` still carries the last good cached value when one
/// exists, alongside the error.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<ShelfError>,
    pub status: FetchStatus,
}

impl<T> QueryState<T> {
    fn disabled() -> Self {
        Self {
            data: None,
            error: None,
            status: FetchStatus::Idle,
        }
    }

    fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: FetchStatus::Success,
        }
    }

    fn failed(error: ShelfError, data: Option<T>) -> Self {
        Self {
            data,
            error: Some(error),
            status: FetchStatus::Error,
        }
    }

    /// Whether the query resolved with data.
    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }

    /// Converts the snapshot into a plain `Result`, dropping any stale data
    /// that accompanied an error.
    pub fn into_result(self) -> Result<Option<T>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

type FetchResult = std::result::Result<Value, ShelfError>;

/// In-memory cache for remote read results.
///
/// Values are stored type-erased as JSON so one cache instance can hold the
/// collection and item entries side by side. Cloning shares the underlying
/// store.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    in_flight: Arc<Mutex<HashMap<String, broadcast::Sender<FetchResult>>>>,
}

impl QueryCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a read for `key`.
    ///
    /// When `enabled` is false (no active session) nothing is fetched and an
    /// idle snapshot is returned. A fresh cached success is served without a
    /// network call; otherwise `fetch` runs, unless another fetch for the
    /// same key is already in flight, in which case this call joins it and
    /// shares its outcome.
    ///
    /// A successful fetch overwrites the entry and clears staleness. A failed
    /// fetch records the error but keeps the previous value available.
    pub async fn query<T, F, Fut>(&self, key: &str, enabled: bool, fetch: F) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !enabled {
            return QueryState::disabled();
        }

        if let Some(value) = self.fresh_value(key).await {
            return decode_state(value);
        }

        // Join an in-flight fetch for this key, or claim ownership of a new one.
        let subscription = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(key) {
                Some(sender) => Some(sender.subscribe()),
                None => {
                    let (sender, _) = broadcast::channel(1);
                    in_flight.insert(key.to_string(), sender);
                    None
                }
            }
        };

        if let Some(mut receiver) = subscription {
            return match receiver.recv().await {
                Ok(Ok(value)) => decode_state(value),
                Ok(Err(err)) => self.stale_state(key, err).await,
                // Owner dropped without publishing; fall back to the entry.
                Err(_) => match self.fresh_value(key).await {
                    Some(value) => decode_state(value),
                    None => {
                        self.stale_state(key, ShelfError::transport("fetch was aborted"))
                            .await
                    }
                },
            };
        }

        self.set_status(key, FetchStatus::Loading).await;

        let outcome = match fetch().await {
            Ok(data) => serde_json::to_value(&data)
                .map(|value| (data, value))
                .map_err(ShelfError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok((data, value)) => {
                {
                    let mut entries = self.entries.write().await;
                    let entry = entries.entry(key.to_string()).or_default();
                    entry.value = Some(value.clone());
                    entry.status = FetchStatus::Success;
                    entry.stale = false;
                }
                self.publish(key, Ok(value)).await;
                QueryState::success(data)
            }
            Err(err) => {
                {
                    let mut entries = self.entries.write().await;
                    let entry = entries.entry(key.to_string()).or_default();
                    // Previous value stays in place: stale-while-error.
                    entry.status = FetchStatus::Error;
                }
                self.publish(key, Err(err.clone())).await;
                self.stale_state(key, err).await
            }
        }
    }

    /// Marks `key` stale so the next read triggers a fresh fetch.
    ///
    /// Exact-key semantics: invalidating `"products"` does not touch
    /// `products:{id}` entries; mutations that affect both declare both keys.
    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.stale = true;
            tracing::debug!(key, "cache entry invalidated");
        }
    }

    /// Invalidates `key` and immediately re-resolves it.
    pub async fn refetch<T, F, Fut>(&self, key: &str, enabled: bool, fetch: F) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.invalidate(key).await;
        self.query(key, enabled, fetch).await
    }

    /// Drops every cached entry (e.g. on logout).
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Returns the recorded status for `key`.
    pub async fn status(&self, key: &str) -> FetchStatus {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| entry.status).unwrap_or_default()
    }

    /// Whether `key` is currently marked stale.
    pub async fn is_stale(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| entry.stale).unwrap_or(false)
    }

    async fn fresh_value(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries.get(key).and_then(|entry| {
            if entry.status == FetchStatus::Success && !entry.stale {
                entry.value.clone()
            } else {
                None
            }
        })
    }

    async fn set_status(&self, key: &str, status: FetchStatus) {
        let mut entries = self.entries.write().await;
        entries.entry(key.to_string()).or_default().status = status;
    }

    /// Releases the in-flight slot for `key` and hands the result to joiners.
    async fn publish(&self, key: &str, result: FetchResult) {
        let sender = self.in_flight.lock().await.remove(key);
        if let Some(sender) = sender {
            let _ = sender.send(result);
        }
    }

    async fn stale_state<T: DeserializeOwned>(&self, key: &str, err: ShelfError) -> QueryState<T> {
        let previous = {
            let entries = self.entries.read().await;
            entries.get(key).and_then(|entry| entry.value.clone())
        };
        let data = previous.and_then(|value| serde_json::from_value(value).ok());
        QueryState::failed(err, data)
    }
}

fn decode_state<T: DeserializeOwned>(value: Value) -> QueryState<T> {
    match serde_json::from_value(value) {
        Ok(data) => QueryState::success(data),
        Err(err) => QueryState::failed(ShelfError::from(err), None),
    }
}
