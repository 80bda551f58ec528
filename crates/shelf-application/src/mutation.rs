//! Write path with declared cache invalidation.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shelf_core::error::{Result, ShelfError};

use crate::cache::QueryCache;

type SuccessCallback = Box<dyn Fn() + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&ShelfError) + Send + Sync>;

/// A single write operation against the remote API.
///
/// The operation runs exactly once per [`Mutation::run`] call; concurrent
/// invocations are not deduplicated, and the last response to resolve wins
/// for cache purposes. On success the declared keys are invalidated so the
/// next read of those scopes refetches; on failure the cache is left
/// untouched and the error surfaces to the caller without retry.
pub struct Mutation {
    cache: QueryCache,
    invalidate_keys: Vec<String>,
    pending: Arc<AtomicBool>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Mutation {
    /// Creates a mutation over the given cache with no invalidation keys.
    pub fn new(cache: QueryCache) -> Self {
        Self {
            cache,
            invalidate_keys: Vec::new(),
            pending: Arc::new(AtomicBool::new(false)),
            on_success: None,
            on_error: None,
        }
    }

    /// Declares a cache key to invalidate when the mutation succeeds.
    pub fn invalidates(mut self, key: impl Into<String>) -> Self {
        self.invalidate_keys.push(key.into());
        self
    }

    /// Registers a callback invoked after a successful run, once the
    /// declared keys have been invalidated (e.g. for a notification).
    pub fn on_success(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Registers a callback invoked with the error of a failed run.
    pub fn on_error(mut self, callback: impl Fn(&ShelfError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Whether a `run` call is currently awaiting the remote operation.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Executes the operation.
    ///
    /// Invalidation happens after the operation resolves and before this
    /// method returns, so a follow-up read through the same cache always
    /// observes the stale marker.
    pub async fn run<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.pending.store(true, Ordering::SeqCst);
        let result = operation.await;
        self.pending.store(false, Ordering::SeqCst);

        match &result {
            Ok(_) => {
                for key in &self.invalidate_keys {
                    self.cache.invalidate(key).await;
                }
                if let Some(callback) = &self.on_success {
                    callback();
                }
            }
            Err(err) => {
                tracing::debug!("mutation failed, cache left untouched: {err}");
                if let Some(callback) = &self.on_error {
                    callback(err);
                }
            }
        }

        result
    }
}
