//! Read-through cache mediator.

use super::cache_metrics::CacheMetrics;
use super::{CacheKey, CacheStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Memoizes computed bodies in a [`CacheStore`].
///
/// The mediator never computes anything itself. Store failures are logged
/// and degraded around so they never reach the caller: a failed lookup
/// falls back to computing without caching, and a failed write still
/// returns the computed body. No lock is held across a store round-trip, so
/// two concurrent misses on one key may both compute; the later write wins.
#[derive(Clone)]
pub struct CacheMediator {
    store: Arc<dyn CacheStore>,
}

impl CacheMediator {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Returns the body stored under `key`, or runs `compute` and stores its
    /// result for `ttl`.
    ///
    /// An `Err` from `compute` is returned unchanged and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if !self.store.is_enabled() {
            return compute().await;
        }

        match self.store.get_raw(key.as_str()).await {
            Ok(Some(body)) => {
                debug!("Cache hit for key '{}'", key);
                CacheMetrics::hit();
                return Ok(body);
            }
            Ok(None) => {
                debug!("Cache miss for key '{}'", key);
                CacheMetrics::miss();
            }
            Err(e) => {
                warn!("Cache lookup for '{}' failed, serving uncached: {}", key, e);
                CacheMetrics::degraded("get");
                return compute().await;
            }
        }

        let body = compute().await?;

        if let Err(e) = self.store.set_raw(key.as_str(), &body, ttl).await {
            warn!("Failed to cache key '{}': {}", key, e);
            CacheMetrics::degraded("set");
        }

        Ok(body)
    }

    /// Removes `key` from the store. Absent keys and store failures are not
    /// errors.
    pub async fn invalidate(&self, key: &CacheKey) {
        match self.store.delete(key.as_str()).await {
            Ok(removed) => {
                debug!("Invalidated key '{}' (present: {})", key, removed);
                CacheMetrics::invalidated(removed);
            }
            Err(e) => {
                warn!("Failed to invalidate key '{}': {}", key, e);
                CacheMetrics::degraded("delete");
            }
        }
    }
}

impl std::fmt::Debug for CacheMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheMediator")
            .field("enabled", &self.store.is_enabled())
            .finish()
    }
}
