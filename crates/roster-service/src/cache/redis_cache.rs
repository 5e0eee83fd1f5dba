//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Timeouts};
use roster_core::{RosterError, RosterResult};
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Per-operation bound used when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Redis-backed cache store.
///
/// Keys are written as `<namespace><key>` with `SET ... EX ttl`, so Redis
/// itself enforces expiry. Every operation, connection checkout included,
/// is bounded by the store timeout; a server that accepts connections but
/// never answers surfaces as a `Cache` error instead of a stalled request.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool. `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
    /// Prefix prepended to every key.
    namespace: String,
    /// Per-operation timeout. `None` means [`DEFAULT_TIMEOUT`].
    timeout: Option<Duration>,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>, namespace: impl Into<String>) -> Self {
        Self {
            pool: Some(pool),
            namespace: namespace.into(),
            timeout: None,
        }
    }

    /// Create a no-op store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            namespace: String::new(),
            timeout: None,
        }
    }

    /// Overrides the per-operation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a pool for `url`. Connections are opened lazily, so an
    /// unreachable server only shows up on first use. `timeout` bounds
    /// waiting for a free connection, opening one, and recycling one.
    pub fn create_pool(url: &str, max_size: usize, timeout: Duration) -> RosterResult<Pool> {
        let mut pool = PoolConfig::new(max_size);
        pool.timeouts = Timeouts {
            wait: Some(timeout),
            create: Some(timeout),
            recycle: Some(timeout),
        };

        let mut config = deadpool_redis::Config::from_url(url);
        config.pool = Some(pool);
        config
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| RosterError::Cache(format!("Failed to create Redis pool: {}", e)))
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Runs one store operation under the store timeout.
    async fn bounded<T, F>(&self, op: &str, key: &str, fut: F) -> RosterResult<T>
    where
        F: Future<Output = RosterResult<T>>,
    {
        let timeout = self.timeout();
        tokio::time::timeout(timeout, fut).await.map_err(|_| {
            RosterError::Cache(format!(
                "Redis {} for key '{}' timed out after {}ms",
                op,
                key,
                timeout.as_millis()
            ))
        })?
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RosterResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                RosterError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(RosterError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let key = self.namespaced(key);
        self.bounded("GET", &key, async {
            let mut conn = self.get_conn().await?;
            conn.get::<_, Option<String>>(&key).await.map_err(|e| {
                RosterError::Cache(format!("Failed to get key '{}': {}", key, e))
            })
        })
        .await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let key = self.namespaced(key);
        let ttl_secs = ttl.as_secs().max(1);

        self.bounded("SET", &key, async {
            let mut conn = self.get_conn().await?;
            conn.set_ex::<_, _, ()>(&key, value, ttl_secs).await.map_err(|e| {
                RosterError::Cache(format!("Failed to set key '{}': {}", key, e))
            })
        })
        .await?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let key = self.namespaced(key);
        let deleted: i64 = self
            .bounded("DEL", &key, async {
                let mut conn = self.get_conn().await?;
                conn.del::<_, i64>(&key).await.map_err(|e| {
                    RosterError::Cache(format!("Failed to delete key '{}': {}", key, e))
                })
            })
            .await?;

        Ok(deleted > 0)
    }
}
