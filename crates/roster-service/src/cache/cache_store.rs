//! Cache store trait for abstracted key-value storage with expiry.

use async_trait::async_trait;
use roster_core::{Interface, RosterResult};
use std::time::Duration;

/// Key-value store with per-entry time-to-live.
///
/// Values are serialized response bodies stored verbatim, so a hit returns
/// exactly the bytes that were written. Implementations report any backend
/// failure as [`roster_core::RosterError::Cache`]; callers decide whether to
/// degrade or propagate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Gets a stored body.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>>;

    /// Stores a body under `key`, replacing any previous entry. The entry
    /// expires `ttl` after this call.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()>;

    /// Deletes an entry.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> RosterResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
