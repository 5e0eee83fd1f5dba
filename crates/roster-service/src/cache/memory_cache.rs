//! Process-local cache store.

use super::CacheStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::RosterResult;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A stored body with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache store.
///
/// Expiry is measured with the tokio clock, which lets tests drive it with
/// `tokio::time::pause` and `advance`. Expired entries are dropped lazily on
/// access.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
        let entry = CacheEntry {
            key: key.to_string(),
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_get_within_ttl() {
        let store = InMemoryCacheStore::new();
        store.set_raw("/data", r#"{"data":"x"}"#, TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(
            store.get_raw("/data").await.unwrap().as_deref(),
            Some(r#"{"data":"x"}"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = InMemoryCacheStore::new();
        store.set_raw("/data", "body", TTL).await.unwrap();

        tokio::time::advance(TTL).await;
        assert_eq!(store.get_raw("/data").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_do_not_extend_expiry() {
        let store = InMemoryCacheStore::new();
        store.set_raw("k", "v", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.get_raw("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_expiry() {
        let store = InMemoryCacheStore::new();
        store.set_raw("k", "old", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        store.set_raw("k", "new", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryCacheStore::new();
        store.set_raw("user_data::1", "a", TTL).await.unwrap();
        store.set_raw("user_data::2", "b", TTL).await.unwrap();

        assert!(store.delete("user_data::1").await.unwrap());
        assert!(!store.delete("user_data::1").await.unwrap());
        assert_eq!(store.get_raw("user_data::2").await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_len_skips_expired_entries() {
        let store = InMemoryCacheStore::new();
        store.set_raw("short", "a", Duration::from_secs(10)).await.unwrap();
        store.set_raw("long", "b", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);
    }
}
