//! Read-through caching for the service layer.
//!
//! [`CacheMediator`] memoizes computed response bodies in a [`CacheStore`]
//! under keys derived by a [`CachePolicy`]. Stores are Redis-backed in
//! production and in-memory in tests and local development.

pub mod cache_keys;
mod cache_store;
mod mediator;
mod memory_cache;
pub mod cache_metrics;
mod redis_cache;

pub use cache_keys::{CacheKey, CachePolicy, KeyContext, KeyFn, KEY_SEPARATOR, USER_DATA_PREFIX};
#[cfg(test)]
pub use cache_store::MockCacheStore;
pub use cache_store::CacheStore;
pub use mediator::CacheMediator;
pub use memory_cache::{CacheEntry, InMemoryCacheStore};
pub use redis_cache::{RedisCacheStore, RedisCacheStoreParameters};
