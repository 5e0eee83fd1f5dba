//! Dependency wiring.
//!
//! The cache store is resolved through a Shaku module so it can be swapped
//! with `with_component_override` in tests. The repository and the user
//! service are chosen at runtime from `database.backend` and built directly.

use roster_config::{DatabaseConfig, RedisConfig, StorageBackend};
use roster_core::{module, HasComponent, RosterResult};
use roster_repository::{create_pool, DatabasePool, InMemoryUserRepository, PgUserRepository, UserRepository};
use roster_service::{CacheStore, RedisCacheStore, RedisCacheStoreParameters, UserService, UserServiceImpl};
use std::sync::Arc;
use tracing::{info, warn};

// Cache store module. Holds the Redis-backed store, or a disabled one when
// `redis.enabled` is false.
module! {
    pub CacheModule {
        components = [RedisCacheStore],
        providers = [],
    }
}

/// Builds the cache module from Redis configuration.
pub fn build_cache_module(config: &RedisConfig) -> RosterResult<CacheModule> {
    let pool = if config.enabled {
        let pool = RedisCacheStore::create_pool(&config.url, config.pool_size, config.timeout())?;
        info!(
            "Redis cache store configured at {} (timeout {}ms)",
            config.url, config.timeout_ms
        );
        Some(Arc::new(pool))
    } else {
        warn!("Redis disabled; cached routes are computed on every request");
        None
    };

    Ok(CacheModule::builder()
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters {
            pool,
            namespace: config.namespace.clone(),
            timeout: Some(config.timeout()),
        })
        .build())
}

/// Trait for resolving the cache store from a module.
pub trait CacheResolver {
    /// Resolves the cache store.
    fn cache_store(&self) -> Arc<dyn CacheStore>;
}

impl CacheResolver for CacheModule {
    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}

/// Persistence wiring produced by [`build_user_service`].
pub struct Persistence {
    /// User service over the selected repository.
    pub user_service: Arc<dyn UserService>,
    /// Open database pool, kept so it can be closed on shutdown.
    pub pool: Option<Arc<DatabasePool>>,
}

/// Builds the user service over the configured storage backend.
pub async fn build_user_service(config: &DatabaseConfig) -> RosterResult<Persistence> {
    let (repository, pool): (Arc<dyn UserRepository>, _) = match config.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(config).await?;
            if config.run_migrations {
                pool.run_migrations().await?;
            }
            (Arc::new(PgUserRepository::new(pool.clone())), Some(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory user storage; records are lost on restart");
            (Arc::new(InMemoryUserRepository::new()), None)
        }
    };

    info!("User storage backend: {}", config.backend);
    Ok(Persistence {
        user_service: Arc::new(UserServiceImpl::new(repository)),
        pool,
    })
}
