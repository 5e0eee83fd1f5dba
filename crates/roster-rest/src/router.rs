//! Main application router.

use crate::{
    controllers::{cache_controller, health_controller, home_controller, user_controller},
    extractors::parse_id_segment,
    middleware::{logging_middleware, ReadThrough},
    responses::not_found,
    state::AppState,
};
use roster_config::{CacheConfig, ServerConfig};
use roster_service::{CachePolicy, USER_DATA_PREFIX};
use axum::{
    http::HeaderValue,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the main application router.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    cache_config: &CacheConfig,
) -> Router {
    let cors = create_cors_layer(server_config);

    let listing = ReadThrough::new(
        state.cache.clone(),
        CachePolicy::route_path(cache_config.listing_ttl()),
    );
    let entity = ReadThrough::new(state.cache.clone(), user_data_policy(cache_config.entity_ttl()));

    let router = Router::new()
        .route("/", get(home_controller::home))
        .merge(health_controller::router())
        .merge(user_controller::router(listing.clone()))
        .merge(cache_controller::router(listing, entity))
        .fallback(fallback)
        .with_state(state)
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with user, cache and health endpoints");
    router
}

/// Keys `/user/{id}` by the numeric id, so `/user/007` and
/// `/clear_cache/7` address the same entry.
fn user_data_policy(ttl: Duration) -> CachePolicy {
    CachePolicy::prefixed(USER_DATA_PREFIX, &["id"], normalize_id, ttl)
}

fn normalize_id(raw: &str) -> String {
    parse_id_segment(raw).map_or_else(|| raw.to_string(), |id| id.to_string())
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        if server_config.cors_origins.iter().any(|o| o == "*") {
            CorsLayer::permissive()
        } else {
            let origins = server_config
                .cors_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect::<Vec<HeaderValue>>();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    } else {
        CorsLayer::new()
    }
}

async fn fallback() -> Response {
    not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::UserId;
    use roster_service::{cache_keys, KeyContext};

    #[test]
    fn test_user_data_policy_normalizes_id() {
        let policy = user_data_policy(Duration::from_secs(120));
        let ctx = KeyContext::new("/user/007").with_param("id", "007");
        assert_eq!(policy.key_for(&ctx), cache_keys::user_data(UserId::new(7)));
    }
}
