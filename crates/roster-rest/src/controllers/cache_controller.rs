//! Cached read routes and explicit invalidation.

use crate::{
    extractors::IdPath,
    middleware::{read_through, ReadThrough},
    responses::{DataResponse, MessageResponse},
    state::AppState,
};
use roster_service::{cache_keys, UserView};
use axum::{extract::State, middleware::from_fn_with_state, routing::get, Json, Router};
use tracing::info;

/// Creates the cache router. `GET /data` is served through `listing` and
/// `GET /user/{id}` through `entity`.
pub fn router(listing: ReadThrough, entity: ReadThrough) -> Router<AppState> {
    Router::new()
        .route(
            "/data",
            get(get_data).route_layer(from_fn_with_state(listing, read_through)),
        )
        .route(
            "/user/:id",
            get(get_user_view).route_layer(from_fn_with_state(entity, read_through)),
        )
        .route("/clear_cache/:id", get(clear_user_cache))
}

async fn get_data() -> Json<DataResponse> {
    Json(DataResponse {
        data: "This is some data!".to_string(),
    })
}

/// Synthetic per-user view. Does not check that the user exists.
async fn get_user_view(IdPath(id): IdPath) -> Json<UserView> {
    Json(UserView::synthetic(id))
}

/// Drops the cached view of one user.
async fn clear_user_cache(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Json<MessageResponse> {
    state.cache.invalidate(&cache_keys::user_data(id)).await;

    info!("Cache cleared for user {}", id);
    Json(MessageResponse::new(format!("Cache for user {} cleared", id)))
}
