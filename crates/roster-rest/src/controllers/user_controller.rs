//! User management controller.

use crate::{
    extractors::{IdPath, JsonBody},
    middleware::{read_through, ReadThrough},
    responses::{ok, ApiResult, CreatedResponse, MessageResponse},
    state::AppState,
};
use roster_service::{CreateUserRequest, UpdateUserRequest, UserResponse};
use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tracing::debug;

/// Creates the user router. `GET /users` is served through `listing`.
pub fn router(listing: ReadThrough) -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users)
                .route_layer(from_fn_with_state(listing, read_through))
                .post(create_user),
        )
        .route("/users/:id", put(update_user).delete(delete_user))
}

/// List all users ordered by id.
async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request");

    let users = state.user_service.list_users().await?;
    ok(users)
}

/// Create a new user.
async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> ApiResult<CreatedResponse> {
    debug!("Create user request: {}", request.username);

    let id = state.user_service.create_user(request).await?;
    ok(CreatedResponse {
        message: "User created successfully".to_string(),
        id,
    })
}

/// Update a user's username and/or email.
async fn update_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Update user request: {}", id);

    state.user_service.update_user(id, request).await?;
    ok(MessageResponse::new("User updated successfully"))
}

/// Delete a user.
async fn delete_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<MessageResponse> {
    debug!("Delete user request: {}", id);

    state.user_service.delete_user(id).await?;
    ok(MessageResponse::new("User deleted successfully"))
}
