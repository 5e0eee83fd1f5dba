//! Landing page.

use crate::responses::MessageResponse;
use axum::Json;

/// `GET /`
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to main page"))
}
