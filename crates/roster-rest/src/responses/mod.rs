//! API response types.

use roster_core::{ErrorResponse, RosterError, UserId};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// `{message}` body used by mutations and informational routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: UserId,
}

/// Body returned by `GET /data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse {
    pub data: String,
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RosterError);

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            RosterError::Conflict(_) => {
                warn!(code = self.0.error_code(), "Request rejected: {}", self.0);
            }
            err if err.is_infrastructure() => {
                error!(code = err.error_code(), "Backing store failure: {}", err);
            }
            err if status.is_server_error() => {
                error!(code = err.error_code(), "Request failed: {}", err);
            }
            _ => {}
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// 404 `{message: "Not Found"}` for unmatched routes.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found"))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status() {
        let response = AppError(RosterError::not_found("User", 0)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError(RosterError::conflict("duplicate")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError(RosterError::validation("bad")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError(RosterError::Database("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_created_response_json() {
        let body = CreatedResponse {
            message: "User created successfully".to_string(),
            id: UserId::new(4),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"message":"User created successfully","id":4}"#
        );
    }
}
