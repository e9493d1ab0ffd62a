//! # Error Handling Middleware
//!
//! Maps the domain error taxonomy to HTTP status codes and JSON error
//! responses, so every endpoint fails the same way. Authorization and
//! validation failures carry their message to the client; persistence
//! failures are logged and surfaced as a generic message without leaking
//! internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use classboard_core::errors::BoardError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain `BoardError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BoardError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BoardError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BoardError::RoleForbidden(_) => StatusCode::FORBIDDEN,
            BoardError::NotOwner(_) => StatusCode::FORBIDDEN,
            BoardError::NotEnrolled(_) => StatusCode::FORBIDDEN,
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::AlreadyExists(_) => StatusCode::CONFLICT,
            BoardError::Validation(_) => StatusCode::BAD_REQUEST,
            BoardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BoardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store failures are logged server-side and not echoed back.
        let message = match &self.0 {
            BoardError::Database(report) => {
                tracing::error!("Database error: {:?}", report);
                "A storage error occurred".to_string()
            }
            BoardError::Internal(err) => {
                tracing::error!("Internal error: {}", err);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows using the `?` operator with `Result<T, BoardError>` inside
/// handlers that return `Result<T, AppError>`.
impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        AppError(err)
    }
}

/// Wraps infrastructure errors from the repository layer.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BoardError::Database(err))
    }
}
