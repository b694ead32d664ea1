//! # Error Handling Middleware
//!
//! Maps the domain error taxonomy to HTTP status codes and JSON error
//! responses so the whole API fails uniformly. State-machine violations
//! (`InvalidState`, `SelfSwap`) map to 409 Conflict: the request was
//! well-formed but not legal against the entity's current status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotswap_core::errors::SlotError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `SlotError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub SlotError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            SlotError::NotFound(_) => StatusCode::NOT_FOUND,
            SlotError::Validation(_) => StatusCode::BAD_REQUEST,
            SlotError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SlotError::Forbidden(_) => StatusCode::FORBIDDEN,
            SlotError::InvalidState(_) => StatusCode::CONFLICT,
            SlotError::SelfSwap(_) => StatusCode::CONFLICT,
            SlotError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SlotError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from SlotError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, SlotError>` in handler functions that return `Result<T, AppError>`.
impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the eyre error in a SlotError::Database variant so plumbing-level
/// failures surface as 500s.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SlotError::Database(err))
    }
}

/// Maps a SlotError to an HTTP response
pub fn map_error(err: SlotError) -> Response {
    AppError(err).into_response()
}
