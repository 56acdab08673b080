//! Shared response plumbing for route handlers.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use services::error::ServiceError;

/// Maps a service failure onto an HTTP status and error envelope.
///
/// Database failures are logged and answered with a generic message so
/// internal details never reach the client.
pub fn service_error_response(err: ServiceError) -> Response {
    let (status, message) = match &err {
        ServiceError::NotFound(_) | ServiceError::OrphanOccurrence => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        ServiceError::Validation(_)
        | ServiceError::Schedule(_)
        | ServiceError::EmptyRecurrence => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        ServiceError::Db(db_err) => {
            tracing::error!(error = %db_err, "database error while handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    };
    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// Shorthand for a `200 OK` success envelope.
pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data, message))).into_response()
}

/// Shorthand for a `201 Created` success envelope.
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(data, message)),
    )
        .into_response()
}
