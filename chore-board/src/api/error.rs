//! Mapping of chore board errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chore_common::Error;
use serde_json::json;
use tracing::error;

/// Handler error wrapper
///
/// Validation problems become 400 with field-level messages and unknown ids
/// 404. Anything else is logged and returned as 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.0.to_string(),
                    "fields": errors,
                }),
            ),
            Error::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.0.to_string() }),
            ),
            Error::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Not found: {}", what) }),
            ),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": other.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
