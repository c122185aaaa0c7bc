//! Handler results to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::handler::{ErrorStatus, HandlerError};

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = status.http_status();

        let message = match &self {
            HandlerError::NotFound => status.message().to_string(),
            HandlerError::InvalidType { .. } => {
                tracing::error!("Handler integration error: {}", self);
                ErrorStatus::Internal.message().to_string()
            }
            other if code.is_server_error() => {
                tracing::error!("Operation failed: {}", other);
                other.to_string()
            }
            other => other.to_string(),
        };

        error_response(code, status, message)
    }
}

fn error_response(code: StatusCode, status: ErrorStatus, message: String) -> Response {
    (
        code,
        Json(json!({
            "error": status.code(),
            "message": message
        })),
    )
        .into_response()
}

/// 200 with the operation's output as JSON
pub fn success<T: Serialize>(output: T) -> Response {
    (StatusCode::OK, Json(output)).into_response()
}
