use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::gateway::GatewayError;
use crate::store::StoreError;

/// Errors that know which HTTP status they surface as.
pub(crate) trait ErrorStatus: std::fmt::Display {
    fn status_code(&self) -> StatusCode;
}

pub(crate) fn error_response<E: ErrorStatus>(err: E) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "request failed");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) fn respond<T: serde::Serialize, E: ErrorStatus>(
    status: StatusCode,
    result: Result<T, E>,
) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(err) => error_response(err),
    }
}

impl ErrorStatus for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Conflict => StatusCode::CONFLICT,
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::Unavailable(_) | StoreError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ErrorStatus for GatewayError {
    fn status_code(&self) -> StatusCode {
        GatewayError::status_code(self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<usize>,
}
