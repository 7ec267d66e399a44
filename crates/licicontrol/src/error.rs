use crate::config::ConfigError;
use crate::export::ExportError;
use crate::gateway::GatewayError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use crate::workflows::pricing::PncpError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures that stop the process: bootstrap, CLI commands and the server loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("pncp client error: {0}")]
    Pncp(#[from] PncpError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Export(ExportError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            AppError::Gateway(err) => err.status_code(),
            AppError::Pncp(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Store(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
