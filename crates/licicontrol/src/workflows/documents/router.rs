use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::domain::{DraftSubmission, GenerationRequest, SignRequest};
use super::service::{DocumentError, DocumentService};
use crate::export::ExportFormat;
use crate::workflows::http::{error_response, respond, LimitQuery};

pub fn document_router(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route("/api/v1/documents/generate", post(generate_handler))
        .route(
            "/api/v1/documents/drafts",
            post(save_handler).get(list_handler),
        )
        .route(
            "/api/v1/documents/drafts/:draft_id",
            get(fetch_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/documents/drafts/:draft_id/export",
            get(export_handler),
        )
        .route("/api/v1/documents/drafts/:draft_id/sign", post(sign_handler))
        .route("/api/v1/documents/signed", get(signed_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    pub format: Option<String>,
}

pub(crate) async fn generate_handler(
    State(service): State<Arc<DocumentService>>,
    Json(request): Json<GenerationRequest>,
) -> Response {
    respond(StatusCode::OK, service.generate(request).await)
}

pub(crate) async fn save_handler(
    State(service): State<Arc<DocumentService>>,
    Json(submission): Json<DraftSubmission>,
) -> Response {
    respond(StatusCode::CREATED, service.save_draft(submission).await)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<DocumentService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.drafts(query.limit).await)
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<DocumentService>>,
    Path(draft_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.draft(draft_id).await)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<DocumentService>>,
    Path(draft_id): Path<Uuid>,
) -> Response {
    match service.delete_draft(draft_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler(
    State(service): State<Arc<DocumentService>>,
    Path(draft_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = match query.format.as_deref().unwrap_or("pdf").parse::<ExportFormat>() {
        Ok(format) => format,
        Err(err) => return error_response(DocumentError::from(err)),
    };

    match service.export_draft(draft_id, format).await {
        Ok(exported) => {
            let content_type = HeaderValue::from_str(exported.format.mime().as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            let disposition =
                HeaderValue::from_str(&format!("attachment; filename=\"{}\"", exported.file_name))
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                exported.bytes,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sign_handler(
    State(service): State<Arc<DocumentService>>,
    Path(draft_id): Path<Uuid>,
    Json(request): Json<SignRequest>,
) -> Response {
    respond(StatusCode::CREATED, service.sign_draft(draft_id, request).await)
}

pub(crate) async fn signed_handler(
    State(service): State<Arc<DocumentService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.signed_documents(query.limit).await)
}
