use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::domain::PortalAnalysisRequest;
use super::service::TransparencyService;
use crate::workflows::http::{error_response, respond, LimitQuery};

pub fn transparency_router(service: Arc<TransparencyService>) -> Router {
    Router::new()
        .route(
            "/api/v1/transparency/reports",
            post(analyze_handler).get(list_handler),
        )
        .route(
            "/api/v1/transparency/reports/:report_id",
            get(fetch_handler).delete(delete_handler),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<TransparencyService>>,
    Json(request): Json<PortalAnalysisRequest>,
) -> Response {
    respond(StatusCode::CREATED, service.analyze(request).await)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<TransparencyService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.reports(query.limit).await)
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<TransparencyService>>,
    Path(report_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.report(report_id).await)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<TransparencyService>>,
    Path(report_id): Path<Uuid>,
) -> Response {
    match service.delete(report_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
