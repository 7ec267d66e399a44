use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::domain::ProcessSubmission;
use super::service::ProcessService;
use crate::workflows::http::{error_response, respond, LimitQuery};

pub fn process_router(service: Arc<ProcessService>) -> Router {
    Router::new()
        .route(
            "/api/v1/processes",
            post(create_handler).get(list_handler),
        )
        .route(
            "/api/v1/processes/:process_id",
            get(fetch_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/processes/:process_id/risk",
            post(analyze_handler).get(risk_handler),
        )
        .with_state(service)
}

pub(crate) async fn create_handler(
    State(service): State<Arc<ProcessService>>,
    Json(submission): Json<ProcessSubmission>,
) -> Response {
    respond(StatusCode::CREATED, service.create(submission).await)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<ProcessService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.list(query.limit).await)
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<ProcessService>>,
    Path(process_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.get(process_id).await)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<ProcessService>>,
    Path(process_id): Path<Uuid>,
) -> Response {
    match service.delete(process_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<ProcessService>>,
    Path(process_id): Path<Uuid>,
) -> Response {
    match service.analyze_risk(process_id).await {
        Ok(outcome) if outcome.created => (StatusCode::CREATED, Json(outcome)).into_response(),
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn risk_handler(
    State(service): State<Arc<ProcessService>>,
    Path(process_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.risk_for(process_id).await)
}
