use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::OpinionSubmission;
use super::rules::AuditReport;
use super::service::AuditorService;
use crate::workflows::http::{respond, LimitQuery};

pub fn auditor_router(service: Arc<AuditorService>) -> Router {
    Router::new()
        .route("/api/v1/auditor/score", post(score_handler))
        .route(
            "/api/v1/auditor/opinions",
            post(protocol_handler).get(list_handler),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ScoreView {
    #[serde(flatten)]
    report: AuditReport,
    submission_allowed: bool,
}

pub(crate) async fn score_handler(
    State(service): State<Arc<AuditorService>>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    let report = service.score(&request.text);
    let view = ScoreView {
        submission_allowed: report.submission_allowed(),
        report,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn protocol_handler(
    State(service): State<Arc<AuditorService>>,
    Json(submission): Json<OpinionSubmission>,
) -> Response {
    respond(StatusCode::CREATED, service.protocol(submission).await)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<AuditorService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.opinions(query.limit).await)
}
