use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use licicontrol::workflows::{
    assistant::assistant_router, auditor::auditor_router, dashboard::dashboard_router,
    documents::document_router, impugnation::impugnation_router, pricing::pricing_router,
    processes::process_router, settings::settings_router, transparency::transparency_router,
};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) fn with_workflow_routes(services: Services) -> Router {
    Router::new()
        .merge(auditor_router(services.auditor))
        .merge(process_router(services.processes))
        .merge(transparency_router(services.transparency))
        .merge(impugnation_router(services.impugnation))
        .merge(document_router(services.documents))
        .merge(pricing_router(services.pricing))
        .merge(dashboard_router(services.dashboard))
        .merge(settings_router(services.settings))
        .merge(assistant_router(services.assistant))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
