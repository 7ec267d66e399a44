use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};

use super::service::DashboardService;
use crate::workflows::http::respond;

pub fn dashboard_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(metrics_handler))
        .route("/api/v1/reports/insights", post(insights_handler))
        .with_state(service)
}

pub(crate) async fn metrics_handler(State(service): State<Arc<DashboardService>>) -> Response {
    respond(StatusCode::OK, service.metrics().await)
}

pub(crate) async fn insights_handler(State(service): State<Arc<DashboardService>>) -> Response {
    respond(StatusCode::OK, service.insights().await)
}
