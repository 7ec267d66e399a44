use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::pncp::PncpSearch;
use super::quotation::QuotationRequest;
use super::service::PricingService;
use crate::workflows::http::{error_response, respond, LimitQuery};

pub fn pricing_router(service: Arc<PricingService>) -> Router {
    Router::new()
        .route("/api/v1/pncp/search", post(search_handler))
        .route(
            "/api/v1/quotations",
            post(save_handler).get(list_handler),
        )
        .route(
            "/api/v1/quotations/:quotation_id",
            get(fetch_handler).delete(delete_handler),
        )
        .with_state(service)
}

pub(crate) async fn search_handler(
    State(service): State<Arc<PricingService>>,
    Json(search): Json<PncpSearch>,
) -> Response {
    respond(StatusCode::OK, service.search_notices(search).await)
}

pub(crate) async fn save_handler(
    State(service): State<Arc<PricingService>>,
    Json(request): Json<QuotationRequest>,
) -> Response {
    respond(StatusCode::CREATED, service.save_quotation(request).await)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<PricingService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.quotations(query.limit).await)
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<PricingService>>,
    Path(quotation_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.quotation(quotation_id).await)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<PricingService>>,
    Path(quotation_id): Path<Uuid>,
) -> Response {
    match service.delete_quotation(quotation_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
