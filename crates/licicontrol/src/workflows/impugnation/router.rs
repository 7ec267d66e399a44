use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::domain::ImpugnationRequest;
use super::service::ImpugnationService;
use crate::workflows::http::{error_response, respond, LimitQuery};

pub fn impugnation_router(service: Arc<ImpugnationService>) -> Router {
    Router::new()
        .route(
            "/api/v1/impugnations",
            post(analyze_handler).get(history_handler),
        )
        .route(
            "/api/v1/impugnations/:review_id",
            get(fetch_handler).delete(delete_handler),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<ImpugnationService>>,
    Json(request): Json<ImpugnationRequest>,
) -> Response {
    respond(StatusCode::CREATED, service.analyze(request).await)
}

pub(crate) async fn history_handler(
    State(service): State<Arc<ImpugnationService>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    respond(StatusCode::OK, service.history(query.limit).await)
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<ImpugnationService>>,
    Path(review_id): Path<Uuid>,
) -> Response {
    respond(StatusCode::OK, service.get(review_id).await)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<ImpugnationService>>,
    Path(review_id): Path<Uuid>,
) -> Response {
    match service.delete(review_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::ScriptedGateway;
    use crate::workflows::testing::{empty_request, json_request, memory_store, read_json_body};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn review_round_trip_over_http() {
        let gateway = Arc::new(ScriptedGateway::replying(
            "A impugnação é PARCIALMENTE PROCEDENTE.",
        ));
        let router = impugnation_router(Arc::new(ImpugnationService::new(
            memory_store(),
            gateway,
        )));

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/impugnations",
                &json!({ "edital_text": "Item 7.1", "impugnation_text": "Cláusula restritiva" }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = read_json_body(response).await;
        assert_eq!(payload["verdict"], "parcialmente_procedente");
        let id = payload["id"].as_str().expect("id present").to_string();

        let response = router
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/v1/impugnations/{id}")))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(empty_request("GET", &format!("/api/v1/impugnations/{id}")))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
