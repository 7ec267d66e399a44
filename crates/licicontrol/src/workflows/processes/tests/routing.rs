use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use super::common::*;
use crate::gateway::GatewayError;
use crate::workflows::processes::process_router;
use crate::workflows::testing::{empty_request, json_request, read_json_body};

#[tokio::test]
async fn risk_route_creates_then_reuses() {
    let h = harness();
    h.gateway.push_reply(RISK_REPLY);
    let router = process_router(h.service.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/processes",
            &serde_json::to_value(submission()).expect("serialize submission"),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let process = read_json_body(response).await;
    let id = process["id"].as_str().expect("id present").to_string();

    let uri = format!("/api/v1/processes/{id}/risk");
    let response = router
        .clone()
        .oneshot(empty_request("POST", &uri))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["created"], true);
    assert_eq!(payload["analysis"]["risk_level"], "alto");

    let response = router
        .clone()
        .oneshot(empty_request("POST", &uri))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["created"], false);

    let response = router
        .oneshot(empty_request("GET", &uri))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn routes_map_service_errors() {
    let h = harness();
    let router = process_router(h.service.clone());

    let missing = format!("/api/v1/processes/{}/risk", Uuid::new_v4());
    let response = router
        .clone()
        .oneshot(empty_request("POST", &missing))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let process = h.service.create(submission()).await.expect("process created");
    h.gateway.push_error(GatewayError::PaymentRequired);
    let response = router
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/processes/{}/risk", process.id),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/processes",
            &json!({
                "user_id": Uuid::new_v4(),
                "process_number": "",
                "object": "Obra",
                "estimated_value": 10.0,
                "modality": "Concorrência",
                "department": "Obras"
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_route_returns_no_content() {
    let h = harness();
    let process = h.service.create(submission()).await.expect("process created");
    let router = process_router(h.service.clone());

    let uri = format!("/api/v1/processes/{}", process.id);
    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(empty_request("GET", &uri))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
