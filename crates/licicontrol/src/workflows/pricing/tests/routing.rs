use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::*;
use crate::workflows::pricing::pricing_router;
use crate::workflows::testing::{json_request, read_json_body};

#[tokio::test]
async fn search_endpoint_uses_requested_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PUBLICATION_PATH))
        .and(query_param("dataInicial", "20240210"))
        .and(query_param("dataFinal", "20240315"))
        .respond_with(ResponseTemplate::new(200).set_body_json(publication_page()))
        .mount(&server)
        .await;
    let router = pricing_router(service_for(&server));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/pncp/search",
            &json!({ "term": "merenda", "start_date": "2024-02-10", "end_date": "2024-03-15" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["results"].as_array().expect("results").len(), 2);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/pncp/search",
            &json!({ "term": "tv" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unavailable_portal_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let router = pricing_router(service_for(&server));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/pncp/search",
            &json!({ "term": "merenda" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn saved_quotation_reports_median() {
    let server = MockServer::start().await;
    let router = pricing_router(service_for(&server));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/quotations",
            &json!({
                "user_id": uuid::Uuid::new_v4(),
                "title": "Cadeiras escritório",
                "search_term": "cadeira",
                "samples": [
                    { "description": "Cadeira A", "unit_price": 600.0, "date": "2024-03-01" },
                    { "description": "Cadeira B", "unit_price": 650.0, "date": "2024-03-02" }
                ]
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["quotation_count"], 2);
    assert_eq!(payload["average_price"], 625.0);
    assert_eq!(payload["stats"]["median"], 625.0);
}
