use std::time::Duration;

use uuid::Uuid;

use super::common::*;
use crate::gateway::testing::ScriptedGateway;
use crate::gateway::GatewayError;
use crate::store::ListQuery;
use crate::workflows::processes::{ProcessError, RiskLevel};

#[tokio::test]
async fn create_defaults_status_and_validates_fields() {
    let h = harness();
    let process = h.service.create(submission()).await.expect("process created");
    assert_eq!(process.status, "em_andamento");
    assert_eq!(process.created_at, process.updated_at);

    let mut blank = submission();
    blank.object = "   ".to_string();
    assert!(matches!(
        h.service.create(blank).await,
        Err(ProcessError::Invalid(message)) if message.contains("object")
    ));

    let mut negative = submission();
    negative.estimated_value = -1.0;
    assert!(matches!(
        h.service.create(negative).await,
        Err(ProcessError::Invalid(_))
    ));
}

#[tokio::test]
async fn analyze_risk_persists_parsed_reply() {
    let h = harness();
    h.gateway.push_reply(RISK_REPLY);
    let process = h.service.create(submission()).await.expect("process created");

    let outcome = h
        .service
        .analyze_risk(process.id)
        .await
        .expect("analysis succeeds");
    assert!(outcome.created);
    assert_eq!(outcome.analysis.risk_level, RiskLevel::Alto);
    assert_eq!(outcome.analysis.risk_score, 68);
    assert_eq!(outcome.analysis.user_id, process.user_id);
    let checklist = outcome
        .analysis
        .risk_factors
        .checklist
        .as_ref()
        .expect("checklist stored");
    assert_eq!(checklist.items().count(), 3);

    let requests = h.gateway.requests();
    assert_eq!(requests.len(), 1);
    let prompt = requests[0].last_user_prompt().expect("user prompt");
    assert!(prompt.contains("PE 045/2024"));
    assert!(prompt.contains("R$ 1.250.000,00"));
    assert!(prompt.contains("Estudo Técnico Anexado: Não"));
    assert_eq!(requests[0].temperature, Some(0.7));

    let stored = h.service.risk_for(process.id).await.expect("analysis stored");
    assert_eq!(stored, outcome.analysis);
}

#[tokio::test]
async fn existing_analysis_is_returned_without_gateway_call() {
    let h = harness();
    h.gateway.push_reply(RISK_REPLY);
    let process = h.service.create(submission()).await.expect("process created");

    let first = h.service.analyze_risk(process.id).await.expect("first analysis");
    let second = h.service.analyze_risk(process.id).await.expect("second analysis");

    assert!(!second.created);
    assert_eq!(second.analysis.id, first.analysis.id);
    assert_eq!(h.gateway.requests().len(), 1);
}

#[tokio::test]
async fn concurrent_requests_share_one_analysis() {
    let h = harness_with(ScriptedGateway::default().with_latency(Duration::from_millis(50)));
    h.gateway.push_reply(RISK_REPLY);
    h.gateway.push_reply(RISK_REPLY);
    let process = h.service.create(submission()).await.expect("process created");

    let (left, right) = tokio::join!(
        h.service.analyze_risk(process.id),
        h.service.analyze_risk(process.id)
    );
    let left = left.expect("first request succeeds");
    let right = right.expect("second request succeeds");

    assert_eq!(
        [left.created, right.created].iter().filter(|created| **created).count(),
        1
    );
    assert_eq!(left.analysis.id, right.analysis.id);
    assert_eq!(h.gateway.requests().len(), 1);
    let stored = h
        .store
        .list("risk_analysis", ListQuery::all())
        .await
        .expect("rows listed");
    assert_eq!(stored.len(), 1);

    let other = h.service.create(submission()).await.expect("second process");
    let outcome = h.service.analyze_risk(other.id).await.expect("independent process");
    assert!(outcome.created);
}

#[tokio::test]
async fn unparsable_reply_stores_nothing() {
    let h = harness();
    h.gateway.push_reply("Desculpe, não consegui analisar.");
    let process = h.service.create(submission()).await.expect("process created");

    let result = h.service.analyze_risk(process.id).await;
    assert!(matches!(result, Err(ProcessError::UnparsableReply(_))));

    let rows = h
        .store
        .list("risk_analysis", ListQuery::all())
        .await
        .expect("rows listed");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn missing_process_and_gateway_failures_surface() {
    let h = harness();
    let unknown = Uuid::new_v4();
    assert!(matches!(
        h.service.analyze_risk(unknown).await,
        Err(ProcessError::NotFound(id)) if id == unknown
    ));
    assert!(h.gateway.requests().is_empty());

    h.gateway.push_error(GatewayError::RateLimited);
    let process = h.service.create(submission()).await.expect("process created");
    assert!(matches!(
        h.service.analyze_risk(process.id).await,
        Err(ProcessError::Gateway(GatewayError::RateLimited))
    ));
}

#[tokio::test]
async fn delete_removes_process_and_analysis() {
    let h = harness();
    h.gateway.push_reply(RISK_REPLY);
    let process = h.service.create(submission()).await.expect("process created");
    h.service.analyze_risk(process.id).await.expect("analysis");

    h.service.delete(process.id).await.expect("process deleted");
    assert!(matches!(
        h.service.get(process.id).await,
        Err(ProcessError::NotFound(_))
    ));
    assert!(matches!(
        h.service.risk_for(process.id).await,
        Err(ProcessError::AnalysisNotFound(_))
    ));
}
