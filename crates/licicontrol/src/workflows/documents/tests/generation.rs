use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::common::*;
use crate::gateway::GatewayError;
use crate::store::Repository;
use crate::workflows::documents::{DocumentError, DocumentKind, GenerationRequest};
use crate::workflows::processes::LicitationProcess;
use crate::workflows::settings::{SettingsService, SettingsUpdate};

fn request(kind: DocumentKind, context: Option<&str>, process_id: Option<Uuid>) -> GenerationRequest {
    GenerationRequest {
        kind,
        context: context.map(str::to_string),
        process_id,
    }
}

#[tokio::test]
async fn retries_transient_failures_then_letterheads() {
    let h = harness();
    SettingsService::new(h.store.clone())
        .save(SettingsUpdate {
            org_name: Some("Prefeitura de Sobral".to_string()),
            state: Some("Ceará".to_string()),
            logo_data: None,
        })
        .await
        .expect("settings saved");
    h.gateway.push_error(GatewayError::RateLimited);
    h.gateway.push_reply(ETP_BODY);

    let document = h
        .service
        .generate(request(DocumentKind::Etp, Some("Compra de 300 notebooks"), None))
        .await
        .expect("document generated");

    assert_eq!(document.content, ETP_BODY);
    assert!(document.formatted.starts_with("PREFEITURA DE SOBRAL\nEstado de Ceará"));
    assert!(document.formatted.contains("Gestor Autorizador"));

    let requests = h.gateway.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1]
        .system_prompt()
        .expect("system prompt")
        .contains("Estudo Técnico Preliminar"));
    assert_eq!(
        requests[1].last_user_prompt(),
        Some("Gerar o documento ETP com base na seguinte demanda: Compra de 300 notebooks")
    );
}

#[tokio::test]
async fn non_retryable_failure_surfaces_immediately() {
    let h = harness();
    h.gateway.push_error(GatewayError::PaymentRequired);
    h.gateway.push_reply("não deve ser usado");

    let result = h
        .service
        .generate(request(DocumentKind::Oficio, Some("Solicitar documentos"), None))
        .await;
    assert!(matches!(
        result,
        Err(DocumentError::Gateway(GatewayError::PaymentRequired))
    ));
    assert_eq!(h.gateway.requests().len(), 1);
}

#[tokio::test]
async fn process_rows_feed_the_demand() {
    let h = harness();
    let now = Utc::now();
    let process = LicitationProcess {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        process_number: "PE 012/2024".to_string(),
        object: "Locação de veículos".to_string(),
        estimated_value: 480_000.0,
        modality: "Pregão Eletrônico".to_string(),
        department: "Secretaria de Saúde".to_string(),
        status: "em_andamento".to_string(),
        publication_date: None,
        opening_date: NaiveDate::from_ymd_opt(2024, 5, 20),
        technical_study_attached: None,
        reference_term_attached: None,
        supplier_history: None,
        budget_allocation: None,
        created_at: now,
        updated_at: now,
    };
    Repository::<LicitationProcess>::new(h.store.clone())
        .insert(&process)
        .await
        .expect("process stored");
    h.gateway.push_reply("MINUTA DE CONTRATO");

    h.service
        .generate(request(DocumentKind::Contrato, None, Some(process.id)))
        .await
        .expect("document generated");
    let prompt = h.gateway.requests()[0]
        .last_user_prompt()
        .expect("prompt sent")
        .to_string();
    assert!(prompt.contains("PE 012/2024"));
    assert!(prompt.contains("R$ 480.000,00"));
    assert!(prompt.contains("20/05/2024"));
    assert!(prompt.contains("Dotação Orçamentária: A definir"));
}

#[tokio::test]
async fn demand_is_required() {
    let h = harness();
    assert!(matches!(
        h.service
            .generate(request(DocumentKind::Dfd, Some("   "), None))
            .await,
        Err(DocumentError::MissingContext)
    ));
    let missing = Uuid::new_v4();
    assert!(matches!(
        h.service
            .generate(request(DocumentKind::Dfd, None, Some(missing)))
            .await,
        Err(DocumentError::ProcessNotFound(id)) if id == missing
    ));
    assert!(h.gateway.requests().is_empty());
}
