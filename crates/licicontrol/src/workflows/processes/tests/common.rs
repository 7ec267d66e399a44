use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::gateway::testing::ScriptedGateway;
use crate::store::RowStore;
use crate::workflows::processes::{ProcessService, ProcessSubmission};
use crate::workflows::testing::memory_store;

pub(super) const RISK_REPLY: &str = r#"```json
{
  "risk_level": "alto",
  "risk_score": 68,
  "risk_factors": [
    { "factor": "Estudo técnico ausente", "severity": "alta", "description": "ETP não anexado" }
  ],
  "recommendations": "Anexar o Estudo Técnico Preliminar antes da publicação.",
  "checklist": {
    "documentosObrigatorios": [{ "item": "Estudo Técnico Preliminar", "status": "FALTA" }],
    "clausulasArriscadas": [{ "item": "Garantia de Proposta", "status": "RISCO ALTO" }],
    "juridicoContabil": [{ "item": "Regularidade Fiscal", "status": "OK" }]
  }
}
```"#;

pub(super) struct Harness {
    pub service: Arc<ProcessService>,
    pub gateway: Arc<ScriptedGateway>,
    pub store: Arc<dyn RowStore>,
}

pub(super) fn harness() -> Harness {
    harness_with(ScriptedGateway::default())
}

pub(super) fn harness_with(gateway: ScriptedGateway) -> Harness {
    let store = memory_store();
    let gateway = Arc::new(gateway);
    let service = Arc::new(ProcessService::new(store.clone(), gateway.clone()));
    Harness {
        service,
        gateway,
        store,
    }
}

pub(super) fn submission() -> ProcessSubmission {
    ProcessSubmission {
        user_id: Uuid::new_v4(),
        process_number: "PE 045/2024".to_string(),
        object: "Aquisição de merenda escolar".to_string(),
        estimated_value: 1_250_000.0,
        modality: "Pregão Eletrônico".to_string(),
        department: "Secretaria de Educação".to_string(),
        status: None,
        publication_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        opening_date: NaiveDate::from_ymd_opt(2024, 3, 18),
        technical_study_attached: Some(false),
        reference_term_attached: Some(true),
        supplier_history: Some(json!({ "multas": 1 })),
        budget_allocation: None,
    }
}
