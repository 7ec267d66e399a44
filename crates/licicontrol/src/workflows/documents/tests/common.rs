use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::gateway::testing::ScriptedGateway;
use crate::gateway::RetryPolicy;
use crate::store::RowStore;
use crate::workflows::documents::{DocumentKind, DocumentService, DraftSubmission};
use crate::workflows::testing::memory_store;

pub(super) const ETP_BODY: &str = "ESTUDO TÉCNICO PRELIMINAR\n\n1. Descrição da Necessidade\n\
Substituição dos computadores da rede municipal de ensino.";

pub(super) struct Harness {
    pub service: Arc<DocumentService>,
    pub gateway: Arc<ScriptedGateway>,
    pub store: Arc<dyn RowStore>,
}

pub(super) fn harness() -> Harness {
    let store = memory_store();
    let gateway = Arc::new(ScriptedGateway::default());
    let service = DocumentService::new(store.clone(), gateway.clone()).with_retry(RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
    });
    Harness {
        service: Arc::new(service),
        gateway,
        store,
    }
}

pub(super) fn submission(title: &str) -> DraftSubmission {
    DraftSubmission {
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        template_type: DocumentKind::Etp,
        generated_content: ETP_BODY.to_string(),
        pncp_id: None,
        pncp_objeto: None,
        pncp_data: None,
    }
}
