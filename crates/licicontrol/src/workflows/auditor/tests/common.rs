use std::sync::Arc;

use uuid::Uuid;

use crate::store::RowStore;
use crate::workflows::auditor::{AuditorService, OpinionSubmission};
use crate::workflows::testing::memory_store;

/// Cites the statute, grounds the estimate in market research and names two principles.
pub(super) const COMPLIANT_OPINION: &str = "Parecer jurídico fundamentado na Lei 14.133/2021. \
O valor estimado decorre de pesquisa de mercado, observando a eficiência e a economicidade.";

/// Cites the statute and two principles but skips the price research methodology.
pub(super) const THRESHOLD_OPINION: &str =
    "Parecer sobre a Lei 14.133/2021 com eficiência e moralidade na condução do certame.";

pub(super) const WEAK_OPINION: &str = "Opinamos pela contratação direta do serviço solicitado.";

pub(super) fn build_service() -> (Arc<AuditorService>, Arc<dyn RowStore>) {
    let store = memory_store();
    (Arc::new(AuditorService::new(store.clone())), store)
}

pub(super) fn submission(content: &str, author_id: Option<Uuid>) -> OpinionSubmission {
    OpinionSubmission {
        title: None,
        content: content.to_string(),
        author_id,
    }
}
