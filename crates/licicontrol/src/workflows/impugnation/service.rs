use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::domain::{Impugnation, ImpugnationRequest, ImpugnationView};
use crate::gateway::parse::truncate_chars;
use crate::gateway::{ChatGateway, ChatRequest, GatewayError};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;

/// Characters of each document sent to the gateway.
pub const PROMPT_TEXT_LIMIT: usize = 30_000;
/// Characters of each document kept with the stored review.
pub const STORED_TEXT_LIMIT: usize = 5_000;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const IMPUGNATION_SYSTEM_PROMPT: &str = "Você é um Consultor Jurídico Especialista em Licitações e \
Contratos Administrativos (Lei 14.133/2021). Analise a Impugnação ao Edital e conclua se ela é \
PROCEDENTE, IMPROCEDENTE ou PARCIALMENTE PROCEDENTE, com fundamentação jurídica.";

pub struct ImpugnationService {
    reviews: Repository<Impugnation>,
    gateway: Arc<dyn ChatGateway>,
}

impl ImpugnationService {
    pub fn new(store: Arc<dyn RowStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            reviews: Repository::new(store),
            gateway,
        }
    }

    pub async fn analyze(
        &self,
        request: ImpugnationRequest,
    ) -> Result<ImpugnationView, ImpugnationError> {
        if request.edital_text.trim().is_empty() {
            return Err(ImpugnationError::MissingText("edital_text"));
        }
        if request.impugnation_text.trim().is_empty() {
            return Err(ImpugnationError::MissingText("impugnation_text"));
        }

        let prompt = format!(
            "TEXTO DO EDITAL (TRECHO RELEVANTE):\n\"{}\"\n\nTEXTO DA IMPUGNAÇÃO:\n\"{}\"\n\nANÁLISE JURÍDICA:",
            truncate_chars(&request.edital_text, PROMPT_TEXT_LIMIT),
            truncate_chars(&request.impugnation_text, PROMPT_TEXT_LIMIT),
        );
        let analysis = self
            .gateway
            .complete(ChatRequest::new(IMPUGNATION_SYSTEM_PROMPT, prompt))
            .await?;

        let review = Impugnation {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            edital_text: truncate_chars(&request.edital_text, STORED_TEXT_LIMIT).to_string(),
            impugnation_text: truncate_chars(&request.impugnation_text, STORED_TEXT_LIMIT)
                .to_string(),
            analysis_result: analysis,
            created_at: Utc::now(),
        };
        let view = ImpugnationView::from(self.reviews.insert(&review).await?);
        info!(review_id = %view.impugnation.id, verdict = ?view.verdict, "impugnation reviewed");
        Ok(view)
    }

    pub async fn history(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ImpugnationView>, ImpugnationError> {
        let query = ListQuery::all().limit(limit.unwrap_or(DEFAULT_HISTORY_LIMIT));
        let reviews = self.reviews.list(query).await?;
        Ok(reviews.into_iter().map(ImpugnationView::from).collect())
    }

    /// Every stored review, used for dashboard counts and report insights.
    pub async fn all(&self) -> Result<Vec<Impugnation>, ImpugnationError> {
        Ok(self.reviews.list(ListQuery::all()).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<ImpugnationView, ImpugnationError> {
        Ok(self.reviews.require(id).await?.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ImpugnationError> {
        self.reviews.delete(id).await?;
        info!(review_id = %id, "impugnation review deleted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImpugnationError {
    #[error("{0} is required")]
    MissingText(&'static str),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for ImpugnationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ImpugnationError::MissingText(_) => StatusCode::BAD_REQUEST,
            ImpugnationError::Gateway(err) => err.status_code(),
            ImpugnationError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
