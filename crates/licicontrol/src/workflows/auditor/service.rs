use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::domain::{LegalOpinion, OpinionSubmission, DEFAULT_OPINION_TITLE};
use super::rules::{audit_text, AuditReport, SUBMISSION_THRESHOLD};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;

pub struct AuditorService {
    opinions: Repository<LegalOpinion>,
}

/// Stored opinion together with the audit that admitted it.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolledOpinion {
    pub opinion: LegalOpinion,
    pub audit: AuditReport,
}

impl AuditorService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            opinions: Repository::new(store),
        }
    }

    pub fn score(&self, text: &str) -> AuditReport {
        audit_text(text)
    }

    /// Re-audits the submitted text and stores it when the gate is open.
    pub async fn protocol(
        &self,
        submission: OpinionSubmission,
    ) -> Result<ProtocolledOpinion, AuditError> {
        let author_id = submission.author_id.ok_or(AuditError::MissingAuthor)?;

        let audit = audit_text(&submission.content);
        if !audit.submission_allowed() {
            return Err(AuditError::BelowThreshold { score: audit.score });
        }

        let title = submission
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_OPINION_TITLE.to_string());

        let opinion = LegalOpinion {
            id: Uuid::new_v4(),
            title,
            content: submission.content,
            compliance_score: audit.score,
            author_id,
            created_at: Utc::now(),
        };
        let opinion = self.opinions.insert(&opinion).await?;
        info!(opinion_id = %opinion.id, score = audit.score, "legal opinion protocolled");

        Ok(ProtocolledOpinion { opinion, audit })
    }

    pub async fn opinions(&self, limit: Option<usize>) -> Result<Vec<LegalOpinion>, AuditError> {
        let mut query = ListQuery::all();
        query.limit = limit;
        Ok(self.opinions.list(query).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("an authenticated author is required to protocol an opinion")]
    MissingAuthor,
    #[error("compliance score {score} is below the protocol threshold of {}", SUBMISSION_THRESHOLD)]
    BelowThreshold { score: u8 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for AuditError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuditError::MissingAuthor => StatusCode::BAD_REQUEST,
            AuditError::BelowThreshold { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AuditError::Store(err) => err.status_code(),
        }
    }
}
