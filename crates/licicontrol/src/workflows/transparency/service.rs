use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::analysis::{interpret_reply, ReplyQuality};
use super::domain::{PortalAnalysisRequest, TransparencyReport, REPORT_STATUS_COMPLETED};
use crate::gateway::{ChatGateway, ChatRequest, GatewayError};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;

pub const DEFAULT_REPORT_LIMIT: usize = 10;

const TRANSPARENCY_SYSTEM_PROMPT: &str = "Você é um auditor de transparência pública que avalia \
portais segundo a Cartilha PNTP 2025, a Lei 12.527/2011 (LAI), a LC 131/2009, a Lei 14.133/2021, \
a Lei 13.709/2018 (LGPD) e a Lei 14.129/2021. Considere informações institucionais, receitas, \
despesas, licitações, contratos, obras, recursos humanos, SIC, ouvidoria e acessibilidade.";

fn transparency_prompt(portal_url: &str) -> String {
    format!(
        "Analise o portal de transparência {portal_url} e responda somente com JSON:\n\
         {{\n  \"score\": 0-100,\n  \"findings_count\": número de não conformidades,\n  \
         \"summary\": \"resumo executivo com até 500 caracteres\",\n  \
         \"detailed_findings\": [{{ \"category\": \"...\", \"severity\": \"alta|média|baixa\", \
         \"description\": \"...\", \"recommendation\": \"...\" }}]\n}}"
    )
}

pub struct TransparencyService {
    reports: Repository<TransparencyReport>,
    gateway: Arc<dyn ChatGateway>,
}

impl TransparencyService {
    pub fn new(store: Arc<dyn RowStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            reports: Repository::new(store),
            gateway,
        }
    }

    pub async fn analyze(
        &self,
        request: PortalAnalysisRequest,
    ) -> Result<TransparencyReport, TransparencyError> {
        let portal_url = request.portal_url.trim();
        if portal_url.is_empty() {
            return Err(TransparencyError::MissingPortalUrl);
        }

        let chat = ChatRequest::new(TRANSPARENCY_SYSTEM_PROMPT, transparency_prompt(portal_url))
            .with_web_search();
        let reply = self.gateway.complete(chat).await?;

        let assessment = interpret_reply(&reply);
        if assessment.quality != ReplyQuality::Structured {
            warn!(portal_url, quality = ?assessment.quality, "transparency reply degraded to placeholder");
        }

        let now = Utc::now();
        let report = TransparencyReport {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            portal_url: portal_url.to_string(),
            score: assessment.score,
            findings_count: assessment.findings_count,
            analysis_summary: Some(assessment.summary),
            detailed_findings: assessment.findings,
            status: REPORT_STATUS_COMPLETED.to_string(),
            analysis_date: now,
            created_at: now,
            updated_at: now,
        };
        let report = self.reports.insert(&report).await?;
        info!(report_id = %report.id, score = report.score, "transparency report stored");
        Ok(report)
    }

    pub async fn reports(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<TransparencyReport>, TransparencyError> {
        let query = ListQuery::all().limit(limit.unwrap_or(DEFAULT_REPORT_LIMIT));
        Ok(self.reports.list(query).await?)
    }

    /// Scores of every stored report, newest first.
    pub async fn scores(&self) -> Result<Vec<u8>, TransparencyError> {
        let reports = self.reports.list(ListQuery::all()).await?;
        Ok(reports.into_iter().map(|report| report.score).collect())
    }

    pub async fn report(&self, id: Uuid) -> Result<TransparencyReport, TransparencyError> {
        Ok(self.reports.require(id).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), TransparencyError> {
        self.reports.delete(id).await?;
        info!(report_id = %id, "transparency report deleted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransparencyError {
    #[error("portal_url is required")]
    MissingPortalUrl,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for TransparencyError {
    fn status_code(&self) -> StatusCode {
        match self {
            TransparencyError::MissingPortalUrl => StatusCode::BAD_REQUEST,
            TransparencyError::Gateway(err) => err.status_code(),
            TransparencyError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
