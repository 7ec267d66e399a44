use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use super::insights::{insights_prompt, parse_insights, InsightsReport, INSIGHTS_SYSTEM_PROMPT};
use super::metrics::{compute_metrics, DashboardMetrics};
use crate::gateway::{ChatGateway, ChatRequest};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::documents::SavedDraft;
use crate::workflows::http::ErrorStatus;
use crate::workflows::impugnation::Impugnation;
use crate::workflows::processes::{LicitationProcess, RiskAnalysis};
use crate::workflows::transparency::TransparencyReport;

/// Rows of each history fed to the insights prompt.
pub const INSIGHTS_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightsOutcome {
    #[serde(flatten)]
    pub report: InsightsReport,
    /// The gateway failed or answered without a usable report.
    pub degraded: bool,
}

pub struct DashboardService {
    analyses: Repository<RiskAnalysis>,
    processes: Repository<LicitationProcess>,
    impugnations: Repository<Impugnation>,
    transparency: Repository<TransparencyReport>,
    drafts: Repository<SavedDraft>,
    gateway: Arc<dyn ChatGateway>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RowStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            analyses: Repository::new(store.clone()),
            processes: Repository::new(store.clone()),
            impugnations: Repository::new(store.clone()),
            transparency: Repository::new(store.clone()),
            drafts: Repository::new(store),
            gateway,
        }
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics, DashboardError> {
        let analyses = self.analyses.list(ListQuery::all()).await?;
        let processes = self.processes.list(ListQuery::all()).await?;
        let impugnations = self.impugnations.list(ListQuery::all()).await?;
        let scores: Vec<u8> = self
            .transparency
            .list(ListQuery::all())
            .await?
            .into_iter()
            .map(|report| report.score)
            .collect();

        Ok(compute_metrics(
            &analyses,
            &processes,
            impugnations.len(),
            &scores,
        ))
    }

    /// Ask the gateway for patterns in recent production. Never fails on the gateway side:
    /// errors and unusable replies fall back to a fixed placeholder report.
    pub async fn insights(&self) -> Result<InsightsOutcome, DashboardError> {
        let recent = ListQuery::all().limit(INSIGHTS_HISTORY_LIMIT);
        let documents: Vec<_> = self
            .drafts
            .list(recent.clone())
            .await?
            .into_iter()
            .map(|draft| (draft.template_type.code().to_string(), draft.created_at))
            .collect();
        let impugnations: Vec<_> = self
            .impugnations
            .list(recent)
            .await?
            .into_iter()
            .map(|review| (review.analysis_result, review.created_at))
            .collect();

        let request = ChatRequest::new(
            INSIGHTS_SYSTEM_PROMPT,
            insights_prompt(&documents, &impugnations),
        );
        let report = match self.gateway.complete(request).await {
            Ok(reply) => parse_insights(&reply),
            Err(err) => {
                warn!(error = %err, "insights request failed");
                None
            }
        };

        Ok(match report {
            Some(report) => {
                info!(patterns = report.patterns.len(), "report insights generated");
                InsightsOutcome {
                    report,
                    degraded: false,
                }
            }
            None => {
                warn!("report insights degraded to placeholder");
                InsightsOutcome {
                    report: InsightsReport::unavailable(),
                    degraded: true,
                }
            }
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
