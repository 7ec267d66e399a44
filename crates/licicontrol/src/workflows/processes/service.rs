use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{
    LicitationProcess, ProcessSubmission, RiskAnalysis, DEFAULT_PROCESS_STATUS,
};
use super::risk::{parse_risk_reply, risk_prompt, RISK_SYSTEM_PROMPT};
use crate::gateway::{ChatGateway, ChatRequest, GatewayError};
use crate::store::{Filter, ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;

const RISK_TEMPERATURE: f32 = 0.7;

pub struct ProcessService {
    processes: Repository<LicitationProcess>,
    analyses: Repository<RiskAnalysis>,
    gateway: Arc<dyn ChatGateway>,
    /// One lock per process being analysed; the stored-analysis check and the insert run
    /// under it so concurrent requests share a single gateway call.
    risk_locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Result of a risk request; `created` is false when a stored analysis was reused.
#[derive(Debug, Clone, Serialize)]
pub struct RiskOutcome {
    pub analysis: RiskAnalysis,
    pub created: bool,
}

impl ProcessService {
    pub fn new(store: Arc<dyn RowStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            processes: Repository::new(store.clone()),
            analyses: Repository::new(store),
            gateway,
            risk_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn create(
        &self,
        submission: ProcessSubmission,
    ) -> Result<LicitationProcess, ProcessError> {
        for (field, value) in [
            ("process_number", &submission.process_number),
            ("object", &submission.object),
            ("modality", &submission.modality),
            ("department", &submission.department),
        ] {
            if value.trim().is_empty() {
                return Err(ProcessError::Invalid(format!("{field} is required")));
            }
        }
        if !submission.estimated_value.is_finite() || submission.estimated_value < 0.0 {
            return Err(ProcessError::Invalid(
                "estimated_value must be a non-negative amount".to_string(),
            ));
        }

        let now = Utc::now();
        let process = LicitationProcess {
            id: Uuid::new_v4(),
            user_id: submission.user_id,
            process_number: submission.process_number.trim().to_string(),
            object: submission.object.trim().to_string(),
            estimated_value: submission.estimated_value,
            modality: submission.modality.trim().to_string(),
            department: submission.department.trim().to_string(),
            status: submission
                .status
                .filter(|status| !status.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROCESS_STATUS.to_string()),
            publication_date: submission.publication_date,
            opening_date: submission.opening_date,
            technical_study_attached: submission.technical_study_attached,
            reference_term_attached: submission.reference_term_attached,
            supplier_history: submission.supplier_history,
            budget_allocation: submission.budget_allocation,
            created_at: now,
            updated_at: now,
        };

        let process = self.processes.insert(&process).await?;
        info!(process_id = %process.id, number = %process.process_number, "process registered");
        Ok(process)
    }

    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<LicitationProcess>, ProcessError> {
        let mut query = ListQuery::all();
        query.limit = limit;
        Ok(self.processes.list(query).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<LicitationProcess, ProcessError> {
        self.processes
            .fetch(id)
            .await?
            .ok_or(ProcessError::NotFound(id))
    }

    /// Removes the process together with its analysis.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProcessError> {
        self.get(id).await?;
        if let Some(analysis) = self.stored_analysis(id).await? {
            self.analyses.delete(analysis.id).await?;
        }
        self.processes.delete(id).await?;
        info!(process_id = %id, "process deleted");
        Ok(())
    }

    pub async fn risk_for(&self, process_id: Uuid) -> Result<RiskAnalysis, ProcessError> {
        self.stored_analysis(process_id)
            .await?
            .ok_or(ProcessError::AnalysisNotFound(process_id))
    }

    /// Analyses the process once; later calls return the stored analysis unchanged.
    pub async fn analyze_risk(&self, process_id: Uuid) -> Result<RiskOutcome, ProcessError> {
        let lock = self.risk_lock(process_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.analyze_risk_locked(process_id).await
        };
        self.release_risk_lock(process_id, lock);
        outcome
    }

    async fn analyze_risk_locked(&self, process_id: Uuid) -> Result<RiskOutcome, ProcessError> {
        let process = self.get(process_id).await?;

        if let Some(analysis) = self.stored_analysis(process_id).await? {
            info!(process_id = %process_id, "risk analysis already exists");
            return Ok(RiskOutcome {
                analysis,
                created: false,
            });
        }

        let request = ChatRequest::new(RISK_SYSTEM_PROMPT, risk_prompt(&process))
            .with_temperature(RISK_TEMPERATURE);
        let reply = self.gateway.complete(request).await?;
        let assessment = parse_risk_reply(&reply).map_err(|err| {
            warn!(process_id = %process_id, error = %err, "risk reply is not valid JSON");
            ProcessError::UnparsableReply(err)
        })?;

        let now = Utc::now();
        let analysis = RiskAnalysis {
            id: Uuid::new_v4(),
            process_id,
            user_id: process.user_id,
            risk_level: assessment.level,
            risk_score: assessment.score,
            risk_factors: assessment.factors,
            recommendations: assessment.recommendations,
            analyzed_at: now,
            created_at: now,
        };
        let analysis = self.analyses.insert(&analysis).await?;
        info!(
            process_id = %process_id,
            analysis_id = %analysis.id,
            level = %analysis.risk_level,
            score = analysis.risk_score,
            "risk analysis stored"
        );

        Ok(RiskOutcome {
            analysis,
            created: true,
        })
    }

    fn risk_lock(&self, process_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .risk_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(process_id).or_default().clone()
    }

    fn release_risk_lock(&self, process_id: Uuid, lock: Arc<AsyncMutex<()>>) {
        let mut locks = self
            .risk_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // The map and this caller hold the only references: nobody else is waiting.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&process_id);
        }
    }

    /// Every stored analysis, used by the dashboard aggregation.
    pub async fn analyses(&self) -> Result<Vec<RiskAnalysis>, ProcessError> {
        Ok(self.analyses.list(ListQuery::all()).await?)
    }

    async fn stored_analysis(&self, process_id: Uuid) -> Result<Option<RiskAnalysis>, StoreError> {
        self.analyses
            .first_where(Filter::eq("process_id", process_id))
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid process: {0}")]
    Invalid(String),
    #[error("process {0} not found")]
    NotFound(Uuid),
    #[error("process {0} has no risk analysis yet")]
    AnalysisNotFound(Uuid),
    #[error("risk analysis reply could not be parsed: {0}")]
    UnparsableReply(serde_json::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for ProcessError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProcessError::Invalid(_) => StatusCode::BAD_REQUEST,
            ProcessError::NotFound(_) | ProcessError::AnalysisNotFound(_) => StatusCode::NOT_FOUND,
            ProcessError::UnparsableReply(_) => StatusCode::BAD_GATEWAY,
            ProcessError::Gateway(err) => err.status_code(),
            ProcessError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
