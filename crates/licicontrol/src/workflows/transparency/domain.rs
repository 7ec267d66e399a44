use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

pub const REPORT_STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparencyFinding {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparencyReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub portal_url: String,
    pub score: u8,
    pub findings_count: u32,
    #[serde(default)]
    pub analysis_summary: Option<String>,
    #[serde(default)]
    pub detailed_findings: Vec<TransparencyFinding>,
    pub status: String,
    pub analysis_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for TransparencyReport {
    const TABLE: &'static str = "transparency_reports";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortalAnalysisRequest {
    pub portal_url: String,
    pub user_id: Uuid,
}
