use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verdict::Verdict;
use crate::store::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impugnation {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub edital_text: String,
    pub impugnation_text: String,
    pub analysis_result: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Impugnation {
    const TABLE: &'static str = "impugnacoes";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Stored review plus the verdict read from its analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpugnationView {
    #[serde(flatten)]
    pub impugnation: Impugnation,
    pub verdict: Verdict,
}

impl From<Impugnation> for ImpugnationView {
    fn from(impugnation: Impugnation) -> Self {
        let verdict = Verdict::detect(&impugnation.analysis_result);
        Self {
            impugnation,
            verdict,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImpugnationRequest {
    pub edital_text: String,
    pub impugnation_text: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}
