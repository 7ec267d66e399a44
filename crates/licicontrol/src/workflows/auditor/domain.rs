use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

pub const DEFAULT_OPINION_TITLE: &str = "Parecer sem Título";

/// A protocolled legal opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalOpinion {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub compliance_score: u8,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Record for LegalOpinion {
    const TABLE: &'static str = "legal_opinions";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpinionSubmission {
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub author_id: Option<Uuid>,
}
