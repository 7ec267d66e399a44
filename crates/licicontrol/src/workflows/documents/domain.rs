use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::kinds::DocumentKind;
use crate::export::ExportFormat;
use crate::store::Record;

pub const DRAFT_STATUS: &str = "Rascunho";
pub const SIGNED_STATUS: &str = "assinado_gov_br";
pub const DEFAULT_SIGNING_DEPARTMENT: &str = "Controle Interno";

/// A generated minute saved for later editing (`saved_minutas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDraft {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_type: DocumentKind,
    pub generated_content: String,
    pub status: String,
    /// Reference tender from the national portal the draft was modelled on.
    #[serde(default)]
    pub pncp_id: Option<String>,
    #[serde(default)]
    pub pncp_objeto: Option<String>,
    #[serde(default)]
    pub pncp_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for SavedDraft {
    const TABLE: &'static str = "saved_minutas";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftSubmission {
    pub user_id: Uuid,
    pub title: String,
    pub template_type: DocumentKind,
    pub generated_content: String,
    #[serde(default)]
    pub pncp_id: Option<String>,
    #[serde(default)]
    pub pncp_objeto: Option<String>,
    #[serde(default)]
    pub pncp_data: Option<Value>,
}

/// What to draft. At least one of `context` or `process_id` must be present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationRequest {
    pub kind: DocumentKind,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub process_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub content: String,
    /// `content` inside the organization letterhead and signature block.
    pub formatted: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignRequest {
    pub author_id: Uuid,
    #[serde(default)]
    pub gov_level: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// A document sealed with a SHA-256 digest of its content and signing instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDocument {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub department: String,
    #[serde(default)]
    pub gov_level: Option<String>,
    pub integrity_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Record for SignedDocument {
    const TABLE: &'static str = "documents";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl SignedDocument {
    /// Recompute the digest from the stored content and timestamp.
    pub fn verify(&self) -> bool {
        super::service::integrity_hash(&self.content, self.created_at.timestamp_millis())
            == self.integrity_hash
    }
}

#[derive(Debug, Clone)]
pub struct ExportedDraft {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}
