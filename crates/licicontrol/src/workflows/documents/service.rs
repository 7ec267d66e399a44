use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{
    DraftSubmission, ExportedDraft, GeneratedDocument, GenerationRequest, SavedDraft,
    SignRequest, SignedDocument, DEFAULT_SIGNING_DEPARTMENT, DRAFT_STATUS, SIGNED_STATUS,
};
use super::formatter::format_official;
use crate::export::{render, ExportDocument, ExportError, ExportFormat};
use crate::gateway::{ChatGateway, ChatRequest, GatewayError, RetryPolicy};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;
use crate::workflows::processes::{format_brl, LicitationProcess};
use crate::workflows::settings::{SettingsError, SettingsService};

pub const MINIMUM_TITLE_LENGTH: usize = 5;

/// Hex SHA-256 of the content followed by the signing instant in unix milliseconds.
pub fn integrity_hash(content: &str, timestamp_millis: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(timestamp_millis.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

pub struct DocumentService {
    drafts: Repository<SavedDraft>,
    signed: Repository<SignedDocument>,
    processes: Repository<LicitationProcess>,
    settings: SettingsService,
    gateway: Arc<dyn ChatGateway>,
    retry: RetryPolicy,
}

impl DocumentService {
    pub fn new(store: Arc<dyn RowStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            drafts: Repository::new(store.clone()),
            signed: Repository::new(store.clone()),
            processes: Repository::new(store.clone()),
            settings: SettingsService::new(store),
            gateway,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedDocument, DocumentError> {
        let mut demand = request
            .context
            .as_deref()
            .map(str::trim)
            .filter(|context| !context.is_empty())
            .map(str::to_string);

        if let Some(process_id) = request.process_id {
            let process = self
                .processes
                .fetch(process_id)
                .await?
                .ok_or(DocumentError::ProcessNotFound(process_id))?;
            let summary = process_summary(&process);
            demand = Some(match demand {
                Some(context) => format!("{context}\n\n{summary}"),
                None => summary,
            });
        }
        let demand = demand.ok_or(DocumentError::MissingContext)?;

        let chat = ChatRequest::new(
            request.kind.instruction(),
            format!(
                "Gerar o documento {} com base na seguinte demanda: {demand}",
                request.kind
            ),
        );
        let gateway = self.gateway.as_ref();
        let content = self
            .retry
            .run(|_| gateway.complete(chat.clone()))
            .await?;

        let organization = self.settings.current().await?;
        let formatted = format_official(&content, &organization);
        info!(kind = %request.kind, chars = content.chars().count(), "document generated");
        Ok(GeneratedDocument {
            kind: request.kind,
            content,
            formatted,
        })
    }

    pub async fn save_draft(&self, submission: DraftSubmission) -> Result<SavedDraft, DocumentError> {
        let title = submission.title.trim();
        if title.chars().count() < MINIMUM_TITLE_LENGTH {
            return Err(DocumentError::TitleTooShort);
        }
        if submission.generated_content.trim().is_empty() {
            return Err(DocumentError::EmptyContent);
        }

        let now = Utc::now();
        let draft = SavedDraft {
            id: Uuid::new_v4(),
            user_id: submission.user_id,
            title: title.to_string(),
            template_type: submission.template_type,
            generated_content: submission.generated_content,
            status: DRAFT_STATUS.to_string(),
            pncp_id: submission.pncp_id,
            pncp_objeto: submission.pncp_objeto,
            pncp_data: submission.pncp_data,
            created_at: now,
            updated_at: now,
        };
        let saved = self.drafts.insert(&draft).await?;
        info!(draft_id = %saved.id, kind = %saved.template_type, "draft saved");
        Ok(saved)
    }

    pub async fn drafts(&self, limit: Option<usize>) -> Result<Vec<SavedDraft>, DocumentError> {
        let query = match limit {
            Some(limit) => ListQuery::all().limit(limit),
            None => ListQuery::all(),
        };
        Ok(self.drafts.list(query).await?)
    }

    pub async fn draft(&self, id: Uuid) -> Result<SavedDraft, DocumentError> {
        Ok(self.drafts.require(id).await?)
    }

    pub async fn delete_draft(&self, id: Uuid) -> Result<(), DocumentError> {
        self.drafts.delete(id).await?;
        info!(draft_id = %id, "draft deleted");
        Ok(())
    }

    pub async fn export_draft(
        &self,
        id: Uuid,
        format: ExportFormat,
    ) -> Result<ExportedDraft, DocumentError> {
        let draft = self.drafts.require(id).await?;
        let bytes = render(
            format,
            ExportDocument::titled(&draft.title, &draft.generated_content),
        )?;
        let file_name = format.file_name(
            &draft.template_type.code().to_lowercase(),
            Utc::now().timestamp_millis(),
        );
        info!(draft_id = %id, %format, bytes = bytes.len(), "draft exported");
        Ok(ExportedDraft {
            format,
            file_name,
            bytes,
        })
    }

    pub async fn sign_draft(
        &self,
        id: Uuid,
        request: SignRequest,
    ) -> Result<SignedDocument, DocumentError> {
        let draft = self.drafts.require(id).await?;
        let signed = self
            .seal(draft.title, draft.generated_content, request, Utc::now())
            .await?;
        info!(draft_id = %id, document_id = %signed.id, "draft signed");
        Ok(signed)
    }

    async fn seal(
        &self,
        title: String,
        content: String,
        request: SignRequest,
        signed_at: DateTime<Utc>,
    ) -> Result<SignedDocument, DocumentError> {
        let integrity_hash = integrity_hash(&content, signed_at.timestamp_millis());
        let department = request
            .department
            .map(|department| department.trim().to_string())
            .filter(|department| !department.is_empty())
            .unwrap_or_else(|| DEFAULT_SIGNING_DEPARTMENT.to_string());
        let document = SignedDocument {
            id: Uuid::new_v4(),
            author_id: request.author_id,
            title,
            content,
            department,
            gov_level: request.gov_level,
            integrity_hash,
            status: SIGNED_STATUS.to_string(),
            created_at: signed_at,
        };
        Ok(self.signed.insert(&document).await?)
    }

    pub async fn signed_documents(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<SignedDocument>, DocumentError> {
        let query = match limit {
            Some(limit) => ListQuery::all().limit(limit),
            None => ListQuery::all(),
        };
        let documents = self.signed.list(query).await?;
        for document in documents.iter().filter(|document| !document.verify()) {
            warn!(document_id = %document.id, "signed document failed integrity check");
        }
        Ok(documents)
    }
}

fn process_summary(process: &LicitationProcess) -> String {
    format!(
        "DADOS DO PROCESSO:\n- Número do Processo: {}\n- Objeto: {}\n- Valor Estimado: {}\n\
         - Modalidade: {}\n- Departamento: {}\n- Dotação Orçamentária: {}\n- Data de Abertura: {}",
        process.process_number,
        process.object,
        format_brl(process.estimated_value),
        process.modality,
        process.department,
        process.budget_allocation.as_deref().unwrap_or("A definir"),
        process
            .opening_date
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "A definir".to_string()),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("context or process_id is required")]
    MissingContext,
    #[error("title must have at least {} characters", MINIMUM_TITLE_LENGTH)]
    TitleTooShort,
    #[error("generated_content must not be empty")]
    EmptyContent,
    #[error("process {0} not found")]
    ProcessNotFound(Uuid),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for DocumentError {
    fn status_code(&self) -> StatusCode {
        match self {
            DocumentError::MissingContext
            | DocumentError::TitleTooShort
            | DocumentError::EmptyContent
            | DocumentError::Export(ExportError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            DocumentError::ProcessNotFound(_) => StatusCode::NOT_FOUND,
            DocumentError::Gateway(err) => err.status_code(),
            DocumentError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DocumentError::Settings(err) => err.status_code(),
            DocumentError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
