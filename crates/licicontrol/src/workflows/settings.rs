//! The single organization profile used to letterhead generated documents.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::store::{ListQuery, Record, Repository, RowStore, StoreError};
use crate::workflows::http::{respond, ErrorStatus};

pub const DEFAULT_ORG_NAME: &str = "Prefeitura Municipal";
pub const DEFAULT_STATE: &str = "Brasil";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    pub id: Uuid,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Logo as a data URL.
    #[serde(default)]
    pub logo_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for OrganizationSettings {
    const TABLE: &'static str = "organization_settings";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OrganizationSettings {
    pub fn display_name(&self) -> &str {
        non_blank(self.org_name.as_deref()).unwrap_or(DEFAULT_ORG_NAME)
    }

    pub fn display_state(&self) -> &str {
        non_blank(self.state.as_deref()).unwrap_or(DEFAULT_STATE)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub logo_data: Option<String>,
}

/// Effective settings as served to clients: stored values with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub org_name: String,
    pub state: String,
    pub logo_data: Option<String>,
    pub configured: bool,
}

pub struct SettingsService {
    settings: Repository<OrganizationSettings>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            settings: Repository::new(store),
        }
    }

    pub async fn stored(&self) -> Result<Option<OrganizationSettings>, SettingsError> {
        let mut rows = self.settings.list(ListQuery::all().limit(1)).await?;
        Ok(rows.pop())
    }

    pub async fn current(&self) -> Result<SettingsView, SettingsError> {
        Ok(match self.stored().await? {
            Some(row) => SettingsView {
                org_name: row.display_name().to_string(),
                state: row.display_state().to_string(),
                logo_data: row.logo_data.clone(),
                configured: true,
            },
            None => SettingsView {
                org_name: DEFAULT_ORG_NAME.to_string(),
                state: DEFAULT_STATE.to_string(),
                logo_data: None,
                configured: false,
            },
        })
    }

    /// Replace the profile, creating the row on first save.
    pub async fn save(&self, update: SettingsUpdate) -> Result<SettingsView, SettingsError> {
        if let Some(logo) = update.logo_data.as_deref() {
            if !logo.is_empty() && !logo.starts_with("data:image/") {
                return Err(SettingsError::InvalidLogo);
            }
        }

        let now = Utc::now();
        match self.stored().await? {
            Some(mut row) => {
                row.org_name = update.org_name;
                row.state = update.state;
                row.logo_data = update.logo_data;
                row.updated_at = now;
                self.settings.update(&row).await?;
            }
            None => {
                let row = OrganizationSettings {
                    id: Uuid::new_v4(),
                    org_name: update.org_name,
                    state: update.state,
                    logo_data: update.logo_data,
                    created_at: now,
                    updated_at: now,
                };
                self.settings.insert(&row).await?;
            }
        }
        info!("organization settings saved");
        self.current().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("logo_data must be an image data URL")]
    InvalidLogo,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for SettingsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SettingsError::InvalidLogo => StatusCode::BAD_REQUEST,
            SettingsError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}

pub fn settings_router(service: Arc<SettingsService>) -> Router {
    Router::new()
        .route("/api/v1/settings", get(fetch_handler).put(save_handler))
        .with_state(service)
}

pub(crate) async fn fetch_handler(State(service): State<Arc<SettingsService>>) -> Response {
    respond(StatusCode::OK, service.current().await)
}

pub(crate) async fn save_handler(
    State(service): State<Arc<SettingsService>>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    respond(StatusCode::OK, service.save(update).await)
}
