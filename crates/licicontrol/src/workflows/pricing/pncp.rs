use std::time::Duration;

use axum::http::StatusCode;
use chrono::{Days, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PncpConfig;
use crate::workflows::http::ErrorStatus;

pub const MINIMUM_TERM_LENGTH: usize = 3;
pub const DEFAULT_WINDOW_DAYS: u64 = 30;
pub const MAX_RESULTS: usize = 20;
const PAGE_SIZE: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Official names of the PNCP procurement modality codes.
pub fn modality_name(code: &str) -> String {
    let name = match code.trim() {
        "1" => "Leilão - Eletrônico",
        "2" => "Diálogo Competitivo",
        "3" => "Concurso",
        "4" => "Concorrência - Eletrônica",
        "5" => "Concorrência - Presencial",
        "6" => "Pregão - Eletrônico",
        "7" => "Pregão - Presencial",
        "8" => "Dispensa de Licitação",
        "9" => "Inexigibilidade",
        "10" => "Manifestação de Interesse",
        "11" => "Pré-qualificação",
        "12" => "Credenciamento",
        "13" => "Leilão - Presencial",
        other => return format!("Modalidade {other}"),
    };
    name.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PncpSearch {
    pub term: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PncpSearch {
    /// Validated term plus the effective date window (the last 30 days by default).
    fn resolve(&self, today: NaiveDate) -> Result<(String, NaiveDate, NaiveDate), PncpError> {
        let term = self.term.trim();
        if term.chars().count() < MINIMUM_TERM_LENGTH {
            return Err(PncpError::TermTooShort);
        }
        let end = self.end_date.unwrap_or(today);
        let start = self
            .start_date
            .or_else(|| end.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS)))
            .unwrap_or(end);
        if start > end {
            return Err(PncpError::InvalidRange { start, end });
        }
        Ok((term.to_string(), start, end))
    }
}

/// A published tender, reshaped from the portal's `contratacoes` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PncpNotice {
    pub id: String,
    pub objeto: String,
    pub modalidade: String,
    pub valor_estimado: f64,
    pub data_publicacao: Option<String>,
    pub data_abertura: Option<String>,
    pub orgao_responsavel: String,
    pub criterio_julgamento: String,
    pub cnpj: Option<String>,
    pub uf: Option<String>,
    pub link_sistema_origem: Option<String>,
    /// Untouched portal record, kept so drafts can reference it.
    pub dados_completos: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PncpSearchResult {
    pub results: Vec<PncpNotice>,
    pub total: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
struct PublicationPage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default, rename = "totalRegistros")]
    total_registros: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContratacao {
    #[serde(default, rename = "numeroControlePNCP")]
    numero_controle_pncp: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    objeto_compra: Option<String>,
    #[serde(default)]
    codigo_modalidade_contratacao: Option<Value>,
    #[serde(default)]
    valor_total_estimado: Option<f64>,
    #[serde(default)]
    data_publicacao_pncp: Option<String>,
    #[serde(default)]
    data_abertura_proposta: Option<String>,
    #[serde(default)]
    tipo_criterio_julgamento: Option<String>,
    #[serde(default)]
    orgao_entidade: Option<RawOrgao>,
    #[serde(default)]
    unidade_orgao: Option<RawUnidade>,
    #[serde(default)]
    link_sistema_origem: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrgao {
    #[serde(default)]
    razao_social: Option<String>,
    #[serde(default)]
    cnpj: Option<String>,
    #[serde(default)]
    uf_sigla: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnidade {
    #[serde(default)]
    uf_sigla: Option<String>,
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl RawContratacao {
    fn matches(&self, term: &str) -> bool {
        let contains = |field: Option<&str>| {
            field.is_some_and(|text| text.to_lowercase().contains(term))
        };
        contains(self.objeto_compra.as_deref())
            || contains(
                self.orgao_entidade
                    .as_ref()
                    .and_then(|orgao| orgao.razao_social.as_deref()),
            )
    }

    fn into_notice(self, raw: Value) -> PncpNotice {
        let modality = self
            .codigo_modalidade_contratacao
            .as_ref()
            .and_then(value_text)
            .unwrap_or_default();
        let (agency, cnpj, agency_uf) = match self.orgao_entidade {
            Some(orgao) => (orgao.razao_social, orgao.cnpj, orgao.uf_sigla),
            None => (None, None, None),
        };
        PncpNotice {
            id: self
                .numero_controle_pncp
                .or_else(|| self.id.as_ref().and_then(value_text))
                .unwrap_or_default(),
            objeto: self
                .objeto_compra
                .unwrap_or_else(|| "Objeto não especificado".to_string()),
            modalidade: modality_name(&modality),
            valor_estimado: self.valor_total_estimado.unwrap_or(0.0),
            data_publicacao: self.data_publicacao_pncp,
            data_abertura: self.data_abertura_proposta,
            orgao_responsavel: agency.unwrap_or_else(|| "Órgão não identificado".to_string()),
            criterio_julgamento: self
                .tipo_criterio_julgamento
                .unwrap_or_else(|| "Menor Preço".to_string()),
            cnpj,
            uf: self.unidade_orgao.and_then(|unidade| unidade.uf_sigla).or(agency_uf),
            link_sistema_origem: self.link_sistema_origem,
            dados_completos: raw,
        }
    }
}

/// Client for the PNCP public consultation API.
#[derive(Debug, Clone)]
pub struct PncpClient {
    client: Client,
    base_url: String,
}

impl PncpClient {
    pub fn new(config: &PncpConfig) -> Result<Self, PncpError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Tenders published in the window whose object or agency mentions the term.
    pub async fn search(
        &self,
        search: &PncpSearch,
        today: NaiveDate,
    ) -> Result<PncpSearchResult, PncpError> {
        let (term, start, end) = search.resolve(today)?;
        let page_size = PAGE_SIZE.to_string();
        let start_param = start.format("%Y%m%d").to_string();
        let end_param = end.format("%Y%m%d").to_string();

        debug!(%term, %start, %end, "querying pncp publications");
        let response = self
            .client
            .get(format!("{}/contratacoes/publicacao", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("dataInicial", start_param.as_str()),
                ("dataFinal", end_param.as_str()),
                ("pagina", "1"),
                ("tamanhoPagina", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(PncpSearchResult {
                results: Vec::new(),
                total: 0,
                start_date: start,
                end_date: end,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "pncp consultation failed");
            return Err(PncpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: PublicationPage = response.json().await?;
        let needle = term.to_lowercase();
        let mut results = Vec::new();
        for raw in page.data {
            if results.len() == MAX_RESULTS {
                break;
            }
            let Ok(record) = serde_json::from_value::<RawContratacao>(raw.clone()) else {
                continue;
            };
            if record.matches(&needle) {
                results.push(record.into_notice(raw));
            }
        }

        let total = page.total_registros.unwrap_or(results.len() as u64);
        debug!(matches = results.len(), total, "pncp consultation finished");
        Ok(PncpSearchResult {
            results,
            total,
            start_date: start,
            end_date: end,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PncpError {
    #[error("search term must have at least {} characters", MINIMUM_TERM_LENGTH)]
    TermTooShort,
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("PNCP returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("PNCP transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ErrorStatus for PncpError {
    fn status_code(&self) -> StatusCode {
        match self {
            PncpError::TermTooShort | PncpError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            PncpError::Status { .. } | PncpError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
