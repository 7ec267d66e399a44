use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gateway::parse::{extract_json_object, parse_fenced, truncate_chars};

pub(crate) const INSIGHTS_SYSTEM_PROMPT: &str = "Atue como um Consultor Sênior de Licitações. \
Analise os dados e retorne APENAS um JSON válido no formato \
{\"summary\": \"...\", \"patterns\": [{\"category\": \"...\", \"count\": 0}], \"recommendations\": [\"...\"]}.";

const RESULT_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightPattern {
    pub category: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub summary: String,
    #[serde(default)]
    pub patterns: Vec<InsightPattern>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl InsightsReport {
    pub fn unavailable() -> Self {
        Self {
            summary: "Não foi possível gerar insights no momento.".to_string(),
            patterns: Vec::new(),
            recommendations: vec!["Verifique a conexão com a IA.".to_string()],
        }
    }
}

/// Production and risk history summarised into the user prompt.
pub(crate) fn insights_prompt(
    documents: &[(String, DateTime<Utc>)],
    impugnations: &[(String, DateTime<Utc>)],
) -> String {
    let production: Vec<_> = documents
        .iter()
        .map(|(kind, date)| json!({ "type": kind, "date": date }))
        .collect();
    let risk: Vec<_> = impugnations
        .iter()
        .map(|(result, date)| {
            json!({ "result": truncate_chars(result, RESULT_EXCERPT_CHARS), "date": date })
        })
        .collect();
    format!(
        "DADOS DE PRODUÇÃO:\n{}\n\nDADOS DE RISCO:\n{}",
        serde_json::Value::Array(production),
        serde_json::Value::Array(risk),
    )
}

pub(crate) fn parse_insights(reply: &str) -> Option<InsightsReport> {
    parse_fenced::<InsightsReport>(reply).ok().or_else(|| {
        extract_json_object(reply).and_then(|span| serde_json::from_str(span).ok())
    })
}
