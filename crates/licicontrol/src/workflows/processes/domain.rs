use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::store::Record;

pub const DEFAULT_PROCESS_STATUS: &str = "em_andamento";

/// A procurement process (licitação) under monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicitationProcess {
    pub id: Uuid,
    pub user_id: Uuid,
    pub process_number: String,
    pub object: String,
    pub estimated_value: f64,
    pub modality: String,
    pub department: String,
    pub status: String,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    #[serde(default)]
    pub technical_study_attached: Option<bool>,
    #[serde(default)]
    pub reference_term_attached: Option<bool>,
    #[serde(default)]
    pub supplier_history: Option<Value>,
    #[serde(default)]
    pub budget_allocation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for LicitationProcess {
    const TABLE: &'static str = "licitation_processes";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessSubmission {
    pub user_id: Uuid,
    pub process_number: String,
    pub object: String,
    pub estimated_value: f64,
    pub modality: String,
    pub department: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    #[serde(default)]
    pub technical_study_attached: Option<bool>,
    #[serde(default)]
    pub reference_term_attached: Option<bool>,
    #[serde(default)]
    pub supplier_history: Option<Value>,
    #[serde(default)]
    pub budget_allocation: Option<String>,
}

/// Risk classification. Parsing tolerates case, accents and surrounding words
/// ("Risco Médio" reads as [`RiskLevel::Medio`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskLevel {
    Baixo,
    Medio,
    Alto,
    Critico,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critico,
        RiskLevel::Alto,
        RiskLevel::Medio,
        RiskLevel::Baixo,
    ];

    pub fn normalize(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        if lowered.contains("baixo") {
            Some(RiskLevel::Baixo)
        } else if lowered.contains("médio") || lowered.contains("medio") {
            Some(RiskLevel::Medio)
        } else if lowered.contains("alto") {
            Some(RiskLevel::Alto)
        } else if lowered.contains("crítico") || lowered.contains("critico") {
            Some(RiskLevel::Critico)
        } else {
            None
        }
    }

    /// Band used when a reply carries a score but no recognisable level.
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => RiskLevel::Critico,
            50..=74 => RiskLevel::Alto,
            25..=49 => RiskLevel::Medio,
            _ => RiskLevel::Baixo,
        }
    }

    /// Middle of the [`from_score`](Self::from_score) band, used when a reply names the level
    /// but omits the score.
    pub fn typical_score(self) -> u8 {
        match self {
            RiskLevel::Baixo => 12,
            RiskLevel::Medio => 37,
            RiskLevel::Alto => 62,
            RiskLevel::Critico => 87,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Baixo => "Baixo",
            RiskLevel::Medio => "Médio",
            RiskLevel::Alto => "Alto",
            RiskLevel::Critico => "Crítico",
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, RiskLevel::Alto | RiskLevel::Critico)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RiskLevel::normalize(&value).ok_or_else(|| format!("unknown risk level `{value}`"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(default)]
    pub factor: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub status: String,
}

/// Three-part compliance checklist returned with every analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    #[serde(default, rename = "documentosObrigatorios")]
    pub mandatory_documents: Vec<ChecklistItem>,
    #[serde(default, rename = "clausulasArriscadas")]
    pub risky_clauses: Vec<ChecklistItem>,
    #[serde(default, rename = "juridicoContabil")]
    pub legal_accounting: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.mandatory_documents
            .iter()
            .chain(&self.risky_clauses)
            .chain(&self.legal_accounting)
    }
}

/// Stored shape of the `risk_factors` column: factors and checklist side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    #[serde(default)]
    pub factors: Vec<RiskFactor>,
    #[serde(default)]
    pub checklist: Option<Checklist>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub id: Uuid,
    pub process_id: Uuid,
    pub user_id: Uuid,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    #[serde(default)]
    pub risk_factors: RiskFactors,
    #[serde(default)]
    pub recommendations: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Record for RiskAnalysis {
    const TABLE: &'static str = "risk_analysis";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Formats an amount in reais the Brazilian way: `R$ 1.250.000,50`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_level_spellings() {
        assert_eq!(RiskLevel::normalize("Médio"), Some(RiskLevel::Medio));
        assert_eq!(RiskLevel::normalize("MEDIO"), Some(RiskLevel::Medio));
        assert_eq!(RiskLevel::normalize("risco alto"), Some(RiskLevel::Alto));
        assert_eq!(RiskLevel::normalize("Crítico"), Some(RiskLevel::Critico));
        assert_eq!(RiskLevel::normalize("critico"), Some(RiskLevel::Critico));
        assert_eq!(RiskLevel::normalize("baixo"), Some(RiskLevel::Baixo));
        assert_eq!(RiskLevel::normalize("severe"), None);
    }

    #[test]
    fn deserializes_stored_levels_leniently() {
        let level: RiskLevel = serde_json::from_value(json!("Alto")).expect("level parses");
        assert_eq!(level, RiskLevel::Alto);
        assert_eq!(serde_json::to_value(RiskLevel::Critico).unwrap(), json!("critico"));
        assert!(serde_json::from_value::<RiskLevel>(json!("unknown")).is_err());
    }

    #[test]
    fn score_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Baixo);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Medio);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::Alto);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critico);
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_score(level.typical_score()), level);
        }
    }

    #[test]
    fn checklist_uses_camel_case_sections() {
        let checklist: Checklist = serde_json::from_value(json!({
            "documentosObrigatorios": [{ "item": "ETP", "status": "FALTA" }],
            "juridicoContabil": [{ "item": "Regularidade Fiscal", "status": "OK" }]
        }))
        .expect("checklist parses");
        assert_eq!(checklist.mandatory_documents.len(), 1);
        assert!(checklist.risky_clauses.is_empty());
        assert_eq!(checklist.items().count(), 2);
    }

    #[test]
    fn formats_reais() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.5), "R$ 999,50");
        assert_eq!(format_brl(1_250_000.0), "R$ 1.250.000,00");
        assert_eq!(format_brl(-1234.567), "-R$ 1.234,57");
    }
}
