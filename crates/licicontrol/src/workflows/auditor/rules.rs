use serde::{Deserialize, Serialize};

/// Drafts shorter than this (in characters) are not scored.
pub const MINIMUM_AUDIT_LENGTH: usize = 15;
/// Lowest score at which an opinion may be protocolled.
pub const SUBMISSION_THRESHOLD: u8 = 75;

const BASE_SCORE: i32 = 10;
const STATUTE_POINTS: i32 = 40;
const PRICE_RESEARCH_POINTS: i32 = 25;
const PRINCIPLES_POINTS: i32 = 25;
const SOLE_SOURCE_PENALTY: i32 = 20;
const MINIMUM_PRINCIPLES: usize = 2;

const STATUTE: &str = "14.133";
const PRICE_TERMS: [&str; 2] = ["valor", "estimado"];
const PRICE_RESEARCH_TERMS: [&str; 2] = ["pesquisa de mercado", "painel de preços"];
const PRINCIPLES: [&str; 5] = [
    "eficiência",
    "moralidade",
    "impessoalidade",
    "publicidade",
    "economicidade",
];
const SOLE_SOURCE: &str = "inexigibilidade";
const SOLE_SOURCE_JUSTIFICATION: &str = "notória especialização";

const MISSING_STATUTE: &str = "Falta referência à Lei 14.133/2021 (Nova Lei de Licitações).";
const MISSING_PRICE_RESEARCH: &str =
    "Risco de sobrepreço: Não detectada metodologia de pesquisa de mercado.";
const WEAK_PRINCIPLES: &str =
    "Considere reforçar os princípios da economicidade e eficiência no texto.";
const UNJUSTIFIED_SOLE_SOURCE: &str =
    "Alerta crítico: Falta justificativa de notória especialização para inexigibilidade.";

/// Outcome of auditing one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub score: u8,
    pub critical_alerts: Vec<String>,
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AuditReport {
    pub fn submission_allowed(&self) -> bool {
        self.score >= SUBMISSION_THRESHOLD
    }
}

/// Scores a legal-opinion draft. Matching is case-insensitive substring search.
pub fn audit_text(text: &str) -> AuditReport {
    if text.chars().count() < MINIMUM_AUDIT_LENGTH {
        return AuditReport::default();
    }

    let content = text.to_lowercase();
    let mut report = AuditReport::default();
    let mut score = BASE_SCORE;

    if content.contains(STATUTE) {
        score += STATUTE_POINTS;
    } else {
        report.critical_alerts.push(MISSING_STATUTE.to_string());
    }

    if PRICE_TERMS.iter().any(|term| content.contains(term)) {
        if PRICE_RESEARCH_TERMS.iter().any(|term| content.contains(term)) {
            score += PRICE_RESEARCH_POINTS;
        } else {
            report.risks.push(MISSING_PRICE_RESEARCH.to_string());
        }
    }

    let principles = PRINCIPLES
        .iter()
        .filter(|principle| content.contains(*principle))
        .count();
    if principles < MINIMUM_PRINCIPLES {
        report.suggestions.push(WEAK_PRINCIPLES.to_string());
    } else {
        score += PRINCIPLES_POINTS;
    }

    if content.contains(SOLE_SOURCE) && !content.contains(SOLE_SOURCE_JUSTIFICATION) {
        report
            .critical_alerts
            .push(UNJUSTIFIED_SOLE_SOURCE.to_string());
        score -= SOLE_SOURCE_PENALTY;
    }

    report.score = score.clamp(0, 100) as u8;
    report
}
