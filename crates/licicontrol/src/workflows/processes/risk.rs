use serde::Deserialize;

use super::domain::{format_brl, Checklist, LicitationProcess, RiskFactor, RiskFactors, RiskLevel};
use crate::gateway::parse::{extract_json_object, parse_fenced};

pub(crate) const RISK_SYSTEM_PROMPT: &str = "Você é um especialista em análise de riscos de \
processos licitatórios brasileiros, com conhecimento da Lei 14.133/2021.";

const RISK_INSTRUCTIONS: &str = r#"Classifique o risco conforme a Lei 14.133/2021 e responda somente com JSON:
{
  "risk_level": "baixo" | "medio" | "alto" | "critico",
  "risk_score": 0-100,
  "risk_factors": [{ "factor": "...", "severity": "baixa" | "media" | "alta", "description": "..." }],
  "recommendations": "...",
  "checklist": {
    "documentosObrigatorios": [{ "item": "...", "status": "OK" | "FALTA" | "REVISAR" }],
    "clausulasArriscadas": [{ "item": "...", "status": "OK" | "RISCO ALTO" | "ATENÇÃO" }],
    "juridicoContabil": [{ "item": "...", "status": "OK" | "PENDENTE" | "INCONFORMIDADE" }]
  }
}"#;

pub(crate) fn risk_prompt(process: &LicitationProcess) -> String {
    let yes_no = |flag: Option<bool>| if flag.unwrap_or(false) { "Sim" } else { "Não" };
    let date = |date: Option<chrono::NaiveDate>| {
        date.map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "Não definida".to_string())
    };
    let supplier_history = process
        .supplier_history
        .as_ref()
        .map(|history| history.to_string())
        .unwrap_or_else(|| "{}".to_string());

    format!(
        "DADOS DO PROCESSO:\n\
         - Número: {}\n\
         - Objeto: {}\n\
         - Valor Estimado: {}\n\
         - Modalidade: {}\n\
         - Departamento: {}\n\
         - Status: {}\n\
         - Data de Publicação: {}\n\
         - Data de Abertura: {}\n\
         - Estudo Técnico Anexado: {}\n\
         - Termo de Referência Anexado: {}\n\
         - Histórico do Fornecedor: {}\n\n\
         {RISK_INSTRUCTIONS}",
        process.process_number,
        process.object,
        format_brl(process.estimated_value),
        process.modality,
        process.department,
        process.status,
        date(process.publication_date),
        date(process.opening_date),
        yes_no(process.technical_study_attached),
        yes_no(process.reference_term_attached),
        supplier_history,
    )
}

#[derive(Debug, Deserialize)]
struct RiskReply {
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    risk_score: Option<f64>,
    #[serde(default)]
    risk_factors: Vec<RiskFactor>,
    #[serde(default)]
    recommendations: Option<String>,
    #[serde(default)]
    checklist: Option<Checklist>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u8,
    pub factors: RiskFactors,
    pub recommendations: Option<String>,
}

/// Reads the gateway's JSON verdict, fenced or embedded in prose.
pub(crate) fn parse_risk_reply(reply: &str) -> Result<RiskAssessment, serde_json::Error> {
    let parsed = match parse_fenced::<RiskReply>(reply) {
        Ok(parsed) => parsed,
        Err(err) => match extract_json_object(reply) {
            Some(span) => serde_json::from_str(span)?,
            None => return Err(err),
        },
    };

    let score = parsed
        .risk_score
        .filter(|score| score.is_finite())
        .map(|score| score.round().clamp(0.0, 100.0) as u8);
    let level = parsed.risk_level.as_deref().and_then(RiskLevel::normalize);
    let (level, score) = match (level, score) {
        (Some(level), Some(score)) => (level, score),
        (None, Some(score)) => (RiskLevel::from_score(score), score),
        (Some(level), None) => (level, level.typical_score()),
        (None, None) => {
            return Err(serde::de::Error::custom(
                "reply carries neither a risk level nor a risk score",
            ))
        }
    };

    Ok(RiskAssessment {
        level,
        score,
        factors: RiskFactors {
            factors: parsed.risk_factors,
            checklist: parsed.checklist,
        },
        recommendations: parsed
            .recommendations
            .filter(|text| !text.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\"risk_level\": \"Alto\", \"risk_score\": 72.4, \
            \"risk_factors\": [{\"factor\": \"Valor elevado\", \"severity\": \"alta\", \
            \"description\": \"Dispensa acima do limite\"}], \
            \"recommendations\": \"Anexar ETP\", \
            \"checklist\": {\"documentosObrigatorios\": [{\"item\": \"ETP\", \"status\": \"FALTA\"}]}}\n```";

        let assessment = parse_risk_reply(reply).expect("reply parses");
        assert_eq!(assessment.level, RiskLevel::Alto);
        assert_eq!(assessment.score, 72);
        assert_eq!(assessment.factors.factors[0].factor, "Valor elevado");
        assert_eq!(
            assessment
                .factors
                .checklist
                .as_ref()
                .map(|checklist| checklist.mandatory_documents.len()),
            Some(1)
        );
        assert_eq!(assessment.recommendations.as_deref(), Some("Anexar ETP"));
    }

    #[test]
    fn reads_object_embedded_in_prose_and_clamps_score() {
        let reply = "Segue a análise: {\"risk_level\": \"desconhecido\", \"risk_score\": 180} Obrigado.";
        let assessment = parse_risk_reply(reply).expect("reply parses");
        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, RiskLevel::Critico);
        assert!(assessment.factors.factors.is_empty());
    }

    #[test]
    fn level_without_score_keeps_its_band() {
        let assessment =
            parse_risk_reply("{\"risk_level\": \"Crítico\"}").expect("reply parses");
        assert_eq!(assessment.level, RiskLevel::Critico);
        assert_eq!(assessment.score, RiskLevel::Critico.typical_score());
        assert_eq!(RiskLevel::from_score(assessment.score), RiskLevel::Critico);
    }

    #[test]
    fn reply_without_level_or_score_is_rejected() {
        assert!(parse_risk_reply("{\"risk_factors\": []}").is_err());
        assert!(parse_risk_reply("{\"risk_level\": \"grave\", \"risk_score\": null}").is_err());
    }

    #[test]
    fn rejects_replies_without_json() {
        assert!(parse_risk_reply("Não foi possível analisar o processo.").is_err());
        assert!(parse_risk_reply("{ risk_level: alto }").is_err());
    }
}
