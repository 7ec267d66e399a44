use super::common::*;
use crate::workflows::auditor::{audit_text, AuditReport, MINIMUM_AUDIT_LENGTH};

#[test]
fn short_drafts_are_not_scored() {
    assert_eq!(audit_text(""), AuditReport::default());
    let boundary = audit_text("inexigibilidade");
    assert_eq!(boundary.score, 0);
    assert_eq!(boundary.critical_alerts.len(), 2);

    let fourteen = "eficiência 123";
    assert_eq!(fourteen.chars().count(), MINIMUM_AUDIT_LENGTH - 1);
    assert_eq!(audit_text(fourteen), AuditReport::default());
}

#[test]
fn minimal_draft_keeps_base_score_and_flags_gaps() {
    let report = audit_text("abcdefghijklmno");
    assert_eq!(report.score, 10);
    assert_eq!(
        report.critical_alerts,
        vec!["Falta referência à Lei 14.133/2021 (Nova Lei de Licitações).".to_string()]
    );
    assert!(report.risks.is_empty());
    assert_eq!(report.suggestions.len(), 1);
}

#[test]
fn compliant_opinion_scores_full_marks() {
    let report = audit_text(COMPLIANT_OPINION);
    assert_eq!(report.score, 100);
    assert!(report.critical_alerts.is_empty());
    assert!(report.risks.is_empty());
    assert!(report.suggestions.is_empty());
    assert!(report.submission_allowed());
}

#[test]
fn citing_the_statute_adds_forty_points() {
    let without = "Parecer favorável observando eficiência e moralidade administrativa.";
    let with = format!("{without} Conforme Lei 14.133/2021.");

    let before = audit_text(without);
    let after = audit_text(&with);
    assert_eq!(after.score, before.score + 40);
    assert_eq!(before.critical_alerts.len(), 1);
    assert!(after.critical_alerts.is_empty());
}

#[test]
fn price_mentions_require_research_methodology() {
    let report = audit_text("O valor da contratação foi definido pelo setor requisitante.");
    assert_eq!(
        report.risks,
        vec!["Risco de sobrepreço: Não detectada metodologia de pesquisa de mercado.".to_string()]
    );

    let researched = audit_text("Preço estimado conforme painel de preços do governo federal.");
    assert!(researched.risks.is_empty());
    assert_eq!(researched.score, 35);
}

#[test]
fn matching_ignores_case() {
    let report = audit_text("CONFORME A LEI 14.133, COM EFICIÊNCIA E PUBLICIDADE.");
    assert_eq!(report.score, 75);
}

#[test]
fn unjustified_sole_source_is_penalised_and_clamped() {
    let report = audit_text("Trata-se de inexigibilidade de licitação para o show.");
    assert_eq!(report.score, 0);
    assert_eq!(report.critical_alerts.len(), 2);
    assert_eq!(
        report.critical_alerts[1],
        "Alerta crítico: Falta justificativa de notória especialização para inexigibilidade."
    );

    let penalised = audit_text(&format!("{THRESHOLD_OPINION} Hipótese de inexigibilidade."));
    assert_eq!(penalised.score, 55);

    let justified = audit_text(&format!(
        "{THRESHOLD_OPINION} Inexigibilidade pela notória especialização do contratado."
    ));
    assert_eq!(justified.score, 75);
    assert!(justified.critical_alerts.is_empty());
}

#[test]
fn submission_gate_opens_at_seventy_five() {
    let report = |score| AuditReport {
        score,
        ..AuditReport::default()
    };
    assert!(!report(0).submission_allowed());
    assert!(!report(74).submission_allowed());
    assert!(report(75).submission_allowed());
    assert!(report(100).submission_allowed());

    assert_eq!(audit_text(THRESHOLD_OPINION).score, 75);
    assert!(!audit_text(WEAK_OPINION).submission_allowed());
}
