use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use uuid::Uuid;

use crate::workflows::processes::{format_brl, LicitationProcess, RiskAnalysis, RiskLevel};

/// High-severity alerts a process needs before it is listed as a priority.
pub const PRIORITY_ALERT_THRESHOLD: usize = 3;
const TOP_CATEGORIES: usize = 5;
const FALLBACK_CATEGORY: &str = "Outros";
const NO_CATEGORY: &str = "Nenhum";
const HIGH_SEVERITY_MARKERS: [&str; 7] = [
    "alto",
    "alta",
    "crítico",
    "critico",
    "falta",
    "risco",
    "inconformidade",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_processes: usize,
    pub high_risk_percentage: f64,
    pub value_at_risk: f64,
    pub value_at_risk_label: String,
    pub top_alert_category: String,
    pub risk_distribution: Vec<LevelCount>,
    pub top_alerts: Vec<AlertCategory>,
    pub priority_alerts: Vec<PriorityAlert>,
    pub total_impugnations: usize,
    pub avg_transparency_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertCategory {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityAlert {
    pub process_id: Uuid,
    pub process_number: String,
    pub estimated_value: f64,
    pub risk_level: RiskLevel,
    pub high_alert_count: usize,
}

fn is_high_severity(severity: &str) -> bool {
    let lowered = severity.to_lowercase();
    HIGH_SEVERITY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn category_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Aggregate the dashboard from raw rows. Analyses whose process is gone still count towards
/// the distribution but contribute no value and never become priority alerts.
pub fn compute_metrics(
    analyses: &[RiskAnalysis],
    processes: &[LicitationProcess],
    impugnation_count: usize,
    transparency_scores: &[u8],
) -> DashboardMetrics {
    let avg_transparency_score = if transparency_scores.is_empty() {
        0
    } else {
        let total: u32 = transparency_scores.iter().map(|score| u32::from(*score)).sum();
        (f64::from(total) / transparency_scores.len() as f64).round() as u8
    };

    let by_id: HashMap<Uuid, &LicitationProcess> =
        processes.iter().map(|process| (process.id, process)).collect();
    let mut distribution: HashMap<RiskLevel, usize> = HashMap::new();
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    let mut priority_alerts = Vec::new();
    let mut high_risk = 0usize;
    let mut value_at_risk = 0.0;

    for analysis in analyses {
        let process = by_id.get(&analysis.process_id).copied();
        let estimated_value = process.map_or(0.0, |process| process.estimated_value);
        *distribution.entry(analysis.risk_level).or_default() += 1;
        if analysis.risk_level.is_high() {
            high_risk += 1;
            value_at_risk += estimated_value;
        }

        let factors = analysis
            .risk_factors
            .factors
            .iter()
            .map(|factor| (factor.factor.as_str(), factor.severity.as_str()));
        let checklist = analysis
            .risk_factors
            .checklist
            .iter()
            .flat_map(|checklist| checklist.items())
            .map(|item| (item.item.as_str(), item.status.as_str()));

        let mut high_alerts = 0;
        for (category, severity) in factors.chain(checklist) {
            *categories.entry(category_name(category)).or_default() += 1;
            if is_high_severity(severity) {
                high_alerts += 1;
            }
        }

        if let Some(process) = process {
            if high_alerts >= PRIORITY_ALERT_THRESHOLD {
                priority_alerts.push(PriorityAlert {
                    process_id: process.id,
                    process_number: process.process_number.clone(),
                    estimated_value,
                    risk_level: analysis.risk_level,
                    high_alert_count: high_alerts,
                });
            }
        }
    }

    let mut top_alerts: Vec<AlertCategory> = categories
        .into_iter()
        .map(|(category, count)| AlertCategory { category, count })
        .collect();
    top_alerts.sort_by(|a, b| b.count.cmp(&a.count));
    top_alerts.truncate(TOP_CATEGORIES);
    priority_alerts.sort_by(|a, b| b.estimated_value.total_cmp(&a.estimated_value));

    let top_alert_category = top_alerts
        .first()
        .map(|top| format!("{} ({})", top.category, top.count))
        .unwrap_or_else(|| NO_CATEGORY.to_string());
    let total_processes = analyses.len();
    let high_risk_percentage = if total_processes == 0 {
        0.0
    } else {
        high_risk as f64 / total_processes as f64 * 100.0
    };

    DashboardMetrics {
        total_processes,
        high_risk_percentage,
        value_at_risk,
        value_at_risk_label: format_brl(value_at_risk),
        top_alert_category,
        risk_distribution: RiskLevel::ALL
            .iter()
            .map(|level| LevelCount {
                level: *level,
                label: level.label(),
                count: distribution.get(level).copied().unwrap_or(0),
            })
            .collect(),
        top_alerts,
        priority_alerts,
        total_impugnations: impugnation_count,
        avg_transparency_score,
    }
}
