//! Portfolio overview: risk metrics aggregated from stored analyses and AI-written insights
//! over recent documents and impugnations.

mod insights;
mod metrics;
pub mod router;
pub mod service;

pub use insights::{InsightsReport, InsightPattern};
pub use metrics::{
    compute_metrics, AlertCategory, DashboardMetrics, LevelCount, PriorityAlert,
    PRIORITY_ALERT_THRESHOLD,
};
pub use router::dashboard_router;
pub use service::{DashboardError, DashboardService, InsightsOutcome};
