//! Procurement processes and their AI-assisted risk analysis.
//!
//! A process has at most one risk analysis. Requesting an analysis for a process that already
//! has one returns the stored row instead of calling the gateway again.

pub mod domain;
mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    format_brl, Checklist, ChecklistItem, LicitationProcess, ProcessSubmission, RiskAnalysis,
    RiskFactor, RiskFactors, RiskLevel,
};
pub use router::process_router;
pub use service::{ProcessError, ProcessService, RiskOutcome};
