//! Real-time compliance auditing of legal opinions (pareceres).
//!
//! The scorer is a pure keyword heuristic over the draft text. [`AuditDebouncer`] reruns it
//! after each pause in typing, and [`AuditorService`] protocols opinions once the score clears
//! the submission gate.

mod debounce;
pub mod domain;
pub mod router;
mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use debounce::{AuditDebouncer, AuditState, DEBOUNCE_DELAY};
pub use domain::{LegalOpinion, OpinionSubmission};
pub use router::auditor_router;
pub use rules::{audit_text, AuditReport, MINIMUM_AUDIT_LENGTH, SUBMISSION_THRESHOLD};
pub use service::{AuditError, AuditorService, ProtocolledOpinion};
