//! Transparency-portal audits against the PNTP criteria.
//!
//! The gateway browses the portal (web-search grounding enabled) and answers with a JSON
//! report. Replies that cannot be read still produce a stored report built from the raw text.

mod analysis;
pub mod domain;
pub mod router;
pub mod service;

pub use analysis::{interpret_reply, PortalAssessment, ReplyQuality};
pub use domain::{PortalAnalysisRequest, TransparencyFinding, TransparencyReport};
pub use router::transparency_router;
pub use service::{TransparencyError, TransparencyService};
