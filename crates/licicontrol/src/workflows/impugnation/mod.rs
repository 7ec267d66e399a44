//! Legal review of impugnations filed against a tender notice (edital).

pub mod domain;
pub mod router;
pub mod service;
mod verdict;

pub use domain::{Impugnation, ImpugnationRequest, ImpugnationView};
pub use router::impugnation_router;
pub use service::{ImpugnationError, ImpugnationService};
pub use verdict::Verdict;
