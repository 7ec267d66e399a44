//! AI-drafted procurement documents: generation, official letterhead, saved drafts, export and
//! integrity-hash signing.

pub mod domain;
mod formatter;
mod kinds;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DraftSubmission, ExportedDraft, GeneratedDocument, GenerationRequest, SavedDraft,
    SignRequest, SignedDocument,
};
pub use formatter::{format_official, SIGNATURE_ROLES};
pub use kinds::DocumentKind;
pub use router::document_router;
pub use service::{integrity_hash, DocumentError, DocumentService};
