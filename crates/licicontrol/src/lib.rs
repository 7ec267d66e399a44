//! Procurement-compliance workflows for Brazilian public administration.
//!
//! The crate bundles the real-time legal opinion auditor, the AI gateway client used by the
//! risk, transparency, impugnation and document workflows, the row store backing them, and the
//! PDF/DOCX export helpers. Each workflow exposes an axum router that the API service composes.

pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod store;
pub mod telemetry;
pub mod workflows;
