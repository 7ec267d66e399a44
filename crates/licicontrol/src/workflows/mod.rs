//! Procurement workflows, one module per dashboard area.
//!
//! Every workflow exposes a service over the shared [`RowStore`](crate::store::RowStore) and
//! [`ChatGateway`](crate::gateway::ChatGateway) handles plus an axum router builder.

pub mod assistant;
pub mod auditor;
pub mod dashboard;
pub mod documents;
pub(crate) mod http;
pub mod impugnation;
pub mod pricing;
pub mod processes;
pub mod settings;
pub mod transparency;

#[cfg(test)]
pub(crate) mod testing;
