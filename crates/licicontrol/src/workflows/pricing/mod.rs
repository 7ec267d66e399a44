//! Price research: tender lookups on the national procurement portal (PNCP) and saved price
//! quotations with their summary statistics.

pub mod pncp;
pub mod quotation;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use pncp::{modality_name, PncpClient, PncpError, PncpNotice, PncpSearch, PncpSearchResult};
pub use quotation::{PriceQuotation, PriceSample, PriceStats, QuotationRequest, QuotationView};
pub use router::pricing_router;
pub use service::{PricingService, QuotationError};
