use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::pncp::{PncpClient, PncpError, PncpSearch, PncpSearchResult, MINIMUM_TERM_LENGTH};
use super::quotation::{
    within_window, PriceQuotation, PriceStats, QuotationRequest, QuotationView, ACTIVE_STATUS,
};
use crate::store::{ListQuery, Repository, RowStore, StoreError};
use crate::workflows::http::ErrorStatus;

pub const MINIMUM_TITLE_LENGTH: usize = 5;

pub struct PricingService {
    quotations: Repository<PriceQuotation>,
    pncp: PncpClient,
}

impl PricingService {
    pub fn new(store: Arc<dyn RowStore>, pncp: PncpClient) -> Self {
        Self {
            quotations: Repository::new(store),
            pncp,
        }
    }

    pub async fn search_notices(&self, search: PncpSearch) -> Result<PncpSearchResult, PncpError> {
        let result = self.pncp.search(&search, Utc::now().date_naive()).await?;
        info!(
            term = %search.term.trim(),
            results = result.results.len(),
            "pncp search completed"
        );
        Ok(result)
    }

    pub async fn save_quotation(
        &self,
        request: QuotationRequest,
    ) -> Result<QuotationView, QuotationError> {
        let title = request.title.trim();
        if title.chars().count() < MINIMUM_TITLE_LENGTH {
            return Err(QuotationError::TitleTooShort);
        }
        let term = request.search_term.trim();
        if term.chars().count() < MINIMUM_TERM_LENGTH {
            return Err(QuotationError::TermTooShort);
        }
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if start > end {
                return Err(QuotationError::InvalidRange);
            }
        }
        if let Some(sample) = request
            .samples
            .iter()
            .find(|sample| !sample.unit_price.is_finite() || sample.unit_price < 0.0)
        {
            return Err(QuotationError::InvalidPrice(sample.description.clone()));
        }

        let samples = within_window(request.samples, request.start_date, request.end_date);
        let prices: Vec<f64> = samples.iter().map(|sample| sample.unit_price).collect();
        let stats = PriceStats::from_prices(&prices);

        let now = Utc::now();
        let quotation = PriceQuotation {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            title: title.to_string(),
            search_term: term.to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            quotations: samples,
            average_price: stats.average,
            quotation_count: stats.count,
            status: ACTIVE_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };
        let saved = self.quotations.insert(&quotation).await?;
        info!(
            quotation_id = %saved.id,
            count = stats.count,
            average = stats.average,
            "price quotation saved"
        );
        Ok(saved.into())
    }

    pub async fn quotations(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<QuotationView>, QuotationError> {
        let query = match limit {
            Some(limit) => ListQuery::all().limit(limit),
            None => ListQuery::all(),
        };
        let rows = self.quotations.list(query).await?;
        Ok(rows.into_iter().map(QuotationView::from).collect())
    }

    pub async fn quotation(&self, id: Uuid) -> Result<QuotationView, QuotationError> {
        Ok(self.quotations.require(id).await?.into())
    }

    pub async fn delete_quotation(&self, id: Uuid) -> Result<(), QuotationError> {
        self.quotations.delete(id).await?;
        info!(quotation_id = %id, "price quotation deleted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuotationError {
    #[error("title must have at least {} characters", MINIMUM_TITLE_LENGTH)]
    TitleTooShort,
    #[error("search term must have at least {} characters", MINIMUM_TERM_LENGTH)]
    TermTooShort,
    #[error("start_date must not be after end_date")]
    InvalidRange,
    #[error("sample '{0}' has an invalid unit price")]
    InvalidPrice(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorStatus for QuotationError {
    fn status_code(&self) -> StatusCode {
        match self {
            QuotationError::TitleTooShort
            | QuotationError::TermTooShort
            | QuotationError::InvalidRange
            | QuotationError::InvalidPrice(_) => StatusCode::BAD_REQUEST,
            QuotationError::Store(err) => ErrorStatus::status_code(err),
        }
    }
}
