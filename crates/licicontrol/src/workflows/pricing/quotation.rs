use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

pub const ACTIVE_STATUS: &str = "Ativo";

/// One observed unit price, typically taken from a published tender or contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub description: String,
    pub unit_price: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A saved price research (`price_quotations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuotation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub search_term: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub quotations: Vec<PriceSample>,
    pub average_price: f64,
    pub quotation_count: u32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for PriceQuotation {
    const TABLE: &'static str = "price_quotations";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotationRequest {
    pub user_id: Uuid,
    pub title: String,
    pub search_term: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub samples: Vec<PriceSample>,
}

/// Summary of the unit prices kept in a quotation. All zeros when it has no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStats {
    pub count: u32,
    pub average: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl PriceStats {
    pub fn from_prices(prices: &[f64]) -> Self {
        if prices.is_empty() {
            return Self::default();
        }
        let mut sorted = prices.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let middle = count / 2;
        let median = if count % 2 == 0 {
            (sorted[middle - 1] + sorted[middle]) / 2.0
        } else {
            sorted[middle]
        };
        let average = sorted.iter().sum::<f64>() / count as f64;

        Self {
            count: count as u32,
            average: round_cents(average),
            min: sorted[0],
            median: round_cents(median),
            max: sorted[count - 1],
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keep samples dated inside the inclusive window; an open bound accepts everything on that side.
pub fn within_window(
    samples: Vec<PriceSample>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<PriceSample> {
    samples
        .into_iter()
        .filter(|sample| start.map_or(true, |start| sample.date >= start))
        .filter(|sample| end.map_or(true, |end| sample.date <= end))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationView {
    #[serde(flatten)]
    pub quotation: PriceQuotation,
    pub stats: PriceStats,
}

impl From<PriceQuotation> for QuotationView {
    fn from(quotation: PriceQuotation) -> Self {
        let prices: Vec<f64> = quotation
            .quotations
            .iter()
            .map(|sample| sample.unit_price)
            .collect();
        Self {
            stats: PriceStats::from_prices(&prices),
            quotation,
        }
    }
}
