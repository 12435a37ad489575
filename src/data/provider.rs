//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over the price-history source so the
//! pipeline can run against fixtures in tests without touching the network.

use serde::Deserialize;
use thiserror::Error;

/// One daily bar as returned by the API. Only the date and close survive
/// into the price table; the rest of the payload is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DailyBar {
    /// Calendar date as a `YYYY-MM-DD` string. Parsed into a date type only
    /// at chart time, never in the table itself.
    pub date: String,
    pub close: f64,
}

/// Full price history for one ticker, chronological as returned by the API
/// (FMP returns most-recent-first; no reordering is applied).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StockHistory {
    pub symbol: String,
    pub historical: Vec<DailyBar>,
}

/// Errors from the fetch stage. All of these are fatal — without the data
/// the table and the charts are worthless, so the pipeline fails fast.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Http(String),

    #[error("unexpected HTTP status {code}")]
    Status { code: u16 },

    #[error("failed to parse response body: {0}")]
    Json(String),
}

/// Trait for price-history sources (FMP over HTTP, fixtures in tests).
pub trait PriceProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily histories for all tickers in one call.
    ///
    /// An absent `historicalStockList` key in the response yields an empty
    /// vec, not an error; the table builder decides that case is fatal.
    fn fetch_histories(
        &self,
        tickers: &[String],
        api_key: &str,
    ) -> Result<Vec<StockHistory>, FetchError>;
}
