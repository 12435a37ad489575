//! Financial Modeling Prep data provider.
//!
//! One GET against the v3 historical-price-full endpoint for the whole
//! ticker list, comma-joined, with the API key as a query credential.
//! No retry and no backoff: this is a one-shot tool, a failed fetch is fatal.

use super::provider::{FetchError, PriceProvider, StockHistory};
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3/historical-price-full";

/// FMP batch response. A single-ticker request returns a bare object without
/// the list key; `default` maps that (and any other missing-key case) to an
/// empty list rather than a parse error.
#[derive(Debug, Deserialize)]
struct HistoricalPriceResponse {
    #[serde(rename = "historicalStockList", default)]
    historical_stock_list: Vec<StockHistory>,
}

pub struct FmpProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Default for FmpProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FmpProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the endpoint base, for tests against a local server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut provider = Self::new();
        provider.base_url = base_url.into();
        provider
    }

    fn request_url(&self, tickers: &[String], api_key: &str) -> String {
        format!("{}/{}?apikey={api_key}", self.base_url, tickers.join(","))
    }

    fn parse_body(body: &str) -> Result<Vec<StockHistory>, FetchError> {
        let response: HistoricalPriceResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Json(e.to_string()))?;
        Ok(response.historical_stock_list)
    }
}

impl PriceProvider for FmpProvider {
    fn name(&self) -> &str {
        "financial_modeling_prep"
    }

    fn fetch_histories(
        &self,
        tickers: &[String],
        api_key: &str,
    ) -> Result<Vec<StockHistory>, FetchError> {
        let url = self.request_url(tickers, api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| FetchError::Http(e.to_string()))?;
        Self::parse_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_tickers_with_commas_and_embeds_the_key() {
        let provider = FmpProvider::new();
        let tickers: Vec<String> = ["JPM", "BAC", "GS"].iter().map(|s| s.to_string()).collect();
        let url = provider.request_url(&tickers, "secret123");
        assert_eq!(
            url,
            "https://financialmodelingprep.com/api/v3/historical-price-full/JPM,BAC,GS?apikey=secret123"
        );
    }

    #[test]
    fn parses_a_batch_response() {
        let body = r#"{
            "historicalStockList": [
                {
                    "symbol": "JPM",
                    "historical": [
                        {"date": "2024-01-03", "close": 170.5, "open": 169.0, "volume": 100},
                        {"date": "2024-01-02", "close": 169.8}
                    ]
                },
                {
                    "symbol": "BAC",
                    "historical": [
                        {"date": "2024-01-03", "close": 33.1},
                        {"date": "2024-01-02", "close": 32.9}
                    ]
                }
            ]
        }"#;

        let histories = FmpProvider::parse_body(body).unwrap();
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].symbol, "JPM");
        assert_eq!(histories[0].historical[0].date, "2024-01-03");
        assert_eq!(histories[0].historical[0].close, 170.5);
        assert_eq!(histories[1].symbol, "BAC");
        assert_eq!(histories[1].historical.len(), 2);
    }

    #[test]
    fn missing_list_key_is_an_empty_result_not_an_error() {
        // Single-ticker requests come back as a bare object
        let body = r#"{"symbol": "JPM", "historical": [{"date": "2024-01-02", "close": 169.8}]}"#;
        let histories = FmpProvider::parse_body(body).unwrap();
        assert!(histories.is_empty());
    }

    #[test]
    fn malformed_json_is_a_fetch_error() {
        let result = FmpProvider::parse_body("<html>rate limited</html>");
        assert!(matches!(result, Err(FetchError::Json(_))));
    }
}
