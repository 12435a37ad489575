//! Price history fetching.

pub mod fmp;
pub mod provider;

pub use fmp::FmpProvider;
pub use provider::{DailyBar, FetchError, PriceProvider, StockHistory};
