//! Bank Charts — descriptive dashboard for bank stock closing prices.
//!
//! Pipeline stages:
//! - Fetch daily price history for a ticker list from Financial Modeling Prep
//! - Assemble closes into one date-indexed price table
//! - Render a 2×2 dashboard (boxplot, two date scatters, histogram) as PNG
//! - Upload the PNG to S3 with public-read access (failure is non-fatal)

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod table;
pub mod upload;

pub use config::PipelineConfig;
pub use pipeline::{run_pipeline, PipelineReport};
pub use table::PriceTable;
pub use upload::UploadOutcome;
