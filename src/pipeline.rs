//! Pipeline orchestrator: fetch → table → charts → upload.
//!
//! Fetch, table, and render errors propagate — the dashboard is worthless
//! without them. The upload outcome is recorded in the report and printed,
//! never propagated.

use crate::charts;
use crate::config::PipelineConfig;
use crate::data::PriceProvider;
use crate::table::PriceTable;
use crate::upload::{ChartStore, UploadOutcome};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// What one run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub tickers: Vec<String>,
    pub rows: usize,
    pub output_path: PathBuf,
    /// `None` when the upload was skipped.
    pub upload: Option<UploadOutcome>,
}

/// Run the full pipeline. Pass `None` for `store` to skip the upload.
pub fn run_pipeline(
    config: &PipelineConfig,
    provider: &dyn PriceProvider,
    store: Option<&dyn ChartStore>,
) -> Result<PipelineReport> {
    config.validate()?;

    println!(
        "Fetching {} ticker(s) from {}...",
        config.tickers.len(),
        provider.name()
    );
    let histories = provider
        .fetch_histories(&config.tickers, &config.api_key)
        .context("price history fetch failed")?;
    println!("Received history for {} ticker(s)", histories.len());

    let table = PriceTable::from_histories(&histories).context("price table assembly failed")?;
    println!("{table}");

    charts::render_dashboard(&table, &config.highlight, &config.output_path)
        .context("dashboard rendering failed")?;
    println!(
        "Visualization saved locally as {}",
        config.output_path.display()
    );

    let upload = store.map(|store| {
        let outcome = store.put(&config.output_path);
        println!("{}", outcome.describe());
        outcome
    });

    Ok(PipelineReport {
        tickers: table.tickers().to_vec(),
        rows: table.height(),
        output_path: config.output_path.clone(),
        upload,
    })
}
