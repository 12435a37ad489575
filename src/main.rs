//! bank-charts CLI — fetch bank closing prices, render the dashboard PNG,
//! and push it to S3.
//!
//! Every config field has a default (the five-largest-US-banks dashboard);
//! a TOML file and/or flags override them. Fetch/table/render failures exit
//! non-zero; a failed upload is reported and the run still succeeds, since
//! the chart is already on disk by then.

use anyhow::{bail, Result};
use bank_charts::config::PipelineConfig;
use bank_charts::data::FmpProvider;
use bank_charts::pipeline::run_pipeline;
use bank_charts::upload::{ChartStore, S3ChartStore};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bank-charts",
    about = "Bank stock dashboard — fetch closes, render charts, upload to S3"
)]
struct Cli {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tickers to fetch (e.g. JPM BAC C WFC GS).
    #[arg(long, num_args = 1..)]
    tickers: Option<Vec<String>>,

    /// FMP API key.
    #[arg(long)]
    api_key: Option<String>,

    /// S3 bucket for the rendered PNG.
    #[arg(long)]
    bucket: Option<String>,

    /// Local output path for the PNG.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exactly two tickers to give dedicated scatter panels.
    #[arg(long, num_args = 2)]
    highlight: Option<Vec<String>>,

    /// Render and save locally without uploading.
    #[arg(long, default_value_t = false)]
    skip_upload: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(tickers) = cli.tickers {
        config.tickers = tickers;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if let Some(bucket) = cli.bucket {
        config.bucket = bucket;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(highlight) = cli.highlight {
        let [first, second] = <[String; 2]>::try_from(highlight)
            .map_err(|h: Vec<String>| anyhow::anyhow!("--highlight takes exactly two tickers, got {}", h.len()))?;
        config.highlight = [first, second];
    }
    config.validate()?;

    for ticker in &config.highlight {
        if !config.tickers.contains(ticker) {
            bail!("highlight ticker '{ticker}' is not in the ticker list");
        }
    }

    let provider = FmpProvider::new();
    let store = (!cli.skip_upload)
        .then(|| S3ChartStore::new(config.bucket.clone(), config.object_key()));
    let store_ref = store.as_ref().map(|s| s as &dyn ChartStore);

    run_pipeline(&config, &provider, store_ref)?;
    Ok(())
}
