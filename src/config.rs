//! Pipeline configuration.
//!
//! The ticker list, API key, bucket, and output path all live here instead of
//! as globals, so tests can run against fixtures and the CLI can override any
//! field. Loadable from a TOML file; every field has a default matching the
//! five-largest-US-banks dashboard.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("ticker list must not be empty")]
    NoTickers,
}

/// Configuration for one dashboard run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tickers to fetch, in table column order.
    pub tickers: Vec<String>,

    /// FMP API key (query credential). May be blank; the remote service
    /// decides what a blank key gets.
    pub api_key: String,

    /// S3 bucket the rendered PNG is pushed to.
    pub bucket: String,

    /// Local path the dashboard PNG is written to. Also used as the S3 key.
    pub output_path: PathBuf,

    /// The two tickers given their own scatter panels.
    pub highlight: [String; 2],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tickers: ["JPM", "BAC", "C", "WFC", "GS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_key: String::new(),
            bucket: "saideepthibucket".to_string(),
            output_path: PathBuf::from("bank_data_plots.png"),
            highlight: ["WFC".to_string(), "BAC".to_string()],
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        Ok(())
    }

    /// S3 object key: the output file name.
    pub fn object_key(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bank_data_plots.png".to_string())
    }
}
