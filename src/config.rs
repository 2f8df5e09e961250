use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::forecast::MAX_HORIZON;
use crate::data::summary::{DEFAULT_BINS, DEFAULT_TOP_N};

/// File name of the IHME GBD 2021 export the dashboard was built around.
pub const DEFAULT_DATA_FILE: &str =
    "IHME_GBD_2021_SUICIDE_1990_2021_DEATHS_MEAN_AGE_Y2025M02D12_0.csv";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--{0} must be at least 1")]
    Zero(&'static str),
}

/// Explore the mean age of suicide mortality by location, sex and year.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Input table (.csv, .json or .parquet).
    #[arg(long, env = "MEAN_AGE_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Shared passphrase required to open the dashboard.
    #[arg(long, env = "MEAN_AGE_PASSPHRASE", default_value = "123456", hide_env_values = true)]
    pub passphrase: String,

    /// Number of locations in the ranked bar chart.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Number of histogram buckets.
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Years to project past the last observation.
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HORIZON))
    )]
    pub forecast_horizon: u32,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Zero("top-n"));
        }
        if self.bins == 0 {
            return Err(ConfigError::Zero("bins"));
        }
        if self.forecast_horizon == 0 {
            return Err(ConfigError::Zero("forecast-horizon"));
        }
        Ok(())
    }
}
