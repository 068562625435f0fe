pub mod init;
pub mod plan;
pub mod schedule;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use debt_planner_core::{ComputationOutput, DebtFileStorage, PlannerConfig, Portfolio};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::input;

/// Options shared by every command that plans a whole portfolio.
#[derive(Args, Debug, Clone, Default)]
pub struct PortfolioArgs {
    /// Portfolio JSON file (defaults to stdin, then the configured data file)
    #[arg(long)]
    pub input: Option<String>,

    /// First payment date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Multiple of monthly interest used for forced minimum payments
    #[arg(long)]
    pub multiplier: Option<Decimal>,

    /// Stop every schedule after this many months
    #[arg(long)]
    pub max_periods: Option<u32>,
}

impl PortfolioArgs {
    /// Command-line flags override the config file.
    pub fn merge_config(&self, config: &PlannerConfig) -> PlannerConfig {
        let mut merged = config.clone();
        if let Some(multiplier) = self.multiplier {
            merged.min_payment_multiplier = multiplier;
        }
        if self.start.is_some() {
            merged.start_date = self.start;
        }
        if self.max_periods.is_some() {
            merged.max_periods = self.max_periods;
        }
        merged
    }
}

/// Locate the portfolio: `--input`, then piped stdin, then the data file.
pub fn load_portfolio(
    input: Option<&str>,
    config: &PlannerConfig,
) -> Result<Portfolio, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        let path = input::file::resolve_path(path)?;
        return Ok(DebtFileStorage::at_path(&path).load()?);
    }
    if let Some(portfolio) = input::stdin::read_stdin_portfolio()? {
        return Ok(portfolio);
    }

    let storage = data_file_storage(config);
    if !storage.exists() {
        return Err(format!(
            "No portfolio found at {} (use --input, pipe JSON on stdin, or run `debtplan init`)",
            storage.file_path().display()
        )
        .into());
    }
    Ok(storage.load()?)
}

pub fn data_file_storage(config: &PlannerConfig) -> DebtFileStorage {
    match &config.data_file {
        Some(path) => DebtFileStorage::at_path(path),
        None => DebtFileStorage::default(),
    }
}

pub fn data_file_path(explicit: Option<&str>, config: &PlannerConfig) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => data_file_storage(config).file_path(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Swap the result of an envelope, keeping methodology, warnings and metadata.
pub fn map_result<T: Serialize, U: Serialize>(
    output: ComputationOutput<T>,
    f: impl FnOnce(T) -> U,
) -> ComputationOutput<U> {
    ComputationOutput {
        result: f(output.result),
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    }
}
