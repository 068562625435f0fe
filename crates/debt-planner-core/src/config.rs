use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::debt::DEFAULT_MIN_PAYMENT_MULTIPLIER;

/// Planner settings supplied by the caller (CLI config file, bindings input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Multiple of monthly interest used for forced minimum payments.
    pub min_payment_multiplier: Decimal,
    /// First period of the plan. `None` means today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Portfolio file. `None` means the storage default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Upper bound on simulated periods per debt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_payment_multiplier: DEFAULT_MIN_PAYMENT_MULTIPLIER,
            start_date: None,
            data_file: None,
            max_periods: None,
        }
    }
}

impl PlannerConfig {
    pub fn start_or(&self, today: NaiveDate) -> NaiveDate {
        self.start_date.unwrap_or(today)
    }
}
