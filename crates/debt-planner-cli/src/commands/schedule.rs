use chrono::NaiveDate;
use clap::Args;
use debt_planner_core::planner::{self, AmortizeInput};
use debt_planner_core::{DebtPlannerError, PlannerConfig};
use rust_decimal::Decimal;
use serde_json::Value;

use super::{load_portfolio, today, PortfolioArgs};

/// Arguments for a single debt's standalone schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Name of the debt in the portfolio
    #[arg(long)]
    pub name: String,

    /// Portfolio JSON file (defaults to stdin, then the configured data file)
    #[arg(long)]
    pub input: Option<String>,

    /// First payment date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Multiple of monthly interest used for forced minimum payments
    #[arg(long)]
    pub multiplier: Option<Decimal>,

    /// Stop the schedule after this many months
    #[arg(long)]
    pub max_periods: Option<u32>,
}

impl ScheduleArgs {
    fn portfolio_args(&self) -> PortfolioArgs {
        PortfolioArgs {
            input: self.input.clone(),
            start: self.start,
            multiplier: self.multiplier,
            max_periods: self.max_periods,
        }
    }
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: &PlannerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.portfolio_args().merge_config(config);
    let portfolio = load_portfolio(args.input.as_deref(), &config)?;
    let debt = portfolio
        .get(&args.name)
        .cloned()
        .ok_or_else(|| DebtPlannerError::DebtNotFound(args.name.clone()))?;

    let input = AmortizeInput {
        debt,
        start_date: config.start_or(today()),
        max_periods: config.max_periods,
        config,
    };
    let output = planner::amortize_debt(&input)?;
    Ok(serde_json::to_value(output)?)
}
