use chrono::NaiveDate;
use clap::Args;
use debt_planner_core::planner::{self, PlanInput};
use debt_planner_core::{
    AmortizationSchedule, DebtPlannerResult, Money, PlanSummary, PlannerConfig, PortfolioPlan,
    Rate,
};
use serde::Serialize;
use serde_json::Value;

use super::{load_portfolio, map_result, today, PortfolioArgs};

/// Arguments for the full snowball plan
#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    /// Include every debt's month-by-month schedule
    #[arg(long)]
    pub detail: bool,
}

/// Arguments for the plan summary
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,
}

/// Arguments for the per-month portfolio totals
#[derive(Args)]
pub struct PaymentsArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,
}

// ---------------------------------------------------------------------------
// Report shapes
// ---------------------------------------------------------------------------

/// One row per planned debt, in payoff order.
#[derive(Debug, Serialize)]
pub struct DebtRow {
    pub position: usize,
    pub name: String,
    pub balance: Money,
    pub rate: Rate,
    pub minimum: Money,
    pub extra_payment: Money,
    pub extra_from_month: Option<i64>,
    pub standalone_months: usize,
    pub planned_months: usize,
    pub months_saved: usize,
    pub payoff_date: Option<NaiveDate>,
    pub total_interest: Money,
}

#[derive(Debug, Serialize)]
pub struct NamedSchedule {
    pub name: String,
    pub schedule: AmortizationSchedule,
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    #[serde(flatten)]
    pub summary: PlanSummary,
    pub debts: Vec<DebtRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<NamedSchedule>>,
}

impl PlanReport {
    pub fn from_plan(plan: &PortfolioPlan, detail: bool) -> DebtPlannerResult<Self> {
        let start = plan.start_date();
        let debts = plan
            .entries()
            .iter()
            .map(|entry| {
                Ok(DebtRow {
                    position: entry.position,
                    name: entry.name.clone(),
                    balance: entry.debt.balance(),
                    rate: entry.debt.rate(start)?,
                    minimum: entry.debt.minimum(start)?,
                    extra_payment: entry.debt.additional_payment(),
                    extra_from_month: entry.injected.map(|p| p.period_index + 1),
                    standalone_months: entry.standalone_periods,
                    planned_months: entry.schedule.len(),
                    months_saved: entry.periods_saved(),
                    payoff_date: entry.schedule.final_date(),
                    total_interest: entry.schedule.total_interest(),
                })
            })
            .collect::<DebtPlannerResult<Vec<_>>>()?;

        let schedules = detail.then(|| {
            plan.entries()
                .iter()
                .map(|entry| NamedSchedule {
                    name: entry.name.clone(),
                    schedule: entry.schedule.clone(),
                })
                .collect()
        });

        Ok(Self {
            summary: plan.summary(),
            debts,
            schedules,
        })
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn plan_input(
    args: &PortfolioArgs,
    config: &PlannerConfig,
) -> Result<PlanInput, Box<dyn std::error::Error>> {
    let config = args.merge_config(config);
    let portfolio = load_portfolio(args.input.as_deref(), &config)?;
    Ok(PlanInput {
        portfolio,
        start_date: config.start_or(today()),
        config,
    })
}

pub fn run_plan(args: PlanArgs, config: &PlannerConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let input = plan_input(&args.portfolio, config)?;
    let output = planner::plan_portfolio(&input)?;
    let report = PlanReport::from_plan(&output.result, args.detail)?;
    Ok(serde_json::to_value(map_result(output, |_| report))?)
}

pub fn run_summary(
    args: SummaryArgs,
    config: &PlannerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = plan_input(&args.portfolio, config)?;
    let output = planner::portfolio_summary(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_payments(
    args: PaymentsArgs,
    config: &PlannerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = plan_input(&args.portfolio, config)?;
    let output = planner::plan_portfolio(&input)?;
    Ok(serde_json::to_value(map_result(output, |plan| plan.period_totals()))?)
}
