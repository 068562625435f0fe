//! JSON-friendly entry points shared by the CLI and the Node bindings.

use std::time::Instant;

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::allocator::SnowballAllocator;
use crate::amortization::AmortizationSchedule;
use crate::config::PlannerConfig;
use crate::debt::Debt;
use crate::plan::{PlanSummary, PortfolioPlan};
use crate::portfolio::Portfolio;
use crate::types::*;
use crate::DebtPlannerResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub portfolio: Portfolio,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub config: PlannerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizeInput {
    pub debt: Debt,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
    #[serde(default)]
    pub config: PlannerConfig,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Snowball plan for a whole portfolio.
pub fn plan_portfolio(input: &PlanInput) -> DebtPlannerResult<ComputationOutput<PortfolioPlan>> {
    let start = Instant::now();
    let (plan, warnings) = build_plan(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt snowball (ascending standalone payoff, cascaded minimums)",
        &assumptions(input),
        warnings,
        elapsed,
        plan,
    ))
}

/// Plan summary only, without the per-debt schedules.
pub fn portfolio_summary(input: &PlanInput) -> DebtPlannerResult<ComputationOutput<PlanSummary>> {
    let start = Instant::now();
    let (plan, warnings) = build_plan(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt snowball summary",
        &assumptions(input),
        warnings,
        elapsed,
        plan.summary(),
    ))
}

/// Standalone month-by-month schedule for one debt.
pub fn amortize_debt(input: &AmortizeInput) -> DebtPlannerResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let debt = input.debt.with_multiplier(input.config.min_payment_multiplier)?;

    let mut warnings = Vec::new();
    if let Some(w) = forced_minimum_warning(&debt, input.start_date)? {
        warnings.push(w);
    }

    let max_periods = input.max_periods.or(input.config.max_periods);
    let schedule = debt.amortize(input.start_date, max_periods)?;
    if !debt.is_paid_off() && schedule.final_balance() > Money::ZERO {
        warnings.push(format!(
            "Schedule for '{}' stopped after {} periods with {} outstanding",
            debt.name(),
            schedule.len(),
            schedule.final_balance()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "start_date": input.start_date,
        "max_periods": max_periods,
        "min_payment_multiplier": input.config.min_payment_multiplier.to_string(),
        "interest": "monthly rate = annual / 12, rounded up to cents",
    });

    Ok(with_metadata(
        "Monthly amortization at the minimum payment",
        &assumptions,
        warnings,
        elapsed,
        schedule,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_plan(input: &PlanInput) -> DebtPlannerResult<(PortfolioPlan, Vec<String>)> {
    let portfolio = input
        .portfolio
        .with_multiplier(input.config.min_payment_multiplier)?;
    portfolio.validate()?;

    let mut warnings = Vec::new();
    for debt in portfolio.paid() {
        warn!("'{}' is already paid off and is excluded from the plan", debt.name());
        warnings.push(format!(
            "Debt '{}' already paid off; its minimum of {} is reallocated",
            debt.name(),
            debt.original_minimum()
        ));
    }
    for debt in portfolio.unpaid() {
        if let Some(w) = forced_minimum_warning(debt, input.start_date)? {
            warnings.push(w);
        }
    }

    let mut allocator = SnowballAllocator::new(input.start_date);
    if let Some(max) = input.config.max_periods {
        allocator = allocator.with_max_periods(max);
    }
    let plan = allocator.plan(portfolio.debts())?;
    Ok((plan, warnings))
}

fn forced_minimum_warning(debt: &Debt, date: NaiveDate) -> DebtPlannerResult<Option<String>> {
    if !debt.uses_forced_minimum(date)? {
        return Ok(None);
    }
    Ok(Some(format!(
        "Debt '{}' uses a forced minimum of {} above its stated minimum of {}",
        debt.name(),
        debt.minimum(date)?,
        debt.current_minimum()
    )))
}

fn assumptions(input: &PlanInput) -> serde_json::Value {
    serde_json::json!({
        "start_date": input.start_date,
        "min_payment_multiplier": input.config.min_payment_multiplier.to_string(),
        "max_periods": input.config.max_periods,
        "ordering": "ascending standalone payoff length, ties probe to the next free slot",
        "cascade": "each retired debt's original minimum is added to the next debt",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DebtPlannerError;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn sample_input() -> PlanInput {
        let portfolio = Portfolio::from_debts(vec![
            Debt::new("card", dec!(2000), dec!(22), dec!(40), start()).unwrap(),
            Debt::new("car", dec!(8000), dec!(6), dec!(250), start()).unwrap(),
            Debt::new("old", dec!(0), dec!(10), dec!(60), start()).unwrap(),
        ])
        .unwrap();
        PlanInput {
            portfolio,
            start_date: start(),
            config: PlannerConfig::default(),
        }
    }

    #[test]
    fn test_plan_portfolio_envelope() {
        let output = plan_portfolio(&sample_input()).unwrap();
        assert_eq!(output.result.len(), 2);
        assert_eq!(output.result.paid_off(), ["old".to_string()]);
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
        assert!(output.warnings.iter().any(|w| w.contains("'old' already paid off")));
        // 36.67 monthly interest * 1.5 forces 55.00 over the stated 40
        assert!(output.warnings.iter().any(|w| w.contains("'card' uses a forced minimum")));
    }

    #[test]
    fn test_summary_matches_plan() {
        let input = sample_input();
        let plan = plan_portfolio(&input).unwrap().result;
        let summary = portfolio_summary(&input).unwrap().result;
        assert_eq!(summary, plan.summary());
        assert_eq!(summary.amount_paid, dec!(60));
    }

    #[test]
    fn test_plan_input_parses_with_default_config() {
        let json = r#"{
            "start_date": "2024-01-01",
            "portfolio": [{
                "name": "A",
                "balance": "1200",
                "as_of": "2024-01-01",
                "rate_calendar": {"2024-01-01": "0"},
                "original_minimum": "100",
                "current_minimum": "100"
            }]
        }"#;
        let input: PlanInput = serde_json::from_str(json).unwrap();
        let output = plan_portfolio(&input).unwrap();
        assert_eq!(output.result.max_length(), 12);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_amortize_debt_bounded_warns() {
        let input = AmortizeInput {
            debt: Debt::new("A", dec!(10000), dec!(5.25), dec!(400), start()).unwrap(),
            start_date: start(),
            max_periods: Some(6),
            config: PlannerConfig::default(),
        };
        let output = amortize_debt(&input).unwrap();
        assert_eq!(output.result.len(), 6);
        assert!(output.warnings.iter().any(|w| w.contains("stopped after 6 periods")));
    }

    #[test]
    fn test_multiplier_that_breaks_a_debt_is_rejected() {
        let mut input = sample_input();
        // a zero multiplier leaves only the stated minimum, which cannot cover interest
        input.portfolio = Portfolio::from_debts(vec![Debt::new(
            "steep",
            dec!(100000),
            dec!(20),
            dec!(1),
            start(),
        )
        .unwrap()])
        .unwrap();
        input.config.min_payment_multiplier = dec!(0);
        let err = plan_portfolio(&input).unwrap_err();
        assert!(matches!(err, DebtPlannerError::InvalidPayment { .. }));
    }
}
