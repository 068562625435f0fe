use chrono::NaiveDate;
use clap::Args;
use debt_planner_core::{Debt, DebtFileStorage, DebtPlannerResult, PlannerConfig, Portfolio};
use log::info;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use super::{data_file_path, today};

/// Arguments for writing a starter portfolio file
#[derive(Args)]
pub struct InitArgs {
    /// Where to write the portfolio (defaults to the configured data file)
    #[arg(long)]
    pub file: Option<String>,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

/// A small mixed portfolio to edit: card, store card, car loan, student loan.
pub fn sample_portfolio(as_of: NaiveDate) -> DebtPlannerResult<Portfolio> {
    Portfolio::from_debts(vec![
        Debt::new("Credit card", dec!(4200), dec!(22.99), dec!(95), as_of)?,
        Debt::new("Store card", dec!(850), dec!(26.49), dec!(35), as_of)?,
        Debt::new("Car loan", dec!(14500), dec!(6.4), dec!(310), as_of)?,
        Debt::new("Student loan", dec!(21000), dec!(4.5), dec!(230), as_of)?,
    ])
}

pub fn run_init(args: InitArgs, config: &PlannerConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let path = data_file_path(args.file.as_deref(), config);
    let storage = DebtFileStorage::at_path(&path);
    if storage.exists() && !args.force {
        return Err(format!(
            "{} already exists (pass --force to replace it)",
            storage.file_path().display()
        )
        .into());
    }

    let portfolio = sample_portfolio(config.start_or(today()))?;
    storage.save(&portfolio)?;
    info!("wrote sample portfolio to {}", storage.file_path().display());

    Ok(json!({
        "path": storage.file_path().display().to_string(),
        "debts": portfolio.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: &std::path::Path, force: bool) -> InitArgs {
        InitArgs {
            file: Some(path.to_string_lossy().into_owned()),
            force,
        }
    }

    #[test]
    fn test_init_writes_loadable_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DebtFile.json");

        let value = run_init(args(&path, false), &PlannerConfig::default()).unwrap();
        assert_eq!(value["debts"], 4);

        let loaded = DebtFileStorage::at_path(&path).load().unwrap();
        assert_eq!(loaded.len(), 4);
        assert!(loaded.get("Store card").is_some());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DebtFile.json");
        run_init(args(&path, false), &PlannerConfig::default()).unwrap();

        let err = run_init(args(&path, false), &PlannerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(run_init(args(&path, true), &PlannerConfig::default()).is_ok());
    }

    #[test]
    fn test_sample_portfolio_plans() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let plan = sample_portfolio(as_of).unwrap().plan(as_of).unwrap();
        assert_eq!(plan.entries()[0].name, "Store card");
        assert_eq!(plan.len(), 4);
    }
}
