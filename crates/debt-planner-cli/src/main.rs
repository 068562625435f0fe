mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use debt_planner_core::PlannerConfig;
use std::process;

use commands::init::InitArgs;
use commands::plan::{PaymentsArgs, PlanArgs, SummaryArgs};
use commands::schedule::ScheduleArgs;

/// Debt snowball payoff planning
#[derive(Parser)]
#[command(
    name = "debtplan",
    version,
    about = "Debt snowball payoff planning",
    long_about = "Plans the payoff of a portfolio of debts with the snowball method: \
                  debts are retired in order of their standalone payoff time and each \
                  retired debt's minimum payment rolls onto the next one. All amounts \
                  use decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Planner config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full snowball plan: payoff order, cascaded payments and totals
    Plan(PlanArgs),
    /// Standalone amortization schedule for one debt
    Schedule(ScheduleArgs),
    /// Plan summary only
    Summary(SummaryArgs),
    /// Total payment across the portfolio for each month
    Payments(PaymentsArgs),
    /// Write a sample portfolio file to edit
    Init(InitArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => input::file::read_config(path).unwrap_or_else(|e| fail(e)),
        None => PlannerConfig::default(),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::plan::run_plan(args, &config),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, &config),
        Commands::Summary(args) => commands::plan::run_summary(args, &config),
        Commands::Payments(args) => commands::plan::run_payments(args, &config),
        Commands::Init(args) => commands::init::run_init(args, &config),
        Commands::Version => {
            println!("debtplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => output::format_output(&cli.output, &value),
        Err(e) => fail(e),
    }
}
