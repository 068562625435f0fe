pub mod allocator;
pub mod amortization;
pub mod config;
pub mod debt;
pub mod error;
pub mod plan;
pub mod planner;
pub mod portfolio;
pub mod rates;
pub mod storage;
pub mod types;

pub use allocator::SnowballAllocator;
pub use amortization::{AmortizationLineItem, AmortizationSchedule};
pub use config::PlannerConfig;
pub use debt::{Debt, DebtOptions, InjectedPayment, DEFAULT_MIN_PAYMENT_MULTIPLIER};
pub use error::DebtPlannerError;
pub use plan::{PeriodTotal, PlanSummary, PlannedDebt, PortfolioPlan};
pub use portfolio::Portfolio;
pub use rates::RateCalendar;
pub use storage::DebtFileStorage;
pub use types::*;

/// Standard result type for all debt-planner operations
pub type DebtPlannerResult<T> = Result<T, DebtPlannerError>;
