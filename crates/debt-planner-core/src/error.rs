use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtPlannerError {
    #[error("Invalid payment for '{name}': payment {payment} does not cover monthly interest {interest}")]
    InvalidPayment {
        name: String,
        payment: Decimal,
        interest: Decimal,
    },

    #[error("No applicable rate on {date}: calendar has no entry at or before that date")]
    NoApplicableRate { date: NaiveDate },

    #[error("Non-convergent payoff for '{name}': payment stops reducing the balance at period {period} ({date})")]
    NonConvergentPayoff {
        name: String,
        period: u32,
        date: NaiveDate,
    },

    #[error("Invalid schedule index: {index} (period indices start at 0)")]
    InvalidScheduleIndex { index: i64 },

    #[error("Duplicate debt name: {0}")]
    DuplicateDebt(String),

    #[error("Debt not found: {0}")]
    DebtNotFound(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DebtPlannerError {
    fn from(e: serde_json::Error) -> Self {
        DebtPlannerError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for DebtPlannerError {
    fn from(e: std::io::Error) -> Self {
        DebtPlannerError::Io(e.to_string())
    }
}
