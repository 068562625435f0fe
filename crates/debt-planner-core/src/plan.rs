//! Output of the snowball allocator and the aggregate views over it.

use std::fmt;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{currency, AmortizationSchedule};
use crate::debt::{Debt, InjectedPayment};
use crate::types::Money;

/// One debt's place in the cascade and its resulting schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedDebt {
    pub name: String,
    /// 1-based processing position.
    pub position: usize,
    /// Tie-broken standalone length used for ordering.
    pub order_slot: usize,
    pub standalone_periods: usize,
    /// Cascaded payment fed into the simulation, if any.
    pub injected: Option<InjectedPayment>,
    /// Planning copy; `additional_payment` records the extra amount received.
    pub debt: Debt,
    pub schedule: AmortizationSchedule,
}

impl PlannedDebt {
    /// Periods saved against the standalone payoff.
    pub fn periods_saved(&self) -> usize {
        self.standalone_periods.saturating_sub(self.schedule.len())
    }
}

/// Portfolio-wide total for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: usize,
    pub date: NaiveDate,
    pub payment: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub start_date: NaiveDate,
    pub debt_count: usize,
    pub paid_off_count: usize,
    /// Original minimums of debts already retired.
    pub amount_paid: Money,
    pub months_to_debt_free: usize,
    pub payoff_date: Option<NaiveDate>,
    pub first_month_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Name-keyed plan entries in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPlan {
    start_date: NaiveDate,
    entries: Vec<PlannedDebt>,
    paid_off: Vec<String>,
    amount_paid: Money,
}

impl PortfolioPlan {
    pub(crate) fn new(
        start_date: NaiveDate,
        entries: Vec<PlannedDebt>,
        paid_off: Vec<String>,
        amount_paid: Money,
    ) -> Self {
        Self {
            start_date,
            entries,
            paid_off,
            amount_paid,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn entries(&self) -> &[PlannedDebt] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&PlannedDebt> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn schedule(&self, name: &str) -> Option<&AmortizationSchedule> {
        self.entry(name).map(|e| &e.schedule)
    }

    /// Names of debts excluded from planning because they are already paid.
    pub fn paid_off(&self) -> &[String] {
        &self.paid_off
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest schedule, i.e. months until every debt is retired.
    pub fn max_length(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.schedule.len())
            .max()
            .unwrap_or(0)
    }

    /// Total paid across all schedules in each period.
    pub fn payments_by_period(&self) -> Vec<Money> {
        (0..self.max_length())
            .map(|i| self.entries.iter().map(|e| e.schedule.payment_at(i)).sum())
            .collect()
    }

    pub fn period_totals(&self) -> Vec<PeriodTotal> {
        self.payments_by_period()
            .into_iter()
            .enumerate()
            .map(|(i, payment)| PeriodTotal {
                period: i + 1,
                date: self.period_date(i),
                payment,
            })
            .collect()
    }

    pub fn grand_total(&self) -> Money {
        self.entries.iter().map(|e| e.schedule.total_paid()).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.schedule.total_interest()).sum()
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.entries
            .iter()
            .filter_map(|e| e.schedule.final_date())
            .max()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            start_date: self.start_date,
            debt_count: self.entries.len() + self.paid_off.len(),
            paid_off_count: self.paid_off.len(),
            amount_paid: self.amount_paid,
            months_to_debt_free: self.max_length(),
            payoff_date: self.payoff_date(),
            first_month_payment: self
                .payments_by_period()
                .first()
                .copied()
                .unwrap_or(Decimal::ZERO),
            total_paid: self.grand_total(),
            total_interest: self.total_interest(),
        }
    }

    fn period_date(&self, index: usize) -> NaiveDate {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.start_date.checked_add_months(Months::new(i)))
            .unwrap_or(self.start_date)
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Debts:               {} ({} paid off)", self.debt_count, self.paid_off_count)?;
        writeln!(f, "Already paid:        {}", currency(self.amount_paid))?;
        writeln!(f, "Plan start:          {}", self.start_date)?;
        match self.payoff_date {
            Some(date) => writeln!(f, "Debt free:           {} ({} months)", date, self.months_to_debt_free)?,
            None => writeln!(f, "Debt free:           now")?,
        }
        writeln!(f, "First month payment: {}", currency(self.first_month_payment))?;
        writeln!(f, "Total paid:          {}", currency(self.total_paid))?;
        writeln!(f, "Total interest:      {}", currency(self.total_interest))
    }
}

impl fmt::Display for PortfolioPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(
                f,
                "#{} {} ({} payments, {} saved)",
                entry.position,
                entry.name,
                entry.schedule.len(),
                entry.periods_saved(),
            )?;
            write!(f, "{}", entry.schedule)?;
        }
        Ok(())
    }
}
