//! A single debt: balance, rate calendar, minimum-payment policy and its
//! month-by-month amortization.
//!
//! Every derived quantity is computed for a query date because the rate in
//! force can change over time. Simulation never mutates the debt it runs on;
//! each period is a pure step from one snapshot to the next.

use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationLineItem, AmortizationSchedule};
use crate::error::DebtPlannerError;
use crate::rates::RateCalendar;
use crate::types::{round_money, round_up, Money, Rate, CENTS};
use crate::DebtPlannerResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Forced minimum payment as a multiple of the month's interest.
pub const DEFAULT_MIN_PAYMENT_MULTIPLIER: Decimal = dec!(1.5);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const DAYS_PER_YEAR: Decimal = dec!(365);
const PERCENT: Decimal = dec!(100);
const MONEY_DP: u32 = 2;
const MINIMUM_PERCENT_DP: u32 = 5;

fn default_force_min_payment() -> bool {
    true
}

fn default_multiplier() -> Decimal {
    DEFAULT_MIN_PAYMENT_MULTIPLIER
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Extra monthly amount that starts at a given 0-based period index and
/// continues for the rest of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedPayment {
    pub period_index: i64,
    pub amount: Money,
}

impl InjectedPayment {
    pub fn new(period_index: i64, amount: Money) -> Self {
        Self {
            period_index,
            amount,
        }
    }
}

/// Optional construction settings for [`Debt::with_options`].
#[derive(Debug, Clone)]
pub struct DebtOptions {
    /// Starting adjustable minimum; clamped up to the original minimum.
    pub current_minimum: Option<Money>,
    pub force_min_payment: bool,
    /// Pre-built calendar. A baseline entry at `as_of` is added when the
    /// calendar has no rate in force on that date; otherwise its rate in
    /// force on `as_of` must equal the `rate` argument.
    pub rate_calendar: Option<RateCalendar>,
    pub min_payment_multiplier: Decimal,
}

impl Default for DebtOptions {
    fn default() -> Self {
        Self {
            current_minimum: None,
            force_min_payment: true,
            rate_calendar: None,
            min_payment_multiplier: DEFAULT_MIN_PAYMENT_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    name: String,
    balance: Money,
    /// Snapshot date; payment validity is checked against the rate in force here.
    as_of: NaiveDate,
    rate_calendar: RateCalendar,
    original_minimum: Money,
    current_minimum: Money,
    #[serde(default = "default_force_min_payment")]
    force_min_payment: bool,
    #[serde(default)]
    additional_payment: Money,
    #[serde(default = "default_multiplier")]
    min_payment_multiplier: Decimal,
}

// ---------------------------------------------------------------------------
// Construction and mutation
// ---------------------------------------------------------------------------

impl Debt {
    /// Create a debt with the forced-minimum policy on.
    pub fn new(
        name: impl Into<String>,
        balance: Money,
        rate: Rate,
        minimum: Money,
        as_of: NaiveDate,
    ) -> DebtPlannerResult<Self> {
        Self::with_options(name, balance, rate, minimum, as_of, DebtOptions::default())
    }

    pub fn with_options(
        name: impl Into<String>,
        balance: Money,
        rate: Rate,
        original_minimum: Money,
        as_of: NaiveDate,
        options: DebtOptions,
    ) -> DebtPlannerResult<Self> {
        let mut rate_calendar = options.rate_calendar.unwrap_or_default();
        match rate_calendar.get_rate(as_of) {
            Ok(in_force) if in_force != rate => {
                return Err(invalid(
                    "rate",
                    "Rate conflicts with the calendar entry in force on the as-of date",
                ));
            }
            Ok(_) => {}
            Err(_) => rate_calendar.set_rate(rate, as_of),
        }

        let original_minimum = round_money(original_minimum);
        let current_minimum = options
            .current_minimum
            .map(round_money)
            .unwrap_or(original_minimum)
            .max(original_minimum);

        let debt = Self {
            name: name.into(),
            balance: round_money(balance),
            as_of,
            rate_calendar,
            original_minimum,
            current_minimum,
            force_min_payment: options.force_min_payment,
            additional_payment: Decimal::ZERO,
            min_payment_multiplier: options.min_payment_multiplier,
        };
        debt.validate()?;
        Ok(debt)
    }

    /// Check field ranges and that the payment in force on `as_of` amortizes
    /// the balance. Deserialized debts go through this before use.
    pub fn validate(&self) -> DebtPlannerResult<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "Debt name must not be empty"));
        }
        if self.balance < Decimal::ZERO {
            return Err(invalid("balance", "Balance must be non-negative"));
        }
        for (field, amount) in [
            ("balance", self.balance),
            ("original_minimum", self.original_minimum),
            ("current_minimum", self.current_minimum),
            ("additional_payment", self.additional_payment),
        ] {
            if amount.normalize().scale() > MONEY_DP {
                return Err(invalid(field, "Amounts must have at most two decimal places"));
            }
        }
        if self.original_minimum < Decimal::ZERO {
            return Err(invalid("original_minimum", "Minimum payment must be non-negative"));
        }
        if self.current_minimum < self.original_minimum {
            return Err(invalid(
                "current_minimum",
                "Current minimum must not be below the original minimum",
            ));
        }
        if self.additional_payment < Decimal::ZERO {
            return Err(invalid("additional_payment", "Additional payment must be non-negative"));
        }
        if self.min_payment_multiplier < Decimal::ZERO {
            return Err(invalid(
                "min_payment_multiplier",
                "Minimum payment multiplier must be non-negative",
            ));
        }

        let payment = self.current_payment(self.as_of)?;
        let interest = self.average_monthly_interest(self.as_of)?;
        if self.balance > payment && payment <= interest {
            return Err(DebtPlannerError::InvalidPayment {
                name: self.name.clone(),
                payment,
                interest,
            });
        }
        Ok(())
    }

    /// Add or overwrite a rate entry. `None` means effective from `as_of`.
    pub fn set_rate(&mut self, rate: Rate, effective: Option<NaiveDate>) -> DebtPlannerResult<()> {
        let effective = effective.unwrap_or(self.as_of);
        self.update(|d| d.rate_calendar.set_rate(rate, effective))
    }

    /// Adjust the minimum; values below the original floor are raised to it.
    pub fn set_current_minimum(&mut self, minimum: Money) -> DebtPlannerResult<()> {
        let floor = self.original_minimum;
        self.update(|d| d.current_minimum = round_money(minimum).max(floor))
    }

    pub fn set_additional_payment(&mut self, amount: Money) -> DebtPlannerResult<()> {
        self.update(|d| d.additional_payment = round_money(amount))
    }

    pub fn set_force_min_payment(&mut self, force: bool) -> DebtPlannerResult<()> {
        self.update(|d| d.force_min_payment = force)
    }

    pub fn with_multiplier(&self, multiplier: Decimal) -> DebtPlannerResult<Self> {
        let mut next = self.clone();
        next.min_payment_multiplier = multiplier;
        next.validate()?;
        Ok(next)
    }

    /// Re-derive the current minimum from the minimum percentage in force on
    /// `date`, rounded up to cents and never below the original minimum.
    pub fn reset_minimum(&mut self, date: NaiveDate) -> DebtPlannerResult<()> {
        let percent = self.minimum_percent(date)?;
        let rescaled = round_up(self.balance * percent, CENTS);
        let floor = self.original_minimum;
        self.update(|d| d.current_minimum = rescaled.max(floor))
    }

    /// Apply one period's payment at `date`, returning the ledger entry.
    pub fn apply_payment(&mut self, date: NaiveDate) -> DebtPlannerResult<AmortizationLineItem> {
        let (item, next) = self.step(date)?;
        *self = next;
        Ok(item)
    }

    /// Mutate a copy and only commit it when the payment invariant still holds.
    fn update(&mut self, change: impl FnOnce(&mut Self)) -> DebtPlannerResult<()> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Copy used by the allocator: same terms, no extra payment.
    pub(crate) fn planning_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.additional_payment = Decimal::ZERO;
        copy
    }

    pub(crate) fn record_additional_payment(&mut self, amount: Money) {
        self.additional_payment = amount.max(Decimal::ZERO);
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Debt {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn rate_calendar(&self) -> &RateCalendar {
        &self.rate_calendar
    }

    pub fn original_minimum(&self) -> Money {
        self.original_minimum
    }

    pub fn current_minimum(&self) -> Money {
        self.current_minimum
    }

    pub fn force_min_payment(&self) -> bool {
        self.force_min_payment
    }

    pub fn additional_payment(&self) -> Money {
        self.additional_payment
    }

    pub fn min_payment_multiplier(&self) -> Decimal {
        self.min_payment_multiplier
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Derived per-date quantities
// ---------------------------------------------------------------------------

impl Debt {
    pub fn rate(&self, date: NaiveDate) -> DebtPlannerResult<Rate> {
        self.rate_calendar.get_rate(date)
    }

    pub fn monthly_periodic_rate(&self, date: NaiveDate) -> DebtPlannerResult<Decimal> {
        Ok(monthly_rate(self.rate(date)?))
    }

    pub fn daily_periodic_rate(&self, date: NaiveDate) -> DebtPlannerResult<Decimal> {
        let rate = self.rate(date)?;
        if rate <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(rate / PERCENT / DAYS_PER_YEAR)
    }

    pub fn average_monthly_interest(&self, date: NaiveDate) -> DebtPlannerResult<Money> {
        Ok(periodic_interest(self.rate(date)?, self.balance, MONTHS_PER_YEAR))
    }

    pub fn daily_interest(&self, date: NaiveDate) -> DebtPlannerResult<Money> {
        Ok(periodic_interest(self.rate(date)?, self.balance, DAYS_PER_YEAR))
    }

    /// Minimum due on `date`, never more than the balance.
    pub fn minimum(&self, date: NaiveDate) -> DebtPlannerResult<Money> {
        let floor = if self.force_min_payment {
            let forced = round_money(self.average_monthly_interest(date)? * self.min_payment_multiplier);
            forced.max(self.current_minimum)
        } else {
            self.current_minimum
        };
        Ok(self.balance.min(floor))
    }

    /// True when the interest-based policy raises the minimum above the stated one.
    pub fn uses_forced_minimum(&self, date: NaiveDate) -> DebtPlannerResult<bool> {
        Ok(self.force_min_payment && self.minimum(date)? > self.current_minimum.min(self.balance))
    }

    pub fn minimum_percent(&self, date: NaiveDate) -> DebtPlannerResult<Decimal> {
        let minimum = self.minimum(date)?;
        if self.balance <= Decimal::ZERO || minimum <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok((minimum / self.balance).round_dp(MINIMUM_PERCENT_DP))
    }

    pub fn current_payment(&self, date: NaiveDate) -> DebtPlannerResult<Money> {
        if self.balance <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok((self.minimum(date)? + self.additional_payment).min(self.balance))
    }

    pub fn payment_reduction(&self, date: NaiveDate) -> DebtPlannerResult<Money> {
        let payment = self.current_payment(date)?;
        if payment <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(payment - self.average_monthly_interest(date)?)
    }

    /// Estimated months to payoff at the current payment reduction.
    pub fn payoff_months(&self, date: NaiveDate) -> DebtPlannerResult<u32> {
        self.payoff_periods(date, Decimal::ONE)
    }

    /// Estimated days to payoff, spreading each month's reduction evenly.
    pub fn payoff_days(&self, date: NaiveDate) -> DebtPlannerResult<u32> {
        self.payoff_periods(date, MONTHS_PER_YEAR)
    }

    fn payoff_periods(&self, date: NaiveDate, divisor: Decimal) -> DebtPlannerResult<u32> {
        if self.balance <= Decimal::ZERO {
            return Ok(0);
        }
        let reduction = self.payment_reduction(date)?;
        if reduction <= Decimal::ZERO {
            return Err(DebtPlannerError::InvalidPayment {
                name: self.name.clone(),
                payment: self.current_payment(date)?,
                interest: self.average_monthly_interest(date)?,
            });
        }
        (self.balance / (reduction / divisor))
            .ceil()
            .to_u32()
            .ok_or_else(|| invalid("balance", "Payoff estimate exceeds the supported range"))
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

impl Debt {
    /// One period at `date`: the ledger entry and the snapshot that follows it.
    pub fn step(&self, date: NaiveDate) -> DebtPlannerResult<(AmortizationLineItem, Debt)> {
        self.step_period(1, date)
    }

    fn step_period(
        &self,
        period: u32,
        date: NaiveDate,
    ) -> DebtPlannerResult<(AmortizationLineItem, Debt)> {
        let rate = self.rate(date)?;
        let opening = self.balance;
        let payment = self.current_payment(date)?;

        // A payment that clears the balance closes the debt without interest.
        let interest = if payment >= opening {
            Decimal::ZERO
        } else {
            periodic_interest(rate, opening, MONTHS_PER_YEAR)
        };
        let applied = payment - interest;

        if opening > Decimal::ZERO && applied <= Decimal::ZERO {
            return Err(DebtPlannerError::NonConvergentPayoff {
                name: self.name.clone(),
                period,
                date,
            });
        }

        let closing = round_money(opening - applied).max(Decimal::ZERO);
        let item = AmortizationLineItem {
            period,
            date,
            rate,
            opening_balance: opening,
            payment,
            interest,
            applied_payment: applied,
            closing_balance: closing,
        };

        let mut next = self.clone();
        next.balance = closing;
        Ok((item, next))
    }

    /// Standalone amortization with no injected payments.
    pub fn amortize(
        &self,
        start: NaiveDate,
        max_periods: Option<u32>,
    ) -> DebtPlannerResult<AmortizationSchedule> {
        self.simulate(start, max_periods, &[])
    }

    /// Simulate month by month from `start` until the balance reaches zero or
    /// `max_periods` entries exist.
    ///
    /// Only the earliest-indexed injected payment is honored (entries sharing
    /// that index are summed). When it targets a period at or beyond the
    /// debt's own standalone length, the standalone schedule is returned.
    pub fn simulate(
        &self,
        start: NaiveDate,
        max_periods: Option<u32>,
        injected: &[InjectedPayment],
    ) -> DebtPlannerResult<AmortizationSchedule> {
        if let Some(bad) = injected.iter().find(|p| p.period_index < 0) {
            return Err(DebtPlannerError::InvalidScheduleIndex {
                index: bad.period_index,
            });
        }
        if injected.iter().any(|p| p.amount < Decimal::ZERO) {
            return Err(invalid("injected_payment", "Injected amount must be non-negative"));
        }

        let Some(first_index) = injected.iter().map(|p| p.period_index).min() else {
            return self.run(start, max_periods, None);
        };

        let baseline = self.run(start, max_periods, None)?;
        let baseline_len = i64::try_from(baseline.len()).unwrap_or(i64::MAX);
        if first_index >= baseline_len {
            debug!(
                "{}: injection at period {} is past standalone payoff ({} periods), ignored",
                self.name, first_index, baseline_len
            );
            return Ok(baseline);
        }

        let amount: Money = injected
            .iter()
            .filter(|p| p.period_index == first_index)
            .map(|p| p.amount)
            .sum();
        // first_index < baseline_len, which came from a u32-bounded loop.
        let at = u32::try_from(first_index).unwrap_or(u32::MAX);
        self.run(start, max_periods, Some((at, amount)))
    }

    fn run(
        &self,
        start: NaiveDate,
        max_periods: Option<u32>,
        injection: Option<(u32, Money)>,
    ) -> DebtPlannerResult<AmortizationSchedule> {
        let mut items = Vec::new();
        let mut current = self.clone();
        let mut index: u32 = 0;

        while current.balance > Decimal::ZERO {
            if max_periods.is_some_and(|max| index >= max) {
                break;
            }
            if let Some((at, amount)) = injection {
                if index == at {
                    current.additional_payment += amount;
                }
            }

            let date = period_date(start, index)?;
            let (item, next) = current.step_period(index + 1, date)?;
            items.push(item);
            current = next;
            index += 1;
        }

        Ok(AmortizationSchedule::from_items(items))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monthly_rate(rate: Rate) -> Decimal {
    if rate <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        rate / PERCENT / MONTHS_PER_YEAR
    }
}

/// Interest for one period, rounded up to cents. Multiplies before dividing
/// so a whole-cent result is not pushed up by a truncated periodic rate.
fn periodic_interest(rate: Rate, balance: Money, periods_per_year: Decimal) -> Money {
    if rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_up(rate * balance / (PERCENT * periods_per_year), CENTS)
}

/// Date of the 0-based period `index`, anchored on `start` so month-end
/// clamping never drifts.
fn period_date(start: NaiveDate, index: u32) -> DebtPlannerResult<NaiveDate> {
    start
        .checked_add_months(Months::new(index))
        .ok_or_else(|| invalid("start_date", "Schedule runs past the supported date range"))
}

fn invalid(field: &str, reason: &str) -> DebtPlannerError {
    DebtPlannerError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}
