//! Snowball allocation: order debts by standalone payoff length and cascade
//! each retired debt's minimum onto the next one.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::debt::{Debt, InjectedPayment};
use crate::error::DebtPlannerError;
use crate::plan::{PlannedDebt, PortfolioPlan};
use crate::types::Money;
use crate::DebtPlannerResult;

#[derive(Debug, Clone)]
pub struct SnowballAllocator {
    start: NaiveDate,
    max_periods: Option<u32>,
}

impl SnowballAllocator {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            max_periods: None,
        }
    }

    /// Bound every simulated schedule to `max_periods` entries.
    pub fn with_max_periods(mut self, max_periods: u32) -> Self {
        self.max_periods = Some(max_periods);
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Plan the cascade over `debts`. Inputs are cloned, never mutated, so
    /// repeated calls on the same slice give identical plans.
    pub fn plan(&self, debts: &[Debt]) -> DebtPlannerResult<PortfolioPlan> {
        let mut names = HashSet::with_capacity(debts.len());
        for debt in debts {
            if !names.insert(debt.name()) {
                return Err(DebtPlannerError::DuplicateDebt(debt.name().to_string()));
            }
        }

        let (paid, active): (Vec<&Debt>, Vec<&Debt>) =
            debts.iter().partition(|d| d.is_paid_off());

        // Paid-off debts free their minimums from the first period.
        let paid_pool: Money = paid.iter().map(|d| d.original_minimum()).sum();
        let paid_off: Vec<String> = paid.iter().map(|d| d.name().to_string()).collect();

        let copies: Vec<Debt> = active.iter().map(|d| d.planning_copy()).collect();
        let standalone = self.standalone_lengths(&copies)?;
        let order = processing_order(&standalone);

        let mut entries = Vec::with_capacity(copies.len());
        let mut freed_amount = paid_pool;
        let mut freed_at: i64 = 0;

        for (position, (index, slot)) in order.into_iter().enumerate() {
            let mut debt = copies[index].clone();
            let injected = (freed_amount > Decimal::ZERO)
                .then(|| InjectedPayment::new(freed_at, freed_amount));

            let schedule = debt.simulate(self.start, self.max_periods, injected.as_slice())?;

            if injected.is_some() {
                let minimum = debt.minimum(self.start)?;
                debt.record_additional_payment(schedule.max_payment() - minimum);
            }

            debug!(
                "snowball #{} '{}': standalone {} periods, planned {} periods, extra {} from period {}",
                position + 1,
                debt.name(),
                standalone[index],
                schedule.len(),
                freed_amount,
                freed_at,
            );

            freed_amount += debt.original_minimum();
            freed_at = i64::try_from(schedule.len()).unwrap_or(i64::MAX);

            entries.push(PlannedDebt {
                name: debt.name().to_string(),
                position: position + 1,
                order_slot: slot,
                standalone_periods: standalone[index],
                injected,
                debt,
                schedule,
            });
        }

        info!(
            "planned {} debts ({} already paid off) from {}",
            entries.len(),
            paid_off.len(),
            self.start
        );

        Ok(PortfolioPlan::new(self.start, entries, paid_off, paid_pool))
    }

    #[cfg(feature = "parallel")]
    fn standalone_lengths(&self, debts: &[Debt]) -> DebtPlannerResult<Vec<usize>> {
        debts
            .par_iter()
            .map(|d| d.amortize(self.start, self.max_periods).map(|s| s.len()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn standalone_lengths(&self, debts: &[Debt]) -> DebtPlannerResult<Vec<usize>> {
        debts
            .iter()
            .map(|d| d.amortize(self.start, self.max_periods).map(|s| s.len()))
            .collect()
    }
}

/// Assign each debt a unique slot starting from its standalone length.
///
/// Debts are visited by ascending length (input order among equals); a debt
/// whose length is already taken probes upward to the next free slot.
/// Returns `(input index, slot)` pairs sorted by slot.
pub fn processing_order(lengths: &[usize]) -> Vec<(usize, usize)> {
    let mut visit: Vec<usize> = (0..lengths.len()).collect();
    visit.sort_by_key(|&i| lengths[i]);

    let mut used = BTreeSet::new();
    let mut order: Vec<(usize, usize)> = visit
        .into_iter()
        .map(|i| {
            let mut slot = lengths[i];
            while !used.insert(slot) {
                slot += 1;
            }
            (i, slot)
        })
        .collect();

    order.sort_by_key(|&(_, slot)| slot);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_processing_order_is_ascending() {
        assert_eq!(processing_order(&[30, 10, 20]), vec![(1, 10), (2, 20), (0, 30)]);
    }

    #[test]
    fn test_processing_order_probes_past_ties() {
        // two 5s and a 6: the second 5 takes 6, pushing the 6 to 7
        assert_eq!(processing_order(&[5, 6, 5]), vec![(0, 5), (2, 6), (1, 7)]);
        assert_eq!(processing_order(&[4, 4, 4]), vec![(0, 4), (1, 5), (2, 6)]);
        assert!(processing_order(&[]).is_empty());
    }

    #[test]
    fn test_cascade_feeds_next_debt() {
        let small = Debt::new("small", dec!(500), dec!(10), dec!(100), start()).unwrap();
        let large = Debt::new("large", dec!(5000), dec!(6), dec!(150), start()).unwrap();

        let plan = SnowballAllocator::new(start())
            .plan(&[large.clone(), small.clone()])
            .unwrap();

        let first = &plan.entries()[0];
        let second = &plan.entries()[1];
        assert_eq!(first.name, "small");
        assert_eq!(first.injected, None);
        assert_eq!(
            second.injected,
            Some(InjectedPayment::new(first.schedule.len() as i64, dec!(100)))
        );

        let standalone = large.amortize(start(), None).unwrap();
        assert!(second.schedule.len() < standalone.len());
        assert_eq!(second.debt.additional_payment(), dec!(100));
    }

    #[test]
    fn test_paid_off_debts_feed_first_debt() {
        let done = Debt::new("done", dec!(0), dec!(0), dec!(75), start()).unwrap();
        let open = Debt::new("open", dec!(1200), dec!(0), dec!(100), start()).unwrap();

        let plan = SnowballAllocator::new(start()).plan(&[done, open]).unwrap();
        assert_eq!(plan.paid_off(), ["done".to_string()]);
        assert_eq!(plan.len(), 1);

        let entry = &plan.entries()[0];
        assert_eq!(entry.injected, Some(InjectedPayment::new(0, dec!(75))));
        assert_eq!(entry.schedule.payment_at(0), dec!(175));
        // 1200 at 175/month with no interest
        assert_eq!(entry.schedule.len(), 7);
    }

    #[test]
    fn test_max_periods_bounds_plan() {
        let debt = Debt::new("long", dec!(50000), dec!(4), dec!(200), start()).unwrap();
        let plan = SnowballAllocator::new(start())
            .with_max_periods(12)
            .plan(&[debt])
            .unwrap();
        assert_eq!(plan.max_length(), 12);
    }

    #[test]
    fn test_duplicate_names_fail() {
        let a = Debt::new("A", dec!(500), dec!(10), dec!(100), start()).unwrap();
        let err = SnowballAllocator::new(start())
            .plan(&[a.clone(), a])
            .unwrap_err();
        assert!(matches!(err, DebtPlannerError::DuplicateDebt(_)));
    }
}
