//! Caller-ordered collection of debts with unique names.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocator::SnowballAllocator;
use crate::debt::Debt;
use crate::error::DebtPlannerError;
use crate::plan::PortfolioPlan;
use crate::types::Money;
use crate::DebtPlannerResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    debts: Vec<Debt>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_debts(debts: Vec<Debt>) -> DebtPlannerResult<Self> {
        let portfolio = Self { debts };
        portfolio.check_unique_names()?;
        Ok(portfolio)
    }

    pub fn add(&mut self, debt: Debt) -> DebtPlannerResult<()> {
        if self.get(debt.name()).is_some() {
            return Err(DebtPlannerError::DuplicateDebt(debt.name().to_string()));
        }
        self.debts.push(debt);
        Ok(())
    }

    /// Validate every debt and name uniqueness, e.g. after deserializing.
    pub fn validate(&self) -> DebtPlannerResult<()> {
        self.check_unique_names()?;
        self.debts.iter().try_for_each(Debt::validate)
    }

    fn check_unique_names(&self) -> DebtPlannerResult<()> {
        let mut seen = HashSet::with_capacity(self.debts.len());
        for debt in &self.debts {
            if !seen.insert(debt.name()) {
                return Err(DebtPlannerError::DuplicateDebt(debt.name().to_string()));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Debt> {
        self.debts.iter().find(|d| d.name() == name)
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Debt> {
        self.debts.iter()
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn paid(&self) -> impl Iterator<Item = &Debt> {
        self.debts.iter().filter(|d| d.is_paid_off())
    }

    pub fn unpaid(&self) -> impl Iterator<Item = &Debt> {
        self.debts.iter().filter(|d| !d.is_paid_off())
    }

    /// Sum of the original minimums of debts already paid off.
    pub fn amount_paid(&self) -> Money {
        self.paid().map(Debt::original_minimum).sum::<Decimal>()
    }

    /// Copy of the portfolio with every debt using `multiplier` for its
    /// forced minimum.
    pub fn with_multiplier(&self, multiplier: Decimal) -> DebtPlannerResult<Self> {
        let debts = self
            .debts
            .iter()
            .map(|d| d.with_multiplier(multiplier))
            .collect::<DebtPlannerResult<Vec<_>>>()?;
        Ok(Self { debts })
    }

    /// Snowball plan starting at `start`. The portfolio itself is not touched.
    pub fn plan(&self, start: NaiveDate) -> DebtPlannerResult<PortfolioPlan> {
        SnowballAllocator::new(start).plan(&self.debts)
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a Debt;
    type IntoIter = std::slice::Iter<'a, Debt>;

    fn into_iter(self) -> Self::IntoIter {
        self.debts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn debt(name: &str, balance: Decimal, rate: Decimal, minimum: Decimal) -> Debt {
        Debt::new(name, balance, rate, minimum, as_of()).unwrap()
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut portfolio = Portfolio::new();
        portfolio.add(debt("A", dec!(1000), dec!(5), dec!(50))).unwrap();
        let err = portfolio.add(debt("A", dec!(2000), dec!(5), dec!(50))).unwrap_err();
        assert!(matches!(err, DebtPlannerError::DuplicateDebt(ref n) if n == "A"));

        let err = Portfolio::from_debts(vec![
            debt("B", dec!(1000), dec!(5), dec!(50)),
            debt("B", dec!(1000), dec!(5), dec!(50)),
        ])
        .unwrap_err();
        assert!(matches!(err, DebtPlannerError::DuplicateDebt(_)));
    }

    #[test]
    fn test_paid_and_unpaid_views() {
        let portfolio = Portfolio::from_debts(vec![
            debt("A", dec!(1000), dec!(5), dec!(50)),
            debt("H", dec!(0), dec!(50.3), dec!(250)),
            debt("I", dec!(0), dec!(12), dec!(100)),
        ])
        .unwrap();

        assert_eq!(portfolio.paid().count(), 2);
        assert_eq!(portfolio.unpaid().count(), 1);
        assert_eq!(portfolio.amount_paid(), dec!(350));
        assert_eq!(portfolio.get("H").unwrap().original_minimum(), dec!(250));
        assert!(portfolio.get("Z").is_none());
    }

    #[test]
    fn test_with_multiplier_applies_to_every_debt() {
        let portfolio = Portfolio::from_debts(vec![
            debt("A", dec!(1000), dec!(5), dec!(50)),
            debt("B", dec!(2000), dec!(7), dec!(60)),
        ])
        .unwrap();
        let scaled = portfolio.with_multiplier(dec!(2)).unwrap();
        assert!(scaled.iter().all(|d| d.min_payment_multiplier() == dec!(2)));
        assert!(portfolio.iter().all(|d| d.min_payment_multiplier() == dec!(1.5)));
    }
}
