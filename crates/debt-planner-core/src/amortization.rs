//! Per-period ledger entries and the schedules they form.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// One monthly period of a debt's amortization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationLineItem {
    /// 1-based payment number.
    pub period: u32,
    pub date: NaiveDate,
    /// Annual percentage rate in force for the period.
    pub rate: Rate,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    /// Portion of the payment that reduced principal.
    pub applied_payment: Money,
    pub closing_balance: Money,
}

impl fmt::Display for AmortizationLineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {:>6}% | {:>12} | {:>10} | {:>12} | {:>14}",
            self.date,
            self.rate.round_dp(2),
            currency(self.payment),
            currency(self.interest),
            currency(self.applied_payment),
            currency(self.closing_balance),
        )
    }
}

/// Ordered amortization of one debt, oldest period first.
///
/// Produced once by a simulation run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmortizationSchedule {
    items: Vec<AmortizationLineItem>,
}

impl AmortizationSchedule {
    pub(crate) fn from_items(items: Vec<AmortizationLineItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[AmortizationLineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AmortizationLineItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AmortizationLineItem> {
        self.items.get(index)
    }

    /// Payment made in period `index` (0-based); zero once the debt is retired.
    pub fn payment_at(&self, index: usize) -> Money {
        self.items
            .get(index)
            .map(|item| item.payment)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn payments(&self) -> Vec<Money> {
        self.items.iter().map(|item| item.payment).collect()
    }

    pub fn total_paid(&self) -> Money {
        self.items.iter().map(|item| item.payment).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.items.iter().map(|item| item.interest).sum()
    }

    pub fn max_payment(&self) -> Money {
        self.items
            .iter()
            .map(|item| item.payment)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn final_date(&self) -> Option<NaiveDate> {
        self.items.last().map(|item| item.date)
    }

    pub fn final_balance(&self) -> Money {
        self.items
            .last()
            .map(|item| item.closing_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationLineItem;
    type IntoIter = std::slice::Iter<'a, AmortizationLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for AmortizationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "Payment {:>3}: {}", item.period, item)?;
        }
        Ok(())
    }
}

/// `$1,234.56` style rendering used by the text views.
pub fn currency(amount: Money) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}
