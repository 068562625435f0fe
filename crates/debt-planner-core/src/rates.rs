//! Date-keyed annual rate calendar for a single debt.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DebtPlannerError;
use crate::types::Rate;
use crate::DebtPlannerResult;

/// Ordered record of annual percentage rate changes.
///
/// The rate in force on any date is the entry with the greatest effective
/// date at or before it. Entries are only ever added; re-setting a date
/// overwrites the previous value for that date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCalendar {
    entries: BTreeMap<NaiveDate, Rate>,
}

impl RateCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar with a single baseline entry.
    pub fn with_baseline(rate: Rate, effective: NaiveDate) -> Self {
        let mut calendar = Self::new();
        calendar.set_rate(rate, effective);
        calendar
    }

    /// Insert or overwrite the rate effective from `effective`.
    pub fn set_rate(&mut self, rate: Rate, effective: NaiveDate) {
        self.entries.insert(effective, rate);
    }

    /// Rate in force on `date`.
    pub fn get_rate(&self, date: NaiveDate) -> DebtPlannerResult<Rate> {
        self.entries
            .range(..=date)
            .next_back()
            .map(|(_, rate)| *rate)
            .ok_or(DebtPlannerError::NoApplicableRate { date })
    }

    pub fn earliest(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, Rate)> + '_ {
        self.entries.iter().map(|(d, r)| (*d, *r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_lookup_uses_latest_entry_not_after_date() {
        let mut cal = RateCalendar::with_baseline(dec!(3.25), d(2021, 1, 1));
        cal.set_rate(dec!(4.5), d(2021, 3, 15));
        cal.set_rate(dec!(12), d(2021, 4, 15));

        assert_eq!(cal.get_rate(d(2021, 1, 1)).unwrap(), dec!(3.25));
        assert_eq!(cal.get_rate(d(2021, 3, 14)).unwrap(), dec!(3.25));
        assert_eq!(cal.get_rate(d(2021, 3, 15)).unwrap(), dec!(4.5));
        assert_eq!(cal.get_rate(d(2021, 4, 14)).unwrap(), dec!(4.5));
        assert_eq!(cal.get_rate(d(2030, 1, 1)).unwrap(), dec!(12));
    }

    #[test]
    fn test_lookup_before_first_entry_fails() {
        let cal = RateCalendar::with_baseline(dec!(5), d(2022, 6, 1));
        let err = cal.get_rate(d(2022, 5, 31)).unwrap_err();
        assert!(matches!(err, DebtPlannerError::NoApplicableRate { date } if date == d(2022, 5, 31)));
    }

    #[test]
    fn test_empty_calendar_has_no_rate() {
        let cal = RateCalendar::new();
        assert!(cal.is_empty());
        assert!(cal.get_rate(d(2020, 1, 1)).is_err());
        assert_eq!(cal.earliest(), None);
    }

    #[test]
    fn test_set_rate_overwrites_same_date() {
        let mut cal = RateCalendar::with_baseline(dec!(5), d(2022, 1, 1));
        cal.set_rate(dec!(7.5), d(2022, 1, 1));
        assert_eq!(cal.len(), 1);
        assert_eq!(cal.get_rate(d(2022, 2, 1)).unwrap(), dec!(7.5));
    }

    #[test]
    fn test_entries_are_ordered_by_date() {
        let mut cal = RateCalendar::new();
        cal.set_rate(dec!(9), d(2024, 1, 1));
        cal.set_rate(dec!(1), d(2020, 1, 1));
        cal.set_rate(dec!(4), d(2022, 1, 1));
        let dates: Vec<NaiveDate> = cal.entries().map(|(date, _)| date).collect();
        assert_eq!(dates, vec![d(2020, 1, 1), d(2022, 1, 1), d(2024, 1, 1)]);
        assert_eq!(cal.earliest(), Some(d(2020, 1, 1)));
    }
}
