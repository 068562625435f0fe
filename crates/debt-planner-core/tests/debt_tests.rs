use chrono::NaiveDate;
use debt_planner_core::{Debt, DebtOptions, DebtPlannerError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ---------------------------------------------------------------------------
// Rate calendar
// ---------------------------------------------------------------------------

fn calendar_debt() -> Debt {
    let mut debt = Debt::new("Test", dec!(12345), dec!(0), dec!(100), d(2021, 1, 1)).unwrap();
    assert_eq!(debt.rate(d(2021, 1, 1)).unwrap(), Decimal::ZERO);

    debt.set_rate(dec!(3.25), None).unwrap();
    debt.set_rate(dec!(4.5), Some(d(2021, 3, 15))).unwrap();
    debt.set_rate(dec!(12), Some(d(2021, 4, 15))).unwrap();
    debt.set_rate(dec!(0), Some(d(2022, 12, 30))).unwrap();
    debt
}

#[test]
fn test_calendar_interest_rate_lookups() {
    let debt = calendar_debt();
    let expected = [
        (d(2021, 1, 1), dec!(3.25)),
        (d(2021, 3, 14), dec!(3.25)),
        (d(2021, 3, 15), dec!(4.5)),
        (d(2021, 4, 15), dec!(12)),
        (d(2021, 5, 15), dec!(12)),
        (d(2021, 6, 15), dec!(12)),
        (d(2021, 7, 15), dec!(12)),
        (d(2021, 12, 30), dec!(12)),
        (d(2022, 12, 30), dec!(0)),
        (d(2023, 1, 2), dec!(0)),
    ];
    for (date, rate) in expected {
        assert_eq!(debt.rate(date).unwrap(), rate, "rate on {date}");
    }
}

#[test]
fn test_rate_before_calendar_fails() {
    let debt = calendar_debt();
    let err = debt.rate(d(2020, 12, 31)).unwrap_err();
    assert!(matches!(err, DebtPlannerError::NoApplicableRate { .. }));
}

#[test]
fn test_schedule_follows_rate_changes() {
    let debt = calendar_debt();
    let schedule = debt.amortize(d(2021, 1, 1), None).unwrap();

    let rates: Vec<Decimal> = schedule.iter().take(5).map(|i| i.rate).collect();
    assert_eq!(rates, vec![dec!(3.25), dec!(3.25), dec!(3.25), dec!(4.5), dec!(12)]);

    // at 12% the forced minimum replaces the stated 100
    let may = schedule.get(4).unwrap();
    assert!(may.payment > dec!(100));
    assert!(may.applied_payment > Decimal::ZERO);

    for item in schedule.iter().filter(|i| i.date >= d(2023, 1, 1)) {
        assert_eq!(item.interest, Decimal::ZERO);
    }
    assert_eq!(schedule.final_balance(), Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Minimum payment policy
// ---------------------------------------------------------------------------

#[test]
fn test_minimum_too_low_without_forcing() {
    let result = Debt::with_options(
        "tooLow",
        dec!(100000),
        dec!(20),
        dec!(1),
        d(2024, 1, 1),
        DebtOptions {
            force_min_payment: false,
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(DebtPlannerError::InvalidPayment { .. })));
}

#[test]
fn test_minimum_too_low_is_forced_up() {
    let debt = Debt::new("tooLow", dec!(100000), dec!(20), dec!(1), d(2024, 1, 1)).unwrap();
    assert!(debt.minimum(d(2024, 1, 1)).unwrap() > dec!(1));
    assert!(debt.amortize(d(2024, 1, 1), Some(24)).is_ok());
}

#[test]
fn test_payoff_estimates() {
    let as_of = d(2024, 1, 1);
    let debt = Debt::new("A", dec!(10000), dec!(5.25), dec!(400), as_of).unwrap();
    assert_eq!(debt.payoff_months(as_of).unwrap(), 29);
    assert_eq!(debt.payoff_days(as_of).unwrap(), 337);

    let paid = Debt::new("H", dec!(0), dec!(50.3), dec!(250), as_of).unwrap();
    assert_eq!(paid.payoff_months(as_of).unwrap(), 0);
    assert_eq!(paid.payoff_days(as_of).unwrap(), 0);
    assert_eq!(paid.current_payment(as_of).unwrap(), Decimal::ZERO);
}

#[test]
fn test_minimum_percent_rounds_to_five_places() {
    let as_of = d(2024, 1, 1);
    let debt = Debt::new("AB", dec!(12345.67), dec!(1), dec!(240), as_of).unwrap();
    assert_eq!(debt.minimum_percent(as_of).unwrap(), dec!(0.01944));
    assert_eq!(debt.average_monthly_interest(as_of).unwrap(), dec!(10.29));
    assert_eq!(debt.payoff_months(as_of).unwrap(), 54);
    assert_eq!(debt.payoff_days(as_of).unwrap(), 645);
}

#[test]
fn test_setting_additional_payment_shortens_schedule() {
    let as_of = d(2024, 1, 1);
    let mut debt = Debt::new("A", dec!(10000), dec!(5.25), dec!(400), as_of).unwrap();
    let before = debt.amortize(as_of, None).unwrap().len();
    debt.set_additional_payment(dec!(100)).unwrap();
    let after = debt.amortize(as_of, None).unwrap();
    assert!(after.len() < before);
    assert_eq!(after.payment_at(0), dec!(500));

    assert!(matches!(
        debt.set_additional_payment(dec!(-5)),
        Err(DebtPlannerError::InvalidInput { .. })
    ));
}
