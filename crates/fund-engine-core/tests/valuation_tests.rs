use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fund_engine_core::records::Investment;
use fund_engine_core::valuation::portfolio::{
    adjust_aum_for_transactions, approximate_portfolio_irr, portfolio_multiple, total_aum,
    weighted_average_irr,
};
use fund_engine_core::valuation::projector::value_at_date;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn investment(
    id: &str,
    principal: Decimal,
    irr: Decimal,
    acquired: NaiveDate,
) -> Investment {
    Investment {
        id: id.into(),
        name: id.into(),
        total_invested: principal,
        current_value: principal,
        irr,
        multiple: dec!(1),
        acquisition_date: acquired,
        last_valuation_date: acquired,
    }
}

// ===========================================================================
// Projector
// ===========================================================================

#[test]
fn test_projection_idempotent_at_acquisition() {
    let cases = [
        investment("a", dec!(1000000), dec!(15), d(2021, 3, 1)),
        investment("b", dec!(250000), dec!(-8), d(2019, 11, 15)),
        investment("c", dec!(42), dec!(0), d(2024, 1, 1)),
    ];
    for inv in &cases {
        assert_eq!(
            value_at_date(inv, inv.acquisition_date),
            inv.total_invested,
            "zero elapsed time must mean no growth for {}",
            inv.id
        );
    }
}

#[test]
fn test_projection_compounds_forward() {
    let inv = investment("a", dec!(1000000), dec!(12), d(2020, 1, 1));
    let one_year = value_at_date(&inv, d(2021, 1, 1));
    let two_years = value_at_date(&inv, d(2022, 1, 1));
    assert!(one_year > dec!(1000000));
    // second year compounds on the first
    assert!(two_years > one_year + dec!(110000));
}

#[test]
fn test_projection_depreciates_with_negative_irr() {
    let inv = investment("a", dec!(1000000), dec!(-15), d(2020, 1, 1));
    let value = value_at_date(&inv, d(2023, 1, 1));
    assert!(value < dec!(650000), "three 15% down years, got {}", value);
    assert!(value > Decimal::ZERO);
}

// ===========================================================================
// Portfolio aggregates
// ===========================================================================

#[test]
fn test_aum_is_sum_of_projected_values() {
    let holdings = vec![
        investment("a", dec!(1000000), dec!(10), d(2020, 1, 1)),
        investment("b", dec!(2000000), dec!(10), d(2020, 1, 1)),
    ];
    let as_of = d(2022, 1, 1);
    let total = total_aum(&holdings, as_of);
    assert_eq!(
        total,
        value_at_date(&holdings[0], as_of) + value_at_date(&holdings[1], as_of)
    );
}

#[test]
fn test_weighted_average_irr_between_extremes() {
    let holdings = vec![
        investment("a", dec!(1000000), dec!(5), d(2021, 1, 1)),
        investment("b", dec!(1000000), dec!(25), d(2021, 1, 1)),
    ];
    let avg = weighted_average_irr(&holdings, d(2023, 1, 1));
    assert!(avg > dec!(5) && avg < dec!(25));
    // the 25% holding compounds faster and carries more weight
    assert!(avg > dec!(15.0));
}

#[test]
fn test_portfolio_multiple_empty_is_zero() {
    assert_eq!(portfolio_multiple(&[], d(2024, 1, 1)), Decimal::ZERO);
    assert_eq!(approximate_portfolio_irr(&[], d(2024, 1, 1)), Decimal::ZERO);
}

#[test]
fn test_approximate_irr_tracks_uniform_portfolio() {
    // every holding at 12% for three years: the approximation should
    // land near 12%
    let holdings = vec![
        investment("a", dec!(1000000), dec!(12), d(2020, 1, 1)),
        investment("b", dec!(3000000), dec!(12), d(2020, 1, 1)),
    ];
    let irr = approximate_portfolio_irr(&holdings, d(2023, 1, 1));
    assert!((irr - dec!(12.0)).abs() < dec!(0.5), "got {}", irr);
}

#[test]
fn test_aum_adjustment_excludes_calls() {
    assert_eq!(
        adjust_aum_for_transactions(dec!(1000000), dec!(50000), dec!(100000)),
        dec!(900000)
    );
    // no transactions, no change
    assert_eq!(
        adjust_aum_for_transactions(dec!(1000000), dec!(0), dec!(0)),
        dec!(1000000)
    );
}
