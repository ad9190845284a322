//! Dated-cash-flow present value and IRR.
//!
//! One Newton-Raphson solver serves every caller. Fund cash flows are
//! sparse and well-behaved, so the solver favors a bounded,
//! always-terminating loop over guaranteed global convergence: it stops
//! at 100 iterations, treats a vanishing derivative as "keep the last
//! estimate", and clamps the working rate to [-0.99, 10.0] so a wild
//! step can never drive the discount base negative.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{CashFlow, Money, Percent, Rate, Years};

/// Day-count convention for year fractions.
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

const NPV_TOLERANCE: Decimal = dec!(0.0001);
const DERIVATIVE_FLOOR: Decimal = dec!(0.0000000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const INITIAL_GUESS: Rate = dec!(0.10);
const MIN_RATE: Rate = dec!(-0.99);
const MAX_RATE: Rate = dec!(10.0);

/// Fraction of a year between two dates, 365.25-day convention.
/// Negative when `to` precedes `from`.
pub fn year_fraction(from: NaiveDate, to: NaiveDate) -> Years {
    Decimal::from((to - from).num_days()) / DAYS_PER_YEAR
}

/// Net Present Value of a dated cash-flow series at a decimal rate,
/// discounting from the first flow's date.
pub fn npv(rate: Rate, flows: &[CashFlow]) -> Money {
    if flows.is_empty() {
        return Decimal::ZERO;
    }
    let base_date = flows[0].date;
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut result = Decimal::ZERO;
    for cf in flows {
        let years = year_fraction(base_date, cf.date);
        let discount = one_plus_r.powd(years);
        if discount.is_zero() {
            continue;
        }
        result += cf.amount / discount;
    }
    result
}

/// Internal Rate of Return of a dated cash-flow series, as a percentage.
///
/// Flows are assumed date-sorted (see `CashFlowSeries::from_records`).
/// Fewer than two flows, or flows all on one date, carry no rate signal
/// and return 0. Non-convergence returns the last estimate; callers may
/// treat a result pinned at the clamp bounds as a signal to flag the
/// series for manual review.
pub fn irr(flows: &[CashFlow]) -> Percent {
    if flows.len() < 2 {
        return Decimal::ZERO;
    }
    let base_date = flows[0].date;
    if flows.iter().all(|cf| cf.date == base_date) {
        return Decimal::ZERO;
    }

    let mut rate = INITIAL_GUESS;

    for _ in 0..MAX_IRR_ITERATIONS {
        let one_plus_r = Decimal::ONE + rate;
        let mut npv_val = Decimal::ZERO;
        let mut dnpv = Decimal::ZERO;

        for cf in flows {
            let years = year_fraction(base_date, cf.date);
            let discount = one_plus_r.powd(years);
            if discount.is_zero() {
                continue;
            }
            npv_val += cf.amount / discount;
            dnpv -= years * cf.amount / (one_plus_r * discount);
        }

        if npv_val.abs() < NPV_TOLERANCE {
            break;
        }
        if dnpv.abs() < DERIVATIVE_FLOOR {
            // Flat NPV surface; the last estimate is the answer.
            break;
        }

        rate -= npv_val / dnpv;

        if rate < MIN_RATE {
            rate = MIN_RATE;
        } else if rate > MAX_RATE {
            rate = MAX_RATE;
        }
    }

    rate * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn flow(date: NaiveDate, amount: Money) -> CashFlow {
        CashFlow {
            date,
            amount,
            label: None,
        }
    }

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1000)),
            flow(d(2021, 1, 1), dec!(400)),
            flow(d(2022, 1, 1), dec!(700)),
        ];
        assert_eq!(npv(dec!(0), &flows), dec!(100));
    }

    #[test]
    fn test_npv_discounts_later_flows() {
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1000)),
            flow(d(2021, 1, 1), dec!(1100)),
        ];
        let result = npv(dec!(0.10), &flows);
        // 1100 discounted a year at 10% is ~1000.2 (366 days / 365.25)
        assert!((result - dec!(0)).abs() < dec!(1));
    }

    #[test]
    fn test_npv_empty() {
        assert_eq!(npv(dec!(0.10), &[]), Decimal::ZERO);
    }

    #[test]
    fn test_irr_fifteen_percent_over_two_years() {
        // 100,000 growing to 132,250 over two years is 15% annually
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-100000)),
            flow(d(2022, 1, 1), dec!(132250)),
        ];
        let rate = irr(&flows);
        assert!(
            (rate - dec!(15.0)).abs() < dec!(0.5),
            "Expected ~15.0, got {}",
            rate
        );
    }

    #[test]
    fn test_irr_single_flow_is_zero() {
        let flows = vec![flow(d(2020, 1, 1), dec!(-1000))];
        assert_eq!(irr(&flows), Decimal::ZERO);
    }

    #[test]
    fn test_irr_same_day_flows_is_zero() {
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1000)),
            flow(d(2020, 1, 1), dec!(1200)),
        ];
        assert_eq!(irr(&flows), Decimal::ZERO);
    }

    #[test]
    fn test_irr_negative_return() {
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1000)),
            flow(d(2022, 1, 1), dec!(640)),
        ];
        let rate = irr(&flows);
        assert!(
            rate < dec!(-15) && rate > dec!(-30),
            "Expected ~-20%, got {}",
            rate
        );
    }

    #[test]
    fn test_irr_multi_flow_series() {
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1000)),
            flow(d(2021, 1, 1), dec!(400)),
            flow(d(2022, 1, 1), dec!(400)),
            flow(d(2023, 1, 1), dec!(400)),
        ];
        let rate = irr(&flows);
        assert!(
            (rate - dec!(9.7)).abs() < dec!(1.0),
            "Expected ~9.7, got {}",
            rate
        );
    }

    #[test]
    fn test_irr_stays_within_clamp_bounds() {
        // An absurd gain pushes Newton steps hard upward; the clamp caps
        // the working rate at 1000%.
        let flows = vec![
            flow(d(2020, 1, 1), dec!(-1)),
            flow(d(2020, 3, 1), dec!(1000000)),
        ];
        let rate = irr(&flows);
        assert!(rate <= dec!(1000.0));
        assert!(rate >= dec!(-99.0));
    }

    #[test]
    fn test_year_fraction_whole_year() {
        let yf = year_fraction(d(2020, 1, 1), d(2021, 1, 1));
        assert!((yf - dec!(1)).abs() < dec!(0.01));
    }

    #[test]
    fn test_year_fraction_negative_when_reversed() {
        let yf = year_fraction(d(2021, 1, 1), d(2020, 1, 1));
        assert!(yf < Decimal::ZERO);
    }
}
