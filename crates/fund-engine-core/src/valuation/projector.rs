//! Point-in-time investment valuation.
//!
//! Projects an investment's principal forward to a target date by
//! compounding its stated IRR over the elapsed year fraction. This is
//! how report-date AUM is derived without re-running the cash-flow IRR
//! solver per investment; it is an approximation, and deliberately so.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::records::Investment;
use crate::time_value::year_fraction;
use crate::types::Money;

/// Project an investment's value at a target date:
/// `principal x (1 + irr/100)^years`, fractional years and negative IRR
/// (depreciation) allowed. Rounded to whole currency units at the
/// boundary. A stated IRR at or below -100% projects to zero.
pub fn value_at_date(investment: &Investment, target: NaiveDate) -> Money {
    let base = Decimal::ONE + investment.irr / dec!(100);
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let years = year_fraction(investment.acquisition_date, target);
    (investment.total_invested * base.powd(years)).round_dp(0)
}
