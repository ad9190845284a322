//! Portfolio-level aggregates built on the valuation projector.
//!
//! AUM, value-weighted average IRR, portfolio multiple and the
//! approximate portfolio IRR at an arbitrary report date. The
//! approximate IRR is derived from the multiple and the value-weighted
//! holding period; it is not the dated-cash-flow IRR and the two can
//! legitimately differ.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::records::Investment;
use crate::time_value::year_fraction;
use crate::types::{Money, Multiple, Percent};
use crate::valuation::projector::value_at_date;

/// Total projected value of the holdings at a date.
pub fn total_aum(investments: &[Investment], as_of: NaiveDate) -> Money {
    investments
        .iter()
        .map(|inv| value_at_date(inv, as_of))
        .sum()
}

/// Value-weighted average of the stated IRRs, percent, 1 decimal.
/// Zero when the holdings carry no projected value.
pub fn weighted_average_irr(investments: &[Investment], as_of: NaiveDate) -> Percent {
    let mut weighted = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    for inv in investments {
        let value = value_at_date(inv, as_of);
        weighted += inv.irr * value;
        total_value += value;
    }

    if total_value.is_zero() {
        Decimal::ZERO
    } else {
        (weighted / total_value).round_dp(1)
    }
}

/// Projected value over invested principal, 2 decimals. Zero on a zero
/// denominator.
pub fn portfolio_multiple(investments: &[Investment], as_of: NaiveDate) -> Multiple {
    raw_portfolio_multiple(investments, as_of).round_dp(2)
}

/// Approximate portfolio IRR: `multiple^(1/weighted_avg_years) - 1`,
/// percent, 1 decimal. The holding period is value-weighted. Zero when
/// the portfolio is empty, worthless, or has no elapsed holding period.
pub fn approximate_portfolio_irr(investments: &[Investment], as_of: NaiveDate) -> Percent {
    let multiple = raw_portfolio_multiple(investments, as_of);
    if multiple <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut weighted_years = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    for inv in investments {
        let value = value_at_date(inv, as_of);
        weighted_years += year_fraction(inv.acquisition_date, as_of) * value;
        total_value += value;
    }
    if total_value.is_zero() {
        return Decimal::ZERO;
    }

    let avg_years = weighted_years / total_value;
    if avg_years <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let rate = multiple.powd(Decimal::ONE / avg_years) - Decimal::ONE;
    (rate * dec!(100)).round_dp(1)
}

/// Adjust a base AUM figure for period transactions. Distributions
/// reduce AUM; capital calls are not added back, because deployed call
/// proceeds are already reflected inside the revalued investments and
/// adding them would double-count.
pub fn adjust_aum_for_transactions(
    base_aum: Money,
    _capital_calls: Money,
    distributions: Money,
) -> Money {
    base_aum - distributions
}

fn raw_portfolio_multiple(investments: &[Investment], as_of: NaiveDate) -> Multiple {
    let total_invested: Money = investments.iter().map(|inv| inv.total_invested).sum();
    if total_invested.is_zero() {
        return Decimal::ZERO;
    }
    let total_value = total_aum(investments, as_of);
    total_value / total_invested
}
