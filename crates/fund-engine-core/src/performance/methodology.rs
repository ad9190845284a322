//! Granular and Gross-Up performance methodologies.
//!
//! Two mutually exclusive ways to attribute management fees when
//! computing gross vs net performance, selected per fund:
//!
//! 1. **Granular** -- requires every capital call itemized into
//!    investment-purpose and fee-purpose amounts. Gross figures are
//!    measured against investment capital only; net figures fold the fee
//!    calls into the denominator.
//! 2. **Gross-Up** -- used when calls are not itemized, and always for
//!    portfolio-level calculations. Lifetime management fees are
//!    estimated as `estimated AUM x fee percent x fund age` and added to
//!    called capital to form the gross denominator; net figures use raw
//!    called capital.
//!
//! Selecting Granular for a fund whose calls lack the itemized split
//! fails fast with `MethodologyMismatch`. It never silently falls back
//! to Gross-Up.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FundEngineError;
use crate::records::CapitalCall;
use crate::types::{Money, Multiple, Percent, Years};
use crate::FundEngineResult;

/// Fee-attribution methodology for a fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Methodology {
    Granular,
    GrossUp,
}

impl std::fmt::Display for Methodology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Methodology::Granular => write!(f, "Granular"),
            Methodology::GrossUp => write!(f, "Gross-Up"),
        }
    }
}

/// Input for the Granular methodology: itemized call totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranularInput {
    /// Sum of investment-purpose call amounts.
    pub investment_calls: Money,
    /// Sum of fee-purpose call amounts.
    pub fee_calls: Money,
    pub total_distributions: Money,
    pub current_nav: Money,
}

/// Input for the Gross-Up methodology: unitemized call totals plus fee
/// assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrossUpInput {
    pub total_calls: Money,
    pub total_distributions: Money,
    pub current_nav: Money,
    /// Annual management fee as a percentage (2.0 = 2%).
    pub fee_percent: Percent,
    pub fund_age_years: Years,
    /// Average AUM over the fund's life; defaults to current NAV.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aum: Option<Money>,
}

/// The denominators and components actually used, for audit display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyBreakdown {
    pub methodology: Methodology,
    /// Denominator behind the gross figures.
    pub gross_invested_capital: Money,
    /// Denominator behind the net figures.
    pub net_invested_capital: Money,
    /// Itemized fee calls (Granular) or estimated lifetime fees (Gross-Up).
    pub fee_capital: Money,
    pub total_distributions: Money,
    pub current_nav: Money,
}

/// Gross and net performance under one methodology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyResult {
    pub gross_gain: Money,
    pub gross_performance_percent: Percent,
    pub gross_multiple: Multiple,
    pub net_gain: Money,
    pub net_performance_percent: Percent,
    pub net_multiple: Multiple,
    pub breakdown: MethodologyBreakdown,
}

/// Granular performance: gross against investment capital only, net
/// against investment plus fee capital.
pub fn granular_performance(input: &GranularInput) -> FundEngineResult<MethodologyResult> {
    if input.investment_calls < Decimal::ZERO || input.fee_calls < Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "investment_calls/fee_calls".into(),
            reason: "Itemized call amounts cannot be negative".into(),
        });
    }

    let total_value = input.total_distributions + input.current_nav;
    let gross_invested = input.investment_calls;
    let net_invested = input.investment_calls + input.fee_calls;

    Ok(build_result(
        Methodology::Granular,
        gross_invested,
        net_invested,
        input.fee_calls,
        input.total_distributions,
        input.current_nav,
        total_value,
    ))
}

/// Gross-Up performance: estimated lifetime fees inflate the gross
/// denominator, net uses raw called capital.
pub fn gross_up_performance(input: &GrossUpInput) -> FundEngineResult<MethodologyResult> {
    if input.total_calls < Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "total_calls".into(),
            reason: "Called capital cannot be negative".into(),
        });
    }
    if input.fee_percent < Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "fee_percent".into(),
            reason: "Fee percent cannot be negative".into(),
        });
    }
    if input.fund_age_years < Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "fund_age_years".into(),
            reason: "Fund age cannot be negative".into(),
        });
    }

    let estimated_aum = input.average_aum.unwrap_or(input.current_nav);
    let estimated_fees = estimated_aum * input.fee_percent / dec!(100) * input.fund_age_years;

    let total_value = input.total_distributions + input.current_nav;
    let gross_invested = input.total_calls + estimated_fees;
    let net_invested = input.total_calls;

    Ok(build_result(
        Methodology::GrossUp,
        gross_invested,
        net_invested,
        estimated_fees,
        input.total_distributions,
        input.current_nav,
        total_value,
    ))
}

/// Aggregate itemized capital calls into a `GranularInput`, failing fast
/// when any call lacks the investment/fee split.
pub fn granular_input_from_calls(
    calls: &[CapitalCall],
    total_distributions: Money,
    current_nav: Money,
) -> FundEngineResult<GranularInput> {
    let mut investment_calls = Decimal::ZERO;
    let mut fee_calls = Decimal::ZERO;

    for call in calls {
        match (call.investment_amount, call.fee_amount) {
            (Some(investment), Some(fee)) => {
                investment_calls += investment;
                fee_calls += fee;
            }
            _ => {
                return Err(FundEngineError::MethodologyMismatch(format!(
                    "capital call {} of fund {} is not itemized into investment and fee amounts",
                    call.call_number, call.fund_id
                )));
            }
        }
    }

    Ok(GranularInput {
        investment_calls,
        fee_calls,
        total_distributions,
        current_nav,
    })
}

fn build_result(
    methodology: Methodology,
    gross_invested: Money,
    net_invested: Money,
    fee_capital: Money,
    total_distributions: Money,
    current_nav: Money,
    total_value: Money,
) -> MethodologyResult {
    let gross_gain = total_value - gross_invested;
    let net_gain = total_value - net_invested;

    MethodologyResult {
        gross_gain,
        gross_performance_percent: performance_percent(gross_gain, gross_invested),
        gross_multiple: value_multiple(total_value, gross_invested),
        net_gain,
        net_performance_percent: performance_percent(net_gain, net_invested),
        net_multiple: value_multiple(total_value, net_invested),
        breakdown: MethodologyBreakdown {
            methodology,
            gross_invested_capital: gross_invested,
            net_invested_capital: net_invested,
            fee_capital,
            total_distributions,
            current_nav,
        },
    }
}

fn performance_percent(gain: Money, invested: Money) -> Percent {
    if invested.is_zero() {
        Decimal::ZERO
    } else {
        (gain / invested * dec!(100)).round_dp(2)
    }
}

fn value_multiple(total_value: Money, invested: Money) -> Multiple {
    if invested.is_zero() {
        Decimal::ZERO
    } else {
        (total_value / invested).round_dp(2)
    }
}
