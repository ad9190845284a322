//! Fund-level performance assembly.
//!
//! The report operation: pulls the fund's call, distribution and
//! investment records from the injected data source, rebuilds the dated
//! cash-flow series, and produces the full `PerformanceMetrics` record
//! with IRR, multiples and gross/net methodology figures. Totals are
//! recomputed from the transaction records on every request; cached
//! ownership fields are never trusted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use chrono::NaiveDate;

use crate::datasource::FundDataSource;
use crate::performance::methodology::{
    granular_input_from_calls, granular_performance, gross_up_performance, GrossUpInput,
    Methodology, MethodologyResult,
};
use crate::performance::multiples::calculate_multiples;
use crate::records::{CapitalCall, CapitalCallStatus, Distribution, Investment, PerformanceMetrics};
use crate::time_value;
use crate::types::{with_metadata, CashFlowSeries, ComputationOutput, Money, Percent};
use crate::FundEngineResult;

/// Parameters for a fund performance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundPerformanceInput {
    pub fund_id: String,
    pub as_of: NaiveDate,
    pub methodology: Methodology,
    /// Annual management fee assumption for Gross-Up (2.0 = 2%).
    pub fee_percent: Percent,
    /// Average AUM refinement for the Gross-Up fee estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aum: Option<Money>,
}

/// Compute a fund's headline performance as of a report date.
pub fn calculate_fund_performance(
    input: &FundPerformanceInput,
    source: &impl FundDataSource,
) -> FundEngineResult<ComputationOutput<PerformanceMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let calls: Vec<CapitalCall> = source
        .capital_calls(&input.fund_id)
        .into_iter()
        .filter(|c| c.call_date <= input.as_of && c.status != CapitalCallStatus::Cancelled)
        .collect();
    let distributions: Vec<Distribution> = source
        .distributions(&input.fund_id)
        .into_iter()
        .filter(|d| d.distribution_date <= input.as_of)
        .collect();
    let investments: Vec<Investment> = source
        .investments(&input.fund_id)
        .into_iter()
        .filter(|i| i.acquisition_date <= input.as_of)
        .collect();

    let total_capital_called: Money = calls.iter().map(|c| c.total_call_amount).sum();
    let total_distributed: Money = distributions
        .iter()
        .map(|d| d.total_distribution_amount)
        .sum();
    let total_invested: Money = investments.iter().map(|i| i.total_invested).sum();
    let current_nav: Money = investments.iter().map(|i| i.current_value).sum();

    // Paid-in capital drives the multiples. Funds whose history predates
    // the call records fall back to deployed principal.
    let paid_in = if total_capital_called.is_zero() {
        total_invested
    } else {
        total_capital_called
    };
    if paid_in.is_zero() {
        warnings.push(format!(
            "No paid-in capital as of {}; multiples default to 0",
            input.as_of
        ));
    }

    let irr = fund_irr(&calls, &distributions, current_nav, input.as_of);
    if irr >= dec!(999.9) || irr <= dec!(-98.9) {
        warnings.push(format!(
            "IRR estimate {irr} is pinned at a solver bound; review the cash-flow history"
        ));
    }

    let multiples = calculate_multiples(paid_in, total_distributed, current_nav);

    let methodology_result = run_methodology(
        input,
        &calls,
        &investments,
        total_capital_called,
        total_distributed,
        current_nav,
    )?;

    let metrics = PerformanceMetrics {
        irr,
        tvpi: multiples.tvpi,
        dpi: multiples.dpi,
        rvpi: multiples.rvpi,
        moic: multiples.moic,
        gross_performance_percent: methodology_result.gross_performance_percent,
        gross_multiple: methodology_result.gross_multiple,
        net_performance_percent: methodology_result.net_performance_percent,
        net_multiple: methodology_result.net_multiple,
        total_capital_called,
        total_distributed,
        total_invested,
        current_nav,
        total_value: total_distributed + current_nav,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Fund performance ({})", input.methodology),
        &serde_json::json!({
            "fund_id": input.fund_id,
            "as_of": input.as_of,
            "methodology": input.methodology.to_string(),
            "fee_percent": input.fee_percent.to_string(),
        }),
        warnings,
        elapsed,
        metrics,
    ))
}

/// Dated-cash-flow IRR of the fund: calls out, distributions in,
/// residual NAV in at the report date. Percent, rounded to 2 decimals.
pub fn fund_irr(
    calls: &[CapitalCall],
    distributions: &[Distribution],
    current_nav: Money,
    as_of: NaiveDate,
) -> Percent {
    let mut records: Vec<(NaiveDate, Money)> = Vec::new();
    for call in calls {
        records.push((call.call_date, -call.total_call_amount));
    }
    for dist in distributions {
        records.push((dist.distribution_date, dist.total_distribution_amount));
    }
    if !current_nav.is_zero() {
        records.push((as_of, current_nav));
    }

    let series = CashFlowSeries::from_records(&records);
    time_value::irr(&series.flows).round_dp(2)
}

fn run_methodology(
    input: &FundPerformanceInput,
    calls: &[CapitalCall],
    investments: &[Investment],
    total_capital_called: Money,
    total_distributed: Money,
    current_nav: Money,
) -> FundEngineResult<MethodologyResult> {
    match input.methodology {
        Methodology::Granular => {
            let granular = granular_input_from_calls(calls, total_distributed, current_nav)?;
            granular_performance(&granular)
        }
        Methodology::GrossUp => {
            let fund_age_years = fund_age(calls, investments, input.as_of);
            gross_up_performance(&GrossUpInput {
                total_calls: total_capital_called,
                total_distributions: total_distributed,
                current_nav,
                fee_percent: input.fee_percent,
                fund_age_years,
                average_aum: input.average_aum,
            })
        }
    }
}

/// Fund age from the earliest recorded activity, zero when nothing is
/// dated yet.
fn fund_age(calls: &[CapitalCall], investments: &[Investment], as_of: NaiveDate) -> Decimal {
    let earliest_call = calls.iter().map(|c| c.call_date).min();
    let earliest_acquisition = investments.iter().map(|i| i.acquisition_date).min();
    let earliest = match (earliest_call, earliest_acquisition) {
        (Some(c), Some(a)) => Some(c.min(a)),
        (Some(c), None) => Some(c),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    };

    match earliest {
        Some(date) if date < as_of => time_value::year_fraction(date, as_of),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::InMemoryFundData;
    use crate::records::{
        CapitalCallAllocation, DistributionAllocation, DistributionStatus, PaymentStatus,
        ProcessingStatus,
    };
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seeded_fund() -> InMemoryFundData {
        let mut data = InMemoryFundData::for_fund("fund-1");
        data.investments.push(Investment {
            id: "i-1".into(),
            name: "PortCo Alpha".into(),
            total_invested: dec!(900000),
            current_value: dec!(1300000),
            irr: dec!(14.0),
            multiple: dec!(1.44),
            acquisition_date: d(2020, 3, 1),
            last_valuation_date: d(2024, 6, 30),
        });
        data.capital_calls.push(CapitalCall {
            id: "cc-1".into(),
            fund_id: "fund-1".into(),
            call_number: 1,
            total_call_amount: dec!(1000000),
            investment_amount: Some(dec!(950000)),
            fee_amount: Some(dec!(50000)),
            call_date: d(2020, 2, 1),
            due_date: d(2020, 3, 1),
            status: CapitalCallStatus::FullyPaid,
            allocations: vec![CapitalCallAllocation {
                investor_id: "inv-a".into(),
                ownership_percent: dec!(100),
                call_amount: dec!(1000000),
                amount_paid: dec!(1000000),
                amount_outstanding: dec!(0),
                status: PaymentStatus::Paid,
                paid_date: Some(d(2020, 2, 20)),
            }],
        });
        data.distributions.push(Distribution {
            id: "di-1".into(),
            fund_id: "fund-1".into(),
            distribution_number: 1,
            total_distribution_amount: dec!(400000),
            distribution_date: d(2023, 6, 1),
            record_date: d(2023, 5, 15),
            payment_date: Some(d(2023, 6, 5)),
            status: DistributionStatus::Completed,
            allocations: vec![DistributionAllocation {
                investor_id: "inv-a".into(),
                ownership_percent: dec!(100),
                amount: dec!(400000),
                status: ProcessingStatus::Completed,
                processed_date: Some(d(2023, 6, 5)),
                failure_reason: None,
            }],
        });
        data
    }

    #[test]
    fn test_fund_performance_granular() {
        let data = seeded_fund();
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            as_of: d(2024, 6, 30),
            methodology: Methodology::Granular,
            fee_percent: dec!(2),
            average_aum: None,
        };
        let output = calculate_fund_performance(&input, &data).unwrap();
        let m = &output.result;

        assert_eq!(m.total_capital_called, dec!(1000000));
        assert_eq!(m.total_distributed, dec!(400000));
        assert_eq!(m.current_nav, dec!(1300000));
        assert_eq!(m.total_value, dec!(1700000));
        // multiples off paid-in capital of 1,000,000
        assert_eq!(m.dpi, dec!(0.4));
        assert_eq!(m.rvpi, dec!(1.3));
        assert_eq!(m.tvpi, dec!(1.7));
        // granular gross denominator is the 950,000 of investment calls
        assert_eq!(m.gross_multiple, dec!(1.79));
        assert_eq!(m.net_multiple, dec!(1.7));
        assert!(m.irr > dec!(10) && m.irr < dec!(20), "IRR was {}", m.irr);
    }

    #[test]
    fn test_fund_performance_gross_up() {
        let data = seeded_fund();
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            as_of: d(2024, 6, 30),
            methodology: Methodology::GrossUp,
            fee_percent: dec!(2),
            average_aum: None,
        };
        let output = calculate_fund_performance(&input, &data).unwrap();
        let m = &output.result;

        // grossed-up denominator exceeds raw calls, so gross < net multiple
        assert!(m.gross_multiple < m.net_multiple);
        assert_eq!(m.net_multiple, dec!(1.7));
    }

    #[test]
    fn test_fund_performance_granular_mismatch_fails() {
        let mut data = seeded_fund();
        data.capital_calls[0].fee_amount = None;
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            as_of: d(2024, 6, 30),
            methodology: Methodology::Granular,
            fee_percent: dec!(2),
            average_aum: None,
        };
        assert!(calculate_fund_performance(&input, &data).is_err());
    }

    #[test]
    fn test_fund_performance_empty_fund() {
        let data = InMemoryFundData::for_fund("fund-1");
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            as_of: d(2024, 6, 30),
            methodology: Methodology::GrossUp,
            fee_percent: dec!(2),
            average_aum: None,
        };
        let output = calculate_fund_performance(&input, &data).unwrap();
        let m = &output.result;
        assert_eq!(m.irr, Decimal::ZERO);
        assert_eq!(m.tvpi, Decimal::ZERO);
        assert_eq!(m.total_value, Decimal::ZERO);
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_fund_performance_respects_as_of() {
        let data = seeded_fund();
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            // before the 2023 distribution
            as_of: d(2022, 12, 31),
            methodology: Methodology::GrossUp,
            fee_percent: dec!(2),
            average_aum: None,
        };
        let output = calculate_fund_performance(&input, &data).unwrap();
        assert_eq!(output.result.total_distributed, Decimal::ZERO);
        assert_eq!(output.result.dpi, Decimal::ZERO);
    }

    #[test]
    fn test_cancelled_calls_excluded() {
        let mut data = seeded_fund();
        data.capital_calls[0].status = CapitalCallStatus::Cancelled;
        let input = FundPerformanceInput {
            fund_id: "fund-1".into(),
            as_of: d(2024, 6, 30),
            methodology: Methodology::GrossUp,
            fee_percent: dec!(2),
            average_aum: None,
        };
        let output = calculate_fund_performance(&input, &data).unwrap();
        assert_eq!(output.result.total_capital_called, Decimal::ZERO);
        // falls back to deployed principal for the multiples
        assert_eq!(output.result.dpi, dec!(400000) / dec!(900000));
    }
}
