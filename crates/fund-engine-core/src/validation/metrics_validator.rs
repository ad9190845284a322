//! Cross-validation of stored report metrics.
//!
//! Recomputes a report's headline numbers from the underlying records
//! and compares against what the report claims. Differences inside the
//! 1,000-unit band read as rounding noise and come back as warnings;
//! anything larger, or an IRR drift beyond 0.1 percentage points, is an
//! error the caller must resolve before publishing. The validator never
//! mutates the report; overwriting stored metrics with the recalculated
//! ones is the caller's decision.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::datasource::FundDataSource;
use crate::records::{FundReport, Investment};
use crate::types::{Money, Percent};
use crate::valuation::portfolio::{total_aum, weighted_average_irr};

/// Amount drift treated as rounding; beyond it, an error.
pub const AMOUNT_TOLERANCE: Decimal = dec!(1000);

/// IRR drift in percentage points beyond which the report is wrong.
pub const IRR_TOLERANCE: Decimal = dec!(0.1);

/// The freshly recomputed headline numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatedReportMetrics {
    pub total_aum: Money,
    pub average_irr: Percent,
    pub total_distributions: Money,
}

/// Outcome of a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub calculated_metrics: CalculatedReportMetrics,
}

/// Recompute a report's metrics from the records and flag discrepancies.
pub fn validate_report_metrics(
    report: &FundReport,
    source: &impl FundDataSource,
) -> ValidationResult {
    let investments: Vec<Investment> = source
        .investments(&report.fund_id)
        .into_iter()
        .filter(|inv| report.investment_ids.contains(&inv.id))
        .collect();

    let calculated = CalculatedReportMetrics {
        total_aum: total_aum(&investments, report.as_of),
        average_irr: weighted_average_irr(&investments, report.as_of),
        total_distributions: source
            .distributions(&report.fund_id)
            .into_iter()
            .filter(|d| d.distribution_date <= report.as_of)
            .map(|d| d.total_distribution_amount)
            .sum(),
    };

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    check_amount(
        "AUM",
        report.total_aum,
        calculated.total_aum,
        &mut errors,
        &mut warnings,
    );
    check_amount(
        "total distributions",
        report.total_distributions,
        calculated.total_distributions,
        &mut errors,
        &mut warnings,
    );

    let irr_drift = (report.average_irr - calculated.average_irr).abs();
    if irr_drift > IRR_TOLERANCE {
        errors.push(format!(
            "Average IRR mismatch on report {}: reported {}%, calculated {}% (drift {} points)",
            report.id, report.average_irr, calculated.average_irr, irr_drift
        ));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        calculated_metrics: calculated,
    }
}

fn check_amount(
    field: &str,
    reported: Money,
    calculated: Money,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let drift = (reported - calculated).abs();
    if drift > AMOUNT_TOLERANCE {
        errors.push(format!(
            "{field} mismatch: reported {reported}, calculated {calculated} (difference {drift})"
        ));
    } else if drift > Decimal::ZERO {
        warnings.push(format!(
            "{field} differs by {drift} (reported {reported}, calculated {calculated}); \
             within rounding tolerance"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::datasource::InMemoryFundData;
    use crate::records::{Distribution, DistributionStatus};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seeded() -> InMemoryFundData {
        let mut data = InMemoryFundData::for_fund("fund-1");
        data.investments.push(Investment {
            id: "i-1".into(),
            name: "PortCo Alpha".into(),
            total_invested: dec!(1000000),
            current_value: dec!(1000000),
            irr: dec!(0),
            multiple: dec!(1),
            acquisition_date: d(2021, 1, 1),
            last_valuation_date: d(2024, 1, 1),
        });
        data.distributions.push(Distribution {
            id: "di-1".into(),
            fund_id: "fund-1".into(),
            distribution_number: 1,
            total_distribution_amount: dec!(250000),
            distribution_date: d(2023, 3, 1),
            record_date: d(2023, 2, 15),
            payment_date: None,
            status: DistributionStatus::Completed,
            allocations: vec![],
        });
        data
    }

    fn report(aum: Money, irr: Percent, dists: Money) -> FundReport {
        FundReport {
            id: "rep-1".into(),
            fund_id: "fund-1".into(),
            as_of: d(2024, 1, 1),
            investment_ids: vec!["i-1".into()],
            total_aum: aum,
            average_irr: irr,
            total_distributions: dists,
        }
    }

    #[test]
    fn test_accurate_report_is_valid() {
        let data = seeded();
        // 0% IRR projects flat to exactly the principal
        let result = validate_report_metrics(&report(dec!(1000000), dec!(0), dec!(250000)), &data);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.calculated_metrics.total_aum, dec!(1000000));
    }

    #[test]
    fn test_small_aum_drift_is_warning() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(1000600), dec!(0), dec!(250000)), &data);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_large_aum_drift_is_error() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(1005000), dec!(0), dec!(250000)), &data);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_irr_drift_beyond_tenth_point_is_error() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(1000000), dec!(0.2), dec!(250000)), &data);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("IRR"));
    }

    #[test]
    fn test_irr_drift_within_tenth_point_passes() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(1000000), dec!(0.1), dec!(250000)), &data);
        assert!(result.is_valid);
    }

    #[test]
    fn test_distribution_mismatch_is_error() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(1000000), dec!(0), dec!(100000)), &data);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("distributions"));
    }

    #[test]
    fn test_only_declared_investments_count() {
        let mut data = seeded();
        data.investments.push(Investment {
            id: "i-2".into(),
            name: "PortCo Beta".into(),
            total_invested: dec!(9000000),
            current_value: dec!(9000000),
            irr: dec!(0),
            multiple: dec!(1),
            acquisition_date: d(2021, 1, 1),
            last_valuation_date: d(2024, 1, 1),
        });
        // report only declares i-1; the 9M holding is out of scope
        let result = validate_report_metrics(&report(dec!(1000000), dec!(0), dec!(250000)), &data);
        assert!(result.is_valid);
    }

    #[test]
    fn test_empty_report_subset_validates_against_zero() {
        let data = seeded();
        let mut rep = report(dec!(0), dec!(0), dec!(250000));
        rep.investment_ids.clear();
        let result = validate_report_metrics(&rep, &data);
        assert!(result.is_valid);
        assert_eq!(result.calculated_metrics.total_aum, Decimal::ZERO);
    }

    #[test]
    fn test_validator_reports_calculated_metrics() {
        let data = seeded();
        let result = validate_report_metrics(&report(dec!(5), dec!(9), dec!(9)), &data);
        assert!(!result.is_valid);
        assert_eq!(result.calculated_metrics.total_distributions, dec!(250000));
        assert_eq!(result.calculated_metrics.average_irr, dec!(0.0));
    }
}
