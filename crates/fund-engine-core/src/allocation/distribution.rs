//! Distribution creation and the processing state machine.
//!
//! Per-allocation lifecycle is `Pending -> Processing -> Completed`,
//! with `Failed` as the terminal error branch out of `Processing`. The
//! parent distribution's status is derived from its allocations, never
//! set directly.

use chrono::NaiveDate;

use crate::allocation::prorata::{allocate_pro_rata, check_conservation};
use crate::error::FundEngineError;
use crate::records::{
    Distribution, DistributionAllocation, DistributionIntent, DistributionStatus, ProcessingStatus,
};
use crate::FundEngineResult;

/// Build a distribution from an intent: pro-rata allocations, `Pending`
/// status, sum invariant enforced here.
pub fn create_distribution(intent: &DistributionIntent) -> FundEngineResult<Distribution> {
    if intent.distribution_number == 0 {
        return Err(FundEngineError::InvalidInput {
            field: "distribution_number".into(),
            reason: "Distribution numbers start at 1".into(),
        });
    }

    let shares = allocate_pro_rata(intent.total_amount, &intent.investors)?;
    check_conservation(intent.total_amount, &shares)?;

    let allocations = shares
        .into_iter()
        .map(|share| DistributionAllocation {
            investor_id: share.investor_id,
            ownership_percent: share.ownership_percent,
            amount: share.amount,
            status: ProcessingStatus::Pending,
            processed_date: None,
            failure_reason: None,
        })
        .collect();

    Ok(Distribution {
        id: format!("{}-dist-{}", intent.fund_id, intent.distribution_number),
        fund_id: intent.fund_id.clone(),
        distribution_number: intent.distribution_number,
        total_distribution_amount: intent.total_amount,
        distribution_date: intent.distribution_date,
        record_date: intent.record_date,
        payment_date: None,
        status: DistributionStatus::Pending,
        allocations,
    })
}

/// Move a single allocation along the processing lifecycle, returning
/// the new allocation value.
pub fn advance_allocation(
    allocation: &DistributionAllocation,
    to: ProcessingStatus,
    date: NaiveDate,
    failure_reason: Option<String>,
) -> FundEngineResult<DistributionAllocation> {
    let valid = matches!(
        (allocation.status, to),
        (ProcessingStatus::Pending, ProcessingStatus::Processing)
            | (ProcessingStatus::Processing, ProcessingStatus::Completed)
            | (ProcessingStatus::Processing, ProcessingStatus::Failed)
    );
    if !valid {
        return Err(FundEngineError::InvalidTransition {
            entity: "distribution allocation".into(),
            from: allocation.status.to_string(),
            to: to.to_string(),
        });
    }

    let mut advanced = allocation.clone();
    advanced.status = to;
    match to {
        ProcessingStatus::Completed => {
            advanced.processed_date = Some(date);
        }
        ProcessingStatus::Failed => {
            advanced.processed_date = Some(date);
            advanced.failure_reason = failure_reason;
        }
        _ => {}
    }
    Ok(advanced)
}

/// Advance an investor's allocation on a distribution and recompute the
/// parent status. Returns the replacement record for a whole-record
/// write.
pub fn update_allocation_status(
    distribution: &Distribution,
    investor_id: &str,
    to: ProcessingStatus,
    date: NaiveDate,
    failure_reason: Option<String>,
) -> FundEngineResult<Distribution> {
    let mut found = false;
    let mut allocations = Vec::with_capacity(distribution.allocations.len());
    for allocation in &distribution.allocations {
        if allocation.investor_id == investor_id {
            allocations.push(advance_allocation(
                allocation,
                to,
                date,
                failure_reason.clone(),
            )?);
            found = true;
        } else {
            allocations.push(allocation.clone());
        }
    }
    if !found {
        return Err(FundEngineError::InvalidInput {
            field: "investor_id".into(),
            reason: format!(
                "Investor {investor_id} has no allocation on distribution {}",
                distribution.id
            ),
        });
    }

    let status = derive_distribution_status(&allocations);
    let mut updated = distribution.clone();
    updated.allocations = allocations;
    updated.status = status;
    if status == DistributionStatus::Completed && updated.payment_date.is_none() {
        updated.payment_date = Some(date);
    }
    Ok(updated)
}

/// Derive the parent status: `Completed` when every allocation
/// completed, `Processing` while any allocation is in flight, `Pending`
/// otherwise. A `Failed` allocation keeps the parent out of `Completed`
/// permanently.
pub fn derive_distribution_status(allocations: &[DistributionAllocation]) -> DistributionStatus {
    if !allocations.is_empty()
        && allocations
            .iter()
            .all(|a| a.status == ProcessingStatus::Completed)
    {
        DistributionStatus::Completed
    } else if allocations
        .iter()
        .any(|a| a.status == ProcessingStatus::Processing)
    {
        DistributionStatus::Processing
    } else {
        DistributionStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::records::InvestorStake;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn intent() -> DistributionIntent {
        DistributionIntent {
            fund_id: "fund-1".into(),
            distribution_number: 1,
            total_amount: dec!(500000),
            distribution_date: d(2023, 6, 1),
            record_date: d(2023, 5, 15),
            investors: vec![
                InvestorStake {
                    investor_id: "inv-a".into(),
                    ownership_percent: dec!(75),
                },
                InvestorStake {
                    investor_id: "inv-b".into(),
                    ownership_percent: dec!(25),
                },
            ],
        }
    }

    #[test]
    fn test_create_distribution_pro_rata() {
        let dist = create_distribution(&intent()).unwrap();
        assert_eq!(dist.status, DistributionStatus::Pending);
        assert_eq!(dist.allocations[0].amount, dec!(375000));
        assert_eq!(dist.allocations[1].amount, dec!(125000));
    }

    #[test]
    fn test_create_rejects_number_zero() {
        let mut bad = intent();
        bad.distribution_number = 0;
        assert!(create_distribution(&bad).is_err());
    }

    #[test]
    fn test_processing_then_completed() {
        let dist = create_distribution(&intent()).unwrap();
        let dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Processing,
            d(2023, 6, 2),
            None,
        )
        .unwrap();
        assert_eq!(dist.status, DistributionStatus::Processing);

        let dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Completed,
            d(2023, 6, 3),
            None,
        )
        .unwrap();
        // inv-b is still pending, so the parent cannot be completed
        assert_eq!(dist.status, DistributionStatus::Pending);
        assert_eq!(dist.allocations[0].processed_date, Some(d(2023, 6, 3)));
    }

    #[test]
    fn test_parent_completed_when_all_allocations_complete() {
        let mut dist = create_distribution(&intent()).unwrap();
        for investor in ["inv-a", "inv-b"] {
            dist = update_allocation_status(
                &dist,
                investor,
                ProcessingStatus::Processing,
                d(2023, 6, 2),
                None,
            )
            .unwrap();
            dist = update_allocation_status(
                &dist,
                investor,
                ProcessingStatus::Completed,
                d(2023, 6, 3),
                None,
            )
            .unwrap();
        }
        assert_eq!(dist.status, DistributionStatus::Completed);
        assert_eq!(dist.payment_date, Some(d(2023, 6, 3)));
    }

    #[test]
    fn test_skipping_processing_rejected() {
        let dist = create_distribution(&intent()).unwrap();
        let err = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Completed,
            d(2023, 6, 2),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, FundEngineError::InvalidTransition { .. }));
    }

    #[test]
    fn test_failed_is_terminal() {
        let dist = create_distribution(&intent()).unwrap();
        let dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Processing,
            d(2023, 6, 2),
            None,
        )
        .unwrap();
        let dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Failed,
            d(2023, 6, 3),
            Some("wire rejected".into()),
        )
        .unwrap();
        assert_eq!(dist.allocations[0].failure_reason.as_deref(), Some("wire rejected"));

        // no way forward from Failed
        assert!(update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Processing,
            d(2023, 6, 4),
            None,
        )
        .is_err());
    }

    #[test]
    fn test_failed_allocation_blocks_completion() {
        let mut dist = create_distribution(&intent()).unwrap();
        dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Processing,
            d(2023, 6, 2),
            None,
        )
        .unwrap();
        dist = update_allocation_status(
            &dist,
            "inv-a",
            ProcessingStatus::Failed,
            d(2023, 6, 3),
            Some("account closed".into()),
        )
        .unwrap();
        dist = update_allocation_status(
            &dist,
            "inv-b",
            ProcessingStatus::Processing,
            d(2023, 6, 2),
            None,
        )
        .unwrap();
        dist = update_allocation_status(
            &dist,
            "inv-b",
            ProcessingStatus::Completed,
            d(2023, 6, 3),
            None,
        )
        .unwrap();
        assert_ne!(dist.status, DistributionStatus::Completed);
    }

    #[test]
    fn test_unknown_investor_rejected() {
        let dist = create_distribution(&intent()).unwrap();
        assert!(update_allocation_status(
            &dist,
            "inv-z",
            ProcessingStatus::Processing,
            d(2023, 6, 2),
            None,
        )
        .is_err());
    }
}
