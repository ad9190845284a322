//! Pro-rata splitting of fund-level amounts across investors.
//!
//! The same split serves capital calls and distributions:
//! `amount = total x ownership_percent / 100`, rounded to cents. For
//! ownership percentages summing to 100% the shares conserve the total
//! within one currency unit, which is the tolerance the record
//! constructors enforce.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FundEngineError;
use crate::records::InvestorStake;
use crate::types::{Money, Percent};
use crate::FundEngineResult;

/// Allowed drift between a total and the sum of its rounded shares.
pub const ALLOCATION_TOLERANCE: Decimal = dec!(1);

/// One investor's computed share of a fund-level amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProRataShare {
    pub investor_id: String,
    pub ownership_percent: Percent,
    pub amount: Money,
}

/// Split a total across investors by ownership percentage.
pub fn allocate_pro_rata(
    total_amount: Money,
    stakes: &[InvestorStake],
) -> FundEngineResult<Vec<ProRataShare>> {
    if stakes.is_empty() {
        return Err(FundEngineError::InsufficientData(
            "At least one investor stake is required to allocate".into(),
        ));
    }
    if total_amount <= Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "total_amount".into(),
            reason: "Allocated amount must be positive".into(),
        });
    }

    let mut shares = Vec::with_capacity(stakes.len());
    for stake in stakes {
        if stake.ownership_percent < Decimal::ZERO {
            return Err(FundEngineError::InvalidInput {
                field: format!("investors[{}].ownership_percent", stake.investor_id),
                reason: "Ownership percent cannot be negative".into(),
            });
        }
        let amount = (total_amount * stake.ownership_percent / dec!(100)).round_dp(2);
        shares.push(ProRataShare {
            investor_id: stake.investor_id.clone(),
            ownership_percent: stake.ownership_percent,
            amount,
        });
    }

    Ok(shares)
}

/// Check the conservation invariant: shares must sum to the total within
/// `ALLOCATION_TOLERANCE`.
pub fn check_conservation(total_amount: Money, shares: &[ProRataShare]) -> FundEngineResult<()> {
    let allocated: Money = shares.iter().map(|s| s.amount).sum();
    let drift = (allocated - total_amount).abs();
    if drift > ALLOCATION_TOLERANCE {
        return Err(FundEngineError::InvalidInput {
            field: "investors".into(),
            reason: format!(
                "Allocations sum to {allocated}, off the total {total_amount} by {drift}; \
                 ownership percentages must cover the full amount"
            ),
        });
    }
    Ok(())
}
