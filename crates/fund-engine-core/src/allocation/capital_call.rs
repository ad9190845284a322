//! Capital call creation and the payment state machine.
//!
//! Allocations update immutably: recording a payment produces a new
//! allocation value, then the parent status is recomputed in an explicit
//! second step. The parent's paid states are always derived from the
//! allocations; `Cancelled` is the one terminal override and freezes
//! every allocation under it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::allocation::prorata::{allocate_pro_rata, check_conservation, ALLOCATION_TOLERANCE};
use crate::error::FundEngineError;
use crate::records::{
    CapitalCall, CapitalCallAllocation, CapitalCallIntent, CapitalCallStatus, PaymentStatus,
};
use crate::types::Money;
use crate::FundEngineResult;

/// Build a capital call from an intent: pro-rata allocations, `Draft`
/// status, the sum invariant enforced here and never re-derived.
pub fn create_capital_call(intent: &CapitalCallIntent) -> FundEngineResult<CapitalCall> {
    if intent.call_number == 0 {
        return Err(FundEngineError::InvalidInput {
            field: "call_number".into(),
            reason: "Call numbers start at 1".into(),
        });
    }
    if intent.due_date < intent.call_date {
        return Err(FundEngineError::InvalidInput {
            field: "due_date".into(),
            reason: "Due date cannot precede the call date".into(),
        });
    }
    check_itemization(intent)?;

    let shares = allocate_pro_rata(intent.total_amount, &intent.investors)?;
    check_conservation(intent.total_amount, &shares)?;

    let allocations = shares
        .into_iter()
        .map(|share| CapitalCallAllocation {
            investor_id: share.investor_id,
            ownership_percent: share.ownership_percent,
            call_amount: share.amount,
            amount_paid: Decimal::ZERO,
            amount_outstanding: share.amount,
            status: PaymentStatus::Pending,
            paid_date: None,
        })
        .collect();

    Ok(CapitalCall {
        id: format!("{}-call-{}", intent.fund_id, intent.call_number),
        fund_id: intent.fund_id.clone(),
        call_number: intent.call_number,
        total_call_amount: intent.total_amount,
        investment_amount: intent.investment_amount,
        fee_amount: intent.fee_amount,
        call_date: intent.call_date,
        due_date: intent.due_date,
        status: CapitalCallStatus::Draft,
        allocations,
    })
}

/// Issue a drafted call to investors.
pub fn mark_sent(call: &CapitalCall) -> FundEngineResult<CapitalCall> {
    if call.status != CapitalCallStatus::Draft {
        return Err(invalid_transition(call.status, CapitalCallStatus::Sent));
    }
    let mut sent = call.clone();
    sent.status = CapitalCallStatus::Sent;
    Ok(sent)
}

/// Record a payment against a single allocation, returning the new
/// allocation value.
///
/// Status follows the paid amounts: `Paid` once nothing is outstanding,
/// `Partial` once something is paid, `Pending` otherwise. A `Paid`
/// allocation stays `Paid` under a zero additional payment.
pub fn apply_payment(
    allocation: &CapitalCallAllocation,
    payment: Money,
    paid_date: NaiveDate,
) -> FundEngineResult<CapitalCallAllocation> {
    if payment < Decimal::ZERO {
        return Err(FundEngineError::InvalidInput {
            field: "payment".into(),
            reason: "Payments cannot be negative".into(),
        });
    }
    if payment > allocation.amount_outstanding {
        return Err(FundEngineError::InvalidInput {
            field: "payment".into(),
            reason: format!(
                "Payment {payment} exceeds the outstanding amount {}",
                allocation.amount_outstanding
            ),
        });
    }

    let amount_paid = allocation.amount_paid + payment;
    let amount_outstanding = allocation.call_amount - amount_paid;
    let status = if amount_outstanding.is_zero() {
        PaymentStatus::Paid
    } else if amount_paid > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    };

    Ok(CapitalCallAllocation {
        investor_id: allocation.investor_id.clone(),
        ownership_percent: allocation.ownership_percent,
        call_amount: allocation.call_amount,
        amount_paid,
        amount_outstanding,
        status,
        paid_date: if status == PaymentStatus::Paid {
            allocation.paid_date.or(Some(paid_date))
        } else {
            allocation.paid_date
        },
    })
}

/// Record an investor's payment on a call and recompute the parent
/// status. Returns the replacement record; the caller persists it as a
/// whole-record write.
pub fn update_investor_payment(
    call: &CapitalCall,
    investor_id: &str,
    payment: Money,
    paid_date: NaiveDate,
) -> FundEngineResult<CapitalCall> {
    if call.status == CapitalCallStatus::Cancelled {
        return Err(invalid_transition(
            CapitalCallStatus::Cancelled,
            CapitalCallStatus::PartiallyPaid,
        ));
    }

    let mut found = false;
    let mut allocations = Vec::with_capacity(call.allocations.len());
    for allocation in &call.allocations {
        if allocation.investor_id == investor_id {
            allocations.push(apply_payment(allocation, payment, paid_date)?);
            found = true;
        } else {
            allocations.push(allocation.clone());
        }
    }
    if !found {
        return Err(FundEngineError::InvalidInput {
            field: "investor_id".into(),
            reason: format!("Investor {investor_id} has no allocation on call {}", call.id),
        });
    }

    let status = derive_call_status(&allocations, call.status);
    let mut updated = call.clone();
    updated.allocations = allocations;
    updated.status = status;
    Ok(updated)
}

/// Derive the parent status from the allocations. `Fully Paid` when
/// nothing is outstanding, `Partially Paid` when something is paid, the
/// current `Draft`/`Sent` otherwise. `Cancelled` is sticky.
pub fn derive_call_status(
    allocations: &[CapitalCallAllocation],
    current: CapitalCallStatus,
) -> CapitalCallStatus {
    if current == CapitalCallStatus::Cancelled {
        return CapitalCallStatus::Cancelled;
    }

    let outstanding: Money = allocations.iter().map(|a| a.amount_outstanding).sum();
    let paid: Money = allocations.iter().map(|a| a.amount_paid).sum();

    if !allocations.is_empty() && outstanding.is_zero() {
        CapitalCallStatus::FullyPaid
    } else if paid > Decimal::ZERO {
        CapitalCallStatus::PartiallyPaid
    } else {
        current
    }
}

/// Cancel a call. Reachable from any non-terminal state; the
/// allocations freeze as they stand.
pub fn cancel_call(call: &CapitalCall) -> FundEngineResult<CapitalCall> {
    match call.status {
        CapitalCallStatus::FullyPaid | CapitalCallStatus::Cancelled => {
            Err(invalid_transition(call.status, CapitalCallStatus::Cancelled))
        }
        _ => {
            let mut cancelled = call.clone();
            cancelled.status = CapitalCallStatus::Cancelled;
            Ok(cancelled)
        }
    }
}

fn check_itemization(intent: &CapitalCallIntent) -> FundEngineResult<()> {
    match (intent.investment_amount, intent.fee_amount) {
        (None, None) => Ok(()),
        (Some(investment), Some(fee)) => {
            let drift = (investment + fee - intent.total_amount).abs();
            if drift > ALLOCATION_TOLERANCE {
                return Err(FundEngineError::InvalidInput {
                    field: "investment_amount/fee_amount".into(),
                    reason: format!(
                        "Itemized amounts sum to {}, not the call total {}",
                        investment + fee,
                        intent.total_amount
                    ),
                });
            }
            Ok(())
        }
        _ => Err(FundEngineError::InvalidInput {
            field: "investment_amount/fee_amount".into(),
            reason: "Itemize both the investment and fee amounts, or neither".into(),
        }),
    }
}

fn invalid_transition(from: CapitalCallStatus, to: CapitalCallStatus) -> FundEngineError {
    FundEngineError::InvalidTransition {
        entity: "capital call".into(),
        from: from.to_string(),
        to: to.to_string(),
    }
}
