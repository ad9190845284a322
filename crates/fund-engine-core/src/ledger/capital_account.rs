//! Capital account history per investor.
//!
//! Rebuilds the full event sequence from the transaction records on
//! every call: an initial contribution seeded from the investor's
//! recorded called capital net of the capital calls already present as
//! records, then one event per call or distribution allocation, sorted
//! chronologically with a stable tie-break, then a single forward pass
//! for the running balance. The caller replaces any stored sequence
//! wholesale; individual entries are never patched, so the running
//! balance can never go stale against its own history.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::datasource::FundDataSource;
use crate::records::{
    CapitalAccountEvent, CapitalAccountEventType, CapitalCallStatus,
};
use crate::types::Money;

/// Rebuild one investor's capital account for a fund.
pub fn build_capital_account(
    fund_id: &str,
    investor_id: &str,
    source: &impl FundDataSource,
) -> Vec<CapitalAccountEvent> {
    let calls = source.capital_calls(fund_id);
    let distributions = source.distributions(fund_id);

    let mut events: Vec<CapitalAccountEvent> = Vec::new();
    let mut called_via_records = Decimal::ZERO;

    for call in &calls {
        if call.status == CapitalCallStatus::Cancelled {
            continue;
        }
        if let Some(allocation) = call
            .allocations
            .iter()
            .find(|a| a.investor_id == investor_id)
        {
            called_via_records += allocation.call_amount;
            events.push(CapitalAccountEvent {
                date: call.call_date,
                event_type: CapitalAccountEventType::CapitalCall,
                amount: allocation.call_amount,
                running_balance: Decimal::ZERO,
                source_id: Some(call.id.clone()),
            });
        }
    }

    for dist in &distributions {
        if let Some(allocation) = dist
            .allocations
            .iter()
            .find(|a| a.investor_id == investor_id)
        {
            events.push(CapitalAccountEvent {
                date: dist.distribution_date,
                event_type: CapitalAccountEventType::Distribution,
                amount: -allocation.amount,
                running_balance: Decimal::ZERO,
                source_id: Some(dist.id.clone()),
            });
        }
    }

    // Capital called before the call records begin shows up as a single
    // opening contribution, so the record-backed events are not counted
    // twice.
    let recorded_called = source
        .ownerships(fund_id)
        .into_iter()
        .find(|o| o.investor_id == investor_id)
        .map(|o| o.called_capital)
        .unwrap_or(Decimal::ZERO);
    let initial = recorded_called - called_via_records;
    if initial > Decimal::ZERO {
        if let Some(anchor) = opening_date(&events, &calls.first().map(|c| c.call_date)) {
            events.insert(
                0,
                CapitalAccountEvent {
                    date: anchor,
                    event_type: CapitalAccountEventType::InitialContribution,
                    amount: initial,
                    running_balance: Decimal::ZERO,
                    source_id: None,
                },
            );
        }
    }

    events.sort_by_key(|e| e.date);

    let mut balance: Money = Decimal::ZERO;
    for event in &mut events {
        balance += event.amount;
        event.running_balance = balance;
    }

    events
}

/// The date the opening contribution anchors to: the investor's earliest
/// event, else the fund's first call. None when nothing is dated, in
/// which case there is no history to build.
fn opening_date(
    events: &[CapitalAccountEvent],
    first_fund_call: &Option<NaiveDate>,
) -> Option<NaiveDate> {
    events
        .iter()
        .map(|e| e.date)
        .min()
        .or(*first_fund_call)
}
