//! Read-only access to a fund's records.
//!
//! The report-level operations (performance assembly, the capital
//! account ledger, the metrics validator) need the related records for a
//! fund. They receive them through this narrow trait instead of reaching
//! into whatever store the surrounding platform uses, which keeps the
//! engine pure and independently testable. Implementations are expected
//! to hand back a consistent snapshot; the engine never writes through
//! this interface.

use serde::{Deserialize, Serialize};

use crate::records::{CapitalCall, Distribution, FundOwnership, Investment};

/// Read-only repository of fund records.
pub trait FundDataSource {
    fn investments(&self, fund_id: &str) -> Vec<Investment>;
    fn ownerships(&self, fund_id: &str) -> Vec<FundOwnership>;
    fn capital_calls(&self, fund_id: &str) -> Vec<CapitalCall>;
    fn distributions(&self, fund_id: &str) -> Vec<Distribution>;
}

/// In-memory implementation backing the outer surfaces and tests. The
/// whole bundle serializes, so batch surfaces can ship a fund's records
/// as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryFundData {
    pub investments: Vec<Investment>,
    pub ownerships: Vec<FundOwnership>,
    pub capital_calls: Vec<CapitalCall>,
    pub distributions: Vec<Distribution>,
    /// Fund id the investment records belong to. Investments carry no
    /// fund field of their own; the store scopes them.
    pub investment_fund_id: String,
}

impl InMemoryFundData {
    pub fn for_fund(fund_id: &str) -> Self {
        InMemoryFundData {
            investment_fund_id: fund_id.to_string(),
            ..Default::default()
        }
    }
}

impl FundDataSource for InMemoryFundData {
    fn investments(&self, fund_id: &str) -> Vec<Investment> {
        if self.investment_fund_id == fund_id {
            self.investments.clone()
        } else {
            Vec::new()
        }
    }

    fn ownerships(&self, fund_id: &str) -> Vec<FundOwnership> {
        self.ownerships
            .iter()
            .filter(|o| o.fund_id == fund_id)
            .cloned()
            .collect()
    }

    fn capital_calls(&self, fund_id: &str) -> Vec<CapitalCall> {
        self.capital_calls
            .iter()
            .filter(|c| c.fund_id == fund_id)
            .cloned()
            .collect()
    }

    fn distributions(&self, fund_id: &str) -> Vec<Distribution> {
        self.distributions
            .iter()
            .filter(|d| d.fund_id == fund_id)
            .cloned()
            .collect()
    }
}
