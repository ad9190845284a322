//! Domain records exchanged with the administration layer.
//!
//! These are plain data shapes: the persistence and UI layers own their
//! storage and rendering, the engine only computes over them. Status
//! fields are exhaustive enums so the payment and processing state
//! machines are compiler-checked rather than string-compared.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple, Percent};

// ---------------------------------------------------------------------------
// Investments and ownership
// ---------------------------------------------------------------------------

/// A single fund holding, revalued externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: String,
    pub name: String,
    /// Principal invested at acquisition.
    pub total_invested: Money,
    /// Latest external mark.
    pub current_value: Money,
    /// Stated IRR as a percentage (15.0 = 15%).
    pub irr: Percent,
    pub multiple: Multiple,
    pub acquisition_date: NaiveDate,
    pub last_valuation_date: NaiveDate,
}

/// One investor's position in one fund.
///
/// `called_capital + uncalled_capital == commitment` is eventually
/// consistent; reconciliation recomputes called capital from the
/// transaction history rather than trusting the cached fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundOwnership {
    pub investor_id: String,
    pub fund_id: String,
    pub commitment: Money,
    pub ownership_percent: Percent,
    pub called_capital: Money,
    pub uncalled_capital: Money,
}

/// An investor's ownership stake, the unit of pro-rata allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorStake {
    pub investor_id: String,
    pub ownership_percent: Percent,
}

// ---------------------------------------------------------------------------
// Capital calls
// ---------------------------------------------------------------------------

/// Lifecycle of a capital call. `FullyPaid` and `Cancelled` are terminal;
/// the paid states are derived from the allocations, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapitalCallStatus {
    Draft,
    Sent,
    PartiallyPaid,
    FullyPaid,
    Cancelled,
}

impl std::fmt::Display for CapitalCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapitalCallStatus::Draft => write!(f, "Draft"),
            CapitalCallStatus::Sent => write!(f, "Sent"),
            CapitalCallStatus::PartiallyPaid => write!(f, "Partially Paid"),
            CapitalCallStatus::FullyPaid => write!(f, "Fully Paid"),
            CapitalCallStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Payment state of a single investor's share of a capital call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Partial => write!(f, "Partial"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

/// One investor's share of a capital call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalCallAllocation {
    pub investor_id: String,
    pub ownership_percent: Percent,
    pub call_amount: Money,
    pub amount_paid: Money,
    pub amount_outstanding: Money,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
}

/// A fund-level capital call with its per-investor allocations.
///
/// The allocation amounts sum to `total_call_amount` within one currency
/// unit; the invariant is enforced at creation and not re-derived later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalCall {
    pub id: String,
    pub fund_id: String,
    /// Monotonic per fund, starting at 1.
    pub call_number: u32,
    pub total_call_amount: Money,
    /// Portion of the call funding investments, when itemized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_amount: Option<Money>,
    /// Portion of the call funding management fees, when itemized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<Money>,
    pub call_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: CapitalCallStatus,
    pub allocations: Vec<CapitalCallAllocation>,
}

impl CapitalCall {
    /// A call is itemized when it carries the investment/fee split the
    /// Granular methodology requires.
    pub fn is_itemized(&self) -> bool {
        self.investment_amount.is_some() && self.fee_amount.is_some()
    }
}

/// The administration layer's request to raise a capital call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalCallIntent {
    pub fund_id: String,
    pub call_number: u32,
    pub total_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<Money>,
    pub call_date: NaiveDate,
    pub due_date: NaiveDate,
    pub investors: Vec<InvestorStake>,
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Lifecycle of a distribution, derived from its allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionStatus {
    Pending,
    Processing,
    Completed,
}

impl std::fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionStatus::Pending => write!(f, "Pending"),
            DistributionStatus::Processing => write!(f, "Processing"),
            DistributionStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Processing state of a single investor's share of a distribution.
/// `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "Pending"),
            ProcessingStatus::Processing => write!(f, "Processing"),
            ProcessingStatus::Completed => write!(f, "Completed"),
            ProcessingStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One investor's share of a distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionAllocation {
    pub investor_id: String,
    pub ownership_percent: Percent,
    pub amount: Money,
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// A fund-level distribution with its per-investor allocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub id: String,
    pub fund_id: String,
    /// Monotonic per fund, starting at 1.
    pub distribution_number: u32,
    pub total_distribution_amount: Money,
    pub distribution_date: NaiveDate,
    pub record_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub status: DistributionStatus,
    pub allocations: Vec<DistributionAllocation>,
}

/// The administration layer's request to distribute proceeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionIntent {
    pub fund_id: String,
    pub distribution_number: u32,
    pub total_amount: Money,
    pub distribution_date: NaiveDate,
    pub record_date: NaiveDate,
    pub investors: Vec<InvestorStake>,
}

// ---------------------------------------------------------------------------
// Capital account ledger
// ---------------------------------------------------------------------------

/// Kind of capital-account movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapitalAccountEventType {
    InitialContribution,
    CapitalCall,
    Distribution,
}

impl std::fmt::Display for CapitalAccountEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapitalAccountEventType::InitialContribution => write!(f, "Initial Contribution"),
            CapitalAccountEventType::CapitalCall => write!(f, "Capital Call"),
            CapitalAccountEventType::Distribution => write!(f, "Distribution"),
        }
    }
}

/// One movement on an investor's capital account. Derived data: the whole
/// sequence is recomputed from the transaction records, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalAccountEvent {
    pub date: NaiveDate,
    pub event_type: CapitalAccountEventType,
    /// Signed from the capital-account perspective: calls and
    /// contributions increase the account, distributions decrease it.
    pub amount: Money,
    pub running_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Report-level outputs
// ---------------------------------------------------------------------------

/// Headline fund performance, recomputed on every request. Never the
/// source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Dated-cash-flow IRR, percent.
    pub irr: Percent,
    pub tvpi: Multiple,
    pub dpi: Multiple,
    pub rvpi: Multiple,
    pub moic: Multiple,
    pub gross_performance_percent: Percent,
    pub gross_multiple: Multiple,
    pub net_performance_percent: Percent,
    pub net_multiple: Multiple,
    pub total_capital_called: Money,
    pub total_distributed: Money,
    pub total_invested: Money,
    pub current_nav: Money,
    pub total_value: Money,
}

/// A published report's stored headline metrics, the validator's input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundReport {
    pub id: String,
    pub fund_id: String,
    pub as_of: NaiveDate,
    /// The investment subset the report covers.
    pub investment_ids: Vec<String>,
    pub total_aum: Money,
    /// Value-weighted average IRR, percent.
    pub average_irr: Percent,
    pub total_distributions: Money,
}
