use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentages (15.0 = 15%), the unit stated IRRs and ownership stakes
/// arrive in from the administration layer.
pub type Percent = Decimal;

/// Multiples (e.g., 2.5x TVPI)
pub type Multiple = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Currency code. A label only; the engine never converts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    HKD,
    SGD,
    Other(String),
}

/// A single cash flow at a point in time.
///
/// Signed from the investor's perspective: negative = capital leaving the
/// investor (calls, contributions), positive = capital returned
/// (distributions, residual value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A date-ordered series of cash flows, the uniform input to the IRR
/// solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSeries {
    pub flows: Vec<CashFlow>,
    pub currency: Currency,
}

impl CashFlowSeries {
    /// Build a series from raw (date, amount) pairs, sorted by date.
    /// Entries sharing a date keep their insertion order (stable sort).
    pub fn from_records(records: &[(NaiveDate, Money)]) -> Self {
        let mut flows: Vec<CashFlow> = records
            .iter()
            .map(|(date, amount)| CashFlow {
                date: *date,
                amount: *amount,
                label: None,
            })
            .collect();
        flows.sort_by_key(|cf| cf.date);
        CashFlowSeries {
            flows,
            currency: Currency::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
