use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use fund_engine_core::datasource::InMemoryFundData;
use fund_engine_core::records::{CapitalCall, Distribution, FundReport, Investment, ProcessingStatus};
use fund_engine_core::types::{CashFlowSeries, Money};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DatedAmount {
    date: NaiveDate,
    amount: Money,
}

#[derive(Deserialize)]
struct IrrBindingInput {
    flows: Vec<DatedAmount>,
}

#[napi]
pub fn calculate_irr(input_json: String) -> NapiResult<String> {
    let input: IrrBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let records: Vec<(NaiveDate, Money)> =
        input.flows.iter().map(|f| (f.date, f.amount)).collect();
    let series = CashFlowSeries::from_records(&records);
    let irr = fund_engine_core::time_value::irr(&series.flows);
    serde_json::to_string(&serde_json::json!({ "irr": irr })).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct FundPerformanceBindingInput {
    request: fund_engine_core::performance::metrics::FundPerformanceInput,
    records: InMemoryFundData,
}

#[napi]
pub fn calculate_fund_performance(input_json: String) -> NapiResult<String> {
    let input: FundPerformanceBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fund_engine_core::performance::metrics::calculate_fund_performance(
            &input.request,
            &input.records,
        )
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ProjectBindingInput {
    investment: Investment,
    target_date: NaiveDate,
}

#[napi]
pub fn project_value(input_json: String) -> NapiResult<String> {
    let input: ProjectBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let value =
        fund_engine_core::valuation::projector::value_at_date(&input.investment, input.target_date);
    serde_json::to_string(&serde_json::json!({ "projected_value": value }))
        .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PortfolioBindingInput {
    investments: Vec<Investment>,
    as_of: NaiveDate,
}

#[napi]
pub fn portfolio_aum(input_json: String) -> NapiResult<String> {
    let input: PortfolioBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = serde_json::json!({
        "total_aum": fund_engine_core::valuation::portfolio::total_aum(
            &input.investments,
            input.as_of,
        ),
        "weighted_average_irr": fund_engine_core::valuation::portfolio::weighted_average_irr(
            &input.investments,
            input.as_of,
        ),
        "portfolio_multiple": fund_engine_core::valuation::portfolio::portfolio_multiple(
            &input.investments,
            input.as_of,
        ),
        "approximate_portfolio_irr":
            fund_engine_core::valuation::portfolio::approximate_portfolio_irr(
                &input.investments,
                input.as_of,
            ),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[napi]
pub fn allocate_capital_call(input_json: String) -> NapiResult<String> {
    let intent: fund_engine_core::records::CapitalCallIntent =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let call = fund_engine_core::allocation::capital_call::create_capital_call(&intent)
        .map_err(to_napi_error)?;
    serde_json::to_string(&call).map_err(to_napi_error)
}

#[napi]
pub fn allocate_distribution(input_json: String) -> NapiResult<String> {
    let intent: fund_engine_core::records::DistributionIntent =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let distribution = fund_engine_core::allocation::distribution::create_distribution(&intent)
        .map_err(to_napi_error)?;
    serde_json::to_string(&distribution).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PaymentBindingInput {
    call: CapitalCall,
    investor_id: String,
    payment: Money,
    paid_date: NaiveDate,
}

#[napi]
pub fn record_investor_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let updated = fund_engine_core::allocation::capital_call::update_investor_payment(
        &input.call,
        &input.investor_id,
        input.payment,
        input.paid_date,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&updated).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct DistributionStatusBindingInput {
    distribution: Distribution,
    investor_id: String,
    status: ProcessingStatus,
    date: NaiveDate,
    failure_reason: Option<String>,
}

#[napi]
pub fn advance_distribution_allocation(input_json: String) -> NapiResult<String> {
    let input: DistributionStatusBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let updated = fund_engine_core::allocation::distribution::update_allocation_status(
        &input.distribution,
        &input.investor_id,
        input.status,
        input.date,
        input.failure_reason,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&updated).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Capital account ledger
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LedgerBindingInput {
    fund_id: String,
    investor_id: String,
    records: InMemoryFundData,
}

#[napi]
pub fn build_capital_account(input_json: String) -> NapiResult<String> {
    let input: LedgerBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let events = fund_engine_core::ledger::capital_account::build_capital_account(
        &input.fund_id,
        &input.investor_id,
        &input.records,
    );
    serde_json::to_string(&events).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValidationBindingInput {
    report: FundReport,
    records: InMemoryFundData,
}

#[napi]
pub fn validate_report_metrics(input_json: String) -> NapiResult<String> {
    let input: ValidationBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result = fund_engine_core::validation::metrics_validator::validate_report_metrics(
        &input.report,
        &input.records,
    );
    serde_json::to_string(&result).map_err(to_napi_error)
}
