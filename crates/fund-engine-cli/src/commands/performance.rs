use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use fund_engine_core::datasource::InMemoryFundData;
use fund_engine_core::performance::metrics::{calculate_fund_performance, FundPerformanceInput};
use fund_engine_core::time_value;
use fund_engine_core::types::{CashFlowSeries, Money};

use crate::input;

/// Arguments for the IRR solver
#[derive(Args)]
pub struct IrrArgs {
    /// Path to a JSON/YAML document with dated cash flows
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct DatedAmount {
    date: NaiveDate,
    amount: Money,
}

#[derive(Deserialize)]
struct IrrRequest {
    flows: Vec<DatedAmount>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: IrrRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let records: Vec<(NaiveDate, Money)> =
        request.flows.iter().map(|f| (f.date, f.amount)).collect();
    let series = CashFlowSeries::from_records(&records);
    let irr = time_value::irr(&series.flows);

    Ok(serde_json::json!({
        "irr": irr,
        "flow_count": series.len(),
    }))
}

/// Arguments for fund performance metrics
#[derive(Args)]
pub struct PerformanceArgs {
    /// Path to a JSON/YAML document with the request and fund records
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct PerformanceRequest {
    request: FundPerformanceInput,
    records: InMemoryFundData,
}

pub fn run_performance(args: PerformanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PerformanceRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let result = calculate_fund_performance(&request.request, &request.records)?;
    Ok(serde_json::to_value(result)?)
}
