use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use fund_engine_core::records::Investment;
use fund_engine_core::types::Money;
use fund_engine_core::valuation::portfolio::{
    adjust_aum_for_transactions, approximate_portfolio_irr, portfolio_multiple, total_aum,
    weighted_average_irr,
};
use fund_engine_core::valuation::projector::value_at_date;

use crate::input;

/// Arguments for single-investment projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON/YAML document with the investment record
    #[arg(long)]
    pub input: Option<String>,

    /// Target date (YYYY-MM-DD); overrides the document
    #[arg(long)]
    pub target_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ProjectRequest {
    investment: Investment,
    target_date: Option<NaiveDate>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ProjectRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let target = args
        .target_date
        .or(request.target_date)
        .ok_or("--target-date is required (or provide target_date in the document)")?;
    let value = value_at_date(&request.investment, target);

    Ok(serde_json::json!({
        "investment_id": request.investment.id,
        "target_date": target,
        "projected_value": value,
    }))
}

/// Arguments for portfolio aggregates
#[derive(Args)]
pub struct AumArgs {
    /// Path to a JSON/YAML document with the holdings
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct AumRequest {
    investments: Vec<Investment>,
    as_of: NaiveDate,
    /// Capital called over the reporting period, for the adjusted figure.
    #[serde(default)]
    period_capital_calls: Option<Money>,
    /// Distributions over the reporting period, for the adjusted figure.
    #[serde(default)]
    period_distributions: Option<Money>,
}

pub fn run_aum(args: AumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AumRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let aum = total_aum(&request.investments, request.as_of);
    let adjusted = adjust_aum_for_transactions(
        aum,
        request.period_capital_calls.unwrap_or_default(),
        request.period_distributions.unwrap_or_default(),
    );

    Ok(serde_json::json!({
        "as_of": request.as_of,
        "total_aum": aum,
        "adjusted_aum": adjusted,
        "weighted_average_irr": weighted_average_irr(&request.investments, request.as_of),
        "portfolio_multiple": portfolio_multiple(&request.investments, request.as_of),
        "approximate_portfolio_irr": approximate_portfolio_irr(&request.investments, request.as_of),
        "holdings": request.investments.len(),
    }))
}
