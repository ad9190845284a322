use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use fund_engine_core::allocation::capital_call::{create_capital_call, update_investor_payment};
use fund_engine_core::allocation::distribution::create_distribution;
use fund_engine_core::records::{CapitalCall, CapitalCallIntent, DistributionIntent};

use crate::input;

/// Arguments for allocating a capital call
#[derive(Args)]
pub struct AllocateCallArgs {
    /// Path to a JSON/YAML document with the capital call intent
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_allocate_call(args: AllocateCallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let intent: CapitalCallIntent = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let call = create_capital_call(&intent)?;
    Ok(serde_json::to_value(call)?)
}

/// Arguments for allocating a distribution
#[derive(Args)]
pub struct AllocateDistributionArgs {
    /// Path to a JSON/YAML document with the distribution intent
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_allocate_distribution(
    args: AllocateDistributionArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let intent: DistributionIntent = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let distribution = create_distribution(&intent)?;
    Ok(serde_json::to_value(distribution)?)
}

/// Arguments for recording an investor payment
#[derive(Args)]
pub struct PayArgs {
    /// Path to a JSON/YAML document with the capital call record
    #[arg(long)]
    pub input: Option<String>,

    /// Paying investor id; overrides the document
    #[arg(long)]
    pub investor: Option<String>,

    /// Payment amount; overrides the document
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Payment date (YYYY-MM-DD); overrides the document
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct PayRequest {
    call: CapitalCall,
    investor_id: Option<String>,
    payment: Option<Decimal>,
    paid_date: Option<NaiveDate>,
}

pub fn run_pay(args: PayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PayRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let investor = args
        .investor
        .or(request.investor_id)
        .ok_or("--investor is required (or provide investor_id in the document)")?;
    let payment = args
        .payment
        .or(request.payment)
        .ok_or("--payment is required (or provide payment in the document)")?;
    let date = args
        .date
        .or(request.paid_date)
        .ok_or("--date is required (or provide paid_date in the document)")?;

    let updated = update_investor_payment(&request.call, &investor, payment, date)?;
    Ok(serde_json::to_value(updated)?)
}
