use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use fund_engine_core::datasource::InMemoryFundData;
use fund_engine_core::ledger::capital_account::build_capital_account;

use crate::input;

/// Arguments for rebuilding a capital account
#[derive(Args)]
pub struct LedgerArgs {
    /// Path to a JSON/YAML document with the fund records
    #[arg(long)]
    pub input: Option<String>,

    /// Fund id; overrides the document
    #[arg(long)]
    pub fund: Option<String>,

    /// Investor id; overrides the document
    #[arg(long)]
    pub investor: Option<String>,
}

#[derive(Deserialize)]
struct LedgerRequest {
    fund_id: Option<String>,
    investor_id: Option<String>,
    records: InMemoryFundData,
}

pub fn run_ledger(args: LedgerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LedgerRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let fund = args
        .fund
        .or(request.fund_id)
        .ok_or("--fund is required (or provide fund_id in the document)")?;
    let investor = args
        .investor
        .or(request.investor_id)
        .ok_or("--investor is required (or provide investor_id in the document)")?;

    let events = build_capital_account(&fund, &investor, &request.records);
    let closing_balance = events
        .last()
        .map(|e| e.running_balance)
        .unwrap_or_default();

    Ok(serde_json::json!({
        "fund_id": fund,
        "investor_id": investor,
        "closing_balance": closing_balance,
        "events": events,
    }))
}
