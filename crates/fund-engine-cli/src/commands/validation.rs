use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use fund_engine_core::datasource::InMemoryFundData;
use fund_engine_core::records::FundReport;
use fund_engine_core::validation::metrics_validator::validate_report_metrics;

use crate::input;

/// Arguments for report metric validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON/YAML document with the report and fund records
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct ValidateRequest {
    report: FundReport,
    records: InMemoryFundData,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ValidateRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };

    let result = validate_report_metrics(&request.report, &request.records);
    Ok(serde_json::to_value(result)?)
}
