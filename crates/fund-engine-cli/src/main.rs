mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocation::{AllocateCallArgs, AllocateDistributionArgs, PayArgs};
use commands::ledger::LedgerArgs;
use commands::performance::{IrrArgs, PerformanceArgs};
use commands::validation::ValidateArgs;
use commands::valuation::{AumArgs, ProjectArgs};

/// Fund performance and capital allocation calculations
#[derive(Parser)]
#[command(
    name = "fen",
    version,
    about = "Fund performance and capital allocation calculations",
    long_about = "Batch surface for the fund administration engine. Computes IRR, \
                  TVPI/DPI/RVPI multiples and gross/net methodology figures, projects \
                  valuations, allocates capital calls and distributions across \
                  investors, rebuilds capital accounts, and cross-validates report \
                  metrics. Inputs are JSON (or YAML) documents of plain records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve IRR from a dated cash-flow series
    Irr(IrrArgs),
    /// Compute fund performance metrics (IRR, multiples, gross/net)
    Performance(PerformanceArgs),
    /// Project an investment's value to a target date
    Project(ProjectArgs),
    /// Portfolio AUM, weighted IRR and multiple at a date
    Aum(AumArgs),
    /// Allocate a capital call across investors pro-rata
    AllocateCall(AllocateCallArgs),
    /// Allocate a distribution across investors pro-rata
    AllocateDistribution(AllocateDistributionArgs),
    /// Record an investor payment against a capital call
    Pay(PayArgs),
    /// Rebuild an investor's capital account history
    Ledger(LedgerArgs),
    /// Cross-validate a report's stored metrics
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Irr(args) => commands::performance::run_irr(args),
        Commands::Performance(args) => commands::performance::run_performance(args),
        Commands::Project(args) => commands::valuation::run_project(args),
        Commands::Aum(args) => commands::valuation::run_aum(args),
        Commands::AllocateCall(args) => commands::allocation::run_allocate_call(args),
        Commands::AllocateDistribution(args) => {
            commands::allocation::run_allocate_distribution(args)
        }
        Commands::Pay(args) => commands::allocation::run_pay(args),
        Commands::Ledger(args) => commands::ledger::run_ledger(args),
        Commands::Validate(args) => commands::validation::run_validate(args),
        Commands::Version => {
            println!("fen {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
