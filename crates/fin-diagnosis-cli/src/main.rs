mod commands;
mod input;
mod output;
mod sink;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::diagnosis::{DiagnoseArgs, ExportArgs};
use commands::scoring::ScoreArgs;

/// Two-period financial ratio diagnosis
#[derive(Parser)]
#[command(
    name = "findiag",
    version,
    about = "Two-period financial ratio diagnosis",
    long_about = "Derives 13 KPIs from a current and a prior period's P/L and balance sheet, \
                  scores five health categories on a 1-5 scale and produces an exportable \
                  report. Figures are in thousands of the reporting currency."
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
    /// Run a full diagnosis and print the report
    Diagnose(DiagnoseArgs),
    /// Print statement and KPI rows for spreadsheet export
    Export(ExportArgs),
    /// Score a single value against four thresholds
    Score(ScoreArgs),
    /// Print the KPI scoring table
    Thresholds,
    /// Print the sample input document
    Sample,
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Diagnose(args) => commands::diagnosis::run_diagnose(args),
        Commands::Export(args) => commands::diagnosis::run_export(args),
        Commands::Score(args) => commands::scoring::run_score(args),
        Commands::Thresholds => commands::scoring::run_thresholds(),
        Commands::Sample => commands::diagnosis::run_sample(),
        Commands::Version => {
            println!("findiag {}", env!("CARGO_PKG_VERSION"));
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
