mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::analysis::{AnalyzeArgs, ProjectArgs, RecommendArgs};
use commands::benchmarks::BenchmarksArgs;
use commands::mortgage::MortgageArgs;
use commands::simulation::SimulateArgs;

/// Rental property return-on-investment analysis
#[derive(Parser)]
#[command(
    name = "rroi",
    version,
    about = "Rental property return-on-investment analysis",
    long_about = "A CLI for analysing buy-to-let property investments with decimal \
                  precision. Projects 15 years of returns, sizes the mortgage, \
                  recommends buy or pass, and compares against alternative investments."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis: projection, recommendation and benchmark comparison
    Analyze(AnalyzeArgs),
    /// Monthly mortgage payment and optional amortization schedule
    Mortgage(MortgageArgs),
    /// 15-year projection of cash flow, value and ROI
    Project(ProjectArgs),
    /// Buy or pass recommendation with tips and alternatives
    Recommend(RecommendArgs),
    /// Re-run the headline metrics with adjusted rent, expenses and vacancy
    Simulate(SimulateArgs),
    /// Compare a yield against alternative investments
    Benchmarks(BenchmarksArgs),
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

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Project(args) => commands::analysis::run_project(args),
        Commands::Recommend(args) => commands::analysis::run_recommend(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Benchmarks(args) => commands::benchmarks::run_benchmarks(args),
        Commands::Version => {
            println!("rroi {}", env!("CARGO_PKG_VERSION"));
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
