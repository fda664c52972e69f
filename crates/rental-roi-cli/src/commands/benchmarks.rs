use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_roi_core::benchmarks::BenchmarkCatalog;

use crate::input;

/// Arguments for the benchmark comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BenchmarksArgs {
    /// Net rental yield of the property in percent
    #[arg(long, default_value = "0")]
    pub yield_pct: Decimal,

    /// Replacement benchmark catalog (JSON or YAML)
    #[arg(long)]
    pub catalog: Option<String>,
}

pub fn run_benchmarks(args: BenchmarksArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = match args.catalog {
        Some(ref path) => input::file::read_benchmarks(path)?,
        None => BenchmarkCatalog::standard(),
    };
    let rows = catalog.compare(args.yield_pct);
    Ok(serde_json::to_value(rows)?)
}
