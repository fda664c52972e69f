use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_roi_core::mortgage::{self, LoanTerms};

use crate::input;

/// Arguments for the mortgage calculator
#[derive(Args)]
pub struct MortgageArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 4.5 for 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long, default_value = "30")]
    pub term: Decimal,

    /// Include the year-by-year amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.term,
            include_schedule: false,
        }
    };
    terms.include_schedule |= args.schedule;

    let result = mortgage::summarize(&terms);
    Ok(serde_json::to_value(result)?)
}
