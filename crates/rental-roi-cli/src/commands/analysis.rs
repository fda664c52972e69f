use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use rental_roi_core::analysis::{self, AnalysisRequest};
use rental_roi_core::benchmarks::default_candidates;
use rental_roi_core::projection::{self, Financing, InvestmentParameters};
use rental_roi_core::recommendation;

use crate::input;

/// Property and financing inputs shared by the analysis commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PropertyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Expected monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Monthly operating expenses (community fees, insurance, maintenance)
    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,

    /// One-time costs (taxes, notary, refurbishment)
    #[arg(long)]
    pub one_time_costs: Option<Decimal>,

    /// Annual property appreciation in percent (e.g. 3 for 3%)
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Annual rent increase in percent
    #[arg(long)]
    pub rent_increase: Option<Decimal>,

    /// Vacancy rate in percent of gross rent
    #[arg(long)]
    pub vacancy_rate: Option<Decimal>,

    /// Finance the purchase with a mortgage
    #[arg(long)]
    pub financed: bool,

    /// Down payment (financed purchases only)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Mortgage interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long, default_value = "30")]
    pub loan_term: Decimal,
}

/// Arguments for the full analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Replacement benchmark catalog (JSON or YAML)
    #[arg(long)]
    pub benchmarks: Option<String>,

    /// Replacement alternative-property listings (JSON or YAML)
    #[arg(long)]
    pub candidates: Option<String>,
}

/// Arguments for the projection table
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

/// Arguments for the recommendation
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Alternative-property listings to suggest from (JSON or YAML)
    #[arg(long)]
    pub candidates: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request = read_request(&args.property)?;
    if let Some(ref path) = args.benchmarks {
        request.benchmarks = Some(input::file::read_benchmarks(path)?);
    }
    if let Some(ref path) = args.candidates {
        request.candidates = Some(input::file::read_candidates(path)?);
    }

    let result = analysis::analyze_property(&request);
    Ok(serde_json::to_value(result)?)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args.property)?;
    let result = projection::project(&request.params);
    Ok(serde_json::to_value(result)?)
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args.property)?;
    let candidates = match args.candidates {
        Some(ref path) => input::file::read_candidates(path)?,
        None => request.candidates.clone().unwrap_or_else(default_candidates),
    };

    let analysis = projection::project(&request.params);
    let result = recommendation::recommend(&analysis, &request.params, &candidates);
    Ok(serde_json::to_value(result)?)
}

/// Input file, then stdin, then flags. Inline catalogs are validated.
pub(crate) fn read_request(
    args: &PropertyArgs,
) -> Result<AnalysisRequest, Box<dyn std::error::Error>> {
    let request: AnalysisRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        parameters_from_flags(args)?.into()
    };
    request.validate()?;
    Ok(request)
}

fn parameters_from_flags(
    args: &PropertyArgs,
) -> Result<InvestmentParameters, Box<dyn std::error::Error>> {
    let purchase_price = args
        .purchase_price
        .ok_or("--purchase-price is required (or provide --input)")?;
    let monthly_rent = args
        .monthly_rent
        .ok_or("--monthly-rent is required (or provide --input)")?;

    let financing = if args.financed {
        Financing {
            use_financing: true,
            down_payment: args
                .down_payment
                .ok_or("--down-payment is required with --financed")?,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required with --financed")?,
            loan_term_years: args.loan_term,
        }
    } else {
        Financing::default()
    };

    Ok(InvestmentParameters {
        purchase_price,
        monthly_rent,
        monthly_expenses: args.monthly_expenses.unwrap_or(Decimal::ZERO),
        one_time_costs: args.one_time_costs.unwrap_or(Decimal::ZERO),
        annual_appreciation: args.appreciation.unwrap_or(dec!(3)),
        annual_rent_increase: args.rent_increase.unwrap_or(dec!(2)),
        vacancy_rate: args.vacancy_rate.unwrap_or(dec!(5)),
        financing,
    })
}
