use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_roi_core::simulation::{self, ScenarioAdjustments};

use super::analysis::{read_request, PropertyArgs};

/// Arguments for a what-if scenario
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Change to monthly rent in percent (e.g. -10)
    #[arg(long, default_value = "0")]
    pub rent_pct: Decimal,

    /// Change to monthly expenses in percent
    #[arg(long, default_value = "0")]
    pub expenses_pct: Decimal,

    /// Replacement vacancy rate in percent
    #[arg(long)]
    pub vacancy: Option<Decimal>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args.property)?;
    let adjustments = ScenarioAdjustments {
        rent_pct: args.rent_pct,
        expenses_pct: args.expenses_pct,
        vacancy_rate: args.vacancy,
    };

    let result = simulation::simulate(&request.params, &adjustments);
    Ok(serde_json::to_value(result)?)
}
