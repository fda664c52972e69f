use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::coerce::lenient_decimal;
use crate::projection::{operating_income, total_investment, InvestmentParameters};
use crate::types::{
    as_percent, compound_factor, percent_of, ratio_or_zero, with_metadata, ComputationOutput,
    Money, Percent, Years,
};

/// Horizon of the simplified ROI figure.
const SIMULATION_YEARS: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What-if tweaks applied on top of a base snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustments {
    /// Relative change to monthly rent, percent (-10 = 10% cheaper)
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rent_pct: Percent,
    /// Relative change to monthly expenses, percent
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub expenses_pct: Percent,
    /// Replacement vacancy rate; the base rate is kept when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_rate: Option<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub adjusted_monthly_rent: Money,
    pub adjusted_monthly_expenses: Money,
    pub vacancy_rate: Percent,
    /// NOI / 12; debt service is left out of the simulation
    pub monthly_cash_flow: Money,
    pub net_rental_yield: Percent,
    pub break_even_years: Option<Years>,
    /// Ten years of flat cash flow plus appreciation over cash invested
    pub roi_10_year: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Re-run the headline metrics with adjusted rent, expenses and vacancy.
///
/// This is the quick slider model: no mortgage, no rent growth, cash flow
/// held flat for ten years.
pub fn simulate(
    base: &InvestmentParameters,
    adjustments: &ScenarioAdjustments,
) -> ComputationOutput<SimulationResult> {
    let start = Instant::now();
    let warnings = adjustment_warnings(adjustments);

    let adjusted_monthly_rent = base
        .monthly_rent
        .saturating_add(percent_of(base.monthly_rent, adjustments.rent_pct));
    let adjusted_monthly_expenses = base
        .monthly_expenses
        .saturating_add(percent_of(base.monthly_expenses, adjustments.expenses_pct));
    let vacancy_rate = adjustments.vacancy_rate.unwrap_or(base.vacancy_rate);

    let (_, noi) = operating_income(
        adjusted_monthly_rent.saturating_mul(dec!(12)),
        vacancy_rate,
        adjusted_monthly_expenses.saturating_mul(dec!(12)),
    );
    let invested = total_investment(base);
    let monthly_cash_flow = noi / dec!(12);
    let net_rental_yield = as_percent(ratio_or_zero(noi, base.purchase_price));
    let break_even_years = if noi > Decimal::ZERO {
        Some(ratio_or_zero(invested, noi))
    } else {
        None
    };

    let cash_flow_total = noi.saturating_mul(Decimal::from(SIMULATION_YEARS));
    let appreciation = base.purchase_price.saturating_mul(
        compound_factor(base.annual_appreciation, SIMULATION_YEARS).saturating_sub(Decimal::ONE),
    );
    let roi_10_year = if invested > Decimal::ZERO {
        as_percent(ratio_or_zero(cash_flow_total.saturating_add(appreciation), invested))
    } else {
        Decimal::ZERO
    };

    debug!("simulated scenario {adjustments:?}: monthly_cf={monthly_cash_flow} roi_10y={roi_10_year}");

    let result = SimulationResult {
        adjusted_monthly_rent,
        adjusted_monthly_expenses,
        vacancy_rate,
        monthly_cash_flow,
        net_rental_yield,
        break_even_years,
        roi_10_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Scenario Simulation (unlevered, flat 10-year cash flow)",
        &serde_json::json!({ "base": base, "adjustments": adjustments }),
        warnings,
        elapsed,
        result,
    )
}

/// Flags adjustments outside the ranges the slider panel offers.
fn adjustment_warnings(adjustments: &ScenarioAdjustments) -> Vec<String> {
    let mut warnings = Vec::new();
    if adjustments.rent_pct < dec!(-50) || adjustments.rent_pct > dec!(50) {
        warnings.push(format!(
            "Rent adjustment {}% is outside the usual -50%..+50% range",
            adjustments.rent_pct
        ));
    }
    if adjustments.expenses_pct < dec!(-50) || adjustments.expenses_pct > dec!(100) {
        warnings.push(format!(
            "Expense adjustment {}% is outside the usual -50%..+100% range",
            adjustments.expenses_pct
        ));
    }
    if let Some(vacancy) = adjustments.vacancy_rate {
        if vacancy < Decimal::ZERO || vacancy > dec!(20) {
            warnings.push(format!(
                "Vacancy rate {vacancy}% is outside the usual 0%..20% range"
            ));
        }
    }
    warnings
}
