use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use rental_roi_core::analysis::{self, AnalysisRequest};
use rental_roi_core::benchmarks::{default_candidates, BenchmarkCatalog};
use rental_roi_core::mortgage::{self, LoanTerms};
use rental_roi_core::projection::{self, InvestmentParameters};
use rental_roi_core::recommendation;
use rental_roi_core::simulation::{self, ScenarioAdjustments};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct SimulationRequest {
    base: InvestmentParameters,
    #[serde(default)]
    adjustments: ScenarioAdjustments,
}

#[derive(Deserialize)]
struct ComparisonRequest {
    #[serde(default, deserialize_with = "rental_roi_core::coerce::lenient_decimal")]
    net_rental_yield: Decimal,
    #[serde(default)]
    benchmarks: Option<BenchmarkCatalog>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let request: AnalysisRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    request.validate().map_err(to_napi_error)?;
    let output = analysis::analyze_property(&request);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_investment(input_json: String) -> NapiResult<String> {
    let params: InvestmentParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = projection::project(&params);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn recommend_investment(input_json: String) -> NapiResult<String> {
    let request: AnalysisRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    request.validate().map_err(to_napi_error)?;
    let candidates = request.candidates.unwrap_or_else(default_candidates);
    let result = projection::project(&request.params);
    let output = recommendation::recommend(&result, &request.params, &candidates);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage_payment(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage::summarize(&terms);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_scenario(input_json: String) -> NapiResult<String> {
    let request: SimulationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simulation::simulate(&request.base, &request.adjustments);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn benchmark_comparison(input_json: String) -> NapiResult<String> {
    let request: ComparisonRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let catalog = request.benchmarks.unwrap_or_default();
    catalog.validate().map_err(to_napi_error)?;
    let output = catalog.compare(request.net_rental_yield);
    serde_json::to_string(&output).map_err(to_napi_error)
}
