use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::benchmarks::{
    default_candidates, validate_candidates, AlternativeProperty, Benchmark, BenchmarkCatalog,
};
use crate::error::RentalRoiError;
use crate::projection::{operating_income, project, AnalysisResult, InvestmentParameters};
use crate::recommendation::{recommend, RecommendationResult};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RentalRoiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameter snapshot plus optional replacement catalogs.
///
/// The parameter fields sit at the top level, so a bare
/// `InvestmentParameters` document is also a valid request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub params: InvestmentParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<BenchmarkCatalog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<AlternativeProperty>>,
}

impl AnalysisRequest {
    /// Check any supplied catalogs: unique non-empty benchmark names,
    /// unique listing ids, non-negative listing prices and rents.
    pub fn validate(&self) -> RentalRoiResult<()> {
        if let Some(ref catalog) = self.benchmarks {
            catalog.validate()?;
        }
        if let Some(ref candidates) = self.candidates {
            validate_candidates(candidates)?;
        }
        Ok(())
    }
}

impl From<InvestmentParameters> for AnalysisRequest {
    fn from(params: InvestmentParameters) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }
}

/// Everything the advisory screen shows for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    pub analysis: AnalysisResult,
    pub recommendation: RecommendationResult,
    pub benchmark_comparison: Vec<Benchmark>,
}

/// Snapshot handed to whatever persists analyses for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAnalysis {
    pub label: String,
    pub saved_at: DateTime<Utc>,
    /// Cash put into the deal
    pub investment: Money,
    /// Monthly cash flow after debt service
    pub monthly_return: Money,
    /// Net rental yield
    pub roi: Percent,
}

impl SavedAnalysis {
    pub fn new(
        label: &str,
        result: &AnalysisResult,
        saved_at: DateTime<Utc>,
    ) -> RentalRoiResult<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(RentalRoiError::InvalidInput {
                field: "label".into(),
                reason: "A saved analysis needs a non-empty label".into(),
            });
        }
        Ok(Self {
            label: label.to_string(),
            saved_at,
            investment: result.total_investment,
            monthly_return: result.monthly_cash_flow,
            roi: result.net_rental_yield,
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project, recommend and compare in one pass.
///
/// Never fails: questionable inputs surface as warnings in the envelope.
pub fn analyze_property(request: &AnalysisRequest) -> ComputationOutput<PropertyAnalysis> {
    let start = Instant::now();
    let params = &request.params;
    let warnings = validate_parameters(params);
    for warning in &warnings {
        warn!("{warning}");
    }

    let analysis = project(params);

    let default_listings;
    let candidates: &[AlternativeProperty] = match &request.candidates {
        Some(list) => list,
        None => {
            default_listings = default_candidates();
            &default_listings
        }
    };
    let recommendation = recommend(&analysis, params, candidates);

    let benchmark_comparison = match &request.benchmarks {
        Some(catalog) => catalog.compare(analysis.net_rental_yield),
        None => BenchmarkCatalog::standard().compare(analysis.net_rental_yield),
    };

    debug!(
        "analysis complete: yield={}% should_buy={}",
        analysis.net_rental_yield, recommendation.should_buy
    );

    let output = PropertyAnalysis {
        analysis,
        recommendation,
        benchmark_comparison,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Rental Property ROI Analysis (15-year projection, rule-based recommendation)",
        params,
        warnings,
        elapsed,
        output,
    )
}

/// Sanity checks on a parameter snapshot. Returns warnings, never errors.
pub fn validate_parameters(params: &InvestmentParameters) -> Vec<String> {
    let mut warnings = Vec::new();

    let amounts = [
        ("purchase_price", params.purchase_price),
        ("monthly_rent", params.monthly_rent),
        ("monthly_expenses", params.monthly_expenses),
        ("one_time_costs", params.one_time_costs),
    ];
    for (field, value) in amounts {
        if value < Decimal::ZERO {
            warnings.push(format!("{field} is negative ({value})"));
        }
    }

    if params.purchase_price.is_zero() {
        warnings.push("Purchase price is zero; yield is reported as 0%".to_string());
    }

    if params.vacancy_rate < Decimal::ZERO || params.vacancy_rate > dec!(100) {
        warnings.push(format!(
            "Vacancy rate {}% is outside 0%..100%",
            params.vacancy_rate
        ));
    }

    let financing = &params.financing;
    if financing.use_financing {
        if financing.down_payment > params.purchase_price {
            warnings.push(format!(
                "Down payment {} exceeds purchase price {}; no loan is modelled",
                financing.down_payment, params.purchase_price
            ));
        }
        if financing.loan_term_years <= Decimal::ZERO {
            warnings.push(
                "Financing enabled with a zero loan term; no payment is modelled".to_string(),
            );
        }
        if financing.interest_rate <= Decimal::ZERO {
            warnings.push(
                "Financing enabled with a zero interest rate; no payment is modelled".to_string(),
            );
        }
    }

    let (_, noi) = operating_income(
        params.monthly_rent.saturating_mul(dec!(12)),
        params.vacancy_rate,
        params.monthly_expenses.saturating_mul(dec!(12)),
    );
    if noi <= Decimal::ZERO {
        warnings.push(format!(
            "Net operating income is {noi}; the investment never breaks even"
        ));
    }

    warnings
}
