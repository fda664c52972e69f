use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed as whole numbers (5 = 5%), the way investors
/// quote yields, vacancy and growth assumptions.
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Divide, returning zero when the denominator is zero.
///
/// Every ratio in the engine resolves degenerate inputs to a numeric
/// sentinel instead of failing: a quotient too large for `Decimal`
/// saturates at `Decimal::MAX` or `Decimal::MIN`.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// `value * pct / 100`, saturating.
pub(crate) fn percent_of(value: Decimal, pct: Percent) -> Decimal {
    value.saturating_mul(pct / Decimal::ONE_HUNDRED)
}

/// Ratio to percent, saturating.
pub(crate) fn as_percent(ratio: Decimal) -> Percent {
    ratio.saturating_mul(Decimal::ONE_HUNDRED)
}

/// `(1 + pct/100)^periods` via iterative multiplication, saturating at
/// `Decimal::MAX` / `Decimal::MIN`.
pub(crate) fn compound_factor(pct: Percent, periods: u32) -> Decimal {
    let step = Decimal::ONE.saturating_add(pct / Decimal::ONE_HUNDRED);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.saturating_mul(step);
    }
    factor
}
