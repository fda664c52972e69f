use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::RentalRoiError;
use crate::types::{as_percent, ratio_or_zero, Money, Percent};
use crate::RentalRoiResult;

/// Label of the row carrying the property under analysis.
pub const RENTAL_PROPERTY_LABEL: &str = "Rental Property";

// ---------------------------------------------------------------------------
// Alternative investments
// ---------------------------------------------------------------------------

/// A named alternative investment and its typical annual yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub roi: Percent,
}

/// Reference table of alternative-investment yields.
///
/// Serialises as a plain array so a replacement table can be dropped in
/// from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkCatalog {
    pub benchmarks: Vec<Benchmark>,
}

impl Default for BenchmarkCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl BenchmarkCatalog {
    /// Long-run average yields used when no catalog is supplied.
    pub fn standard() -> Self {
        let rows = [
            ("Bank Deposit", dec!(1.5)),
            ("Government Bonds", dec!(2.5)),
            ("Stock Market (S&P 500)", dec!(8)),
            ("REITs", dec!(6)),
        ];
        Self {
            benchmarks: rows
                .into_iter()
                .map(|(name, roi)| Benchmark {
                    name: name.to_string(),
                    roi,
                })
                .collect(),
        }
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> RentalRoiResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Names must be non-empty and unique.
    pub fn validate(&self) -> RentalRoiResult<()> {
        let mut seen = HashSet::new();
        for benchmark in &self.benchmarks {
            let name = benchmark.name.trim();
            if name.is_empty() {
                return Err(RentalRoiError::InvalidInput {
                    field: "name".into(),
                    reason: "Benchmark name must not be empty".into(),
                });
            }
            if name == RENTAL_PROPERTY_LABEL {
                return Err(RentalRoiError::InvalidInput {
                    field: "name".into(),
                    reason: format!("'{RENTAL_PROPERTY_LABEL}' is reserved for the analysed property"),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(RentalRoiError::DuplicateEntry(name.to_string()));
            }
        }
        Ok(())
    }

    /// Side-by-side table: the analysed property first, then the catalog in
    /// its own order.
    pub fn compare(&self, current_yield: Percent) -> Vec<Benchmark> {
        let mut rows = Vec::with_capacity(self.benchmarks.len() + 1);
        rows.push(Benchmark {
            name: RENTAL_PROPERTY_LABEL.to_string(),
            roi: current_yield,
        });
        rows.extend(self.benchmarks.iter().cloned());
        rows
    }
}

// ---------------------------------------------------------------------------
// Alternative properties
// ---------------------------------------------------------------------------

/// A listed property that may be suggested instead of the one analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeProperty {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub price: Money,
    pub monthly_rent: Money,
    /// Quoted yield; falls back to gross yield when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl AlternativeProperty {
    /// Quoted yield if present, else annual rent over price.
    pub fn effective_roi(&self) -> Percent {
        self.roi.unwrap_or_else(|| gross_yield(self.price, self.monthly_rent))
    }
}

/// Annual rent / price, percent. Zero for a zero price.
pub fn gross_yield(price: Money, monthly_rent: Money) -> Percent {
    as_percent(ratio_or_zero(monthly_rent.saturating_mul(dec!(12)), price))
}

/// Sample listings used when the caller supplies none.
pub fn default_candidates() -> Vec<AlternativeProperty> {
    vec![
        listing(
            "rec1",
            "Modern Apartment Chamberí",
            "Chamberí, Madrid",
            dec!(195000),
            dec!(1380),
            dec!(8.5),
            2019,
            "75m²",
            "Apartment",
            &["Recently renovated", "Premium area", "Metro 2 min away"],
        ),
        listing(
            "rec2",
            "Bright Flat Eixample",
            "Eixample, Barcelona",
            dec!(220000),
            dec!(1500),
            dec!(8.2),
            2020,
            "80m²",
            "Flat",
            &["Fully refurbished", "Balcony", "Parking included"],
        ),
        listing(
            "rec3",
            "Old Town Studio",
            "Centro, Sevilla",
            dec!(85000),
            dec!(650),
            dec!(9.2),
            2018,
            "45m²",
            "Studio",
            &["High tourist demand", "Fully furnished", "Guaranteed yield"],
        ),
        listing(
            "rec4",
            "University Apartment",
            "Moncloa, Madrid",
            dec!(165000),
            dec!(1250),
            dec!(9.1),
            2017,
            "60m²",
            "Apartment",
            &["University district", "Stable demand", "Low maintenance"],
        ),
    ]
}

/// Parse and validate a candidate list from JSON.
pub fn candidates_from_json(json: &str) -> RentalRoiResult<Vec<AlternativeProperty>> {
    let candidates: Vec<AlternativeProperty> = serde_json::from_str(json)?;
    validate_candidates(&candidates)?;
    Ok(candidates)
}

/// Ids must be non-empty and unique; prices and rents non-negative.
pub fn validate_candidates(candidates: &[AlternativeProperty]) -> RentalRoiResult<()> {
    let mut seen = HashSet::new();
    for candidate in candidates {
        if candidate.id.trim().is_empty() {
            return Err(RentalRoiError::InvalidInput {
                field: "id".into(),
                reason: format!("Listing '{}' has an empty id", candidate.title),
            });
        }
        if candidate.price < Decimal::ZERO {
            return Err(RentalRoiError::InvalidInput {
                field: "price".into(),
                reason: format!("Listing '{}' has a negative price", candidate.id),
            });
        }
        if candidate.monthly_rent < Decimal::ZERO {
            return Err(RentalRoiError::InvalidInput {
                field: "monthly_rent".into(),
                reason: format!("Listing '{}' has a negative rent", candidate.id),
            });
        }
        if !seen.insert(candidate.id.as_str()) {
            return Err(RentalRoiError::DuplicateEntry(candidate.id.clone()));
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    location: &str,
    price: Money,
    monthly_rent: Money,
    roi: Percent,
    year_built: u32,
    size: &str,
    property_type: &str,
    highlights: &[&str],
) -> AlternativeProperty {
    AlternativeProperty {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        price,
        monthly_rent,
        roi: Some(roi),
        year_built: Some(year_built),
        size: Some(size.to_string()),
        property_type: Some(property_type.to_string()),
        highlights: highlights.iter().map(|h| h.to_string()).collect(),
    }
}
