//! Rental property investment analysis.
//!
//! Given purchase, financing and operating assumptions for a single
//! property, the engine derives net operating income, cash flow, yield and
//! break-even time, projects returns over fifteen years, and turns the
//! result into buy/no-buy advice. Every entry point is a pure function of
//! its input snapshot.

pub mod coerce;
pub mod error;
pub mod mortgage;
pub mod projection;
pub mod types;

#[cfg(feature = "advisory")]
pub mod analysis;

#[cfg(feature = "advisory")]
pub mod benchmarks;

#[cfg(feature = "advisory")]
pub mod recommendation;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::RentalRoiError;
pub use types::*;

/// Standard result type for the fallible edges (catalog loading, snapshots)
pub type RentalRoiResult<T> = Result<T, RentalRoiError>;
