pub mod analysis;
pub mod benchmarks;
pub mod mortgage;
pub mod simulation;
