mod aggregator;
mod matrix;

pub use aggregator::{EvolutionAggregator, FailurePolicy};
pub use matrix::{EvolutionMatrix, EvolutionReport, EvolutionRow, FileFailure};
