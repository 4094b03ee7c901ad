pub mod aggregator;
pub mod engine;
pub mod generator;

pub use aggregator::FormAggregator;
pub use generator::PredictionGenerator;
