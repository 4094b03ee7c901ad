pub mod ingest_worker;
pub mod prediction_worker;

pub use ingest_worker::IngestWorker;
pub use prediction_worker::PredictionWorker;
