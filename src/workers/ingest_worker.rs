use std::time::Duration;

use tokio::time;
use tracing::info;

use crate::ingest::IngestionPipeline;

/// Worker that runs a full ingestion pass on a fixed interval
pub struct IngestWorker {
    pipeline: IngestionPipeline,
    interval: Duration,
}

impl IngestWorker {
    pub fn new(pipeline: IngestionPipeline, interval_secs: u64) -> Self {
        Self {
            pipeline,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run the worker loop. Each pass handles its own failures; the loop
    /// never exits.
    pub async fn run(&self) {
        info!("Ingest worker started (interval: {:?})", self.interval);

        let mut interval = time::interval(self.interval);

        loop {
            interval.tick().await;
            self.pipeline.run().await;
        }
    }
}
