use std::time::Duration;

use tokio::time;
use tracing::info;

use crate::predict::PredictionGenerator;

/// Worker that regenerates predictions on a fixed interval
pub struct PredictionWorker {
    generator: PredictionGenerator,
    interval: Duration,
}

impl PredictionWorker {
    pub fn new(generator: PredictionGenerator, interval_secs: u64) -> Self {
        Self {
            generator,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run the worker loop
    pub async fn run(&self) {
        info!("Prediction worker started (interval: {:?})", self.interval);

        let mut interval = time::interval(self.interval);

        loop {
            interval.tick().await;
            self.generator.generate_predictions().await;
        }
    }
}
