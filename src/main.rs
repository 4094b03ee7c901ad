use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use footy_predict::api::FootballApiClient;
use footy_predict::config::Config;
use footy_predict::db::Store;
use footy_predict::ingest::IngestionPipeline;
use footy_predict::predict::PredictionGenerator;
use footy_predict::workers::{IngestWorker, PredictionWorker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footy_predict=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting footy-predict");

    // Load configuration; a missing API key aborts before any work begins
    let config = Config::from_env()?;
    info!("Configuration loaded (season {})", config.season);

    // Initialize database
    let store = Arc::new(Store::new(&config.database_url).await?);
    info!("Database initialized");

    // Initialize API client
    let client = FootballApiClient::new(&config.football_api_url, &config.football_api_key);
    info!("API client initialized");

    // Create workers
    let ingest_worker = IngestWorker::new(
        IngestionPipeline::new(client, Arc::clone(&store), config.season),
        config.ingest_interval,
    );

    let prediction_worker = PredictionWorker::new(
        PredictionGenerator::new(Arc::clone(&store)),
        config.predict_interval,
    );

    info!("Workers created, starting...");

    // Spawn workers
    let ingest_handle = tokio::spawn(async move {
        ingest_worker.run().await;
    });

    let prediction_handle = tokio::spawn(async move {
        prediction_worker.run().await;
    });

    info!("All workers started");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = ingest_handle => {
            error!("Ingest worker exited unexpectedly: {:?}", result);
        }
        result = prediction_handle => {
            error!("Prediction worker exited unexpectedly: {:?}", result);
        }
    }

    info!("Shutting down footy-predict");
    Ok(())
}
