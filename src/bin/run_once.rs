use std::env;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use footy_predict::api::FootballApiClient;
use footy_predict::config::Config;
use footy_predict::db::Store;
use footy_predict::ingest::IngestionPipeline;
use footy_predict::predict::PredictionGenerator;

/// Manual trigger: run one ingestion pass and one prediction pass, then
/// exit. `--ingest-only` / `--predict-only` limit the run to one phase.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "run_once=info,footy_predict=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let ingest_only = args.iter().any(|a| a == "--ingest-only");
    let predict_only = args.iter().any(|a| a == "--predict-only");

    let config = Config::from_env()?;
    let store = Arc::new(Store::new(&config.database_url).await?);

    if !predict_only {
        let client = FootballApiClient::new(&config.football_api_url, &config.football_api_key);
        let pipeline = IngestionPipeline::new(client, Arc::clone(&store), config.season);

        info!("Running ingestion pass (season {})", config.season);
        pipeline.run().await;
    }

    if !ingest_only {
        let generator = PredictionGenerator::new(Arc::clone(&store));

        info!("Running prediction pass");
        generator.generate_predictions().await;
    }

    info!(
        "Done: {} matches, {} predictions in store",
        store.get_match_count().await?,
        store.get_prediction_count().await?
    );

    Ok(())
}
