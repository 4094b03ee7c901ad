use std::env;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Football data API base URL
    pub football_api_url: String,

    /// Football data API key. Required: ingestion cannot run without it.
    pub football_api_key: String,

    /// Season start year to ingest (European convention)
    pub season: i32,

    /// Interval in seconds between ingestion passes
    pub ingest_interval: u64,

    /// Interval in seconds between prediction generation passes
    pub predict_interval: u64,

    /// SQLite database path
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            football_api_url: env::var("FOOTBALL_API_URL")
                .unwrap_or_else(|_| "https://v3.football.api-sports.io".to_string()),

            football_api_key: env::var("FOOTBALL_API_KEY")
                .context("FOOTBALL_API_KEY must be set")?,

            season: match env::var("SEASON") {
                Ok(v) => v.parse().context("SEASON must be a valid year")?,
                Err(_) => current_season(),
            },

            ingest_interval: env::var("INGEST_INTERVAL")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("INGEST_INTERVAL must be a valid number")?,

            predict_interval: env::var("PREDICT_INTERVAL")
                .unwrap_or_else(|_| "7200".to_string())
                .parse()
                .context("PREDICT_INTERVAL must be a valid number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/footy.db".to_string()),
        })
    }
}

/// European seasons are labeled by their start year: a match in May 2026
/// still belongs to the 2025 season.
fn current_season() -> i32 {
    let now = Utc::now();
    if now.month() >= 7 {
        now.year()
    } else {
        now.year() - 1
    }
}
