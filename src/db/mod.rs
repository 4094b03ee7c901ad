pub mod catalog;
pub mod matches;
pub mod predictions;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

/// SQLite store owning every persisted entity. The ingestion pipeline and
/// prediction generator write through it; the read layer only queries.
pub struct Store {
    pub(crate) pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        // Parse connection options, enable create_if_missing and FK cascades
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leagues (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                country TEXT,
                season INTEGER NOT NULL,
                round TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create leagues table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS venues (
                id INTEGER PRIMARY KEY,
                name TEXT,
                city TEXT,
                capacity INTEGER,
                surface TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create venues table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                code TEXT,
                country TEXT,
                founded INTEGER,
                national INTEGER NOT NULL DEFAULT 0,
                venue_id INTEGER REFERENCES venues (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create teams table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                referee TEXT,
                venue_id INTEGER REFERENCES venues (id) ON DELETE CASCADE,
                league_id INTEGER NOT NULL REFERENCES leagues (id) ON DELETE CASCADE,
                home_team_id INTEGER NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
                away_team_id INTEGER NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
                home_goals INTEGER,
                away_goals INTEGER,
                halftime_home INTEGER,
                halftime_away INTEGER,
                extratime_home INTEGER,
                extratime_away INTEGER,
                penalty_home INTEGER,
                penalty_away INTEGER,
                status TEXT NOT NULL,
                elapsed INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create matches table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS match_statistics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                match_id INTEGER NOT NULL REFERENCES matches (id) ON DELETE CASCADE,
                team_id INTEGER NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
                shots_total INTEGER,
                shots_on_goal INTEGER,
                ball_possession REAL,
                yellow_cards INTEGER,
                red_cards INTEGER,
                total_passes INTEGER,
                expected_goals REAL,
                UNIQUE (match_id, team_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create match_statistics table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                match_id INTEGER NOT NULL UNIQUE REFERENCES matches (id) ON DELETE CASCADE,
                home_win_probability REAL NOT NULL,
                draw_probability REAL NOT NULL,
                away_win_probability REAL NOT NULL,
                both_teams_score_probability REAL NOT NULL,
                over_2_5_goals_probability REAL NOT NULL,
                under_2_5_goals_probability REAL NOT NULL,
                home_win_or_draw_probability REAL NOT NULL,
                away_win_or_draw_probability REAL NOT NULL,
                home_handicap_probability REAL NOT NULL,
                away_handicap_probability REAL NOT NULL,
                confidence_score REAL NOT NULL,
                prediction_date TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create predictions table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                prediction_id INTEGER NOT NULL REFERENCES predictions (id) ON DELETE CASCADE,
                saved_at TEXT NOT NULL,
                UNIQUE (user_id, prediction_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user_predictions table")?;

        // Indexes for the aggregator's history queries
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_matches_home_team
            ON matches (home_team_id, status, date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_matches_away_team
            ON matches (away_team_id, status, date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_matches_status_date
            ON matches (status, date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
