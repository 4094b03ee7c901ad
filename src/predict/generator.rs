use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use crate::db::Store;
use crate::models::Match;

use super::aggregator::FormAggregator;
use super::engine;

/// Predictions are generated for scheduled matches within this horizon
const PREDICTION_HORIZON_HOURS: i64 = 48;

/// Orchestrates one prediction pass: upcoming matches are aggregated,
/// scored and upserted one at a time. One match's failure never affects
/// the others.
pub struct PredictionGenerator {
    store: Arc<Store>,
    aggregator: FormAggregator,
}

impl PredictionGenerator {
    pub fn new(store: Arc<Store>) -> Self {
        let aggregator = FormAggregator::new(Arc::clone(&store));
        Self { store, aggregator }
    }

    /// Generate (or regenerate) predictions for all scheduled matches
    /// kicking off within the next 48 hours
    pub async fn generate_predictions(&self) {
        let upcoming = match self.store.scheduled_within_hours(PREDICTION_HORIZON_HOURS).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Failed to load upcoming matches: {:#}", e);
                return;
            }
        };

        info!("Generating predictions for {} upcoming matches", upcoming.len());

        let mut generated = 0;
        let mut failed = 0;

        for m in &upcoming {
            match self.predict_match(m).await {
                Ok(()) => generated += 1,
                Err(e) => {
                    error!("Failed to predict match {}: {:#}", m.id, e);
                    failed += 1;
                }
            }
        }

        info!("Prediction pass complete: {} generated, {} failed", generated, failed);
    }

    /// Aggregate history for both sides and overwrite the match's snapshot
    pub async fn predict_match(&self, m: &Match) -> Result<()> {
        let home_stats = self.aggregator.get_team_form_stats(m.home_team_id, true).await;
        let away_stats = self.aggregator.get_team_form_stats(m.away_team_id, false).await;
        let h2h_stats = self
            .aggregator
            .get_head_to_head_stats(m.home_team_id, m.away_team_id)
            .await;

        let prediction = engine::predict(m.id, &home_stats, &away_stats, &h2h_stats, Utc::now());

        self.store.upsert_prediction(&prediction).await?;

        info!(
            "Match {} | home {:.1}% / draw {:.1}% / away {:.1}% | confidence {:.2}",
            m.id,
            prediction.home_win_probability * 100.0,
            prediction.draw_probability * 100.0,
            prediction.away_win_probability * 100.0,
            prediction.confidence_score,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{League, MatchStatus, Team};
    use chrono::Duration;

    async fn seeded_store() -> Arc<Store> {
        let store = Store::new("sqlite::memory:").await.unwrap();

        store
            .upsert_league(&League {
                id: 39,
                name: "Premier League".to_string(),
                country: Some("England".to_string()),
                season: 2025,
                round: None,
            })
            .await
            .unwrap();

        for (id, name) in [(33, "Manchester United"), (40, "Liverpool"), (42, "Arsenal")] {
            store
                .upsert_team(&Team {
                    id,
                    name: name.to_string(),
                    code: None,
                    country: None,
                    founded: None,
                    national: false,
                    venue_id: None,
                })
                .await
                .unwrap();
        }

        Arc::new(store)
    }

    fn fixture(id: i64, home: i64, away: i64, status: MatchStatus, hours_from_now: i64) -> Match {
        Match {
            id,
            date: Utc::now() + Duration::hours(hours_from_now),
            referee: None,
            venue_id: None,
            league_id: 39,
            home_team_id: home,
            away_team_id: away,
            home_goals: None,
            away_goals: None,
            halftime_home: None,
            halftime_away: None,
            extratime_home: None,
            extratime_away: None,
            penalty_home: None,
            penalty_away: None,
            status,
            elapsed: None,
        }
    }

    #[tokio::test]
    async fn test_generates_for_upcoming_window_only() {
        let store = seeded_store().await;

        // In window, outside window, and already live
        store.upsert_match(&fixture(1, 33, 40, MatchStatus::Scheduled, 12)).await.unwrap();
        store.upsert_match(&fixture(2, 40, 42, MatchStatus::Scheduled, 24 * 7)).await.unwrap();
        store.upsert_match(&fixture(3, 42, 33, MatchStatus::Live, 1)).await.unwrap();

        let generator = PredictionGenerator::new(Arc::clone(&store));
        generator.generate_predictions().await;

        assert_eq!(store.get_prediction_count().await.unwrap(), 1);
        assert!(store.get_prediction_for_match(1).await.unwrap().is_some());
        assert!(store.get_prediction_for_match(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_history_still_produces_prediction() {
        let store = seeded_store().await;
        let m = fixture(1, 33, 40, MatchStatus::Scheduled, 12);
        store.upsert_match(&m).await.unwrap();

        let generator = PredictionGenerator::new(Arc::clone(&store));
        generator.predict_match(&m).await.unwrap();

        // Neutral defaults feed the engine, so the baseline values land
        let p = store.get_prediction_for_match(1).await.unwrap().unwrap();
        assert!((p.home_win_probability - 0.65 / 1.2).abs() < 1e-9);
        assert!((p.away_win_probability - 0.44 / 1.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_regeneration_overwrites_snapshot() {
        let store = seeded_store().await;
        let m = fixture(1, 33, 40, MatchStatus::Scheduled, 12);
        store.upsert_match(&m).await.unwrap();

        let generator = PredictionGenerator::new(Arc::clone(&store));
        generator.predict_match(&m).await.unwrap();

        // A finished meeting changes the h2h inputs for the second pass
        let mut past = fixture(2, 33, 40, MatchStatus::Finished, -24);
        past.home_goals = Some(3);
        past.away_goals = Some(0);
        store.upsert_match(&past).await.unwrap();

        generator.predict_match(&m).await.unwrap();

        assert_eq!(store.get_prediction_count().await.unwrap(), 1);
        let p = store.get_prediction_for_match(1).await.unwrap().unwrap();
        // Home won the only recorded meeting, so the h2h ratio is 1
        assert!(p.home_win_probability > 0.65 / 1.2);
    }
}
