use anyhow::{Context, Result};
use chrono::Utc;

use crate::models::{Prediction, UserPrediction};

use super::matches::parse_stored_date;
use super::Store;

impl Store {
    /// Insert or overwrite the prediction snapshot for a match
    pub async fn upsert_prediction(&self, p: &Prediction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions (
                match_id,
                home_win_probability,
                draw_probability,
                away_win_probability,
                both_teams_score_probability,
                over_2_5_goals_probability,
                under_2_5_goals_probability,
                home_win_or_draw_probability,
                away_win_or_draw_probability,
                home_handicap_probability,
                away_handicap_probability,
                confidence_score,
                prediction_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (match_id) DO UPDATE SET
                home_win_probability = excluded.home_win_probability,
                draw_probability = excluded.draw_probability,
                away_win_probability = excluded.away_win_probability,
                both_teams_score_probability = excluded.both_teams_score_probability,
                over_2_5_goals_probability = excluded.over_2_5_goals_probability,
                under_2_5_goals_probability = excluded.under_2_5_goals_probability,
                home_win_or_draw_probability = excluded.home_win_or_draw_probability,
                away_win_or_draw_probability = excluded.away_win_or_draw_probability,
                home_handicap_probability = excluded.home_handicap_probability,
                away_handicap_probability = excluded.away_handicap_probability,
                confidence_score = excluded.confidence_score,
                prediction_date = excluded.prediction_date
            "#,
        )
        .bind(p.match_id)
        .bind(p.home_win_probability)
        .bind(p.draw_probability)
        .bind(p.away_win_probability)
        .bind(p.both_teams_score_probability)
        .bind(p.over_2_5_goals_probability)
        .bind(p.under_2_5_goals_probability)
        .bind(p.home_win_or_draw_probability)
        .bind(p.away_win_or_draw_probability)
        .bind(p.home_handicap_probability)
        .bind(p.away_handicap_probability)
        .bind(p.confidence_score)
        .bind(p.prediction_date.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to upsert prediction")?;

        Ok(())
    }

    pub async fn get_prediction_for_match(&self, match_id: i64) -> Result<Option<Prediction>> {
        let row = sqlx::query_as::<_, PredictionRow>(
            "SELECT * FROM predictions WHERE match_id = ?",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch prediction")?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_prediction_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM predictions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count predictions")?;

        Ok(row.0)
    }

    /// Save a prediction to a user's list. Saving twice is a no-op.
    pub async fn save_user_prediction(&self, user_id: &str, prediction_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_predictions (user_id, prediction_id, saved_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(prediction_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user prediction")?;

        Ok(())
    }

    pub async fn remove_user_prediction(&self, user_id: &str, prediction_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM user_predictions WHERE user_id = ? AND prediction_id = ?")
            .bind(user_id)
            .bind(prediction_id)
            .execute(&self.pool)
            .await
            .context("Failed to remove user prediction")?;

        Ok(())
    }

    pub async fn get_user_predictions(&self, user_id: &str) -> Result<Vec<UserPrediction>> {
        let rows = sqlx::query_as::<_, UserPredictionRow>(
            r#"
            SELECT * FROM user_predictions
            WHERE user_id = ?
            ORDER BY saved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user predictions")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct PredictionRow {
    id: i64,
    match_id: i64,
    home_win_probability: f64,
    draw_probability: f64,
    away_win_probability: f64,
    both_teams_score_probability: f64,
    over_2_5_goals_probability: f64,
    under_2_5_goals_probability: f64,
    home_win_or_draw_probability: f64,
    away_win_or_draw_probability: f64,
    home_handicap_probability: f64,
    away_handicap_probability: f64,
    confidence_score: f64,
    prediction_date: String,
}

impl From<PredictionRow> for Prediction {
    fn from(row: PredictionRow) -> Self {
        Prediction {
            id: Some(row.id),
            match_id: row.match_id,
            home_win_probability: row.home_win_probability,
            draw_probability: row.draw_probability,
            away_win_probability: row.away_win_probability,
            both_teams_score_probability: row.both_teams_score_probability,
            over_2_5_goals_probability: row.over_2_5_goals_probability,
            under_2_5_goals_probability: row.under_2_5_goals_probability,
            home_win_or_draw_probability: row.home_win_or_draw_probability,
            away_win_or_draw_probability: row.away_win_or_draw_probability,
            home_handicap_probability: row.home_handicap_probability,
            away_handicap_probability: row.away_handicap_probability,
            confidence_score: row.confidence_score,
            prediction_date: parse_stored_date(&row.prediction_date),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserPredictionRow {
    id: i64,
    user_id: String,
    prediction_id: i64,
    saved_at: String,
}

impl From<UserPredictionRow> for UserPrediction {
    fn from(row: UserPredictionRow) -> Self {
        UserPrediction {
            id: Some(row.id),
            user_id: row.user_id,
            prediction_id: row.prediction_id,
            saved_at: parse_stored_date(&row.saved_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{League, Match, MatchStatus, Team};

    async fn seeded_store() -> Store {
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

        for (id, name) in [(33, "Manchester United"), (40, "Liverpool")] {
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

        store
            .upsert_match(&Match {
                id: 1001,
                date: Utc::now(),
                referee: None,
                venue_id: None,
                league_id: 39,
                home_team_id: 33,
                away_team_id: 40,
                home_goals: None,
                away_goals: None,
                halftime_home: None,
                halftime_away: None,
                extratime_home: None,
                extratime_away: None,
                penalty_home: None,
                penalty_away: None,
                status: MatchStatus::Scheduled,
                elapsed: None,
            })
            .await
            .unwrap();

        store
    }

    fn sample_prediction(match_id: i64, home_win: f64) -> Prediction {
        Prediction {
            id: None,
            match_id,
            home_win_probability: home_win,
            draw_probability: 0.25,
            away_win_probability: 0.25,
            both_teams_score_probability: 0.55,
            over_2_5_goals_probability: 0.5,
            under_2_5_goals_probability: 0.5,
            home_win_or_draw_probability: home_win + 0.25,
            away_win_or_draw_probability: 0.5,
            home_handicap_probability: 0.35,
            away_handicap_probability: 0.1,
            confidence_score: 0.6,
            prediction_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_prediction_overwrites_snapshot() {
        let store = seeded_store().await;

        store.upsert_prediction(&sample_prediction(1001, 0.5)).await.unwrap();
        store.upsert_prediction(&sample_prediction(1001, 0.7)).await.unwrap();

        assert_eq!(store.get_prediction_count().await.unwrap(), 1);
        let stored = store.get_prediction_for_match(1001).await.unwrap().unwrap();
        assert_eq!(stored.home_win_probability, 0.7);
    }

    #[tokio::test]
    async fn test_user_save_list_unique() {
        let store = seeded_store().await;
        store.upsert_prediction(&sample_prediction(1001, 0.5)).await.unwrap();

        let prediction_id = store
            .get_prediction_for_match(1001)
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap();

        store.save_user_prediction("user-1", prediction_id).await.unwrap();
        store.save_user_prediction("user-1", prediction_id).await.unwrap();

        let saved = store.get_user_predictions("user-1").await.unwrap();
        assert_eq!(saved.len(), 1);

        store.remove_user_prediction("user-1", prediction_id).await.unwrap();
        assert!(store.get_user_predictions("user-1").await.unwrap().is_empty());
    }
}
