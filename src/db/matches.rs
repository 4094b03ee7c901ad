use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::models::{Match, MatchStatistics, MatchStatus};

use super::Store;

impl Store {
    /// Insert or update a match by source fixture id. Ingestion calls this
    /// repeatedly as a fixture's status and scores change.
    pub async fn upsert_match(&self, m: &Match) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                id, date, referee, venue_id, league_id,
                home_team_id, away_team_id,
                home_goals, away_goals,
                halftime_home, halftime_away,
                extratime_home, extratime_away,
                penalty_home, penalty_away,
                status, elapsed
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                date = excluded.date,
                referee = excluded.referee,
                venue_id = excluded.venue_id,
                league_id = excluded.league_id,
                home_team_id = excluded.home_team_id,
                away_team_id = excluded.away_team_id,
                home_goals = excluded.home_goals,
                away_goals = excluded.away_goals,
                halftime_home = excluded.halftime_home,
                halftime_away = excluded.halftime_away,
                extratime_home = excluded.extratime_home,
                extratime_away = excluded.extratime_away,
                penalty_home = excluded.penalty_home,
                penalty_away = excluded.penalty_away,
                status = excluded.status,
                elapsed = excluded.elapsed
            "#,
        )
        .bind(m.id)
        .bind(m.date.to_rfc3339())
        .bind(&m.referee)
        .bind(m.venue_id)
        .bind(m.league_id)
        .bind(m.home_team_id)
        .bind(m.away_team_id)
        .bind(m.home_goals)
        .bind(m.away_goals)
        .bind(m.halftime_home)
        .bind(m.halftime_away)
        .bind(m.extratime_home)
        .bind(m.extratime_away)
        .bind(m.penalty_home)
        .bind(m.penalty_away)
        .bind(m.status.as_str())
        .bind(m.elapsed)
        .execute(&self.pool)
        .await
        .context("Failed to upsert match")?;

        Ok(())
    }

    /// Insert or update per-team statistics, unique on (match_id, team_id)
    pub async fn upsert_match_statistics(&self, stats: &MatchStatistics) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO match_statistics (
                match_id, team_id,
                shots_total, shots_on_goal, ball_possession,
                yellow_cards, red_cards, total_passes, expected_goals
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (match_id, team_id) DO UPDATE SET
                shots_total = excluded.shots_total,
                shots_on_goal = excluded.shots_on_goal,
                ball_possession = excluded.ball_possession,
                yellow_cards = excluded.yellow_cards,
                red_cards = excluded.red_cards,
                total_passes = excluded.total_passes,
                expected_goals = excluded.expected_goals
            "#,
        )
        .bind(stats.match_id)
        .bind(stats.team_id)
        .bind(stats.shots_total)
        .bind(stats.shots_on_goal)
        .bind(stats.ball_possession)
        .bind(stats.yellow_cards)
        .bind(stats.red_cards)
        .bind(stats.total_passes)
        .bind(stats.expected_goals)
        .execute(&self.pool)
        .await
        .context("Failed to upsert match statistics")?;

        Ok(())
    }

    pub async fn get_match(&self, id: i64) -> Result<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch match")?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_match_statistics(&self, match_id: i64) -> Result<Vec<MatchStatistics>> {
        let rows = sqlx::query_as::<_, StatisticsRow>(
            "SELECT * FROM match_statistics WHERE match_id = ?",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch match statistics")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Most recent finished matches involving a team, either side,
    /// newest first
    pub async fn recent_finished_for_team(&self, team_id: i64, limit: i64) -> Result<Vec<Match>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM matches
            WHERE (home_team_id = ? OR away_team_id = ?)
              AND status = 'FINISHED'
            ORDER BY date DESC
            LIMIT ?
            "#,
        )
        .bind(team_id)
        .bind(team_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch team match history")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Most recent finished meetings between a specific pair, newest first
    pub async fn finished_head_to_head(
        &self,
        team_a: i64,
        team_b: i64,
        limit: i64,
    ) -> Result<Vec<Match>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM matches
            WHERE ((home_team_id = ? AND away_team_id = ?)
                OR (home_team_id = ? AND away_team_id = ?))
              AND status = 'FINISHED'
            ORDER BY date DESC
            LIMIT ?
            "#,
        )
        .bind(team_a)
        .bind(team_b)
        .bind(team_b)
        .bind(team_a)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch head-to-head history")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Scheduled matches kicking off within the next `hours`, soonest first
    pub async fn scheduled_within_hours(&self, hours: i64) -> Result<Vec<Match>> {
        let now = Utc::now();
        let until = now + Duration::hours(hours);

        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM matches
            WHERE status = 'SCHEDULED'
              AND date >= ?
              AND date <= ?
            ORDER BY date ASC
            "#,
        )
        .bind(now.to_rfc3339())
        .bind(until.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch upcoming matches")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_match_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM matches")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count matches")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    date: String,
    referee: Option<String>,
    venue_id: Option<i64>,
    league_id: i64,
    home_team_id: i64,
    away_team_id: i64,
    home_goals: Option<i64>,
    away_goals: Option<i64>,
    halftime_home: Option<i64>,
    halftime_away: Option<i64>,
    extratime_home: Option<i64>,
    extratime_away: Option<i64>,
    penalty_home: Option<i64>,
    penalty_away: Option<i64>,
    status: String,
    elapsed: Option<i64>,
}

impl From<MatchRow> for Match {
    fn from(row: MatchRow) -> Self {
        Match {
            id: row.id,
            date: parse_stored_date(&row.date),
            referee: row.referee,
            venue_id: row.venue_id,
            league_id: row.league_id,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            home_goals: row.home_goals,
            away_goals: row.away_goals,
            halftime_home: row.halftime_home,
            halftime_away: row.halftime_away,
            extratime_home: row.extratime_home,
            extratime_away: row.extratime_away,
            penalty_home: row.penalty_home,
            penalty_away: row.penalty_away,
            status: MatchStatus::parse(&row.status),
            elapsed: row.elapsed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatisticsRow {
    #[allow(dead_code)]
    id: i64,
    match_id: i64,
    team_id: i64,
    shots_total: Option<i64>,
    shots_on_goal: Option<i64>,
    ball_possession: Option<f64>,
    yellow_cards: Option<i64>,
    red_cards: Option<i64>,
    total_passes: Option<i64>,
    expected_goals: Option<f64>,
}

impl From<StatisticsRow> for MatchStatistics {
    fn from(row: StatisticsRow) -> Self {
        MatchStatistics {
            match_id: row.match_id,
            team_id: row.team_id,
            shots_total: row.shots_total,
            shots_on_goal: row.shots_on_goal,
            ball_possession: row.ball_possession,
            yellow_cards: row.yellow_cards,
            red_cards: row.red_cards,
            total_passes: row.total_passes,
            expected_goals: row.expected_goals,
        }
    }
}

pub(crate) fn parse_stored_date(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::League;

    async fn test_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    async fn seed_catalog(store: &Store) {
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
                .upsert_team(&crate::models::Team {
                    id,
                    name: name.to_string(),
                    code: None,
                    country: Some("England".to_string()),
                    founded: None,
                    national: false,
                    venue_id: None,
                })
                .await
                .unwrap();
        }
    }

    fn fixture(id: i64, status: MatchStatus, home_goals: Option<i64>, away_goals: Option<i64>) -> Match {
        Match {
            id,
            date: Utc::now(),
            referee: None,
            venue_id: None,
            league_id: 39,
            home_team_id: 33,
            away_team_id: 40,
            home_goals,
            away_goals,
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
    async fn test_match_upsert_is_idempotent() {
        let store = test_store().await;
        seed_catalog(&store).await;

        let scheduled = fixture(1001, MatchStatus::Scheduled, None, None);
        store.upsert_match(&scheduled).await.unwrap();
        store.upsert_match(&scheduled).await.unwrap();

        assert_eq!(store.get_match_count().await.unwrap(), 1);

        // Re-ingesting with updated fields overwrites in place
        let finished = fixture(1001, MatchStatus::Finished, Some(2), Some(1));
        store.upsert_match(&finished).await.unwrap();

        assert_eq!(store.get_match_count().await.unwrap(), 1);
        let stored = store.get_match(1001).await.unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Finished);
        assert_eq!(stored.home_goals, Some(2));
        assert_eq!(stored.away_goals, Some(1));
    }

    #[tokio::test]
    async fn test_statistics_unique_per_match_team() {
        let store = test_store().await;
        seed_catalog(&store).await;
        store
            .upsert_match(&fixture(1001, MatchStatus::Finished, Some(1), Some(0)))
            .await
            .unwrap();

        let stats = MatchStatistics {
            match_id: 1001,
            team_id: 33,
            shots_total: Some(12),
            ball_possession: Some(61.0),
            ..Default::default()
        };
        store.upsert_match_statistics(&stats).await.unwrap();

        let updated = MatchStatistics {
            shots_total: Some(14),
            ..stats.clone()
        };
        store.upsert_match_statistics(&updated).await.unwrap();

        let rows = store.get_match_statistics(1001).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shots_total, Some(14));
        assert_eq!(rows[0].ball_possession, Some(61.0));
    }

    #[tokio::test]
    async fn test_history_queries_only_see_finished() {
        let store = test_store().await;
        seed_catalog(&store).await;

        store
            .upsert_match(&fixture(1, MatchStatus::Finished, Some(3), Some(1)))
            .await
            .unwrap();
        store
            .upsert_match(&fixture(2, MatchStatus::Live, Some(1), Some(0)))
            .await
            .unwrap();
        store
            .upsert_match(&fixture(3, MatchStatus::Scheduled, None, None))
            .await
            .unwrap();

        let history = store.recent_finished_for_team(33, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 1);

        let h2h = store.finished_head_to_head(33, 40, 10).await.unwrap();
        assert_eq!(h2h.len(), 1);
    }
}
