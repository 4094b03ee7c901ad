use anyhow::{Context, Result};

use crate::models::{League, Team, Venue};

use super::Store;

/// Upserts and lookups for leagues, venues and teams. Each upsert is keyed
/// on the source API id and independently retriable.
impl Store {
    /// Insert or update a league by source id
    pub async fn upsert_league(&self, league: &League) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leagues (id, name, country, season, round)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                country = excluded.country,
                season = excluded.season,
                round = excluded.round
            "#,
        )
        .bind(league.id)
        .bind(&league.name)
        .bind(&league.country)
        .bind(league.season)
        .bind(&league.round)
        .execute(&self.pool)
        .await
        .context("Failed to upsert league")?;

        Ok(())
    }

    /// Record the current round without touching other league fields
    pub async fn set_league_round(&self, league_id: i64, round: &str) -> Result<()> {
        sqlx::query("UPDATE leagues SET round = ? WHERE id = ?")
            .bind(round)
            .bind(league_id)
            .execute(&self.pool)
            .await
            .context("Failed to update league round")?;

        Ok(())
    }

    pub async fn get_league(&self, id: i64) -> Result<Option<League>> {
        let row = sqlx::query_as::<_, LeagueRow>("SELECT * FROM leagues WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch league")?;

        Ok(row.map(|r| r.into()))
    }

    /// Insert or update a venue by source id
    pub async fn upsert_venue(&self, venue: &Venue) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO venues (id, name, city, capacity, surface)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                city = excluded.city,
                capacity = excluded.capacity,
                surface = excluded.surface
            "#,
        )
        .bind(venue.id)
        .bind(&venue.name)
        .bind(&venue.city)
        .bind(venue.capacity)
        .bind(&venue.surface)
        .execute(&self.pool)
        .await
        .context("Failed to upsert venue")?;

        Ok(())
    }

    /// Insert or update a team by source id
    pub async fn upsert_team(&self, team: &Team) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, code, country, founded, national, venue_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                code = excluded.code,
                country = excluded.country,
                founded = excluded.founded,
                national = excluded.national,
                venue_id = excluded.venue_id
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.code)
        .bind(&team.country)
        .bind(team.founded)
        .bind(team.national)
        .bind(team.venue_id)
        .execute(&self.pool)
        .await
        .context("Failed to upsert team")?;

        Ok(())
    }

    pub async fn get_team(&self, id: i64) -> Result<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>("SELECT * FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch team")?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_teams_in_league(&self, league_id: i64) -> Result<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT DISTINCT t.* FROM teams t
            JOIN matches m ON t.id IN (m.home_team_id, m.away_team_id)
            WHERE m.league_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch teams for league")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct LeagueRow {
    id: i64,
    name: String,
    country: Option<String>,
    season: i32,
    round: Option<String>,
}

impl From<LeagueRow> for League {
    fn from(row: LeagueRow) -> Self {
        League {
            id: row.id,
            name: row.name,
            country: row.country,
            season: row.season,
            round: row.round,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    code: Option<String>,
    country: Option<String>,
    founded: Option<i64>,
    national: bool,
    venue_id: Option<i64>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: row.id,
            name: row.name,
            code: row.code,
            country: row.country,
            founded: row.founded,
            national: row.national,
            venue_id: row.venue_id,
        }
    }
}
