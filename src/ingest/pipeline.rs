use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::football::{FixturePayload, TeamPayload, VenueInfo};
use crate::api::FootballApiClient;
use crate::db::Store;
use crate::models::{League, Match, MatchStatus, Team, Venue};

use super::leagues::{active_leagues, SupportedLeague};
use super::stat_map::extract_statistics;

/// Pause between leagues to stay under the source's request quota
const LEAGUE_DELAY: Duration = Duration::from_millis(1100);

/// Fixtures are synced for a rolling window around today
const FIXTURE_WINDOW_DAYS: i64 = 30;

/// Keeps League/Team/Venue/Match/MatchStatistics current for every
/// supported league. Upserts are idempotent, so a pass is safe to re-run.
pub struct IngestionPipeline {
    client: FootballApiClient,
    store: Arc<Store>,
    season: i32,
}

impl IngestionPipeline {
    pub fn new(client: FootballApiClient, store: Arc<Store>, season: i32) -> Self {
        Self {
            client,
            store,
            season,
        }
    }

    /// Run one full ingestion pass over all active leagues, sequentially.
    /// A failed league is logged and skipped; the pass always completes.
    pub async fn run(&self) {
        let leagues = active_leagues();
        info!("Starting ingestion pass for {} leagues", leagues.len());

        let mut updated = 0;
        let mut failed = 0;

        for league in &leagues {
            match self.update_league(league).await {
                Ok(()) => {
                    updated += 1;
                }
                Err(e) => {
                    error!("Failed to update {} ({}): {:#}", league.name, league.country, e);
                    failed += 1;
                }
            }

            // Rate limit between leagues
            sleep(LEAGUE_DELAY).await;
        }

        info!("Ingestion pass complete: {} updated, {} failed", updated, failed);
    }

    /// Sync one league: metadata, then teams and venues, then fixtures
    async fn update_league(&self, league: &SupportedLeague) -> Result<()> {
        info!("Updating {} (season {})", league.name, self.season);

        self.sync_league_metadata(league).await?;
        self.sync_teams(league).await?;
        self.sync_fixtures(league).await?;

        Ok(())
    }

    async fn sync_league_metadata(&self, league: &SupportedLeague) -> Result<()> {
        let payload = self
            .client
            .get_league(league.api_id, self.season)
            .await
            .context("league metadata request failed")?;

        // Fall back to the static configuration when the source has no
        // entry for this season yet
        let record = match payload {
            Some(p) => League {
                id: p.league.id,
                name: p.league.name,
                country: p.country.and_then(|c| c.name).or_else(|| Some(league.country.to_string())),
                season: self.season,
                round: None,
            },
            None => {
                warn!("Source returned no metadata for {}, using configured values", league.name);
                League {
                    id: league.api_id,
                    name: league.name.to_string(),
                    country: Some(league.country.to_string()),
                    season: self.season,
                    round: None,
                }
            }
        };

        self.store.upsert_league(&record).await
    }

    async fn sync_teams(&self, league: &SupportedLeague) -> Result<()> {
        let teams = self
            .client
            .get_teams(league.api_id, self.season)
            .await
            .context("teams request failed")?;

        debug!("{}: {} teams", league.name, teams.len());

        for payload in &teams {
            if let Err(e) = self.upsert_team_payload(payload).await {
                warn!(
                    "Failed to upsert team {} in {}: {:#}",
                    payload.team.name, league.name, e
                );
            }
        }

        Ok(())
    }

    async fn upsert_team_payload(&self, payload: &TeamPayload) -> Result<()> {
        // Venue first so the team's weak reference resolves
        let venue_id = match &payload.venue {
            Some(v) => self.upsert_venue_info(v).await?,
            None => None,
        };

        self.store
            .upsert_team(&Team {
                id: payload.team.id,
                name: payload.team.name.clone(),
                code: payload.team.code.clone(),
                country: payload.team.country.clone(),
                founded: payload.team.founded,
                national: payload.team.national,
                venue_id,
            })
            .await
    }

    async fn upsert_venue_info(&self, venue: &VenueInfo) -> Result<Option<i64>> {
        let id = match venue.id {
            Some(id) => id,
            None => return Ok(None),
        };

        self.store
            .upsert_venue(&Venue {
                id,
                name: venue.name.clone(),
                city: venue.city.clone(),
                capacity: venue.capacity,
                surface: venue.surface.clone(),
            })
            .await?;

        Ok(Some(id))
    }

    async fn sync_fixtures(&self, league: &SupportedLeague) -> Result<()> {
        let today = Utc::now().date_naive();
        let from = today - ChronoDuration::days(FIXTURE_WINDOW_DAYS);
        let to = today + ChronoDuration::days(FIXTURE_WINDOW_DAYS);

        let fixtures = self
            .client
            .get_fixtures(league.api_id, self.season, from, to)
            .await
            .context("fixtures request failed")?;

        debug!("{}: {} fixtures in window", league.name, fixtures.len());

        let mut current_round: Option<String> = None;

        for payload in &fixtures {
            match self.upsert_fixture(payload).await {
                Ok(status) => {
                    // Remember the round of the first upcoming fixture;
                    // the window is ordered by date
                    if status == MatchStatus::Scheduled && current_round.is_none() {
                        current_round = payload.league.round.clone();
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to upsert fixture {} in {}: {:#}",
                        payload.fixture.id, league.name, e
                    );
                }
            }
        }

        if let Some(round) = current_round {
            self.store.set_league_round(league.api_id, &round).await?;
        }

        Ok(())
    }

    /// Upsert one fixture and, for finished fixtures carrying statistics,
    /// its per-team statistics records
    async fn upsert_fixture(&self, payload: &FixturePayload) -> Result<MatchStatus> {
        let date = parse_fixture_date(&payload.fixture.date)
            .with_context(|| format!("bad fixture date {:?}", payload.fixture.date))?;

        let status = MatchStatus::from_source_code(&payload.fixture.status.short);

        // Fixture venues can differ from any team's home ground; upsert so
        // the match's reference resolves
        let venue_id = match &payload.fixture.venue {
            Some(v) => self.upsert_venue_info(v).await?,
            None => None,
        };

        let score = &payload.score;
        let halftime = score.halftime.as_ref();
        let extratime = score.extratime.as_ref();
        let penalty = score.penalty.as_ref();

        self.store
            .upsert_match(&Match {
                id: payload.fixture.id,
                date,
                referee: payload.fixture.referee.clone(),
                venue_id,
                league_id: payload.league.id,
                home_team_id: payload.teams.home.id,
                away_team_id: payload.teams.away.id,
                home_goals: payload.goals.home,
                away_goals: payload.goals.away,
                halftime_home: halftime.and_then(|g| g.home),
                halftime_away: halftime.and_then(|g| g.away),
                extratime_home: extratime.and_then(|g| g.home),
                extratime_away: extratime.and_then(|g| g.away),
                penalty_home: penalty.and_then(|g| g.home),
                penalty_away: penalty.and_then(|g| g.away),
                status,
                elapsed: payload.fixture.status.elapsed,
            })
            .await?;

        if status == MatchStatus::Finished {
            for team_stats in &payload.statistics {
                let record = extract_statistics(
                    payload.fixture.id,
                    team_stats.team.id,
                    &team_stats.statistics,
                );

                if let Err(e) = self.store.upsert_match_statistics(&record).await {
                    warn!(
                        "Failed to upsert statistics for fixture {} team {}: {:#}",
                        payload.fixture.id, team_stats.team.id, e
                    );
                }
            }
        }

        Ok(status)
    }
}

fn parse_fixture_date(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixture_date() {
        let dt = parse_fixture_date("2026-09-12T14:00:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-09-12T14:00:00+00:00");

        let offset = parse_fixture_date("2026-09-12T16:00:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2026-09-12T14:00:00+00:00");

        assert!(parse_fixture_date("not a date").is_err());
    }
}
