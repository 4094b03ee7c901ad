use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Error from the football data API boundary
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Client for the external football data API (API-Football style).
/// All endpoints require an API key header; a missing key is a fatal
/// startup error handled in Config, not here.
pub struct FootballApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Common envelope wrapping every endpoint's payload list
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

/// Item from the leagues endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LeaguePayload {
    pub league: LeagueInfo,
    pub country: Option<CountryInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInfo {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryInfo {
    pub name: Option<String>,
}

/// Item from the teams endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TeamPayload {
    pub team: TeamInfo,
    pub venue: Option<VenueInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<i64>,
    #[serde(default)]
    pub national: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i64>,
    pub surface: Option<String>,
}

/// Item from the fixtures endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FixturePayload {
    pub fixture: FixtureInfo,
    pub league: FixtureLeagueInfo,
    pub teams: FixtureTeams,
    pub goals: GoalsInfo,
    pub score: ScoreInfo,

    /// Per-team statistics, present only when the source attaches them
    #[serde(default)]
    pub statistics: Vec<TeamStatisticsPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureInfo {
    pub id: i64,
    pub referee: Option<String>,
    /// Kickoff as RFC3339
    pub date: String,
    pub status: FixtureStatus,
    pub venue: Option<VenueInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureStatus {
    /// Short status code ("NS", "HT", "FT", "PST", ...)
    pub short: String,
    pub elapsed: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureLeagueInfo {
    pub id: i64,
    pub season: Option<i32>,
    pub round: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTeams {
    pub home: FixtureTeam,
    pub away: FixtureTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTeam {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalsInfo {
    pub home: Option<i64>,
    pub away: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreInfo {
    pub halftime: Option<GoalsInfo>,
    pub extratime: Option<GoalsInfo>,
    pub penalty: Option<GoalsInfo>,
}

/// Statistics block for one team within a fixture payload
#[derive(Debug, Clone, Deserialize)]
pub struct TeamStatisticsPayload {
    pub team: FixtureTeam,
    /// Unordered list of labeled values; labels are mapped to typed fields
    /// at the ingestion boundary
    #[serde(default)]
    pub statistics: Vec<StatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    #[serde(rename = "type")]
    pub label: String,
    /// Number, percentage string ("55%"), or null
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FootballApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch league metadata by source id and season
    pub async fn get_league(&self, league_id: i64, season: i32) -> Result<Option<LeaguePayload>, ApiError> {
        let url = format!("{}/leagues?id={}&season={}", self.base_url, league_id, season);
        let envelope: ApiEnvelope<LeaguePayload> = self.get(&url, "leagues").await?;
        Ok(envelope.response.into_iter().next())
    }

    /// Fetch all teams registered for (league, season)
    pub async fn get_teams(&self, league_id: i64, season: i32) -> Result<Vec<TeamPayload>, ApiError> {
        let url = format!("{}/teams?league={}&season={}", self.base_url, league_id, season);
        let envelope: ApiEnvelope<TeamPayload> = self.get(&url, "teams").await?;
        Ok(envelope.response)
    }

    /// Fetch fixtures for (league, season) within a date range, inclusive
    pub async fn get_fixtures(
        &self,
        league_id: i64,
        season: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FixturePayload>, ApiError> {
        let url = format!(
            "{}/fixtures?league={}&season={}&from={}&to={}",
            self.base_url, league_id, season, from, to
        );
        let envelope: ApiEnvelope<FixturePayload> = self.get(&url, "fixtures").await?;
        Ok(envelope.response)
    }

    async fn get<T>(&self, url: &str, endpoint: &'static str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("x-apisports-key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }
}
