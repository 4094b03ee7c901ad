use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A football competition for a given season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    /// Source API league id
    pub id: i64,

    /// League name (e.g. "Premier League")
    pub name: String,

    /// Country the league is played in
    pub country: Option<String>,

    /// Season year (start year for European seasons)
    pub season: i32,

    /// Current round, as reported by the source (e.g. "Regular Season - 12")
    pub round: Option<String>,
}

/// A stadium referenced by teams and fixtures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Source API venue id
    pub id: i64,

    pub name: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i64>,
    pub surface: Option<String>,
}

/// A football club or national team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Source API team id
    pub id: i64,

    pub name: String,

    /// Short code (e.g. "MUN")
    pub code: Option<String>,

    pub country: Option<String>,

    /// Year the club was founded
    pub founded: Option<i64>,

    /// Whether this is a national team
    pub national: bool,

    /// Home venue, if known (weak reference, team does not own the venue)
    pub venue_id: Option<i64>,
}

/// Lifecycle state of a match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse a stored status string, defaulting to Scheduled
    pub fn parse(s: &str) -> Self {
        match s {
            "LIVE" => MatchStatus::Live,
            "FINISHED" => MatchStatus::Finished,
            "POSTPONED" => MatchStatus::Postponed,
            "CANCELLED" => MatchStatus::Cancelled,
            _ => MatchStatus::Scheduled,
        }
    }

    /// Map the source API's short fixture-status vocabulary onto the five
    /// states. Codes that are unknown or not-yet-started default to Scheduled.
    pub fn from_source_code(code: &str) -> Self {
        match code {
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" | "SUSP" => MatchStatus::Live,
            "FT" | "AET" | "PEN" => MatchStatus::Finished,
            "PST" => MatchStatus::Postponed,
            "CANC" | "ABD" | "AWD" | "WO" => MatchStatus::Cancelled,
            _ => MatchStatus::Scheduled,
        }
    }
}

/// A fixture as persisted in the store, mutated repeatedly by ingestion
/// as its status and scores change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Source API fixture id
    pub id: i64,

    /// Kickoff timestamp
    pub date: DateTime<Utc>,

    pub referee: Option<String>,

    pub venue_id: Option<i64>,
    pub league_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,

    /// Full-time goals (null until the source reports any score)
    pub home_goals: Option<i64>,
    pub away_goals: Option<i64>,

    pub halftime_home: Option<i64>,
    pub halftime_away: Option<i64>,
    pub extratime_home: Option<i64>,
    pub extratime_away: Option<i64>,
    pub penalty_home: Option<i64>,
    pub penalty_away: Option<i64>,

    pub status: MatchStatus,

    /// Minutes played, for in-play fixtures
    pub elapsed: Option<i64>,
}

/// Per-team statistics for a finished match, unique on (match_id, team_id).
/// Only present when the source provides a statistics payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub match_id: i64,
    pub team_id: i64,

    pub shots_total: Option<i64>,
    pub shots_on_goal: Option<i64>,

    /// Ball possession as a percentage (0-100)
    pub ball_possession: Option<f64>,

    pub yellow_cards: Option<i64>,
    pub red_cards: Option<i64>,
    pub total_passes: Option<i64>,
    pub expected_goals: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(MatchStatus::from_source_code("HT"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_source_code("FT"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_source_code("AET"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_source_code("PEN"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_source_code("PST"), MatchStatus::Postponed);
        assert_eq!(MatchStatus::from_source_code("CANC"), MatchStatus::Cancelled);
        assert_eq!(MatchStatus::from_source_code("NS"), MatchStatus::Scheduled);
        // Unrecognized codes fall back to Scheduled
        assert_eq!(MatchStatus::from_source_code("XYZ"), MatchStatus::Scheduled);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::Live,
            MatchStatus::Finished,
            MatchStatus::Postponed,
            MatchStatus::Cancelled,
        ] {
            assert_eq!(MatchStatus::parse(status.as_str()), status);
        }
    }
}
