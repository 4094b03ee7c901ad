use serde::{Deserialize, Serialize};

/// Outcome of a single match from one team's perspective
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// Classify a result from the perspective of the team that scored
    /// `scored` goals against `conceded`
    pub fn from_goals(scored: i64, conceded: i64) -> Self {
        if scored > conceded {
            MatchOutcome::Win
        } else if scored < conceded {
            MatchOutcome::Loss
        } else {
            MatchOutcome::Draw
        }
    }
}

/// Recent-form summary for one team, derived from its latest finished matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStats {
    /// W/D/L outcomes, most recent first, up to 5 entries
    pub recent_form: Vec<MatchOutcome>,

    /// Goal sums over the whole loaded sample (up to 10 matches)
    pub goals_scored: i64,
    pub goals_conceded: i64,

    /// Matches where the opponent failed to score
    pub clean_sheets: i64,

    /// Matches where the team itself failed to score
    pub failed_to_score: i64,

    pub average_goals_scored: f64,
    pub average_goals_conceded: f64,

    /// Mean home goals scored minus overall average scored; only computed
    /// for the home side when the sample contains home matches
    pub home_advantage: Option<f64>,

    /// Overall average scored minus mean away goals scored; only computed
    /// for the away side when the sample contains away matches
    pub away_disadvantage: Option<f64>,
}

impl FormStats {
    /// Neutral fallback used when a team has no finished history or the
    /// history query fails: five draws, one goal per match each way.
    pub fn neutral() -> Self {
        Self {
            recent_form: vec![MatchOutcome::Draw; 5],
            goals_scored: 0,
            goals_conceded: 0,
            clean_sheets: 0,
            failed_to_score: 0,
            average_goals_scored: 1.0,
            average_goals_conceded: 1.0,
            home_advantage: None,
            away_disadvantage: None,
        }
    }
}

/// Head-to-head summary between a specific pair of teams. Win counts are
/// taken from the reference team's perspective: `home_wins` counts matches
/// the reference (upcoming home) team won, whichever side it played on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H2HStats {
    pub total_matches: i64,
    pub home_wins: i64,
    pub away_wins: i64,
    pub draws: i64,

    /// Mean combined goals per meeting
    pub average_goals: f64,

    /// Meetings where both sides scored at least once
    pub both_teams_scored: i64,

    /// Meetings with more than 2.5 combined goals
    pub over_2_5_goals: i64,
}

impl H2HStats {
    /// Neutral fallback for pairs with no recorded meetings
    pub fn neutral() -> Self {
        Self {
            total_matches: 0,
            home_wins: 0,
            away_wins: 0,
            draws: 0,
            average_goals: 2.5,
            both_teams_scored: 0,
            over_2_5_goals: 0,
        }
    }
}
