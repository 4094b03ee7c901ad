use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time prediction snapshot for one match, unique on match_id.
/// Regenerating for the same match overwrites the prior snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Row id, assigned by the store
    pub id: Option<i64>,

    /// Fixture this prediction is for
    pub match_id: i64,

    /// Clamped to [0.1, 0.9]
    pub home_win_probability: f64,

    /// Residual of home/away win probabilities, floored at 0. The three
    /// outcome probabilities are not guaranteed to sum to exactly 1.
    pub draw_probability: f64,

    /// Clamped to [0.05, 0.8]
    pub away_win_probability: f64,

    /// Clamped to [0.2, 0.9]
    pub both_teams_score_probability: f64,

    /// Clamped to [0.2, 0.9]
    pub over_2_5_goals_probability: f64,

    /// Exactly 1 - over_2_5_goals_probability, no independent clamp
    pub under_2_5_goals_probability: f64,

    /// Simple sums with draw; may exceed 1 in edge cases, accepted as-is
    pub home_win_or_draw_probability: f64,
    pub away_win_or_draw_probability: f64,

    /// Win probabilities shifted by a -1.5 goal handicap line
    pub home_handicap_probability: f64,
    pub away_handicap_probability: f64,

    /// Engine's self-assessed reliability, in [0.1, 1.0]. Not a probability
    /// of correctness.
    pub confidence_score: f64,

    /// When this snapshot was generated
    pub prediction_date: DateTime<Utc>,
}

/// A user's saved prediction, unique on (user_id, prediction_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPrediction {
    pub id: Option<i64>,
    pub user_id: String,
    pub prediction_id: i64,
    pub saved_at: DateTime<Utc>,
}
