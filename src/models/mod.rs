pub mod entities;
pub mod form;
pub mod prediction;

pub use entities::{League, Match, MatchStatistics, MatchStatus, Team, Venue};
pub use form::{FormStats, H2HStats, MatchOutcome};
pub use prediction::{Prediction, UserPrediction};
