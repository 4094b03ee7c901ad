use std::sync::Arc;

use tracing::warn;

use crate::db::Store;
use crate::models::{FormStats, H2HStats, Match, MatchOutcome};

/// How many finished matches feed each summary
const HISTORY_LIMIT: i64 = 10;

/// How many outcomes make up the recent-form sequence
const FORM_LENGTH: usize = 5;

/// Computes the statistical inputs the probability engine needs from
/// persisted match history. Read-only; a failed or empty query degrades to
/// neutral defaults so predictions are always generated.
pub struct FormAggregator {
    store: Arc<Store>,
}

impl FormAggregator {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Recent-form summary for a team, from up to its 10 most recent
    /// finished matches on either side
    pub async fn get_team_form_stats(&self, team_id: i64, is_home: bool) -> FormStats {
        let matches = match self.store.recent_finished_for_team(team_id, HISTORY_LIMIT).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Form history query failed for team {}: {:#}", team_id, e);
                return FormStats::neutral();
            }
        };

        derive_form_stats(team_id, &matches, is_home)
    }

    /// Head-to-head summary between a pair, win counts taken from
    /// `team_a`'s perspective
    pub async fn get_head_to_head_stats(&self, team_a: i64, team_b: i64) -> H2HStats {
        let matches = match self
            .store
            .finished_head_to_head(team_a, team_b, HISTORY_LIMIT)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!(
                    "Head-to-head query failed for teams {} / {}: {:#}",
                    team_a, team_b, e
                );
                return H2HStats::neutral();
            }
        };

        derive_h2h_stats(team_a, &matches)
    }
}

/// Derive a form summary from finished matches, newest first. Matches with
/// no recorded score are ignored; an empty sample yields the neutral default.
pub fn derive_form_stats(team_id: i64, matches: &[Match], is_home: bool) -> FormStats {
    let scored: Vec<(i64, i64, bool)> = matches
        .iter()
        .filter_map(|m| {
            let home_goals = m.home_goals?;
            let away_goals = m.away_goals?;
            if m.home_team_id == team_id {
                Some((home_goals, away_goals, true))
            } else {
                Some((away_goals, home_goals, false))
            }
        })
        .collect();

    if scored.is_empty() {
        return FormStats::neutral();
    }

    let count = scored.len() as f64;

    let recent_form: Vec<MatchOutcome> = scored
        .iter()
        .take(FORM_LENGTH)
        .map(|&(gf, ga, _)| MatchOutcome::from_goals(gf, ga))
        .collect();

    let goals_scored: i64 = scored.iter().map(|&(gf, _, _)| gf).sum();
    let goals_conceded: i64 = scored.iter().map(|&(_, ga, _)| ga).sum();
    let clean_sheets = scored.iter().filter(|&&(_, ga, _)| ga == 0).count() as i64;
    let failed_to_score = scored.iter().filter(|&&(gf, _, _)| gf == 0).count() as i64;

    let average_goals_scored = goals_scored as f64 / count;
    let average_goals_conceded = goals_conceded as f64 / count;

    let home_sample: Vec<i64> = scored
        .iter()
        .filter(|&&(_, _, was_home)| was_home)
        .map(|&(gf, _, _)| gf)
        .collect();
    let away_sample: Vec<i64> = scored
        .iter()
        .filter(|&&(_, _, was_home)| !was_home)
        .map(|&(gf, _, _)| gf)
        .collect();

    let home_advantage = if is_home && !home_sample.is_empty() {
        let home_mean = home_sample.iter().sum::<i64>() as f64 / home_sample.len() as f64;
        Some(home_mean - average_goals_scored)
    } else {
        None
    };

    let away_disadvantage = if !is_home && !away_sample.is_empty() {
        let away_mean = away_sample.iter().sum::<i64>() as f64 / away_sample.len() as f64;
        Some(average_goals_scored - away_mean)
    } else {
        None
    };

    FormStats {
        recent_form,
        goals_scored,
        goals_conceded,
        clean_sheets,
        failed_to_score,
        average_goals_scored,
        average_goals_conceded,
        home_advantage,
        away_disadvantage,
    }
}

/// Derive a head-to-head summary from finished meetings of one pair.
/// `home_wins` counts wins by `team_a` regardless of which side it played,
/// since teams alternate venues across the history.
pub fn derive_h2h_stats(team_a: i64, matches: &[Match]) -> H2HStats {
    let scored: Vec<(i64, i64)> = matches
        .iter()
        .filter_map(|m| {
            let home_goals = m.home_goals?;
            let away_goals = m.away_goals?;
            if m.home_team_id == team_a {
                Some((home_goals, away_goals))
            } else {
                Some((away_goals, home_goals))
            }
        })
        .collect();

    if scored.is_empty() {
        return H2HStats::neutral();
    }

    let mut home_wins = 0;
    let mut away_wins = 0;
    let mut draws = 0;
    let mut total_goals = 0;
    let mut both_teams_scored = 0;
    let mut over_2_5_goals = 0;

    for &(a_goals, b_goals) in &scored {
        match MatchOutcome::from_goals(a_goals, b_goals) {
            MatchOutcome::Win => home_wins += 1,
            MatchOutcome::Loss => away_wins += 1,
            MatchOutcome::Draw => draws += 1,
        }

        let combined = a_goals + b_goals;
        total_goals += combined;

        if a_goals > 0 && b_goals > 0 {
            both_teams_scored += 1;
        }
        if combined > 2 {
            over_2_5_goals += 1;
        }
    }

    H2HStats {
        total_matches: scored.len() as i64,
        home_wins,
        away_wins,
        draws,
        average_goals: total_goals as f64 / scored.len() as f64,
        both_teams_scored,
        over_2_5_goals,
    }
}
