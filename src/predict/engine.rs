use chrono::{DateTime, Utc};

use crate::models::{FormStats, H2HStats, MatchOutcome, Prediction};

/// Per-position weights for the recent-form sequence, most recent first.
/// Positions beyond the fifth contribute the tail weight.
const FORM_WEIGHTS: [f64; 5] = [0.4, 0.3, 0.2, 0.08, 0.02];
const FORM_WEIGHT_TAIL: f64 = 0.01;

/// Fixed additive terms for venue effects
const HOME_ADVANTAGE_TERM: f64 = 0.1;
const AWAY_DISADVANTAGE_TERM: f64 = -0.05;

/// Weight on the goals-based adjustment in each win-probability blend
const GOALS_ADJUSTMENT_WEIGHT: f64 = 0.1;

/// Goal handicap applied to both handicap markets
const HANDICAP_LINE: f64 = 1.5;

/// Fallback head-to-head ratios for pairs with no recorded meetings
const DEFAULT_H2H_HOME_RATIO: f64 = 0.5;
const DEFAULT_H2H_AWAY_RATIO: f64 = 0.3;
const DEFAULT_H2H_BTTS_RATIO: f64 = 0.6;
const DEFAULT_H2H_OVER_RATIO: f64 = 0.5;

/// Score a recent-form sequence into [0, ~1]. Wins contribute their full
/// positional weight, draws half, losses nothing. An empty sequence is
/// treated as unknown and scores 0.5.
pub fn form_score(form: &[MatchOutcome]) -> f64 {
    if form.is_empty() {
        return 0.5;
    }

    form.iter()
        .enumerate()
        .map(|(i, outcome)| {
            let weight = FORM_WEIGHTS.get(i).copied().unwrap_or(FORM_WEIGHT_TAIL);
            let value = match outcome {
                MatchOutcome::Win => 1.0,
                MatchOutcome::Draw => 0.5,
                MatchOutcome::Loss => 0.0,
            };
            weight * value
        })
        .sum()
}

/// Deterministic mapping from aggregated statistics to a full set of market
/// probabilities. Pure computation, no state.
///
/// Home/draw/away are deliberately not renormalized to sum to 1: draw is a
/// clamped residual and the win probabilities are clamped independently.
/// Renormalizing would silently change output values.
pub fn predict(
    match_id: i64,
    home: &FormStats,
    away: &FormStats,
    h2h: &H2HStats,
    now: DateTime<Utc>,
) -> Prediction {
    let home_form = form_score(&home.recent_form);
    let away_form = form_score(&away.recent_form);

    let home_win_probability = home_win_probability(home_form, away_form, home, away, h2h);
    let away_win_probability = away_win_probability(home_form, away_form, home, away, h2h);
    let draw_probability = (1.0 - home_win_probability - away_win_probability).max(0.0);

    let both_teams_score_probability = both_teams_score_probability(home, away, h2h);
    let over_2_5_goals_probability = over_2_5_goals_probability(home, away, h2h);
    // Exact complement, no independent clamp
    let under_2_5_goals_probability = 1.0 - over_2_5_goals_probability;

    // Simple sums; these can exceed 1 in edge cases and are stored as-is
    let home_win_or_draw_probability = home_win_probability + draw_probability;
    let away_win_or_draw_probability = away_win_probability + draw_probability;

    let home_handicap_probability = handicap_probability(home_win_probability, HANDICAP_LINE);
    let away_handicap_probability = handicap_probability(away_win_probability, HANDICAP_LINE);

    let confidence_score = confidence_score(&home.recent_form, &away.recent_form, h2h);

    Prediction {
        id: None,
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
        prediction_date: now,
    }
}

fn home_win_probability(
    home_form: f64,
    away_form: f64,
    home: &FormStats,
    away: &FormStats,
    h2h: &H2HStats,
) -> f64 {
    let h2h_ratio = if h2h.total_matches > 0 {
        h2h.home_wins as f64 / h2h.total_matches as f64
    } else {
        DEFAULT_H2H_HOME_RATIO
    };

    let goals_adjustment = goals_adjustment(home.average_goals_scored, away.average_goals_conceded);

    let weighted_sum = 0.4 * home_form
        + 0.3 * (1.0 - away_form)
        + 0.3 * h2h_ratio
        + HOME_ADVANTAGE_TERM
        + GOALS_ADJUSTMENT_WEIGHT * goals_adjustment;

    // Normalize by the total weight carried by the blend
    let weight_sum = 0.4 + 0.3 + 0.3 + HOME_ADVANTAGE_TERM + GOALS_ADJUSTMENT_WEIGHT;

    clamp(weighted_sum / weight_sum, 0.1, 0.9)
}

fn away_win_probability(
    home_form: f64,
    away_form: f64,
    home: &FormStats,
    away: &FormStats,
    h2h: &H2HStats,
) -> f64 {
    let h2h_ratio = if h2h.total_matches > 0 {
        h2h.away_wins as f64 / h2h.total_matches as f64
    } else {
        DEFAULT_H2H_AWAY_RATIO
    };

    let goals_adjustment = goals_adjustment(away.average_goals_scored, home.average_goals_conceded);

    let weighted_sum = 0.3 * (1.0 - home_form)
        + 0.4 * away_form
        + 0.3 * h2h_ratio
        + AWAY_DISADVANTAGE_TERM
        + GOALS_ADJUSTMENT_WEIGHT * goals_adjustment;

    let weight_sum =
        0.3 + 0.4 + 0.3 + AWAY_DISADVANTAGE_TERM.abs() + GOALS_ADJUSTMENT_WEIGHT;

    clamp(weighted_sum / weight_sum, 0.05, 0.8)
}

/// Mean of the attacking side's normalized scoring rate and the defending
/// side's normalized leakiness
fn goals_adjustment(attack_avg_scored: f64, defence_avg_conceded: f64) -> f64 {
    let scoring = (attack_avg_scored / 2.0).min(1.0);
    let leakiness = (1.0 - defence_avg_conceded / 2.0).max(0.0);
    (scoring + leakiness) / 2.0
}

fn both_teams_score_probability(home: &FormStats, away: &FormStats, h2h: &H2HStats) -> f64 {
    let home_scoring = (home.average_goals_scored / 1.5).min(1.0);
    let away_scoring = (away.average_goals_scored / 1.5).min(1.0);
    let home_conceding = (home.average_goals_conceded / 1.5).min(1.0);
    let away_conceding = (away.average_goals_conceded / 1.5).min(1.0);

    let h2h_ratio = if h2h.total_matches > 0 {
        h2h.both_teams_scored as f64 / h2h.total_matches as f64
    } else {
        DEFAULT_H2H_BTTS_RATIO
    };

    let blended = (0.3 * home_scoring
        + 0.3 * away_scoring
        + 0.2 * home_conceding
        + 0.2 * away_conceding
        + 0.3 * h2h_ratio)
        / 1.3;

    clamp(blended, 0.2, 0.9)
}

fn over_2_5_goals_probability(home: &FormStats, away: &FormStats, h2h: &H2HStats) -> f64 {
    let combined_rate =
        ((home.average_goals_scored + away.average_goals_scored) / 3.0).min(1.0);

    let h2h_ratio = if h2h.total_matches > 0 {
        h2h.over_2_5_goals as f64 / h2h.total_matches as f64
    } else {
        DEFAULT_H2H_OVER_RATIO
    };

    clamp(0.7 * combined_rate + 0.3 * h2h_ratio, 0.2, 0.9)
}

/// Shift a win probability by a goal handicap line
fn handicap_probability(base: f64, line: f64) -> f64 {
    clamp(base - line * 0.1, 0.1, 0.9)
}

fn confidence_score(
    home_form: &[MatchOutcome],
    away_form: &[MatchOutcome],
    h2h: &H2HStats,
) -> f64 {
    let sample_factor = (h2h.total_matches as f64 / 5.0).min(1.0);

    let score = 0.3 * form_consistency(home_form)
        + 0.3 * form_consistency(away_form)
        + 0.4 * sample_factor;

    clamp(score, 0.1, 1.0)
}

/// Fraction of the form sequence occupied by its single most frequent
/// outcome; sequences too short to say anything score 0.5
fn form_consistency(form: &[MatchOutcome]) -> f64 {
    if form.len() < 2 {
        return 0.5;
    }

    let most_frequent = [MatchOutcome::Win, MatchOutcome::Draw, MatchOutcome::Loss]
        .iter()
        .map(|target| form.iter().filter(|o| *o == target).count())
        .max()
        .unwrap_or(0);

    most_frequent as f64 / form.len() as f64
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchOutcome::{Draw, Loss, Win};

    fn form_stats(form: &[MatchOutcome], avg_scored: f64, avg_conceded: f64) -> FormStats {
        FormStats {
            recent_form: form.to_vec(),
            goals_scored: 0,
            goals_conceded: 0,
            clean_sheets: 0,
            failed_to_score: 0,
            average_goals_scored: avg_scored,
            average_goals_conceded: avg_conceded,
            home_advantage: None,
            away_disadvantage: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_form_score_empty_is_half() {
        assert_close(form_score(&[]), 0.5);
    }

    #[test]
    fn test_form_score_five_wins_is_full_weight() {
        assert_close(form_score(&[Win; 5]), 0.4 + 0.3 + 0.2 + 0.08 + 0.02);
    }

    #[test]
    fn test_form_score_draws_at_half_weight() {
        assert_close(form_score(&[Draw; 5]), 0.5);
        assert_close(form_score(&[Loss; 5]), 0.0);
        assert_close(form_score(&[Win, Loss, Loss, Loss, Loss]), 0.4);
    }

    #[test]
    fn test_form_score_tail_weight_past_five() {
        let form = [Win, Win, Win, Win, Win, Win, Win];
        assert_close(form_score(&form), 1.0 + 2.0 * 0.01);
    }

    #[test]
    fn test_neutral_baseline_is_reproducible() {
        // No-information scenario: five draws each, one goal per match each
        // way, no head-to-head history. Values pinned by regression.
        let home = form_stats(&[Draw; 5], 1.0, 1.0);
        let away = form_stats(&[Draw; 5], 1.0, 1.0);
        let h2h = H2HStats::neutral();

        let p = predict(1, &home, &away, &h2h, Utc::now());

        assert_close(p.home_win_probability, 0.65 / 1.2);
        assert_close(p.away_win_probability, 0.44 / 1.15);
        assert_close(
            p.draw_probability,
            1.0 - 0.65 / 1.2 - 0.44 / 1.15,
        );
        assert_close(p.confidence_score, 0.6);
    }

    #[test]
    fn test_all_probabilities_in_clamp_ranges() {
        let extremes = [
            (form_stats(&[Win; 5], 5.0, 0.0), form_stats(&[Loss; 5], 0.0, 5.0)),
            (form_stats(&[Loss; 5], 0.0, 5.0), form_stats(&[Win; 5], 5.0, 0.0)),
            (form_stats(&[], 0.0, 0.0), form_stats(&[], 0.0, 0.0)),
            (form_stats(&[Draw; 5], 1.0, 1.0), form_stats(&[Draw; 5], 1.0, 1.0)),
        ];

        let histories = [
            H2HStats::neutral(),
            H2HStats {
                total_matches: 10,
                home_wins: 10,
                away_wins: 0,
                draws: 0,
                average_goals: 6.0,
                both_teams_scored: 10,
                over_2_5_goals: 10,
            },
            H2HStats {
                total_matches: 10,
                home_wins: 0,
                away_wins: 10,
                draws: 0,
                average_goals: 0.5,
                both_teams_scored: 0,
                over_2_5_goals: 0,
            },
        ];

        for (home, away) in &extremes {
            for h2h in &histories {
                let p = predict(1, home, away, h2h, Utc::now());

                assert!(p.home_win_probability >= 0.1 && p.home_win_probability <= 0.9);
                assert!(p.away_win_probability >= 0.05 && p.away_win_probability <= 0.8);
                assert!(p.draw_probability >= 0.0);
                assert!(p.both_teams_score_probability >= 0.2 && p.both_teams_score_probability <= 0.9);
                assert!(p.over_2_5_goals_probability >= 0.2 && p.over_2_5_goals_probability <= 0.9);
                assert!(p.home_handicap_probability >= 0.1 && p.home_handicap_probability <= 0.9);
                assert!(p.away_handicap_probability >= 0.1 && p.away_handicap_probability <= 0.9);
                assert!(p.confidence_score >= 0.1 && p.confidence_score <= 1.0);

                // Exact complement, never independently clamped
                assert_close(
                    p.under_2_5_goals_probability,
                    1.0 - p.over_2_5_goals_probability,
                );
            }
        }
    }

    #[test]
    fn test_draw_is_residual_and_never_negative() {
        // Two in-form high-scoring sides push home + away past 1
        let home = form_stats(&[Win; 5], 3.0, 3.0);
        let away = form_stats(&[Win; 5], 3.0, 3.0);
        let h2h = H2HStats::neutral();

        let p = predict(1, &home, &away, &h2h, Utc::now());
        assert!(p.home_win_probability + p.away_win_probability >= 1.0);
        assert_close(p.draw_probability, 0.0);
        // Double-chance sums collapse to the win probabilities
        assert_close(p.home_win_or_draw_probability, p.home_win_probability);
    }

    #[test]
    fn test_handicap_shifts_base_probability() {
        assert_close(handicap_probability(0.8, 1.5), 0.65);
        assert_close(handicap_probability(0.15, 1.5), 0.1); // floor
        assert_close(handicap_probability(0.2, 0.0), 0.2);
    }

    #[test]
    fn test_strong_home_scenario() {
        // Home in strong form against a struggling away side with a
        // favorable head-to-head record
        let home = form_stats(&[Win, Win, Win, Draw, Loss], 2.0, 0.8);
        let away = form_stats(&[Loss, Draw, Loss, Loss, Win], 0.6, 1.8);
        let h2h = H2HStats {
            total_matches: 4,
            home_wins: 3,
            away_wins: 0,
            draws: 1,
            average_goals: 2.75,
            both_teams_scored: 2,
            over_2_5_goals: 2,
        };

        let p = predict(1, &home, &away, &h2h, Utc::now());

        // Weighted value: (0.4*0.94 + 0.3*0.83 + 0.3*0.75 + 0.1 + 0.1*0.55) / 1.2
        assert_close(p.home_win_probability, 1.005 / 1.2);
        assert!(p.home_win_probability > 0.5);
        assert!(p.away_win_probability < 0.2);

        // Both sides 3/5 consistent, h2h sample factor 4/5
        assert_close(p.confidence_score, 0.3 * 0.6 + 0.3 * 0.6 + 0.4 * 0.8);
    }

    #[test]
    fn test_snapshot_carries_generation_time() {
        let now = Utc::now();
        let p = predict(
            77,
            &FormStats::neutral(),
            &FormStats::neutral(),
            &H2HStats::neutral(),
            now,
        );
        assert_eq!(p.match_id, 77);
        assert_eq!(p.prediction_date, now);
        assert!(p.id.is_none());
    }
}
