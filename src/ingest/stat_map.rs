use serde_json::Value;

use crate::api::football::StatEntry;
use crate::models::MatchStatistics;

/// Typed destination for a labeled statistic from the source payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatField {
    ShotsTotal,
    ShotsOnGoal,
    BallPossession,
    YellowCards,
    RedCards,
    TotalPasses,
    ExpectedGoals,
}

/// Label-to-field mapping for the source's statistics vocabulary.
/// Labels not listed here are ignored; listed labels absent from a payload
/// leave their field null.
const STAT_LABELS: &[(&str, StatField)] = &[
    ("total shots", StatField::ShotsTotal),
    ("shots on goal", StatField::ShotsOnGoal),
    ("ball possession", StatField::BallPossession),
    ("yellow cards", StatField::YellowCards),
    ("red cards", StatField::RedCards),
    ("total passes", StatField::TotalPasses),
    ("expected_goals", StatField::ExpectedGoals),
    ("expected goals", StatField::ExpectedGoals),
];

/// Build a statistics record for (match, team) from the source's unordered
/// list of labeled values
pub fn extract_statistics(match_id: i64, team_id: i64, entries: &[StatEntry]) -> MatchStatistics {
    let mut stats = MatchStatistics {
        match_id,
        team_id,
        ..Default::default()
    };

    for entry in entries {
        let label = entry.label.trim().to_lowercase();
        let field = match STAT_LABELS.iter().find(|(l, _)| *l == label) {
            Some((_, field)) => *field,
            None => continue,
        };

        match field {
            StatField::ShotsTotal => stats.shots_total = as_integer(&entry.value),
            StatField::ShotsOnGoal => stats.shots_on_goal = as_integer(&entry.value),
            StatField::BallPossession => stats.ball_possession = as_number(&entry.value),
            StatField::YellowCards => stats.yellow_cards = as_integer(&entry.value),
            StatField::RedCards => stats.red_cards = as_integer(&entry.value),
            StatField::TotalPasses => stats.total_passes = as_integer(&entry.value),
            StatField::ExpectedGoals => stats.expected_goals = as_number(&entry.value),
        }
    }

    stats
}

/// Parse a stat value that may arrive as a number, a numeric string, or a
/// percentage string like "55%". Null and unparseable values yield None.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    as_number(value).map(|n| n.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(label: &str, value: Value) -> StatEntry {
        StatEntry {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_extract_known_labels() {
        let entries = vec![
            entry("Total Shots", json!(14)),
            entry("Shots on Goal", json!(6)),
            entry("Ball Possession", json!("62%")),
            entry("Yellow Cards", json!(2)),
            entry("Red Cards", json!(null)),
            entry("Total passes", json!(512)),
            entry("expected_goals", json!("1.84")),
        ];

        let stats = extract_statistics(1001, 33, &entries);
        assert_eq!(stats.shots_total, Some(14));
        assert_eq!(stats.shots_on_goal, Some(6));
        assert_eq!(stats.ball_possession, Some(62.0));
        assert_eq!(stats.yellow_cards, Some(2));
        assert_eq!(stats.red_cards, None);
        assert_eq!(stats.total_passes, Some(512));
        assert_eq!(stats.expected_goals, Some(1.84));
    }

    #[test]
    fn test_unknown_and_missing_labels_left_null() {
        let entries = vec![
            entry("Corner Kicks", json!(7)),
            entry("Total Shots", json!(9)),
        ];

        let stats = extract_statistics(1001, 33, &entries);
        assert_eq!(stats.shots_total, Some(9));
        assert_eq!(stats.shots_on_goal, None);
        assert_eq!(stats.ball_possession, None);
        assert_eq!(stats.expected_goals, None);
    }

    #[test]
    fn test_unparseable_value_left_null() {
        let entries = vec![entry("Ball Possession", json!("n/a"))];
        let stats = extract_statistics(1, 2, &entries);
        assert_eq!(stats.ball_possession, None);
    }
}
