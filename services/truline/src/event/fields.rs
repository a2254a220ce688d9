//! Ordered fallback field lists for shape-varying provider payloads
//!
//! Each upstream names the same concept differently. The candidate lists
//! below are evaluated in order with first-present-wins semantics; the
//! lists are the only implicit "schema" the normalizer has.

use serde_json::Value;

pub const EVENT_ID_FIELDS: &[&str] = &["id", "gameID", "game_id", "eventId", "event_id"];

pub const START_TIME_FIELDS: &[&str] = &[
    "gameTime",
    "game_time",
    "startTime",
    "start_time",
    "commence_time",
    "scheduled",
    "date",
];

pub const STATUS_FIELDS: &[&str] = &["status", "gameStatus", "game_status", "state"];

pub const HOME_TEAM_FIELDS: &[&str] = &["homeTeam", "home_team", "home"];

pub const AWAY_TEAM_FIELDS: &[&str] = &["awayTeam", "away_team", "away"];

pub const LEAGUE_FIELDS: &[&str] = &["league", "sport", "sport_key", "sportKey"];

pub const PERIOD_FIELDS: &[&str] = &["period", "quarter", "inning"];

pub const CLOCK_FIELDS: &[&str] = &["clock", "displayClock", "game_clock"];

/// First non-null value among the candidate field names.
pub fn first_present<'a>(payload: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|name| payload.get(name))
        .find(|v| !v.is_null())
}

/// First non-empty string among the candidate field names. Numbers are
/// stringified so numeric ids survive.
pub fn first_string(payload: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().filter_map(|name| payload.get(name)).find_map(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_present_ordered() {
        let payload = json!({"start_time": "b", "gameTime": "a"});
        let v = first_present(&payload, START_TIME_FIELDS).unwrap();
        assert_eq!(v, "a");
    }

    #[test]
    fn test_first_present_skips_null() {
        let payload = json!({"gameTime": null, "startTime": "x"});
        let v = first_present(&payload, START_TIME_FIELDS).unwrap();
        assert_eq!(v, "x");
    }

    #[test]
    fn test_first_string_skips_empty_and_stringifies_numbers() {
        let payload = json!({"id": "", "gameID": 40123});
        assert_eq!(first_string(&payload, EVENT_ID_FIELDS).unwrap(), "40123");
    }

    #[test]
    fn test_absent_everywhere_is_none() {
        let payload = json!({"unrelated": 1});
        assert!(first_present(&payload, STATUS_FIELDS).is_none());
        assert!(first_string(&payload, STATUS_FIELDS).is_none());
    }
}
