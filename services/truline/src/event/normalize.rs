//! Normalize a raw provider payload into a canonical `Event`
//!
//! The normalizer never fails: missing or malformed fields degrade to
//! defaults (now-fallback start time, placeholder team names) and a
//! best-effort record is always produced. Callers needing strict
//! validation inspect the returned fields instead.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::event::fields;
use crate::event::{Event, League};
use crate::status::{compute_truth_status, map_provider_status, TruthStatus};
use crate::time;

const PLACEHOLDER_HOME: &str = "Team A";
const PLACEHOLDER_AWAY: &str = "Team B";

/// Normalize a raw payload using the wall clock.
pub fn normalize(payload: &Value) -> Event {
    normalize_at(payload, Utc::now())
}

/// Normalize a raw payload against an explicit "now", injectable for tests
/// and re-evaluation passes.
pub fn normalize_at(payload: &Value, now: DateTime<Utc>) -> Event {
    let payload_hash = hash_payload(payload);

    let start_time = match fields::first_present(payload, fields::START_TIME_FIELDS) {
        Some(v) => match time::parse_instant(v) {
            Ok(dt) => dt,
            Err(e) => {
                warn!("unparsable start time ({}), falling back to now", e);
                now
            }
        },
        None => {
            warn!("payload has no start time field, falling back to now");
            now
        }
    };

    let provider_status =
        fields::first_string(payload, fields::STATUS_FIELDS).unwrap_or_default();
    let raw_status = map_provider_status(&provider_status);
    let truth_status = compute_truth_status(&raw_status, now, start_time);

    let id = fields::first_string(payload, fields::EVENT_ID_FIELDS)
        .unwrap_or_else(|| format!("unknown-{}", &payload_hash[..12]));
    let home_team = fields::first_string(payload, fields::HOME_TEAM_FIELDS)
        .unwrap_or_else(|| PLACEHOLDER_HOME.to_string());
    let away_team = fields::first_string(payload, fields::AWAY_TEAM_FIELDS)
        .unwrap_or_else(|| PLACEHOLDER_AWAY.to_string());

    let league = fields::first_string(payload, fields::LEAGUE_FIELDS)
        .map(|tag| League::from_provider_tag(&tag))
        .unwrap_or(League::Unknown);

    let period = fields::first_string(payload, fields::PERIOD_FIELDS);
    let clock = fields::first_string(payload, fields::CLOCK_FIELDS);

    if cfg!(debug_assertions) {
        // Observability self-checks for upstream provider bugs; they never
        // alter the computed statuses.
        if truth_status == TruthStatus::Live && !raw_status.is_live() {
            warn!(
                "STATUS-MISMATCH: event {} is LIVE with non-live raw status {}",
                id, raw_status
            );
        }
        if raw_status.is_live() && start_time > now {
            warn!(
                "PROVIDER-BUG: event {} reports live status {} before scheduled start {}",
                id,
                raw_status,
                time::to_utc_iso(&start_time)
            );
        }
    }

    Event {
        id,
        home_team,
        away_team,
        league,
        start_time,
        provider_status,
        raw_status,
        truth_status,
        period,
        clock,
        payload_hash,
    }
}

fn hash_payload(payload: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
