//! Canonical event records normalized from raw provider payloads

pub mod fields;
pub mod normalize;

pub use normalize::{normalize, normalize_at};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::{RawStatus, TruthStatus};

/// League/sport tag collapsed into a fixed vocabulary for downstream
/// filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum League {
    Nfl,
    Nba,
    Mlb,
    Nhl,
    Soccer,
    Racing,
    Unknown,
    Other(String),
}

impl League {
    /// Collapse a provider sport/league tag. `"american football"` is NFL;
    /// any other football is soccer; motorsport synonyms are racing.
    pub fn from_provider_tag(tag: &str) -> League {
        let t = tag.trim().to_lowercase();
        if t.is_empty() {
            return League::Unknown;
        }
        if t.contains("american football") || t == "nfl" {
            return League::Nfl;
        }
        if t == "nba" || t.contains("basketball") {
            return League::Nba;
        }
        if t == "mlb" || t.contains("baseball") {
            return League::Mlb;
        }
        if t == "nhl" || t.contains("hockey") {
            return League::Nhl;
        }
        if t.contains("football") || t.contains("soccer") || t == "epl" {
            return League::Soccer;
        }
        if t.contains("motorsport")
            || t.contains("racing")
            || t.contains("nascar")
            || t == "f1"
            || t.contains("formula 1")
            || t.contains("formula one")
            || t.contains("indycar")
        {
            return League::Racing;
        }
        League::Other(tag.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            League::Nfl => "NFL",
            League::Nba => "NBA",
            League::Mlb => "MLB",
            League::Nhl => "NHL",
            League::Soccer => "SOCCER",
            League::Racing => "RACING",
            League::Unknown => "UNKNOWN",
            League::Other(tag) => tag,
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical event record.
///
/// Constructed fresh on every normalization pass; a later pass over the
/// same upstream game produces a new value rather than mutating this one.
/// `provider_status` keeps the original status string for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub league: League,
    pub start_time: DateTime<Utc>,
    pub provider_status: String,
    pub raw_status: RawStatus,
    pub truth_status: TruthStatus,
    pub period: Option<String>,
    pub clock: Option<String>,
    /// sha256 of the raw payload this record was derived from.
    pub payload_hash: String,
}

impl Event {
    /// Display label, e.g. `"Celtics @ Lakers"`.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}
