//! Trusted life-cycle classification for events
//!
//! Providers are observed sending `in_progress` before their own declared
//! start time, and omitting status updates at kickoff. The clock is
//! therefore never authoritative: only an explicit live-class status can
//! classify an event as `Live`, and ambiguity yields `Unknown` rather than
//! a guess. False negatives are preferred to false positives that would
//! point users at markets that should already be frozen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::status::vocab::RawStatus;

/// Trusted event life-cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TruthStatus {
    Upcoming,
    Live,
    Finished,
    Unknown,
}

impl fmt::Display for TruthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TruthStatus::Upcoming => "UPCOMING",
            TruthStatus::Live => "LIVE",
            TruthStatus::Finished => "FINISHED",
            TruthStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Classify an event's trusted state from its normalized provider status
/// and clock context.
///
/// Deterministic and pure over its three inputs. The transition rules:
/// prematch statuses stay `Upcoming` even when `now` is past `start`
/// (providers legitimately delay starts); only live-class statuses yield
/// `Live`; terminal statuses (including abandoned) yield `Finished`;
/// everything else is an explicit refusal to guess.
pub fn compute_truth_status(
    raw: &RawStatus,
    now: DateTime<Utc>,
    start: DateTime<Utc>,
) -> TruthStatus {
    if raw.is_live() {
        return TruthStatus::Live;
    }
    if raw.is_terminal() {
        return TruthStatus::Finished;
    }
    if raw.is_prematch() {
        if now >= start {
            debug!(
                "prematch status {} persists past scheduled start ({} >= {})",
                raw, now, start
            );
        }
        return TruthStatus::Upcoming;
    }
    TruthStatus::Unknown
}
