//! Map free-form provider status tokens into a closed vocabulary

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized provider status code.
///
/// `Other` preserves an unrecognized non-empty token verbatim rather than
/// collapsing it to `Unknown`; the original spelling is what operators need
/// when chasing a new provider vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawStatus {
    NotStarted,
    Scheduled,
    InProgress,
    Live,
    FirstHalf,
    SecondHalf,
    HalfTime,
    Q1,
    Q2,
    Q3,
    Q4,
    Overtime,
    Final,
    FullTime,
    Completed,
    Abandoned,
    Unknown,
    Other(String),
}

impl RawStatus {
    /// Not-started class: the game has not begun per the provider.
    pub fn is_prematch(&self) -> bool {
        matches!(self, RawStatus::NotStarted | RawStatus::Scheduled)
    }

    /// Live class: an explicit in-progress signal. Only this class may
    /// classify as `TruthStatus::Live`.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            RawStatus::InProgress
                | RawStatus::Live
                | RawStatus::FirstHalf
                | RawStatus::SecondHalf
                | RawStatus::HalfTime
                | RawStatus::Q1
                | RawStatus::Q2
                | RawStatus::Q3
                | RawStatus::Q4
                | RawStatus::Overtime
        )
    }

    /// Terminal class: no further bets are live, whether the game completed
    /// or was abandoned.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RawStatus::Final | RawStatus::FullTime | RawStatus::Completed | RawStatus::Abandoned
        )
    }

    /// Short display code, e.g. `1H`, `Q3`, `ft`.
    pub fn as_code(&self) -> &str {
        match self {
            RawStatus::NotStarted => "not_started",
            RawStatus::Scheduled => "scheduled",
            RawStatus::InProgress => "in_progress",
            RawStatus::Live => "live",
            RawStatus::FirstHalf => "1H",
            RawStatus::SecondHalf => "2H",
            RawStatus::HalfTime => "HT",
            RawStatus::Q1 => "Q1",
            RawStatus::Q2 => "Q2",
            RawStatus::Q3 => "Q3",
            RawStatus::Q4 => "Q4",
            RawStatus::Overtime => "OT",
            RawStatus::Final => "final",
            RawStatus::FullTime => "ft",
            RawStatus::Completed => "completed",
            RawStatus::Abandoned => "abandoned",
            RawStatus::Unknown => "unknown",
            RawStatus::Other(token) => token,
        }
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Map an arbitrary provider status token to a `RawStatus`.
///
/// Pure and total: every input produces exactly one output. Case and
/// separator characters (`_`, `-`, repeated whitespace) are ignored for
/// matching. Empty input maps to `Unknown`; unrecognized non-empty tokens
/// pass through verbatim as `Other`.
pub fn map_provider_status(raw: &str) -> RawStatus {
    let norm = normalize_token(raw);
    if norm.is_empty() {
        return RawStatus::Unknown;
    }

    match norm.as_str() {
        "not started" | "notstarted" | "ns" => return RawStatus::NotStarted,
        "scheduled" | "pre" | "pregame" | "upcoming" => return RawStatus::Scheduled,
        "in progress" | "inprogress" => return RawStatus::InProgress,
        "live" | "playing" => return RawStatus::Live,
        "1h" | "h1" | "first half" => return RawStatus::FirstHalf,
        "2h" | "h2" | "second half" => return RawStatus::SecondHalf,
        "ht" | "half" | "halftime" | "half time" => return RawStatus::HalfTime,
        "q1" | "first quarter" => return RawStatus::Q1,
        "q2" | "second quarter" => return RawStatus::Q2,
        "q3" | "third quarter" => return RawStatus::Q3,
        "q4" | "fourth quarter" => return RawStatus::Q4,
        "ot" | "overtime" => return RawStatus::Overtime,
        "final" => return RawStatus::Final,
        "ft" | "full time" | "fulltime" => return RawStatus::FullTime,
        "completed" | "complete" | "finished" | "ended" => return RawStatus::Completed,
        "abandoned" | "cancelled" | "canceled" => return RawStatus::Abandoned,
        "unknown" => return RawStatus::Unknown,
        _ => {}
    }

    // Ordinal spellings: "1st quarter"/"3rd" and friends. Bare "1st"/"2nd"
    // are half markers in provider feeds; bare "3rd"/"4th" only occur for
    // quarter sports.
    let quarter_re = Regex::new(r"^(?:q\s*([1-4])|([1-4])(?:st|nd|rd|th)\s+quarter|quarter\s+([1-4]))$").unwrap();
    if let Some(caps) = quarter_re.captures(&norm) {
        let digit = caps
            .iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str())
            .unwrap_or("");
        return match digit {
            "1" => RawStatus::Q1,
            "2" => RawStatus::Q2,
            "3" => RawStatus::Q3,
            _ => RawStatus::Q4,
        };
    }

    let half_re = Regex::new(r"^([12])(?:st|nd)\s+half$").unwrap();
    if let Some(caps) = half_re.captures(&norm) {
        return if &caps[1] == "1" {
            RawStatus::FirstHalf
        } else {
            RawStatus::SecondHalf
        };
    }

    let ordinal_re = Regex::new(r"^([1-4])(?:st|nd|rd|th)$").unwrap();
    if let Some(caps) = ordinal_re.captures(&norm) {
        return match &caps[1] {
            "1" => RawStatus::FirstHalf,
            "2" => RawStatus::SecondHalf,
            "3" => RawStatus::Q3,
            _ => RawStatus::Q4,
        };
    }

    RawStatus::Other(raw.trim().to_string())
}

fn normalize_token(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(['_', '-'], " ");
    let ws_re = Regex::new(r"\s+").unwrap();
    ws_re.replace_all(lowered.trim(), " ").to_string()
}
