//! Quote and opportunity records

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Moneyline,
    Spread,
    Total,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Moneyline => "moneyline",
            MarketType::Spread => "spread",
            MarketType::Total => "total",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sportsbook's quote for a market.
///
/// `home_odds`/`away_odds` are the two-sided prices; for totals they carry
/// the over/under side prices. `spread` and `total` hold the line for
/// their respective market types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsbookQuote {
    pub sportsbook: String,
    pub market: MarketType,
    #[serde(default)]
    pub home_odds: Option<f64>,
    #[serde(default)]
    pub away_odds: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl SportsbookQuote {
    /// The line for this quote's market type, if any (moneylines carry
    /// none).
    pub fn line(&self) -> Option<f64> {
        match self.market {
            MarketType::Moneyline => None,
            MarketType::Spread => self.spread,
            MarketType::Total => self.total,
        }
    }
}

/// A market-level betting opportunity backed by surviving quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Game label, e.g. `"Lakers @ Celtics"`.
    pub game: String,
    pub market: MarketType,
    pub line: Option<f64>,
    pub expected_value: f64,
    pub quotes: Vec<SportsbookQuote>,
}

impl Opportunity {
    /// Dedup key: lowercase, whitespace-stripped game label + market +
    /// line (or the literal `none`).
    pub fn key(&self) -> String {
        let game: String = self
            .game
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let line = self
            .line
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!("{}|{}|{}", game, self.market, line)
    }
}
