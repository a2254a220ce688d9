//! Mock feed generating the dirty payload shapes real providers send
//!
//! Field names rotate between upstream spellings, statuses come from a
//! pool of real-world vocabulary (including junk), and quote lists carry
//! duplicate books under cosmetically different names, so a pipeline run
//! against this feed exercises every fallback path.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use super::traits::ProviderFeed;
use crate::odds::types::{MarketType, SportsbookQuote};

const TEAM_POOL: &[(&str, &str, &str)] = &[
    ("Celtics", "Lakers", "NBA"),
    ("Knicks", "Heat", "basketball"),
    ("Chiefs", "Bills", "american football"),
    ("Arsenal", "Chelsea", "football"),
    ("Yankees", "Red Sox", "MLB"),
    ("Rangers", "Bruins", "hockey"),
];

const STATUS_POOL: &[&str] = &[
    "scheduled",
    "not_started",
    "IN_PROGRESS",
    "live",
    "Q3",
    "1st",
    "halftime",
    "Final",
    "ft",
    "",
    "Rain Delay",
];

const BOOK_POOL: &[&str] = &["DraftKings", "FanDuel", "BetMGM", "Caesars", "PointsBet"];

pub struct MockFeed {
    name: String,
    game_count: usize,
    seed: u64,
}

impl MockFeed {
    pub fn new(game_count: usize, seed: Option<u64>) -> Self {
        Self {
            name: "mock".to_string(),
            game_count,
            seed: seed.unwrap_or(0),
        }
    }

    fn rng(&self, salt: u64) -> fastrand::Rng {
        fastrand::Rng::with_seed(self.seed.wrapping_add(salt))
    }

    fn event_payload(&self, idx: usize, rng: &mut fastrand::Rng) -> Value {
        let (home, away, league) = TEAM_POOL[idx % TEAM_POOL.len()];
        let status = STATUS_POOL[rng.usize(..STATUS_POOL.len())];
        let start = Utc::now() + Duration::minutes(rng.i64(-120..180));
        let id = format!("mock-{}", idx);

        // Rotate through the field spellings real upstreams use.
        match idx % 3 {
            0 => json!({
                "gameID": id,
                "homeTeam": home,
                "awayTeam": away,
                "league": league,
                "gameTime": start.timestamp_millis(),
                "status": status,
            }),
            1 => json!({
                "id": id,
                "home_team": home,
                "away_team": away,
                "sport": league,
                "start_time": start.to_rfc3339(),
                "state": status,
            }),
            // Status intentionally absent: exercises the unknown path.
            _ => json!({
                "eventId": id,
                "home": home,
                "away": away,
                "sport_key": league,
                "commence_time": start.to_rfc3339(),
            }),
        }
    }
}

#[async_trait]
impl ProviderFeed for MockFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_events(&self) -> Result<Vec<Value>> {
        let mut rng = self.rng(0);
        let payloads = (0..self.game_count)
            .map(|idx| self.event_payload(idx, &mut rng))
            .collect();
        Ok(payloads)
    }

    async fn fetch_quotes(
        &self,
        event_id: &str,
        market: MarketType,
    ) -> Result<Vec<SportsbookQuote>> {
        let salt = event_id.bytes().map(u64::from).sum::<u64>();
        let mut rng = self.rng(salt);

        let mut quotes = Vec::new();
        for book in BOOK_POOL.iter().take(rng.usize(3..=BOOK_POOL.len())) {
            quotes.push(random_quote(book, market, &mut rng));
        }

        // Near-duplicate row under a cosmetically different name, the way
        // aggregators resend the same book.
        if let Some(first) = quotes.first().cloned() {
            let mut dup = first;
            dup.sportsbook = dup
                .sportsbook
                .chars()
                .flat_map(|c| {
                    if c.is_uppercase() {
                        vec![' ', c]
                    } else {
                        vec![c]
                    }
                })
                .collect::<String>()
                .trim()
                .to_string();
            quotes.push(dup);
        }

        Ok(quotes)
    }
}

fn random_quote(book: &str, market: MarketType, rng: &mut fastrand::Rng) -> SportsbookQuote {
    let price = |rng: &mut fastrand::Rng| 1.70 + rng.f64() * 0.6;
    let mut quote = SportsbookQuote {
        sportsbook: book.to_string(),
        market,
        home_odds: Some(price(rng)),
        away_odds: Some(price(rng)),
        spread: None,
        total: None,
    };
    match market {
        MarketType::Spread => {
            quote.spread = Some((rng.i32(-20..20) as f64) / 2.0);
        }
        MarketType::Total => {
            quote.total = Some(180.0 + (rng.i32(0..120) as f64) / 2.0);
        }
        MarketType::Moneyline => {}
    }
    quote
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_feed_event_shapes_vary() {
        let feed = MockFeed::new(6, Some(42));
        let payloads = feed.fetch_events().await.unwrap();
        assert_eq!(payloads.len(), 6);
        assert!(payloads[0].get("gameID").is_some());
        assert!(payloads[1].get("home_team").is_some());
        assert!(payloads[2].get("commence_time").is_some());
        assert!(payloads[2].get("status").is_none());
    }

    #[tokio::test]
    async fn test_mock_feed_quotes_contain_duplicate_book() {
        let feed = MockFeed::new(1, Some(42));
        let quotes = feed
            .fetch_quotes("mock-0", MarketType::Moneyline)
            .await
            .unwrap();
        assert!(quotes.len() >= 4);

        let deduped = crate::odds::dedupe::dedupe_quotes(&quotes, MarketType::Moneyline);
        assert!(deduped.len() < quotes.len(), "duplicate book should collapse");
    }

    #[tokio::test]
    async fn test_mock_feed_deterministic_with_seed() {
        let a = MockFeed::new(4, Some(7)).fetch_quotes("g", MarketType::Spread).await.unwrap();
        let b = MockFeed::new(4, Some(7)).fetch_quotes("g", MarketType::Spread).await.unwrap();
        assert_eq!(a, b);
    }
}
