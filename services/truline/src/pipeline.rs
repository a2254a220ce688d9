//! Batch glue: normalize payloads, dedupe odds, build opportunities,
//! and cache per-game results
//!
//! JSONL is the interchange format for run artifacts (one payload, event,
//! or opportunity per line).

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::event::{self, Event};
use crate::odds::cache::ResultCache;
use crate::odds::dedupe::{dedupe_opportunities, dedupe_quotes};
use crate::odds::types::{MarketType, Opportunity, SportsbookQuote};
use crate::provider::ProviderFeed;
use crate::status::TruthStatus;

/// Counters for one pipeline run, logged as the run summary.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub events_in: usize,
    pub events_unknown_status: usize,
    pub games_skipped_recent: usize,
    pub quotes_in: usize,
    pub quotes_dropped: usize,
    pub opportunities_built: usize,
    pub opportunities_merged: usize,
}

impl RunStats {
    pub fn log_summary(&self) {
        info!(
            "run summary: {} events in ({} unknown status), {} games skipped as recent, {} quotes in ({} dropped as duplicates), {} opportunities built ({} merged away)",
            self.events_in,
            self.events_unknown_status,
            self.games_skipped_recent,
            self.quotes_in,
            self.quotes_dropped,
            self.opportunities_built,
            self.opportunities_merged,
        );
    }
}

/// Normalize a batch of raw payloads.
pub fn normalize_batch(payloads: &[Value]) -> Vec<Event> {
    payloads.iter().map(event::normalize).collect()
}

/// Consensus-edge expected value: how much the best available price beats
/// the average implied probability across the surviving books.
fn expected_value(quotes: &[SportsbookQuote]) -> f64 {
    let prices: Vec<f64> = quotes.iter().filter_map(|q| q.home_odds).collect();
    if prices.is_empty() {
        return 0.0;
    }
    let consensus_prob =
        prices.iter().map(|p| 1.0 / p).sum::<f64>() / prices.len() as f64;
    let best = prices.iter().cloned().fold(f64::MIN, f64::max);
    best * consensus_prob - 1.0
}

/// Build the opportunity for one event/market from already-deduped quotes.
/// Returns `None` when no quotes survive.
pub fn build_opportunity(
    event: &Event,
    market: MarketType,
    quotes: Vec<SportsbookQuote>,
) -> Option<Opportunity> {
    if quotes.is_empty() {
        return None;
    }
    let line = quotes.iter().find_map(|q| q.line());
    Some(Opportunity {
        game: event.label(),
        market,
        line,
        expected_value: expected_value(&quotes),
        quotes,
    })
}

/// One processing pass over a provider feed. Events are normalized, games
/// still fresh in the cache are skipped, quotes per market are deduped,
/// opportunities are merged, and each processed game's surviving
/// opportunities are cached.
pub struct Pipeline {
    cache: Arc<ResultCache>,
    markets: Vec<MarketType>,
}

impl Pipeline {
    pub fn new(cache: Arc<ResultCache>, markets: Vec<MarketType>) -> Self {
        Self { cache, markets }
    }

    pub async fn process_feed(
        &self,
        feed: &dyn ProviderFeed,
    ) -> Result<(Vec<Event>, Vec<Opportunity>, RunStats)> {
        let mut stats = RunStats::default();

        let payloads = feed
            .fetch_events()
            .await
            .with_context(|| format!("fetching events from feed {}", feed.name()))?;
        let events = normalize_batch(&payloads);
        stats.events_in = events.len();
        stats.events_unknown_status = events
            .iter()
            .filter(|e| e.truth_status == TruthStatus::Unknown)
            .count();

        let fresh: Vec<&Event> = self.cache.fresh_games(&events, |e| e.id.as_str());
        stats.games_skipped_recent = events.len() - fresh.len();

        let mut all_opportunities = Vec::new();
        for event in fresh {
            let mut game_opportunities = Vec::new();
            for &market in &self.markets {
                let quotes = match feed.fetch_quotes(&event.id, market).await {
                    Ok(quotes) => quotes,
                    Err(e) => {
                        warn!("quote fetch failed for {} {}: {}", event.id, market, e);
                        continue;
                    }
                };
                stats.quotes_in += quotes.len();
                let surviving = dedupe_quotes(&quotes, market);
                stats.quotes_dropped += quotes.len() - surviving.len();
                if let Some(opp) = build_opportunity(event, market, surviving) {
                    game_opportunities.push(opp);
                }
            }
            self.cache
                .cache_game_result(&event.id, game_opportunities.clone());
            all_opportunities.extend(game_opportunities);
        }

        stats.opportunities_built = all_opportunities.len();
        let surviving = dedupe_opportunities(all_opportunities);
        stats.opportunities_merged = stats.opportunities_built - surviving.len();

        Ok((events, surviving, stats))
    }
}

/// Read one JSON payload per line.
pub fn load_payloads_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open payload file: {:?}", path.as_ref()))?;
    let reader = BufReader::new(file);

    let mut payloads = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let payload: Value = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse payload line: {}", line))?;
        payloads.push(payload);
    }
    Ok(payloads)
}

pub fn write_events_jsonl<P: AsRef<Path>>(path: P, events: &[Event]) -> Result<()> {
    write_jsonl(path, events)
}

pub fn write_opportunities_jsonl<P: AsRef<Path>>(
    path: P,
    opportunities: &[Opportunity],
) -> Result<()> {
    write_jsonl(path, opportunities)
}

fn write_jsonl<P: AsRef<Path>, T: serde::Serialize>(path: P, records: &[T]) -> Result<()> {
    if let Some(dir) = path.as_ref().parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("Failed to create output file: {:?}", path.as_ref()))?;
    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;
    }
    info!("Wrote {} records to {:?}", records.len(), path.as_ref());
    Ok(())
}
