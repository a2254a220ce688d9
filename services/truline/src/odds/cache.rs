//! Per-game result cache with short-TTL freshness semantics
//!
//! Reads treat an entry older than the cache duration as absent without
//! deleting it; a background sweeper evicts entries older than five times
//! the duration so memory stays bounded independent of read traffic. The
//! cache is an explicitly constructed component owned by the caller's
//! wiring; the sweeper starts and stops through `SweeperHandle`.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant};
use tracing::debug;

use crate::odds::types::Opportunity;

pub const DEFAULT_CACHE_DURATION_MS: u64 = 60_000;
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 300_000;

/// Entries older than this multiple of the cache duration are removed by
/// the sweeper.
const EVICTION_MULTIPLIER: u32 = 5;

struct CacheEntry {
    cached_at: Instant,
    opportunities: Vec<Opportunity>,
}

pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    cache_duration: Duration,
    sweep_interval: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_durations(
            Duration::from_millis(DEFAULT_CACHE_DURATION_MS),
            Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        )
    }

    pub fn with_durations(cache_duration: Duration, sweep_interval: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cache_duration,
            sweep_interval,
        }
    }

    /// True if the game was cached within the cache duration.
    pub fn is_recently_processed(&self, game_id: &str) -> bool {
        let entries = self.entries.lock();
        entries
            .get(game_id)
            .map(|e| e.cached_at.elapsed() < self.cache_duration)
            .unwrap_or(false)
    }

    /// Overwrite the entry for a game with a fresh timestamp. Entries are
    /// replaced wholesale, never merged.
    pub fn cache_game_result(&self, game_id: &str, opportunities: Vec<Opportunity>) {
        let mut entries = self.entries.lock();
        entries.insert(
            game_id.to_string(),
            CacheEntry {
                cached_at: Instant::now(),
                opportunities,
            },
        );
    }

    /// The cached opportunities if still recent. Stale entries surface as
    /// `None` but are not deleted here; the sweeper removes them.
    pub fn get_cached_opportunities(&self, game_id: &str) -> Option<Vec<Opportunity>> {
        let entries = self.entries.lock();
        entries
            .get(game_id)
            .filter(|e| e.cached_at.elapsed() < self.cache_duration)
            .map(|e| e.opportunities.clone())
    }

    /// Filter a candidate list down to games not recently processed, so a
    /// caller can skip redundant upstream fetches.
    pub fn fresh_games<'a, T, F>(&self, games: &'a [T], id_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        games
            .iter()
            .filter(|g| !self.is_recently_processed(id_of(g)))
            .collect()
    }

    /// Remove entries older than five times the cache duration. Returns the
    /// number evicted.
    pub fn evict_expired(&self) -> usize {
        let cutoff = self.cache_duration * EVICTION_MULTIPLIER;
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| e.cached_at.elapsed() <= cutoff);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("sweeper evicted {} expired game results", evicted);
        }
        evicted
    }

    /// Operator-triggered full invalidation.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of physically present entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Spawn the periodic eviction task. The handle must be kept; dropping
    /// the shutdown side without calling [`SweeperHandle::stop`] leaves the
    /// task running until the runtime shuts down.
    pub fn start_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let cache = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let sweep_interval = self.sweep_interval;

        let task = tokio::spawn(async move {
            let mut ticker = interval(sweep_interval);
            // The first tick completes immediately; skip it so the first
            // sweep happens one full interval after startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cache.evict_expired();
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("result cache sweeper stopped");
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Explicit stop hook for the sweeper task, for clean shutdown in tests
/// and process teardown.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::types::MarketType;

    fn sample_opp() -> Opportunity {
        Opportunity {
            game: "Lakers @ Celtics".to_string(),
            market: MarketType::Moneyline,
            line: None,
            expected_value: 0.02,
            quotes: vec![],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_then_stale_after_duration() {
        let cache = ResultCache::with_durations(
            Duration::from_millis(60_000),
            Duration::from_millis(300_000),
        );

        cache.cache_game_result("g1", vec![sample_opp()]);
        assert!(cache.is_recently_processed("g1"));
        let cached = cache.get_cached_opportunities("g1").unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].game, "Lakers @ Celtics");

        tokio::time::advance(Duration::from_millis(60_001)).await;
        assert!(!cache.is_recently_processed("g1"));
        assert!(cache.get_cached_opportunities("g1").is_none());
        // Stale reads do not delete; the entry is still physically present.
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_refreshes_timestamp() {
        let cache = ResultCache::with_durations(
            Duration::from_millis(60_000),
            Duration::from_millis(300_000),
        );

        cache.cache_game_result("g1", vec![]);
        tokio::time::advance(Duration::from_millis(50_000)).await;
        cache.cache_game_result("g1", vec![sample_opp()]);
        tokio::time::advance(Duration::from_millis(50_000)).await;

        // 100s after the first write but only 50s after the overwrite.
        assert!(cache.is_recently_processed("g1"));
        assert_eq!(cache.get_cached_opportunities("g1").unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_games_filters_recently_processed() {
        let cache = ResultCache::with_durations(
            Duration::from_millis(60_000),
            Duration::from_millis(300_000),
        );
        let games = ["g1", "g2"];

        let fresh = cache.fresh_games(&games, |g| *g);
        assert_eq!(fresh.len(), 2);

        cache.cache_game_result("g1", vec![]);
        let fresh = cache.fresh_games(&games, |g| *g);
        assert_eq!(fresh, vec![&"g2"]);

        // Second call within the window still filters g1 out.
        cache.cache_game_result("g2", vec![]);
        let fresh = cache.fresh_games(&games, |g| *g);
        assert!(fresh.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_expired_removes_only_old_entries() {
        let cache = ResultCache::with_durations(
            Duration::from_millis(60_000),
            Duration::from_millis(300_000),
        );

        cache.cache_game_result("old", vec![]);
        tokio::time::advance(Duration::from_millis(301_000)).await;
        cache.cache_game_result("new", vec![]);

        let evicted = cache.evict_expired();
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.is_recently_processed("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_invalidates_everything() {
        let cache = ResultCache::new();
        cache.cache_game_result("g1", vec![sample_opp()]);
        cache.cache_game_result("g2", vec![]);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get_cached_opportunities("g1").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_and_stops() {
        let cache = Arc::new(ResultCache::with_durations(
            Duration::from_millis(1_000),
            Duration::from_millis(10_000),
        ));
        cache.cache_game_result("g1", vec![]);

        let handle = cache.start_sweeper();
        // Let the spawned sweeper reach its first await so its interval is
        // anchored at t=0 before we advance the paused clock.
        tokio::task::yield_now().await;

        // Past 5x the cache duration and past one sweep interval.
        tokio::time::advance(Duration::from_millis(11_000)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert_eq!(cache.len(), 0);
        handle.stop().await;
    }
}
