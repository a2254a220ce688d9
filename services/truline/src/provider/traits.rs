use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::odds::types::{MarketType, SportsbookQuote};

/// An upstream event/odds source. Implementations live in the ingestion
/// layer; the core only sees the payloads they deliver. Network timeouts
/// and retries are the implementation's responsibility.
#[async_trait]
pub trait ProviderFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Raw, shape-varying event payloads as delivered upstream.
    async fn fetch_events(&self) -> Result<Vec<Value>>;

    /// Sportsbook quotes for one event and market, freshest-first.
    async fn fetch_quotes(&self, event_id: &str, market: MarketType)
        -> Result<Vec<SportsbookQuote>>;
}
