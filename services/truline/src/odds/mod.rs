//! Sportsbook quote records, deduplication, and the per-game result cache

pub mod cache;
pub mod dedupe;
pub mod types;

pub use cache::{ResultCache, SweeperHandle};
pub use dedupe::{dedupe_opportunities, dedupe_quotes, normalize_book_name};
pub use types::{MarketType, Opportunity, SportsbookQuote};
