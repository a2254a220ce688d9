//! Collapse duplicate sportsbook quotes and duplicate opportunities

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::odds::types::{MarketType, Opportunity, SportsbookQuote};

/// Collapse cosmetic naming differences between sportsbook spellings:
/// `"Draft Kings"`, `"draftkings"`, `"DraftKings "` all reduce to one key.
pub fn normalize_book_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Odds fields scaled to integers at three decimal digits, so float
/// near-duplicates compare equal.
fn quote_signature(quote: &SportsbookQuote, market: MarketType) -> Vec<i64> {
    let scaled = |v: Option<f64>| v.map(|x| (x * 1000.0).round() as i64).unwrap_or(i64::MIN);
    match market {
        MarketType::Moneyline => vec![scaled(quote.home_odds), scaled(quote.away_odds)],
        MarketType::Spread => vec![
            scaled(quote.spread),
            scaled(quote.home_odds),
            scaled(quote.away_odds),
        ],
        MarketType::Total => vec![
            scaled(quote.total),
            scaled(quote.home_odds),
            scaled(quote.away_odds),
        ],
    }
}

/// Keep at most one quote per normalized sportsbook name.
///
/// Precondition: the first row per book wins, so callers wanting
/// "latest wins" must supply quotes freshest-first. Later rows for an
/// already-seen book are discarded whether their odds agree or conflict.
pub fn dedupe_quotes(quotes: &[SportsbookQuote], market: MarketType) -> Vec<SportsbookQuote> {
    let mut seen: HashMap<String, Vec<i64>> = HashMap::new();
    let mut surviving = Vec::with_capacity(quotes.len());

    for quote in quotes {
        let key = normalize_book_name(&quote.sportsbook);
        let signature = quote_signature(quote, market);
        match seen.entry(key) {
            Entry::Occupied(entry) => {
                if *entry.get() == signature {
                    debug!("dropping exact duplicate quote from {}", quote.sportsbook);
                } else {
                    debug!(
                        "dropping conflicting duplicate quote from {} (first seen wins)",
                        quote.sportsbook
                    );
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(signature);
                surviving.push(quote.clone());
            }
        }
    }

    surviving
}

/// Merge duplicate opportunities by key, keeping the higher expected value;
/// on an EV tie, the one backed by strictly more quotes. A final
/// content comparison keeps the reduction order-independent when both
/// figures tie. Output is sorted by key.
pub fn dedupe_opportunities(opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
    let mut best: HashMap<String, Opportunity> = HashMap::new();

    for opp in opportunities {
        match best.entry(opp.key()) {
            Entry::Occupied(mut entry) => {
                if challenger_wins(&opp, entry.get()) {
                    entry.insert(opp);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(opp);
            }
        }
    }

    let mut surviving: Vec<Opportunity> = best.into_values().collect();
    surviving.sort_by_key(|o| o.key());
    surviving
}

fn challenger_wins(challenger: &Opportunity, incumbent: &Opportunity) -> bool {
    if challenger.expected_value != incumbent.expected_value {
        return challenger.expected_value > incumbent.expected_value;
    }
    if challenger.quotes.len() != incumbent.quotes.len() {
        return challenger.quotes.len() > incumbent.quotes.len();
    }
    book_fingerprint(challenger) > book_fingerprint(incumbent)
}

fn book_fingerprint(opp: &Opportunity) -> String {
    let mut books: Vec<String> = opp
        .quotes
        .iter()
        .map(|q| normalize_book_name(&q.sportsbook))
        .collect();
    books.sort();
    books.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ml_quote(book: &str, home: f64, away: f64) -> SportsbookQuote {
        SportsbookQuote {
            sportsbook: book.to_string(),
            market: MarketType::Moneyline,
            home_odds: Some(home),
            away_odds: Some(away),
            spread: None,
            total: None,
        }
    }

    fn opp(game: &str, ev: f64, books: &[&str]) -> Opportunity {
        Opportunity {
            game: game.to_string(),
            market: MarketType::Moneyline,
            line: None,
            expected_value: ev,
            quotes: books.iter().map(|b| ml_quote(b, 1.9, 1.9)).collect(),
        }
    }

    #[test]
    fn test_normalize_book_name() {
        assert_eq!(normalize_book_name("Draft Kings"), "draftkings");
        assert_eq!(normalize_book_name("draftkings"), "draftkings");
        assert_eq!(normalize_book_name("DraftKings "), "draftkings");
        assert_eq!(normalize_book_name("Bet-MGM!"), "betmgm");
    }

    #[test]
    fn test_dedupe_quotes_one_per_book() {
        let quotes = vec![
            ml_quote("DraftKings", 1.91, 1.95),
            ml_quote("draft kings", 1.91, 1.95),
            ml_quote("FanDuel", 1.88, 1.98),
        ];
        let out = dedupe_quotes(&quotes, MarketType::Moneyline);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sportsbook, "DraftKings");
        assert_eq!(out[1].sportsbook, "FanDuel");
    }

    #[test]
    fn test_dedupe_quotes_first_seen_wins_on_conflict() {
        let quotes = vec![
            ml_quote("DraftKings", 1.91, 1.95),
            ml_quote("DraftKings", 2.05, 1.80),
        ];
        let out = dedupe_quotes(&quotes, MarketType::Moneyline);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].home_odds, Some(1.91));
    }

    #[test]
    fn test_dedupe_quotes_idempotent() {
        let quotes = vec![
            ml_quote("DraftKings", 1.91, 1.95),
            ml_quote("Draft Kings", 1.91, 1.95),
            ml_quote("BetMGM", 1.90, 1.96),
            ml_quote("Caesars", 1.87, 2.0),
        ];
        let once = dedupe_quotes(&quotes, MarketType::Moneyline);
        let twice = dedupe_quotes(&once, MarketType::Moneyline);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_signature_ignores_float_noise() {
        let mut a = ml_quote("BookA", 1.910_000_1, 1.95);
        let b = ml_quote("BookA", 1.91, 1.95);
        a.sportsbook = "Book A".to_string();
        let sig_a = quote_signature(&a, MarketType::Moneyline);
        let sig_b = quote_signature(&b, MarketType::Moneyline);
        assert_eq!(sig_a, sig_b);
    }

    #[test]
    fn test_dedupe_opportunities_higher_ev_wins() {
        let out = dedupe_opportunities(vec![
            opp("Lakers @ Celtics", 0.010, &["dk"]),
            opp("Lakers @ Celtics", 0.025, &["fd"]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].expected_value, 0.025);
    }

    #[test]
    fn test_dedupe_opportunities_ev_tie_prefers_more_quotes() {
        let out = dedupe_opportunities(vec![
            opp("Lakers @ Celtics", 0.02, &["dk"]),
            opp("Lakers @ Celtics", 0.02, &["fd", "mgm"]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quotes.len(), 2);
    }

    #[test]
    fn test_dedupe_opportunities_distinct_lines_both_survive() {
        let mut a = opp("Lakers @ Celtics", 0.02, &["dk"]);
        a.market = MarketType::Total;
        a.line = Some(220.5);
        let mut b = a.clone();
        b.line = Some(221.5);
        let out = dedupe_opportunities(vec![a, b]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_dedupe_opportunities_order_independent() {
        let base = vec![
            opp("Lakers @ Celtics", 0.010, &["dk"]),
            opp("lakers@celtics", 0.025, &["fd", "mgm"]),
            opp("Heat @ Knicks", 0.030, &["dk", "fd"]),
            opp("Heat @ Knicks", 0.030, &["mgm"]),
            opp("Jets @ Bills", 0.005, &["caesars"]),
            opp("Jets @ Bills", 0.005, &["pointsbet"]),
        ];
        let expected = dedupe_opportunities(base.clone());

        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let mut shuffled = base.clone();
            rng.shuffle(&mut shuffled);
            assert_eq!(dedupe_opportunities(shuffled), expected);
        }
    }
}
