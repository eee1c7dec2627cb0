use crate::domain::suggestion::SuggestionEntry;
use crate::market::{catalog, MarketData};
use std::collections::HashSet;

pub const MAX_RESULTS: usize = 10;
const MIN_QUERY_CHARS: usize = 2;

/// Server-side `/search`: live matches first, then catalog matches, unique by symbol.
///
/// Live lookup failures are logged and treated as no live matches.
pub async fn search_stocks(market: &dyn MarketData, query: &str) -> Vec<SuggestionEntry> {
    let query = query.trim().to_uppercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let live = match market.live_search(&query).await {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(source = market.source_name(), %query, error = %err, "live search failed; using catalog only");
            Vec::new()
        }
    };

    merge_unique(live, catalog::lookup(&query), MAX_RESULTS)
}

fn merge_unique(
    first: Vec<SuggestionEntry>,
    second: Vec<SuggestionEntry>,
    limit: usize,
) -> Vec<SuggestionEntry> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|e| seen.insert(e.symbol.clone()))
        .take(limit)
        .collect()
}
