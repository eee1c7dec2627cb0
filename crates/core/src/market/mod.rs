pub mod catalog;
pub mod search;
pub mod types;
pub mod yahoo;

use crate::domain::suggestion::SuggestionEntry;
use anyhow::Result;

pub use types::{Candle, PriceHistory};
pub use yahoo::YahooMarketData;

/// Source of daily price history and live symbol lookups for the analysis service.
#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Roughly one year of daily candles, oldest first. An unknown symbol yields an empty
    /// history rather than an error.
    async fn daily_history(&self, symbol: &str) -> Result<PriceHistory>;

    async fn live_search(&self, query: &str) -> Result<Vec<SuggestionEntry>>;
}
