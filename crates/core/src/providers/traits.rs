use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::chart::{ChartPeriod, PricePoint};
use crate::models::coin::{CoinDetail, CoinQuote};

/// Trait abstraction for market data sources.
///
/// The engines never talk to a provider directly: the facade fetches what
/// it needs and hands plain records to the pure valuation/alert functions.
/// Swapping CoinGecko for another API means one new implementation here.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current quote for one coin. `Ok(None)` when the coin is unknown.
    async fn get_quote(&self, coin_id: &str) -> Result<Option<CoinQuote>, CoreError>;

    /// Current quotes for several coins. Unknown ids are left out.
    ///
    /// The default asks for each coin separately; providers with a batch
    /// endpoint should override it.
    async fn get_quotes_by_ids(&self, coin_ids: &[&str]) -> Result<Vec<CoinQuote>, CoreError> {
        let mut quotes = Vec::with_capacity(coin_ids.len());
        for coin_id in coin_ids {
            if let Some(quote) = self.get_quote(coin_id).await? {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }

    /// One page of quotes ordered by market cap rank. Pages start at 1.
    async fn get_quotes(&self, page: u32, page_size: u32) -> Result<Vec<CoinQuote>, CoreError>;

    /// Price history for a coin over the given window, oldest first.
    async fn get_price_history(
        &self,
        coin_id: &str,
        period: ChartPeriod,
    ) -> Result<Vec<PricePoint>, CoreError>;

    /// Detailed view of one coin. `Ok(None)` when the coin is unknown.
    async fn get_coin_detail(&self, coin_id: &str) -> Result<Option<CoinDetail>, CoreError>;
}

/// Reject page arguments every provider treats as invalid.
pub fn validate_page(page: u32, page_size: u32) -> Result<(), CoreError> {
    if page == 0 {
        return Err(CoreError::ValidationError("Page numbers start at 1".into()));
    }
    if page_size == 0 {
        return Err(CoreError::ValidationError("Page size must be positive".into()));
    }
    Ok(())
}
