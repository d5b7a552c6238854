use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::coin::{CoinQuote, MarketOverview, QuoteMap};
use crate::providers::traits::MarketDataProvider;
use crate::services::valuation_service::percent_of;

/// Coin id whose share of the total market cap is reported as dominance.
pub const BITCOIN_ID: &str = "bitcoin";

/// Index quotes by coin id. A later duplicate replaces an earlier one.
pub fn quote_map(quotes: impl IntoIterator<Item = CoinQuote>) -> QuoteMap {
    quotes.into_iter().map(|q| (q.id.clone(), q)).collect()
}

/// Market-wide totals over the given quotes.
pub fn market_overview(quotes: &[CoinQuote]) -> MarketOverview {
    let total_market_cap: f64 = quotes.iter().map(|q| q.market_cap).sum();
    let total_volume_24h: f64 = quotes.iter().map(|q| q.volume_24h).sum();
    let btc_market_cap = quotes
        .iter()
        .find(|q| q.id == BITCOIN_ID)
        .map(|q| q.market_cap)
        .unwrap_or(0.0);

    MarketOverview {
        total_market_cap,
        total_volume_24h,
        btc_dominance: percent_of(btc_market_cap, total_market_cap),
        active_cryptocurrencies: quotes.len(),
    }
}

/// Fetch quotes for every distinct coin id in one provider call.
///
/// Coins the provider does not know are left out of the map, so the
/// engines report them as `MissingQuote` rather than valuing them at zero.
/// Provider failures are propagated.
pub async fn fetch_quotes<'a, I>(
    provider: &dyn MarketDataProvider,
    coin_ids: I,
) -> Result<QuoteMap, CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: Vec<&str> = coin_ids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if distinct.is_empty() {
        return Ok(QuoteMap::new());
    }

    let fetched = provider.get_quotes_by_ids(&distinct).await?;
    let quotes = quote_map(
        fetched
            .into_iter()
            .filter(|q| distinct.contains(&q.id.as_str())),
    );

    for coin_id in distinct.iter().filter(|id| !quotes.contains_key(**id)) {
        debug!(provider = provider.name(), coin_id, "no quote for coin");
    }

    Ok(quotes)
}
