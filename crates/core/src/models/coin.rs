use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

/// Quotes keyed by coin id, as handed to the valuation and alert engines.
pub type QuoteMap = HashMap<String, CoinQuote>;

/// Market snapshot for one coin.
///
/// Quotes are immutable: a refresh replaces the whole snapshot rather than
/// patching fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    /// Stable provider identifier (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as reported upstream (e.g., "btc")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    pub image_url: String,

    /// Latest price in the quote currency, never negative
    pub current_price: f64,

    /// Signed 24h change in percent
    pub price_change_percent_24h: f64,

    pub market_cap: f64,

    pub volume_24h: f64,

    /// Position by market cap, starting at 1
    pub market_cap_rank: u32,

    /// Last 7 days of prices, oldest first. Empty unless requested.
    #[serde(default)]
    pub sparkline_7d: Vec<f64>,
}

impl CoinQuote {
    /// Minimal quote carrying only identity and price. Handy for tests and
    /// for callers that only need valuation.
    pub fn new(id: impl Into<String>, current_price: f64) -> Self {
        let id = id.into();
        Self {
            symbol: id.clone(),
            name: id.clone(),
            id,
            image_url: String::new(),
            current_price,
            price_change_percent_24h: 0.0,
            market_cap: 0.0,
            volume_24h: 0.0,
            market_cap_rank: 1,
            sparkline_7d: Vec::new(),
        }
    }

    /// Ticker in display form ("BTC").
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// Check that `coin_id` is a provider slug: lowercase ASCII letters,
/// digits and `-`. Ids are spliced into request paths, so anything else
/// is rejected before it reaches a URL.
pub fn validate_coin_id(coin_id: &str) -> Result<(), CoreError> {
    let valid = !coin_id.is_empty()
        && coin_id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid {
        return Err(CoreError::ValidationError(format!(
            "Invalid coin id: {coin_id:?}"
        )));
    }
    Ok(())
}

/// Detailed view of a single coin, backing the coin details page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image_url: String,

    /// English description, may be empty
    pub description: String,

    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_percent_24h: f64,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub market_cap_rank: Option<u32>,
}

/// Market-wide statistics shown on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,

    /// Bitcoin's share of `total_market_cap`, in percent
    pub btc_dominance: f64,

    /// Number of coins the figures were computed from
    pub active_cryptocurrencies: usize,
}
