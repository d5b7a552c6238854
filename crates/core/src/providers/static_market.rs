use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use super::traits::{validate_page, MarketDataProvider};
use crate::errors::CoreError;
use crate::models::chart::{ChartPeriod, PricePoint};
use crate::models::coin::{CoinDetail, CoinQuote};

/// In-memory market data, served through the same contract as a live API.
///
/// Used for offline mode, demos and tests. The snapshot is replaced
/// wholesale with [`StaticMarketData::replace_quotes`], never patched.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    quotes: Vec<CoinQuote>,
    details: HashMap<String, CoinDetail>,
    histories: HashMap<String, Vec<PricePoint>>,
}

impl StaticMarketData {
    pub fn new(quotes: Vec<CoinQuote>) -> Self {
        let mut data = Self::default();
        data.replace_quotes(quotes);
        data
    }

    /// Swap in a new snapshot, kept ordered by market cap rank.
    pub fn replace_quotes(&mut self, mut quotes: Vec<CoinQuote>) {
        quotes.sort_by_key(|q| q.market_cap_rank);
        self.quotes = quotes;
    }

    pub fn with_detail(mut self, detail: CoinDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// Attach a price history; points are stored oldest first.
    pub fn with_history(mut self, coin_id: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        self.histories.insert(coin_id.into(), points);
        self
    }

    pub fn quotes(&self) -> &[CoinQuote] {
        &self.quotes
    }

    /// Sample market: top ten coins, Bitcoin/Ethereum details and a week of
    /// Bitcoin prices ending at `now`.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let quotes = vec![
            sample_quote(1, "bitcoin", "btc", "Bitcoin", "1/large/bitcoin.png", 45123.45, 2.5, 880e9, 25e9),
            sample_quote(2, "ethereum", "eth", "Ethereum", "279/large/ethereum.png", 2345.67, -1.2, 280e9, 15e9),
            sample_quote(3, "tether", "usdt", "Tether", "325/large/Tether.png", 1.0, 0.01, 95e9, 45e9),
            sample_quote(4, "solana", "sol", "Solana", "4128/large/solana.png", 98.76, 5.3, 42e9, 2.8e9),
            sample_quote(5, "cardano", "ada", "Cardano", "975/large/cardano.png", 0.52, -0.8, 18.5e9, 780e6),
            sample_quote(6, "ripple", "xrp", "XRP", "44/large/xrp-symbol-white-128.png", 0.62, 1.5, 33e9, 1.2e9),
            sample_quote(7, "polkadot", "dot", "Polkadot", "12171/large/polkadot.png", 7.23, 3.2, 9.5e9, 340e6),
            sample_quote(8, "dogecoin", "doge", "Dogecoin", "5/large/dogecoin.png", 0.085, -2.1, 12e9, 890e6),
            sample_quote(9, "avalanche", "avax", "Avalanche", "12559/large/avalanche.png", 36.45, 4.7, 14e9, 650e6),
            sample_quote(10, "chainlink", "link", "Chainlink", "877/large/chainlink.png", 14.56, 1.8, 8.5e9, 420e6),
        ];

        let bitcoin_week = [43000.0, 43500.0, 44000.0, 43800.0, 44500.0, 45000.0, 45123.0]
            .into_iter()
            .enumerate()
            .map(|(i, price)| PricePoint {
                timestamp: now - Duration::days(6 - i as i64),
                price,
            })
            .collect();

        Self::new(quotes)
            .with_detail(CoinDetail {
                id: "bitcoin".into(),
                symbol: "btc".into(),
                name: "Bitcoin".into(),
                image_url: image_url("1/large/bitcoin.png"),
                description: "Bitcoin is the first successful internet money based on peer-to-peer technology."
                    .into(),
                current_price: 45123.45,
                market_cap: 880e9,
                volume_24h: 25e9,
                high_24h: Some(46000.0),
                low_24h: Some(44500.0),
                price_change_percent_24h: 2.5,
                circulating_supply: Some(19_500_000.0),
                total_supply: Some(21_000_000.0),
                max_supply: Some(21_000_000.0),
                market_cap_rank: Some(1),
            })
            .with_detail(CoinDetail {
                id: "ethereum".into(),
                symbol: "eth".into(),
                name: "Ethereum".into(),
                image_url: image_url("279/large/ethereum.png"),
                description: "Ethereum is a decentralized open-source blockchain system with its own cryptocurrency, Ether."
                    .into(),
                current_price: 2345.67,
                market_cap: 280e9,
                volume_24h: 15e9,
                high_24h: Some(2400.0),
                low_24h: Some(2320.0),
                price_change_percent_24h: -1.2,
                circulating_supply: Some(120_000_000.0),
                total_supply: Some(120_000_000.0),
                max_supply: None,
                market_cap_rank: Some(2),
            })
            .with_history("bitcoin", bitcoin_week)
    }
}

fn image_url(path: &str) -> String {
    format!("https://coin-images.coingecko.com/coins/images/{path}")
}

#[allow(clippy::too_many_arguments)]
fn sample_quote(
    rank: u32,
    id: &str,
    symbol: &str,
    name: &str,
    image: &str,
    price: f64,
    change_24h: f64,
    market_cap: f64,
    volume_24h: f64,
) -> CoinQuote {
    CoinQuote {
        id: id.into(),
        symbol: symbol.into(),
        name: name.into(),
        image_url: image_url(image),
        current_price: price,
        price_change_percent_24h: change_24h,
        market_cap,
        volume_24h,
        market_cap_rank: rank,
        sparkline_7d: Vec::new(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for StaticMarketData {
    fn name(&self) -> &str {
        "Static"
    }

    async fn get_quote(&self, coin_id: &str) -> Result<Option<CoinQuote>, CoreError> {
        Ok(self.quotes.iter().find(|q| q.id == coin_id).cloned())
    }

    async fn get_quotes(&self, page: u32, page_size: u32) -> Result<Vec<CoinQuote>, CoreError> {
        validate_page(page, page_size)?;
        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        Ok(self
            .quotes
            .iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn get_price_history(
        &self,
        coin_id: &str,
        period: ChartPeriod,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let points = self
            .histories
            .get(coin_id)
            .ok_or_else(|| CoreError::NotFound(format!("coin {coin_id}")))?;

        // Window is measured back from the newest sample, not the wall clock.
        let (Some(days), Some(last)) = (period.days(), points.last()) else {
            return Ok(points.clone());
        };
        let start = last.timestamp - Duration::days(days);
        Ok(points.iter().filter(|p| p.timestamp >= start).cloned().collect())
    }

    async fn get_coin_detail(&self, coin_id: &str) -> Result<Option<CoinDetail>, CoreError> {
        Ok(self.details.get(coin_id).cloned())
    }
}
