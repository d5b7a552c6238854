use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::{validate_page, MarketDataProvider};
use crate::errors::CoreError;
use crate::models::chart::{ChartPeriod, PricePoint};
use crate::models::coin::{validate_coin_id, CoinDetail, CoinQuote};
use crate::models::settings::{Settings, DEFAULT_API_BASE_URL, DEFAULT_VS_CURRENCY, MAX_PAGE_SIZE};

const PROVIDER: &str = "CoinGecko";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko API provider.
///
/// - **Free tier**: works without a key; a demo key raises rate limits.
/// - **Endpoints**: `/coins/markets`, `/coins/{id}`, `/coins/{id}/market_chart`
///
/// Note: CoinGecko identifies coins by lowercase slugs ("bitcoin",
/// "ethereum"), not ticker symbols.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
        }
    }

    /// Provider configured from dashboard settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let provider = Self::new()
            .with_base_url(settings.api_base_url.clone())
            .with_vs_currency(settings.vs_currency.clone());
        match &settings.api_key {
            Some(key) => provider.with_api_key(key.clone()),
            None => provider,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_vs_currency(mut self, vs_currency: impl Into<String>) -> Self {
        self.vs_currency = vs_currency.into().to_lowercase();
        self
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    /// GET `{base_url}{path}` and decode the JSON body.
    /// Returns `Ok(None)` on HTTP 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, CoreError> {
        let url = format!("{}{path}", self.base_url);
        debug!(provider = PROVIDER, path, "requesting market data");

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("{path} returned HTTP {status}"),
            });
        }

        let body = resp.json::<T>().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse response for {path}: {e}"),
        })?;
        Ok(Some(body))
    }

    async fn get_markets(&self, mut query: Vec<(&str, String)>) -> Result<Vec<CoinQuote>, CoreError> {
        query.push(("vs_currency", self.vs_currency.clone()));

        let entries: Vec<MarketEntry> = self
            .get_json("/coins/markets", &query)
            .await?
            .unwrap_or_default();

        Ok(entries.into_iter().filter_map(MarketEntry::into_quote).collect())
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    sparkline_in_7d: Option<Sparkline>,
}

#[derive(Deserialize)]
struct Sparkline {
    price: Vec<f64>,
}

impl MarketEntry {
    /// Entries without a price or rank cannot form a valid quote.
    fn into_quote(self) -> Option<CoinQuote> {
        let (Some(current_price), Some(market_cap_rank)) = (self.current_price, self.market_cap_rank)
        else {
            debug!(provider = PROVIDER, coin_id = %self.id, "skipping market entry without price or rank");
            return None;
        };

        Some(CoinQuote {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            image_url: self.image.unwrap_or_default(),
            current_price,
            price_change_percent_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            market_cap: self.market_cap.unwrap_or(0.0),
            volume_24h: self.total_volume.unwrap_or(0.0),
            market_cap_rank,
            sparkline_7d: self.sparkline_in_7d.map(|s| s.price).unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
struct DetailResponse {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    image: Option<DetailImage>,
    #[serde(default)]
    market_data: Option<DetailMarketData>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

#[derive(Deserialize)]
struct Description {
    #[serde(default)]
    en: String,
}

#[derive(Deserialize)]
struct DetailImage {
    large: String,
}

#[derive(Deserialize)]
struct DetailMarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
    #[serde(default)]
    market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    #[serde(default)]
    high_24h: HashMap<String, f64>,
    #[serde(default)]
    low_24h: HashMap<String, f64>,
    price_change_percentage_24h: Option<f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    max_supply: Option<f64>,
}

#[derive(Deserialize)]
struct MarketChartResponse {
    /// `[unix_millis, price]` pairs
    prices: Vec<(f64, f64)>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_quote(&self, coin_id: &str) -> Result<Option<CoinQuote>, CoreError> {
        Ok(self.get_quotes_by_ids(&[coin_id]).await?.into_iter().next())
    }

    /// One `/coins/markets?ids=a,b,c` request per 250 ids.
    async fn get_quotes_by_ids(&self, coin_ids: &[&str]) -> Result<Vec<CoinQuote>, CoreError> {
        let mut quotes = Vec::with_capacity(coin_ids.len());
        for chunk in coin_ids.chunks(MAX_PAGE_SIZE as usize) {
            for coin_id in chunk {
                validate_coin_id(coin_id)?;
            }
            let batch = self
                .get_markets(vec![
                    ("ids", chunk.join(",")),
                    ("per_page", chunk.len().to_string()),
                ])
                .await?;
            quotes.extend(batch.into_iter().filter(|q| chunk.contains(&q.id.as_str())));
        }
        Ok(quotes)
    }

    async fn get_quotes(&self, page: u32, page_size: u32) -> Result<Vec<CoinQuote>, CoreError> {
        validate_page(page, page_size)?;
        self.get_markets(vec![
            ("order", "market_cap_desc".to_string()),
            ("page", page.to_string()),
            ("per_page", page_size.to_string()),
            ("sparkline", "true".to_string()),
        ])
        .await
    }

    async fn get_price_history(
        &self,
        coin_id: &str,
        period: ChartPeriod,
    ) -> Result<Vec<PricePoint>, CoreError> {
        validate_coin_id(coin_id)?;
        let path = format!("/coins/{coin_id}/market_chart");
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("days", period.days_param().to_string()),
        ];

        let resp: MarketChartResponse = self
            .get_json(&path, &query)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("coin {coin_id}")))?;

        let mut points: Vec<PricePoint> = resp
            .prices
            .into_iter()
            .filter_map(|(millis, price)| {
                let timestamp = chrono::DateTime::from_timestamp_millis(millis as i64)?;
                Some(PricePoint { timestamp, price })
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);

        Ok(points)
    }

    async fn get_coin_detail(&self, coin_id: &str) -> Result<Option<CoinDetail>, CoreError> {
        validate_coin_id(coin_id)?;
        let path = format!("/coins/{coin_id}");
        let query = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("community_data", "false".to_string()),
            ("developer_data", "false".to_string()),
        ];

        let Some(resp) = self.get_json::<DetailResponse>(&path, &query).await? else {
            return Ok(None);
        };

        let market = resp.market_data.ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No market data for {coin_id}"),
        })?;
        let currency = self.vs_currency.as_str();
        let current_price = market.current_price.get(currency).copied().ok_or_else(|| {
            CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No {currency} price for {coin_id}"),
            }
        })?;

        Ok(Some(CoinDetail {
            id: resp.id,
            symbol: resp.symbol,
            name: resp.name,
            image_url: resp.image.map(|i| i.large).unwrap_or_default(),
            description: resp.description.map(|d| d.en).unwrap_or_default(),
            current_price,
            market_cap: market.market_cap.get(currency).copied().unwrap_or(0.0),
            volume_24h: market.total_volume.get(currency).copied().unwrap_or(0.0),
            high_24h: market.high_24h.get(currency).copied(),
            low_24h: market.low_24h.get(currency).copied(),
            price_change_percent_24h: market.price_change_percentage_24h.unwrap_or(0.0),
            circulating_supply: market.circulating_supply,
            total_supply: market.total_supply,
            max_supply: market.max_supply,
            market_cap_rank: resp.market_cap_rank,
        }))
    }
}
