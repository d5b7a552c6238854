pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use errors::CoreError;
use format::Currency;
use models::{
    alert::{Alert, AlertDirection},
    analytics::{AlertTriggerState, AlertsSummary, PortfolioSummary},
    chart::{ChartPeriod, PricePoint},
    coin::{CoinDetail, CoinQuote, MarketOverview},
    holding::Holding,
    settings::{Settings, DEFAULT_PAGE_SIZE},
};
use providers::{coingecko::CoinGeckoProvider, traits::MarketDataProvider};
use services::{alert_service, market_service, valuation_service};
#[cfg(not(target_arch = "wasm32"))]
use storage::backend::FileBackend;
use storage::{
    backend::{KeyValueBackend, MemoryBackend},
    local_store::{LocalStore, Validate},
};

/// Store key of the holdings list.
pub const HOLDINGS_KEY: &str = "portfolio";
/// Store key of the alerts list.
pub const ALERTS_KEY: &str = "alerts";

/// Main entry point for the crypto dashboard core.
///
/// Owns the market data provider and the holdings/alerts stores. Every
/// summary is recomputed from freshly fetched quotes; nothing derived is
/// cached between calls.
#[must_use]
pub struct CryptoDashboard {
    provider: Box<dyn MarketDataProvider>,
    holdings: LocalStore<Vec<Holding>>,
    alerts: LocalStore<Vec<Alert>>,
    page_size: u32,
    currency: Currency,
}

impl std::fmt::Debug for CryptoDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoDashboard")
            .field("provider", &self.provider.name())
            .field("holdings_key", &self.holdings.key())
            .field("alerts_key", &self.alerts.key())
            .field("page_size", &self.page_size)
            .field("currency", &self.currency)
            .finish()
    }
}

impl CryptoDashboard {
    /// Dashboard over an explicit provider and storage backend.
    pub fn new(provider: Box<dyn MarketDataProvider>, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            provider,
            holdings: LocalStore::new(HOLDINGS_KEY, Vec::new(), Arc::clone(&backend)),
            alerts: LocalStore::new(ALERTS_KEY, Vec::new(), backend),
            page_size: DEFAULT_PAGE_SIZE,
            currency: Currency::default(),
        }
    }

    /// Dashboard whose holdings and alerts live only in memory.
    pub fn in_memory(provider: Box<dyn MarketDataProvider>) -> Self {
        Self::new(provider, Arc::new(MemoryBackend::new()))
    }

    /// CoinGecko-backed dashboard configured from `settings`.
    /// Uses a file store when `storage_dir` is set (native only).
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let provider = Box::new(CoinGeckoProvider::from_settings(settings));

        let backend: Arc<dyn KeyValueBackend> = match &settings.storage_dir {
            #[cfg(not(target_arch = "wasm32"))]
            Some(dir) => Arc::new(FileBackend::new(dir)),
            _ => Arc::new(MemoryBackend::new()),
        };

        let dashboard = Self::new(provider, backend)
            .with_page_size(settings.page_size)
            .with_currency(Currency::from_code(&settings.vs_currency).unwrap_or_default());
        Ok(dashboard)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Display currency for formatting prices.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    // ── Market Data ─────────────────────────────────────────────────

    /// One page of the coin listing, ordered by market cap rank.
    pub async fn list_coins(&self, page: u32) -> Result<Vec<CoinQuote>, CoreError> {
        self.provider.get_quotes(page, self.page_size).await
    }

    /// Current quote for a coin, `None` when the provider does not know it.
    pub async fn get_coin(&self, coin_id: &str) -> Result<Option<CoinQuote>, CoreError> {
        self.provider.get_quote(coin_id).await
    }

    pub async fn get_coin_detail(&self, coin_id: &str) -> Result<Option<CoinDetail>, CoreError> {
        self.provider.get_coin_detail(coin_id).await
    }

    pub async fn get_price_history(
        &self,
        coin_id: &str,
        period: ChartPeriod,
    ) -> Result<Vec<PricePoint>, CoreError> {
        self.provider.get_price_history(coin_id, period).await
    }

    /// Market-wide totals over the first page of the listing.
    pub async fn market_overview(&self) -> Result<MarketOverview, CoreError> {
        let quotes = self.list_coins(1).await?;
        Ok(market_service::market_overview(&quotes))
    }

    // ── Holdings ────────────────────────────────────────────────────

    #[must_use]
    pub fn holdings(&self) -> Vec<Holding> {
        self.holdings.get()
    }

    /// Record a new position. Returns its id.
    pub fn add_holding(
        &mut self,
        coin_id: &str,
        quantity: f64,
        purchase_price: f64,
    ) -> Result<String, CoreError> {
        let holding = Holding::new(coin_id.trim(), quantity, purchase_price);
        holding.validate()?;

        let id = holding.id.clone();
        let mut holdings = self.holdings.get();
        holdings.push(holding);
        self.holdings.set(&holdings)?;

        info!(holding_id = %id, coin_id, "holding added");
        Ok(id)
    }

    pub fn remove_holding(&mut self, holding_id: &str) -> Result<(), CoreError> {
        let mut holdings = self.holdings.get();
        let idx = holdings
            .iter()
            .position(|h| h.id == holding_id)
            .ok_or_else(|| CoreError::NotFound(format!("holding {holding_id}")))?;
        holdings.remove(idx);
        self.holdings.set(&holdings)?;

        info!(holding_id, "holding removed");
        Ok(())
    }

    /// Value every holding against freshly fetched quotes.
    ///
    /// A holding whose coin the provider does not know yields
    /// `CoreError::MissingQuote`. CoinGecko listings with a price but no
    /// market cap rank are not turned into quotes, so a holding in such a
    /// coin fails the same way until the coin is ranked again.
    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary, CoreError> {
        let holdings = self.holdings.get();
        let quotes = market_service::fetch_quotes(
            self.provider.as_ref(),
            holdings.iter().map(|h| h.coin_id.as_str()),
        )
        .await?;
        valuation_service::summarize_portfolio(&holdings, &quotes)
    }

    // ── Alerts ──────────────────────────────────────────────────────

    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.get()
    }

    /// Create an active alert. Returns its id.
    pub fn add_alert(
        &mut self,
        coin_id: &str,
        target_price: f64,
        direction: AlertDirection,
    ) -> Result<String, CoreError> {
        let alert = Alert::new(coin_id.trim(), target_price, direction);
        alert.validate()?;

        let id = alert.id.clone();
        let mut alerts = self.alerts.get();
        alerts.push(alert);
        self.alerts.set(&alerts)?;

        info!(alert_id = %id, coin_id, %direction, target_price, "alert added");
        Ok(id)
    }

    pub fn remove_alert(&mut self, alert_id: &str) -> Result<(), CoreError> {
        let mut alerts = self.alerts.get();
        let idx = alerts
            .iter()
            .position(|a| a.id == alert_id)
            .ok_or_else(|| CoreError::NotFound(format!("alert {alert_id}")))?;
        alerts.remove(idx);
        self.alerts.set(&alerts)?;

        info!(alert_id, "alert removed");
        Ok(())
    }

    /// Turn notifications for an alert on or off.
    pub fn set_alert_active(&mut self, alert_id: &str, active: bool) -> Result<(), CoreError> {
        let mut alerts = self.alerts.get();
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| CoreError::NotFound(format!("alert {alert_id}")))?;
        alert.is_active = active;
        self.alerts.set(&alerts)?;

        info!(alert_id, active, "alert toggled");
        Ok(())
    }

    /// Trigger state of every alert, in stored order.
    pub async fn alert_states(&self) -> Result<Vec<AlertTriggerState>, CoreError> {
        let alerts = self.alerts.get();
        let quotes = market_service::fetch_quotes(
            self.provider.as_ref(),
            alerts.iter().map(|a| a.coin_id.as_str()),
        )
        .await?;
        alert_service::evaluate_all(&alerts, &quotes)
    }

    pub async fn alerts_summary(&self) -> Result<AlertsSummary, CoreError> {
        let alerts = self.alerts.get();
        let quotes = market_service::fetch_quotes(
            self.provider.as_ref(),
            alerts.iter().map(|a| a.coin_id.as_str()),
        )
        .await?;
        alert_service::summarize_alerts(&alerts, &quotes)
    }
}
