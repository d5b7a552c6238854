use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Upper bound CoinGecko accepts for `per_page`.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Runtime configuration for the dashboard core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the CoinGecko-compatible market data API.
    pub api_base_url: String,

    /// Optional demo API key, sent as `x-cg-demo-api-key`.
    pub api_key: Option<String>,

    /// Quote currency for all prices (e.g., "usd", "eur").
    pub vs_currency: String,

    /// Coins per page on the listing.
    pub page_size: u32,

    /// Directory for the holdings/alerts store. In-memory when unset.
    pub storage_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            storage_dir: None,
        }
    }
}

impl Settings {
    /// Build settings from environment variables, falling back to the
    /// defaults for anything unset or empty.
    ///
    /// - `COINGECKO_API_URL`
    /// - `COINGECKO_API_KEY`
    /// - `CRYPTO_DASHBOARD_CURRENCY`
    /// - `CRYPTO_DASHBOARD_PAGE_SIZE`
    /// - `CRYPTO_DASHBOARD_STORAGE_DIR`
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(url) = get("COINGECKO_API_URL") {
            settings.api_base_url = url;
        }
        settings.api_key = get("COINGECKO_API_KEY");
        if let Some(currency) = get("CRYPTO_DASHBOARD_CURRENCY") {
            settings.vs_currency = currency.to_lowercase();
        }
        if let Some(raw) = get("CRYPTO_DASHBOARD_PAGE_SIZE") {
            settings.page_size = raw.parse().map_err(|e| {
                CoreError::Config(format!("CRYPTO_DASHBOARD_PAGE_SIZE must be an integer: {e}"))
            })?;
        }
        settings.storage_dir = get("CRYPTO_DASHBOARD_STORAGE_DIR");

        settings.validate()?;
        Ok(settings)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(CoreError::Config("Quote currency must not be empty".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(CoreError::Config(format!(
                "Page size out of range: {} (expected 1..={MAX_PAGE_SIZE})",
                self.page_size
            )));
        }
        Ok(())
    }
}
