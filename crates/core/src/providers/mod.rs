pub mod traits;

// Market data provider implementations
pub mod coingecko;
pub mod static_market;
