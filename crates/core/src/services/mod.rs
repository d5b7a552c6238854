pub mod alert_service;
pub mod market_service;
pub mod valuation_service;
