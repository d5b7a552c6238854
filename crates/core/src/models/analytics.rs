use serde::{Deserialize, Serialize};

use super::alert::AlertDirection;

/// Derived figures for a single holding against its current quote.
///
/// Never persisted. Recomputed from the holding and quote on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub holding_id: String,

    pub coin_id: String,

    /// quantity × current price
    pub current_value: f64,

    /// quantity × purchase price
    pub invested_value: f64,

    /// current_value − invested_value
    pub profit: f64,

    /// profit / invested_value × 100, or 0 when nothing was invested
    pub profit_percent: f64,
}

/// Totals across every holding in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of all holdings' current values
    pub total_value: f64,

    /// Sum of all holdings' invested values
    pub total_invested: f64,

    /// total_value − total_invested
    pub total_profit: f64,

    /// total_profit / total_invested × 100, or 0 when nothing was invested
    pub total_profit_percent: f64,

    /// Per-holding breakdown, in the order the holdings were given
    pub holdings: Vec<HoldingValuation>,
}

/// Trigger state of one alert against the current quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTriggerState {
    pub alert_id: String,
    pub coin_id: String,
    pub direction: AlertDirection,
    pub target_price: f64,
    pub current_price: f64,
    pub is_active: bool,
    pub is_triggered: bool,
}

/// Counters for the alerts page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertsSummary {
    pub total: usize,
    pub active: usize,
    pub triggered: usize,
}
