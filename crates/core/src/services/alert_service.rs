//! Alert evaluation. Trigger state is derived from the current quote on
//! every call and never stored.

use crate::errors::CoreError;
use crate::models::alert::{Alert, AlertDirection};
use crate::models::analytics::{AlertTriggerState, AlertsSummary};
use crate::models::coin::{CoinQuote, QuoteMap};

/// Evaluate one alert against its quote.
///
/// Reaching the target exactly counts as triggered in both directions.
/// Inactive alerts are evaluated too; `is_active` is only carried through.
pub fn evaluate_alert(alert: &Alert, quote: &CoinQuote) -> AlertTriggerState {
    let is_triggered = match alert.direction {
        AlertDirection::Above => quote.current_price >= alert.target_price,
        AlertDirection::Below => quote.current_price <= alert.target_price,
    };

    AlertTriggerState {
        alert_id: alert.id.clone(),
        coin_id: alert.coin_id.clone(),
        direction: alert.direction,
        target_price: alert.target_price,
        current_price: quote.current_price,
        is_active: alert.is_active,
        is_triggered,
    }
}

/// Evaluate every alert, preserving input order.
pub fn evaluate_all(
    alerts: &[Alert],
    quotes_by_id: &QuoteMap,
) -> Result<Vec<AlertTriggerState>, CoreError> {
    alerts
        .iter()
        .map(|alert| {
            let quote = quotes_by_id
                .get(&alert.coin_id)
                .ok_or_else(|| CoreError::missing_quote(&alert.coin_id))?;
            Ok(evaluate_alert(alert, quote))
        })
        .collect()
}

/// Count total, active and currently triggered alerts.
pub fn summarize_alerts(
    alerts: &[Alert],
    quotes_by_id: &QuoteMap,
) -> Result<AlertsSummary, CoreError> {
    let states = evaluate_all(alerts, quotes_by_id)?;

    Ok(AlertsSummary {
        total: states.len(),
        active: states.iter().filter(|s| s.is_active).count(),
        triggered: states.iter().filter(|s| s.is_triggered).count(),
    })
}
