//! Portfolio valuation: profit/loss per holding and aggregate totals.
//!
//! Pure business logic with no I/O. Quotes are fetched by the
//! caller and passed in.

use crate::errors::CoreError;
use crate::models::analytics::{HoldingValuation, PortfolioSummary};
use crate::models::coin::{CoinQuote, QuoteMap};
use crate::models::holding::Holding;

/// Value one holding against its quote.
///
/// The quote is trusted to belong to `holding.coin_id`; use
/// [`summarize_portfolio`] when quotes still need to be looked up.
pub fn valuate_holding(holding: &Holding, quote: &CoinQuote) -> HoldingValuation {
    let current_value = holding.quantity * quote.current_price;
    let invested_value = holding.quantity * holding.purchase_price;
    let profit = current_value - invested_value;

    HoldingValuation {
        holding_id: holding.id.clone(),
        coin_id: holding.coin_id.clone(),
        current_value,
        invested_value,
        profit,
        profit_percent: percent_of(profit, invested_value),
    }
}

/// Value every holding, in input order.
///
/// Fails with `MissingQuote` on the first holding whose coin has no quote.
pub fn valuate_holdings(
    holdings: &[Holding],
    quotes_by_id: &QuoteMap,
) -> Result<Vec<HoldingValuation>, CoreError> {
    holdings
        .iter()
        .map(|holding| {
            let quote = quotes_by_id
                .get(&holding.coin_id)
                .ok_or_else(|| CoreError::missing_quote(&holding.coin_id))?;
            Ok(valuate_holding(holding, quote))
        })
        .collect()
}

/// Aggregate totals across all holdings.
///
/// Totals do not depend on the order of `holdings`: the per-holding values
/// are summed in ascending order, so any permutation gives bit-identical
/// results.
pub fn summarize_portfolio(
    holdings: &[Holding],
    quotes_by_id: &QuoteMap,
) -> Result<PortfolioSummary, CoreError> {
    let valuations = valuate_holdings(holdings, quotes_by_id)?;

    let total_value = ordered_sum(valuations.iter().map(|v| v.current_value));
    let total_invested = ordered_sum(valuations.iter().map(|v| v.invested_value));
    let total_profit = total_value - total_invested;

    Ok(PortfolioSummary {
        total_value,
        total_invested,
        total_profit,
        total_profit_percent: percent_of(total_profit, total_invested),
        holdings: valuations,
    })
}

/// `part / whole × 100`, or exactly 0 when `whole` is not positive.
/// Keeps NaN and infinities out of presentation.
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}

fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
