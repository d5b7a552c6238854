//! Display helpers for prices, percentages and counts.
//!
//! The engines never round; these are applied at the presentation edge.

use serde::{Deserialize, Serialize};

/// Display currency for [`format_price`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Rub,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Rub => "₽",
        }
    }

    /// Map a quote currency code ("usd", "EUR") to a display currency.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "usd" => Some(Currency::Usd),
            "eur" => Some(Currency::Eur),
            "rub" => Some(Currency::Rub),
            _ => None,
        }
    }
}

/// Compact money: `$1.23M`, `$45.12K`, `$0.52`. Negative values keep
/// their sign in front of the currency symbol.
pub fn format_price(value: f64, currency: Currency) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let symbol = currency.symbol();
    let abs = value.abs();

    if abs >= 1_000_000.0 {
        format!("{sign}{symbol}{:.2}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}{symbol}{:.2}K", abs / 1_000.0)
    } else {
        format!("{sign}{symbol}{abs:.2}")
    }
}

/// Signed percentage with two decimals: `+12.81%`, `-1.20%`.
pub fn format_percentage(value: f64) -> String {
    if value >= 0.0 {
        // abs() folds -0.0 so it never prints as "+-0.00%"
        format!("+{:.2}%", value.abs())
    } else {
        format!("{value:.2}%")
    }
}

/// en-US number: thousands separated by commas, at most three fraction
/// digits with trailing zeros dropped (`12,500`, `1,234.5`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".into() } else { "-∞".into() };
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
