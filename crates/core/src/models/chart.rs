use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single price sample for chart rendering.
///
/// The core produces these, the frontend just plots them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Time window selectable on the price chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "1D")]
    OneDay,
    #[default]
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl ChartPeriod {
    /// Every period in the order the chart shows its buttons.
    pub const ALL_PERIODS: [ChartPeriod; 6] = [
        ChartPeriod::OneDay,
        ChartPeriod::SevenDays,
        ChartPeriod::OneMonth,
        ChartPeriod::ThreeMonths,
        ChartPeriod::OneYear,
        ChartPeriod::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1D",
            ChartPeriod::SevenDays => "7D",
            ChartPeriod::OneMonth => "1M",
            ChartPeriod::ThreeMonths => "3M",
            ChartPeriod::OneYear => "1Y",
            ChartPeriod::All => "ALL",
        }
    }

    /// Value of the `days` query parameter for market chart endpoints.
    pub fn days_param(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1",
            ChartPeriod::SevenDays => "7",
            ChartPeriod::OneMonth => "30",
            ChartPeriod::ThreeMonths => "90",
            ChartPeriod::OneYear => "365",
            ChartPeriod::All => "max",
        }
    }

    /// Window length in days, `None` for the unbounded `ALL` period.
    pub fn days(&self) -> Option<i64> {
        match self {
            ChartPeriod::All => None,
            other => other.days_param().parse().ok(),
        }
    }
}

impl std::fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ChartPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ChartPeriod::ALL_PERIODS
            .into_iter()
            .find(|p| p.label() == upper)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown chart period: {s}")))
    }
}
