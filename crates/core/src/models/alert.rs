use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the target price fires the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    /// Fires once the price is at or above the target
    Above,
    /// Fires once the price is at or below the target
    Below,
}

impl std::fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertDirection::Above => write!(f, "above"),
            AlertDirection::Below => write!(f, "below"),
        }
    }
}

/// A user-defined price watch.
///
/// **Important**: whether the alert has fired is NOT stored here. It is
/// derived from the current quote every time it is read, see
/// [`crate::services::alert_service::evaluate_alert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,

    pub coin_id: String,

    pub target_price: f64,

    pub direction: AlertDirection,

    /// Whether the user wants to be notified. Independent of trigger state.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Create a new, active alert.
    pub fn new(coin_id: impl Into<String>, target_price: f64, direction: AlertDirection) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coin_id: coin_id.into(),
            target_price,
            direction,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn above(coin_id: impl Into<String>, target_price: f64) -> Self {
        Self::new(coin_id, target_price, AlertDirection::Above)
    }

    pub fn below(coin_id: impl Into<String>, target_price: f64) -> Self {
        Self::new(coin_id, target_price, AlertDirection::Below)
    }
}
