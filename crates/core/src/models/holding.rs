use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's recorded position in one coin.
///
/// `coin_id` is only a lookup key into the market data; the holding does
/// not own or cache a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier within the store
    pub id: String,

    /// Provider coin id (e.g., "bitcoin")
    pub coin_id: String,

    /// Units held (always positive)
    pub quantity: f64,

    /// Price paid per unit
    pub purchase_price: f64,

    pub created_at: DateTime<Utc>,
}

impl Holding {
    pub fn new(coin_id: impl Into<String>, quantity: f64, purchase_price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coin_id: coin_id.into(),
            quantity,
            purchase_price,
            created_at: Utc::now(),
        }
    }
}
