use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use super::backend::KeyValueBackend;
use crate::errors::CoreError;
use crate::models::alert::Alert;
use crate::models::coin::validate_coin_id;
use crate::models::holding::Holding;

/// Shape check applied to every value going into or coming out of a store.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

/// A stored record with an id that must be unique within its list.
pub trait Record: Validate {
    fn record_id(&self) -> &str;
}

impl<T: Record> Validate for Vec<T> {
    fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(self.len());
        for record in self {
            record.validate()?;
            if !seen.insert(record.record_id()) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate record id: {}",
                    record.record_id()
                )));
            }
        }
        Ok(())
    }
}

fn require_id(kind: &str, id: &str, coin_id: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{kind} id must not be empty")));
    }
    validate_coin_id(coin_id)
}

impl Validate for Holding {
    fn validate(&self) -> Result<(), CoreError> {
        require_id("Holding", &self.id, &self.coin_id)?;
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Holding {} quantity must be positive, got {}",
                self.id, self.quantity
            )));
        }
        if !self.purchase_price.is_finite() || self.purchase_price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Holding {} purchase price must be non-negative, got {}",
                self.id, self.purchase_price
            )));
        }
        Ok(())
    }
}

impl Record for Holding {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Validate for Alert {
    fn validate(&self) -> Result<(), CoreError> {
        require_id("Alert", &self.id, &self.coin_id)?;
        if !self.target_price.is_finite() || self.target_price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Alert {} target price must be non-negative, got {}",
                self.id, self.target_price
            )));
        }
        Ok(())
    }
}

impl Record for Alert {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// A typed, validated JSON record stored under one key.
///
/// Reads never fail: a missing, unparsable or invalid record yields the
/// fallback supplied at construction. Writes validate first and refuse
/// invalid data.
pub struct LocalStore<T> {
    key: String,
    fallback: T,
    backend: Arc<dyn KeyValueBackend>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> LocalStore<T>
where
    T: Serialize + DeserializeOwned + Validate + Clone,
{
    pub fn new(key: impl Into<String>, fallback: T, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            key: key.into(),
            fallback,
            backend,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, or the fallback if the stored record is unusable.
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(Some(value)) => value,
            Ok(None) => self.fallback.clone(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored record rejected, using fallback");
                self.fallback.clone()
            }
        }
    }

    fn try_get(&self) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.backend.read(&self.key)? else {
            return Ok(None);
        };
        let value: T = serde_json::from_str(&raw)?;
        value.validate()?;
        Ok(Some(value))
    }

    /// Validate and persist `value`. Nothing is written on failure.
    pub fn set(&self, value: &T) -> Result<(), CoreError> {
        value.validate()?;
        let json = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {}: {e}", self.key)))?;
        self.backend.write(&self.key, &json)
    }

    pub fn remove(&self) -> Result<(), CoreError> {
        self.backend.remove(&self.key)
    }
}
