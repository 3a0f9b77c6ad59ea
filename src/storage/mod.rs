//! Persistence seam for the cached balance.
//!
//! The secure store itself is external; this module only defines the
//! key-value trait the host supplies and a single-slot wrapper over it.

pub mod postgres;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::common::error::StoreError;
use crate::types::TokenAmount;

pub use postgres::PostgresStore;

/// Default key for the balance slot.
pub const DEFAULT_BALANCE_KEY: &str = "wallet.balance";

/// External durable key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Single-slot wrapper holding the last known balance across restarts.
pub struct BalanceStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl BalanceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Returns the stored amount if present and parseable.
    ///
    /// An absent or unparseable slot is a normal first-run state, not an
    /// error; backend failures are logged and also yield `None`.
    pub async fn load(&self) -> Option<TokenAmount> {
        match self.backend.get_string(&self.key).await {
            Ok(Some(raw)) => match raw.parse() {
                Ok(amount) => Some(amount),
                Err(e) => {
                    log::warn!("ignoring unparseable persisted balance {raw:?}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("persisted balance read failed: {e}");
                None
            }
        }
    }

    /// Persists the canonical decimal form of the amount.
    pub async fn save(&self, amount: TokenAmount) -> Result<(), StoreError> {
        self.backend
            .set_string(&self.key, &amount.to_string())
            .await
    }
}

/// In-memory backend for tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let slots = self
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
