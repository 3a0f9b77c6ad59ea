//! Read-only seam over the external transfer-history source.
//!
//! Records are display data: this crate neither validates nor mutates them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::error::HistoryError;
use crate::types::{Address, TokenAmount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Incoming,
    Outgoing,
}

/// One past transfer as reported by the history source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub direction: TransferDirection,
    pub counterparty: Address,
    pub amount: TokenAmount,
    pub timestamp: DateTime<Utc>,
    pub memo: Option<String>,
}

/// External source of recent transfer records.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn list_recent(&self, address: Address) -> Result<Vec<TransferRecord>, HistoryError>;
}

/// Fixed record list, for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticHistory {
    records: Vec<TransferRecord>,
}

impl StaticHistory {
    pub fn new(records: Vec<TransferRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl HistorySource for StaticHistory {
    async fn list_recent(&self, _address: Address) -> Result<Vec<TransferRecord>, HistoryError> {
        Ok(self.records.clone())
    }
}
