//! Outbound transfers and simulated inbound credits.
//!
//! A send validates against the cache, submits the encoded call through the
//! provider, and only then decrements the cache optimistically. Submission
//! failure leaves the cache untouched. Receives never touch the provider:
//! they record an external credit whose settlement happened outside this
//! client's visibility.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::timeout;

use crate::cache::BalanceCache;
use crate::codec::{self, FunctionCall};
use crate::common::error::{InsufficientBalance, TransferError};
use crate::common::logging::{self, LogLevel};
use crate::providers::WalletSession;
use crate::types::{Address, BalanceDelta, TokenAmount};

/// An in-flight outbound transfer. Lives only for the duration of a
/// [`TransferClient::send`] call; never persisted.
#[derive(Debug, Clone)]
struct PendingTransfer {
    to: Address,
    amount: TokenAmount,
    note: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl PendingTransfer {
    fn into_receipt(self, transaction_id: String) -> TransferReceipt {
        TransferReceipt {
            transaction_id,
            to: self.to,
            amount: self.amount,
            note: self.note,
            submitted_at: self.submitted_at,
        }
    }
}

/// Proof of an accepted transfer submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Opaque transaction identifier returned by the provider.
    pub transaction_id: String,
    pub to: Address,
    pub amount: TokenAmount,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Executes value movement against the cache and the remote provider.
pub struct TransferClient {
    cache: Arc<BalanceCache>,
    submit_lock: tokio::sync::Mutex<()>,
}

impl TransferClient {
    pub fn new(cache: Arc<BalanceCache>) -> Self {
        Self {
            cache,
            submit_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Submits a transfer and, on acceptance, decrements the cached balance.
    ///
    /// Validation failures and submission failures are specific and never
    /// swallowed: insufficient funds, a malformed recipient, and a network
    /// failure are distinct results. The cache is only mutated after the
    /// provider accepted the submission.
    pub async fn send(
        &self,
        to: &str,
        amount: TokenAmount,
        note: &str,
    ) -> Result<TransferReceipt, TransferError> {
        let to: Address = to
            .trim()
            .parse()
            .map_err(|_| TransferError::InvalidAddress(to.to_string()))?;
        if amount.is_zero() {
            return Err(TransferError::InvalidAmount(
                "transfer amount must be positive".to_string(),
            ));
        }

        // One submission at a time; the balance check stays valid for the
        // whole submit.
        let _guard = self.submit_lock.lock().await;

        let available = self.cache.current();
        if amount > available {
            return Err(InsufficientBalance {
                available,
                requested: amount,
            }
            .into());
        }
        let WalletSession::Connected { address, provider } = self.cache.session() else {
            return Err(TransferError::SubmissionFailed(
                "wallet session is disconnected".to_string(),
            ));
        };

        let pending = PendingTransfer {
            to,
            amount,
            note: if note.is_empty() {
                None
            } else {
                Some(note.to_string())
            },
            submitted_at: Utc::now(),
        };

        let payload = codec::encode(&FunctionCall::Transfer {
            to,
            amount: amount.to_word(),
        });
        let params = json!([{
            "from": address,
            "to": self.cache.config().token_address,
            "data": payload,
        }]);

        let submit_timeout = self.cache.config().submit_timeout;
        let transaction_id =
            match timeout(submit_timeout, provider.request("eth_sendTransaction", params)).await {
                Ok(Ok(id)) => id,
                Ok(Err(e)) => return Err(TransferError::SubmissionFailed(e.to_string())),
                Err(_) => {
                    return Err(TransferError::SubmissionFailed(format!(
                        "no provider response within {submit_timeout:?}"
                    )));
                }
            };

        self.cache
            .apply_optimistic_delta(BalanceDelta::Debit(amount))
            .await?;
        logging::log(
            LogLevel::Success,
            &format!("transfer of {amount} to {to} submitted as {transaction_id}"),
        );
        Ok(pending.into_receipt(transaction_id))
    }

    /// Records an external credit by incrementing the cached balance.
    pub async fn receive(&self, amount: TokenAmount) -> Result<(), TransferError> {
        if amount.is_zero() {
            return Err(TransferError::InvalidAmount(
                "credit amount must be positive".to_string(),
            ));
        }
        self.cache
            .apply_optimistic_delta(BalanceDelta::Credit(amount))
            .await?;
        Ok(())
    }
}
