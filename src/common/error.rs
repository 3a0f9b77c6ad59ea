//! Error types for the wallet SDK.
//!
//! Codec and store failures are recoverable: callers fall back to the cached
//! value or skip persistence and log a warning. Transfer-level failures are
//! returned to the caller untouched since they represent money movement.

use std::time::Duration;

use thiserror::Error;

use crate::types::TokenAmount;

/// Failures translating between typed calls and raw hex payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The function name/argument shape is not one of the supported
    /// operations.
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),
    /// The payload is not exactly one 32-byte hex word.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Failures converting between human-decimal and base-unit amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("unparseable amount {0:?}")]
    Unparseable(String),
    #[error("amount carries more than {max} decimal places")]
    TooPrecise { max: u32 },
    #[error("amount does not fit the base-unit range")]
    OutOfRange,
}

/// Persistence failures. Non-fatal: the in-memory cache stays authoritative
/// for the current process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Failures raised by a [`Provider`](crate::providers::Provider)
/// implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed provider response: {0}")]
    InvalidResponse(String),
}

/// A failed balance refresh.
///
/// Refresh failures never clear the cache: `retained` carries the value
/// still being served (from memory or the persisted store), if any.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RefreshError {
    #[source]
    pub kind: RefreshErrorKind,
    pub retained: Option<TokenAmount>,
}

#[derive(Debug, Error)]
pub enum RefreshErrorKind {
    #[error("wallet session is disconnected")]
    Disconnected,
    #[error("balance query timed out after {0:?}")]
    Timeout(Duration),
    #[error("balance query was cancelled")]
    Cancelled,
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// A debit that would take the balance negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient balance: available {available}, requested {requested}")]
pub struct InsufficientBalance {
    pub available: TokenAmount,
    pub requested: TokenAmount,
}

/// Failures of a requested transfer operation. Fatal to that operation
/// only; the cache is left exactly as it was unless submission succeeded.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid recipient address {0:?}")]
    InvalidAddress(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    InsufficientBalance(#[from] InsufficientBalance),
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
}

/// Configuration validation failures raised by
/// [`WalletConfigBuilder::build`](crate::config::WalletConfigBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("token address is required")]
    MissingTokenAddress,
    #[error("invalid token address {0:?}")]
    InvalidTokenAddress(String),
    #[error("timeouts must be non-zero")]
    ZeroTimeout,
}

/// Failures reading the external history source.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history source unavailable: {0}")]
    Unavailable(String),
}
