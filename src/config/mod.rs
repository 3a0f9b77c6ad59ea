//! Wallet configuration with builder-time validation.

use std::time::Duration;

use crate::common::error::ConfigError;
use crate::storage::DEFAULT_BALANCE_KEY;
use crate::types::Address;

const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

/// Validated configuration for a [`BalanceCache`](crate::cache::BalanceCache)
/// and its [`TransferClient`](crate::transfer::TransferClient).
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Token contract all calls are addressed to.
    pub token_address: Address,
    /// Bound on a single balance query.
    pub refresh_timeout: Duration,
    /// Bound on a single transfer submission.
    pub submit_timeout: Duration,
    /// Key of the persisted balance slot.
    pub balance_key: String,
}

/// Builder for [`WalletConfig`]; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct WalletConfigBuilder {
    token_address: Option<String>,
    refresh_timeout_secs: Option<u64>,
    submit_timeout_secs: Option<u64>,
    balance_key: Option<String>,
}

impl WalletConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, address: impl Into<String>) -> Self {
        self.token_address = Some(address.into());
        self
    }

    pub fn with_refresh_timeout(mut self, secs: u64) -> Self {
        self.refresh_timeout_secs = Some(secs);
        self
    }

    pub fn with_submit_timeout(mut self, secs: u64) -> Self {
        self.submit_timeout_secs = Some(secs);
        self
    }

    pub fn with_balance_key(mut self, key: impl Into<String>) -> Self {
        self.balance_key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<WalletConfig, ConfigError> {
        let raw = self
            .token_address
            .ok_or(ConfigError::MissingTokenAddress)?;
        let token_address = raw
            .parse()
            .map_err(|_| ConfigError::InvalidTokenAddress(raw))?;

        let refresh = self
            .refresh_timeout_secs
            .unwrap_or(DEFAULT_REFRESH_TIMEOUT_SECS);
        let submit = self
            .submit_timeout_secs
            .unwrap_or(DEFAULT_SUBMIT_TIMEOUT_SECS);
        if refresh == 0 || submit == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(WalletConfig {
            token_address,
            refresh_timeout: Duration::from_secs(refresh),
            submit_timeout: Duration::from_secs(submit),
            balance_key: self
                .balance_key
                .unwrap_or_else(|| DEFAULT_BALANCE_KEY.to_string()),
        })
    }
}
