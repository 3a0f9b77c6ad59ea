//! Provider seam to the remote value-transfer network.
//!
//! The network is reachable only through a narrow request/response gateway:
//! submit a named method with JSON params, get a hex string back. Only two
//! methods are relied on: a read-only call and a state-changing submission.

pub mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::ProviderError;
use crate::types::Address;

pub use http::HttpProvider;

/// Request/response gateway to the remote network.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Submits a raw request and returns the hex-encoded result string.
    async fn request(&self, method: &str, params: Value) -> Result<String, ProviderError>;
}

/// The active wallet session, supplied by the authentication subsystem.
#[derive(Clone)]
pub enum WalletSession {
    Disconnected,
    Connected {
        address: Address,
        provider: Arc<dyn Provider>,
    },
}

impl WalletSession {
    pub fn connected(address: Address, provider: Arc<dyn Provider>) -> Self {
        WalletSession::Connected { address, provider }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletSession::Connected { .. })
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletSession::Disconnected => f.write_str("Disconnected"),
            WalletSession::Connected { address, .. } => f
                .debug_struct("Connected")
                .field("address", address)
                .finish_non_exhaustive(),
        }
    }
}
