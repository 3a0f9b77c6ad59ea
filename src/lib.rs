//! A client-side SDK for cached stablecoin balance tracking and transfers.
//!
//! The crate sits between a user interface and a remote value-transfer
//! network reachable only through a narrow request/response provider:
//! submit a call, get a hex-encoded result. It presents one consistent
//! balance, lets callers initiate transfers and record external credits,
//! and keeps working when the network is slow or down by falling back to
//! the last persisted value.
//!
//! The pieces compose explicitly, leaves first:
//!
//! - [`codec`]: typed function calls to raw hex payloads and back.
//! - [`storage`]: the external key-value seam and the single balance slot.
//! - [`events`]: the injected balance-change bus.
//! - [`cache`]: the authoritative balance, reconciling memory, store, and
//!   chain.
//! - [`transfer`]: outbound sends and simulated inbound credits.
//! - [`providers`]: the session/provider seam, with a JSON-RPC HTTP
//!   implementation.

pub mod cache;
pub mod codec;
pub mod common;
pub mod config;
pub mod events;
pub mod history;
pub mod providers;
pub mod storage;
pub mod transfer;
pub mod types;

pub use cache::{BalanceCache, CachePhase};
pub use common::error::{
    AmountError, CodecError, ConfigError, HistoryError, InsufficientBalance, ProviderError,
    RefreshError, RefreshErrorKind, StoreError, TransferError,
};
pub use config::{WalletConfig, WalletConfigBuilder};
pub use events::{EventBus, Subscription};
pub use history::{HistorySource, StaticHistory, TransferDirection, TransferRecord};
pub use providers::{HttpProvider, Provider, WalletSession};
pub use storage::{BalanceStore, KeyValueStore, MemoryStore, PostgresStore};
pub use transfer::{TransferClient, TransferReceipt};
pub use types::{Address, BalanceDelta, TOKEN_DECIMALS, TokenAmount};
