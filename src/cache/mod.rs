//! The authoritative in-memory balance and its reconciliation logic.
//!
//! The cache reconciles three inputs: in-memory state, the persisted slot,
//! and on-chain reads. State mutations are sync critical sections under a
//! mutex never held across an await, so a cancelled or dropped operation can
//! never leave the balance partially updated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::codec::{self, FunctionCall};
use crate::common::error::{InsufficientBalance, RefreshError, RefreshErrorKind};
use crate::common::logging::{self, LogLevel};
use crate::config::WalletConfig;
use crate::events::EventBus;
use crate::providers::WalletSession;
use crate::storage::BalanceStore;
use crate::types::{BalanceDelta, TokenAmount};

/// Where the cached value currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePhase {
    /// No value yet, from either the store or the chain.
    Uninitialized,
    /// Holding a value believed current.
    Loaded,
    /// A remote read is in flight.
    Refreshing,
    /// The last reconciliation failed; the previous value is still served.
    Stale,
}

struct CacheState {
    balance: Option<TokenAmount>,
    last_applied_seq: u64,
    phase: CachePhase,
}

/// Single source of truth for "what is my balance right now".
pub struct BalanceCache {
    state: Mutex<CacheState>,
    session: Mutex<WalletSession>,
    refresh_seq: AtomicU64,
    store: BalanceStore,
    bus: Arc<EventBus>,
    config: WalletConfig,
    persist_lock: tokio::sync::Mutex<()>,
    shutdown: CancellationToken,
}

impl BalanceCache {
    pub fn new(
        config: WalletConfig,
        store: BalanceStore,
        bus: Arc<EventBus>,
        session: WalletSession,
    ) -> Self {
        Self {
            state: Mutex::new(CacheState {
                balance: None,
                last_applied_seq: 0,
                phase: CachePhase::Uninitialized,
            }),
            session: Mutex::new(session),
            refresh_seq: AtomicU64::new(0),
            store,
            bus,
            config,
            persist_lock: tokio::sync::Mutex::new(()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Synchronous read of the in-memory value. Never blocks on I/O; zero
    /// until a value has been adopted from the store or the chain.
    pub fn current(&self) -> TokenAmount {
        self.lock_state().balance.unwrap_or(TokenAmount::ZERO)
    }

    pub fn phase(&self) -> CachePhase {
        self.lock_state().phase
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn session(&self) -> WalletSession {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Swaps the active session and drops the cache back to a pre-refresh
    /// phase. The next [`refresh`](Self::refresh) re-reconciles; nothing is
    /// fetched reactively here.
    pub fn session_changed(&self, session: WalletSession) {
        *self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = session;
        let mut state = self.lock_state();
        if state.balance.is_some() {
            state.phase = CachePhase::Stale;
        }
        logging::log(
            LogLevel::Info,
            "wallet session changed; next refresh will reconcile",
        );
    }

    /// Token for cooperative shutdown; a cancelled in-flight refresh
    /// resolves with a cancellation error and leaves the cache untouched.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Reconciles the cached balance with the store and the chain.
    ///
    /// The persisted value is adopted immediately when the cache is
    /// uninitialized (fast path, no network wait). A successful remote read
    /// then replaces the current value, is persisted, and is published.
    /// Every failure retains the previous value and reports it on the
    /// error. Concurrent refreshes apply in request-start order: a response
    /// whose sequence number is not newer than the last applied one is
    /// discarded.
    pub async fn refresh(&self) -> Result<TokenAmount, RefreshError> {
        self.adopt_persisted().await;

        let WalletSession::Connected { address, provider } = self.session() else {
            return Err(self.fail(RefreshErrorKind::Disconnected));
        };

        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_state().phase = CachePhase::Refreshing;

        let payload = codec::encode(&FunctionCall::BalanceOf { account: address });
        let params = json!([
            { "to": self.config.token_address, "data": payload },
            "latest",
        ]);

        let outcome = tokio::select! {
            () = self.shutdown.cancelled() => {
                return Err(self.fail(RefreshErrorKind::Cancelled));
            }
            outcome = timeout(
                self.config.refresh_timeout,
                provider.request("eth_call", params),
            ) => outcome,
        };

        let raw = match outcome {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(self.fail(RefreshErrorKind::Provider(e))),
            Err(_) => {
                return Err(self.fail(RefreshErrorKind::Timeout(self.config.refresh_timeout)));
            }
        };

        let word = codec::decode_uint(&raw).map_err(|e| self.fail(e.into()))?;
        let amount = TokenAmount::try_from_word(word).map_err(|e| self.fail(e.into()))?;

        let discarded = {
            let mut state = self.lock_state();
            if seq <= state.last_applied_seq {
                true
            } else {
                state.last_applied_seq = seq;
                state.balance = Some(amount);
                state.phase = CachePhase::Loaded;
                false
            }
        };
        if discarded {
            log::debug!("discarding refresh #{seq}: a newer refresh already applied");
            return Ok(self.current());
        }

        self.persist_current().await;
        self.bus.publish(self.current());
        Ok(amount)
    }

    /// Adds or subtracts an amount immediately, persists, and publishes,
    /// without waiting for remote confirmation. A debit that would go
    /// negative fails and leaves the cache unchanged.
    pub async fn apply_optimistic_delta(
        &self,
        delta: BalanceDelta,
    ) -> Result<TokenAmount, InsufficientBalance> {
        let updated = {
            let mut state = self.lock_state();
            let available = state.balance.unwrap_or(TokenAmount::ZERO);
            let updated = match delta {
                BalanceDelta::Credit(amount) => available.saturating_add(amount),
                BalanceDelta::Debit(amount) => {
                    available
                        .checked_sub(amount)
                        .ok_or(InsufficientBalance {
                            available,
                            requested: amount,
                        })?
                }
            };
            state.balance = Some(updated);
            state.phase = CachePhase::Loaded;
            updated
        };

        self.persist_current().await;
        self.bus.publish(updated);
        Ok(updated)
    }

    /// Fast path: adopt the persisted value when nothing is loaded yet.
    async fn adopt_persisted(&self) {
        if self.lock_state().balance.is_some() {
            return;
        }
        let Some(stored) = self.store.load().await else {
            return;
        };
        let adopted = {
            let mut state = self.lock_state();
            if state.balance.is_none() {
                state.balance = Some(stored);
                state.phase = CachePhase::Loaded;
                true
            } else {
                false
            }
        };
        if adopted {
            logging::log(
                LogLevel::Info,
                &format!("adopted persisted balance {stored}"),
            );
            self.bus.publish(stored);
        }
    }

    /// Marks the cache stale and builds the error carrying whatever value
    /// is still being served.
    fn fail(&self, kind: RefreshErrorKind) -> RefreshError {
        let mut state = self.lock_state();
        let retained = state.balance;
        state.phase = if retained.is_some() {
            CachePhase::Stale
        } else {
            CachePhase::Uninitialized
        };
        RefreshError { kind, retained }
    }

    /// Persists the balance as it stands now. Saves serialize behind a
    /// dedicated lock and re-read the state, so a slow save can never write
    /// an older snapshot over a newer one.
    async fn persist_current(&self) {
        let _guard = self.persist_lock.lock().await;
        let Some(amount) = self.lock_state().balance else {
            return;
        };
        if let Err(e) = self.store.save(amount).await {
            logging::log(
                LogLevel::Warning,
                &format!("failed to persist balance {amount}: {e}"),
            );
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
