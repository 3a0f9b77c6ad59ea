//! In-process balance change notifications.
//!
//! The bus is constructed explicitly and injected into the cache; its
//! lifecycle is tied to the cache's owner, not to process-wide globals.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use crate::types::TokenAmount;

type Listener = Arc<dyn Fn(TokenAmount) + Send + Sync>;

/// Opaque handle returned by [`EventBus::subscribe`]; pass it back to
/// [`EventBus::unsubscribe`] to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Broadcast channel for "balance changed" notifications.
///
/// Delivery is synchronous and in subscription order. Publishing iterates a
/// snapshot of the registry, so listeners may subscribe or unsubscribe from
/// inside their callback; such changes take effect on the next publish.
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener invoked with every new balance.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(TokenAmount) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Removes a listener. No-op if it was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.lock().listeners.retain(|(id, _)| *id != subscription.0);
    }

    /// Invokes every registered listener with the new amount, in
    /// subscription order. A panicking listener is isolated and does not
    /// prevent delivery to the rest.
    pub fn publish(&self, amount: TokenAmount) {
        let snapshot: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(amount))).is_err() {
                log::warn!("balance listener panicked; continuing delivery");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    fn amount(s: &str) -> TokenAmount {
        s.parse().unwrap()
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_| seen.lock().unwrap().push(tag));
        }
        bus.publish(amount("1"));

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0u32));

        let counter = Arc::clone(&count);
        let subscription = bus.subscribe(move |_| *counter.lock().unwrap() += 1);

        bus.publish(amount("1"));
        bus.unsubscribe(subscription);
        bus.unsubscribe(subscription);
        bus.publish(amount("2"));

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn panicking_listener_does_not_block_later_ones() {
        let bus = EventBus::new();
        let reached = Arc::new(Mutex::new(false));

        bus.subscribe(|_| panic!("listener failure"));
        let flag = Arc::clone(&reached);
        bus.subscribe(move |_| *flag.lock().unwrap() = true);

        bus.publish(amount("1"));
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn unsubscribe_from_within_listener_is_safe() {
        let bus = Arc::new(EventBus::new());
        let fired = Arc::new(Mutex::new(0u32));

        let handle: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let bus_ref = Arc::clone(&bus);
        let handle_ref = Arc::clone(&handle);
        let counter = Arc::clone(&fired);
        let subscription = bus.subscribe(move |_| {
            *counter.lock().unwrap() += 1;
            if let Some(own) = handle_ref.lock().unwrap().take() {
                bus_ref.unsubscribe(own);
            }
        });
        *handle.lock().unwrap() = Some(subscription);

        bus.publish(amount("1"));
        bus.publish(amount("2"));

        // fired once, then removed itself
        assert_eq!(*fired.lock().unwrap(), 1);
        assert_eq!(bus.listener_count(), 0);
    }
}
