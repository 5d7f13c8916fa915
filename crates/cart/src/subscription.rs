//! Change notification for cart consumers.
//!
//! The registry is either `Idle` (nobody listening) or `Active` (at least one
//! subscriber). Callbacks run synchronously on the mutating thread, in the
//! order they subscribed, before the mutating call returns.

use core::fmt;

use tracing::debug;

use crate::state::CartState;

/// Callback invoked with every new cart snapshot.
pub type Callback = Box<dyn FnMut(&CartState) + Send>;

/// Handle returned by `subscribe`, used to detach later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Whether anyone is listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubscriptionStatus {
    #[default]
    Idle,
    Active,
}

/// Ordered set of subscriber callbacks.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and immediately hand it `current`.
    pub fn subscribe(&mut self, mut callback: Callback, current: &CartState) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        callback(current);

        if self.entries.is_empty() {
            debug!(subscription = %id, "Subscriptions active");
        }
        self.entries.push((id, callback));
        id
    }

    /// Detach a subscriber. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = self.entries.len() != before;

        if removed && self.entries.is_empty() {
            debug!(subscription = %id, "Last subscriber detached, subscriptions idle");
        }
        removed
    }

    #[must_use]
    pub fn status(&self) -> SubscriptionStatus {
        if self.entries.is_empty() {
            SubscriptionStatus::Idle
        } else {
            SubscriptionStatus::Active
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `state` to every subscriber.
    pub(crate) fn broadcast(&mut self, state: &CartState) {
        for (_, callback) in &mut self.entries {
            callback(state);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use shopfront_core::{CatalogItem, CurrencyCode, Price};

    fn recorder() -> (Arc<Mutex<Vec<usize>>>, Callback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: Callback = Box::new(move |state: &CartState| {
            sink.lock().unwrap().push(state.len());
        });
        (seen, callback)
    }

    #[test]
    fn test_idle_to_active_to_idle() {
        let mut subs = Subscribers::new();
        let empty = CartState::empty(CurrencyCode::USD);
        assert_eq!(subs.status(), SubscriptionStatus::Idle);

        let (_, a) = recorder();
        let (_, b) = recorder();
        let first = subs.subscribe(a, &empty);
        let second = subs.subscribe(b, &empty);
        assert_eq!(subs.status(), SubscriptionStatus::Active);
        assert_ne!(first, second);

        assert!(subs.unsubscribe(first));
        assert_eq!(subs.status(), SubscriptionStatus::Active);
        assert!(subs.unsubscribe(second));
        assert_eq!(subs.status(), SubscriptionStatus::Idle);
    }

    #[test]
    fn test_unsubscribe_unknown_is_false() {
        let mut subs = Subscribers::new();
        let (_, cb) = recorder();
        let id = subs.subscribe(cb, &CartState::empty(CurrencyCode::USD));
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
    }

    #[test]
    fn test_subscribe_delivers_current_state() {
        let mut subs = Subscribers::new();
        let item = CatalogItem::new("sku1", "Widget", Price::from_cents(100, CurrencyCode::USD));
        let state = CartState::empty(CurrencyCode::USD).with_added(&item, 1);

        let (seen, cb) = recorder();
        subs.subscribe(cb, &state);
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_broadcast_reaches_all_subscribers() {
        let mut subs = Subscribers::new();
        let empty = CartState::empty(CurrencyCode::USD);
        let (seen_a, a) = recorder();
        let (seen_b, b) = recorder();
        subs.subscribe(a, &empty);
        subs.subscribe(b, &empty);

        let item = CatalogItem::new("sku1", "Widget", Price::from_cents(100, CurrencyCode::USD));
        subs.broadcast(&empty.with_added(&item, 1));

        assert_eq!(*seen_a.lock().unwrap(), vec![0, 1]);
        assert_eq!(*seen_b.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_debug_does_not_print_callbacks() {
        let subs = Subscribers::new();
        assert_eq!(
            format!("{subs:?}"),
            "Subscribers { count: 0, status: Idle, .. }"
        );
    }
}
