//! Cart state engine.
//!
//! [`Cart`] owns the current snapshot, the storage adapter and the
//! subscribers. It is the only writer of storage. Every state change runs
//! the same sequence:
//!
//! 1. compute the next complete [`CartState`]
//! 2. persist it through [`CartStorage`]
//! 3. broadcast it to subscribers
//!
//! Steps 2 and 3 see the same `Arc<CartState>`. A failed write is logged and
//! reported in the [`Outcome`] but does not roll back the in-memory state,
//! and subscribers are still notified.

use std::sync::Arc;

use rust_decimal::Decimal;
use shopfront_core::{CatalogItem, CurrencyCode, ProductId};
use tracing::{debug, error, instrument};

use crate::error::CartError;
use crate::state::{CartLine, CartState};
use crate::storage::{CartStorage, StorageError};
use crate::subscription::{Subscribers, SubscriptionId, SubscriptionStatus};
use crate::totals;

/// Result of a cart mutation that passed validation.
#[derive(Debug)]
#[must_use]
pub enum Outcome {
    /// Nothing changed; nothing was persisted or broadcast.
    Unchanged,
    /// State changed, was persisted (or storage is inert) and broadcast.
    Applied,
    /// State changed and was broadcast, but the snapshot was not written.
    Unsaved(StorageError),
}

impl Outcome {
    /// Returns true if the cart state changed.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// The write error, if persistence failed.
    #[must_use]
    pub const fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::Unsaved(e) => Some(e),
            _ => None,
        }
    }
}

/// A shopping cart session.
///
/// Construct one per session with [`Cart::hydrate`], route every change
/// through its methods, and drop it when the session ends.
#[derive(Debug)]
pub struct Cart {
    state: Arc<CartState>,
    storage: CartStorage,
    subscribers: Subscribers,
}

impl Cart {
    /// Start a session from whatever `storage` holds.
    ///
    /// Unreadable or invalid stored data yields an empty cart.
    #[must_use]
    pub fn hydrate(storage: CartStorage, currency: CurrencyCode) -> Self {
        let state = storage.load(currency);
        debug!(
            key = storage.key(),
            inert = storage.is_inert(),
            lines = state.len(),
            "Cart session started"
        );
        Self {
            state: Arc::new(state),
            storage,
            subscribers: Subscribers::new(),
        }
    }

    /// Current state, read-only.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CartState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub const fn storage(&self) -> &CartStorage {
        &self.storage
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.state.currency()
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.state.line(product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.state.contains(product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        totals::item_count(&self.state)
    }

    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        totals::grand_total(&self.state)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `item`.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item`].
    pub fn add_one(&mut self, item: &CatalogItem) -> Result<Outcome, CartError> {
        self.add_item(item, 1)
    }

    /// Add `quantity` units of `item`.
    ///
    /// If the product is already in the cart its quantity grows by
    /// `quantity` and the captured name/price/image are kept; otherwise a new
    /// line is appended with a snapshot of the item.
    ///
    /// # Errors
    ///
    /// Returns `CartError` without touching state, storage or subscribers if
    /// `quantity` is zero, the item fails validation, or the item is priced
    /// in another currency.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub fn add_item(&mut self, item: &CatalogItem, quantity: u32) -> Result<Outcome, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        item.validate()?;
        if item.price.currency_code != self.state.currency() {
            return Err(CartError::CurrencyMismatch {
                id: item.id.clone(),
                expected: self.state.currency(),
                found: item.price.currency_code,
            });
        }

        let next = self.state.with_added(item, quantity);
        Ok(self.commit(next, "add_item"))
    }

    /// Remove the line for `product_id`. Absent products are a no-op.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> Outcome {
        match self.state.without(product_id) {
            Some(next) => self.commit(next, "remove_item"),
            None => Outcome::Unchanged,
        }
    }

    /// Replace the quantity for `product_id`.
    ///
    /// Zero removes the line. Absent products are a no-op.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Outcome {
        match self.state.with_quantity(product_id, quantity) {
            Some(next) => self.commit(next, "set_quantity"),
            None => Outcome::Unchanged,
        }
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Outcome {
        if self.state.is_empty() {
            return Outcome::Unchanged;
        }
        let next = CartState::empty(self.state.currency());
        self.commit(next, "clear")
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback for every future snapshot.
    ///
    /// The callback is invoked immediately with the current snapshot.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CartState) + Send + 'static,
    {
        self.subscribers.subscribe(Box::new(callback), &self.state)
    }

    /// Detach a subscriber. Returns false if `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    #[must_use]
    pub fn status(&self) -> SubscriptionStatus {
        self.subscribers.status()
    }

    /// Install `next`, persist it, then broadcast it.
    fn commit(&mut self, next: CartState, operation: &'static str) -> Outcome {
        let snapshot = Arc::new(next);
        self.state = Arc::clone(&snapshot);

        let persisted = self.storage.save(&snapshot);
        if let Err(e) = &persisted {
            error!(
                operation,
                key = self.storage.key(),
                error = %e,
                "Failed to persist cart, keeping in-memory state"
            );
        }

        self.subscribers.broadcast(&snapshot);

        debug!(
            operation,
            lines = snapshot.len(),
            items = totals::item_count(&snapshot),
            "Cart updated"
        );

        match persisted {
            Ok(()) => Outcome::Applied,
            Err(e) => Outcome::Unsaved(e),
        }
    }
}
