//! Cart state types.
//!
//! [`CartState`] is an immutable snapshot. Transitions are pure functions
//! that build the next complete state; the engine decides what to do with
//! it (persist, broadcast). No method here mutates a state in place.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CatalogItem, CurrencyCode, ProductId};

use crate::error::LineError;

/// One product-and-quantity entry in the cart.
///
/// Name, price and image are captured from the catalog when the line is
/// created; later catalog changes do not alter an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot a catalog item into a new line.
    #[must_use]
    pub fn from_item(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            product_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price.amount,
            image: item.image.clone(),
            quantity,
        }
    }

    /// Check the per-line invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), LineError> {
        if self.product_id.is_blank() {
            return Err(LineError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(LineError::EmptyName(self.product_id.clone()));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(LineError::NegativePrice(self.product_id.clone()));
        }
        if self.quantity == 0 {
            return Err(LineError::ZeroQuantity(self.product_id.clone()));
        }
        Ok(())
    }
}

/// Ordered cart contents in a single currency.
///
/// Lines keep insertion order, which is the display order in the drawer.
/// At most one line exists per product and every quantity is at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartState {
    currency: CurrencyCode,
    lines: Vec<CartLine>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn empty(currency: CurrencyCode) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    /// Build a state from lines of unknown provenance.
    ///
    /// # Errors
    ///
    /// Returns `LineError` if any line is invalid or a product repeats.
    pub fn from_lines(currency: CurrencyCode, lines: Vec<CartLine>) -> Result<Self, LineError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            line.validate()?;
            if !seen.insert(&line.product_id) {
                return Err(LineError::Duplicate(line.product_id.clone()));
            }
        }
        Ok(Self { currency, lines })
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.lines.iter()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// State with `quantity` more units of `item`.
    ///
    /// Merges into the existing line if present (keeping the captured price),
    /// otherwise appends a new line.
    #[must_use]
    pub(crate) fn with_added(&self, item: &CatalogItem, quantity: u32) -> Self {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine::from_item(item, quantity)),
        }
        Self {
            currency: self.currency,
            lines,
        }
    }

    /// State without the line for `product_id`, or `None` if absent.
    #[must_use]
    pub(crate) fn without(&self, product_id: &ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let lines = self
            .lines
            .iter()
            .filter(|l| &l.product_id != product_id)
            .cloned()
            .collect();
        Some(Self {
            currency: self.currency,
            lines,
        })
    }

    /// State with the quantity of `product_id` replaced.
    ///
    /// Zero removes the line. Returns `None` if the product is absent or the
    /// quantity is already `quantity`.
    #[must_use]
    pub(crate) fn with_quantity(&self, product_id: &ProductId, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return self.without(product_id);
        }
        let current = self.line(product_id)?;
        if current.quantity == quantity {
            return None;
        }
        let lines = self
            .lines
            .iter()
            .map(|l| {
                if &l.product_id == product_id {
                    CartLine {
                        quantity,
                        ..l.clone()
                    }
                } else {
                    l.clone()
                }
            })
            .collect();
        Some(Self {
            currency: self.currency,
            lines,
        })
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
