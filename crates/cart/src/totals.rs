//! Derived totals.
//!
//! Pure functions over a [`CartState`]; nothing here is cached, totals are
//! recomputed on every read. An empty cart totals to zero.

use rust_decimal::Decimal;
use shopfront_core::Price;

use crate::state::{CartLine, CartState};

/// `unit_price * quantity` for one line.
#[must_use]
pub fn line_total(line: &CartLine) -> Decimal {
    line.unit_price
        .saturating_mul(Decimal::from(line.quantity))
}

/// Sum of every line total.
#[must_use]
pub fn grand_total(state: &CartState) -> Decimal {
    state
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line_total(line)))
}

/// Sum of every line quantity.
#[must_use]
pub fn item_count(state: &CartState) -> u64 {
    state.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Grand total paired with the cart currency, for display.
#[must_use]
pub fn grand_total_price(state: &CartState) -> Price {
    Price::new(grand_total(state), state.currency())
}

/// Line total paired with the cart currency, for display.
#[must_use]
pub fn line_total_price(state: &CartState, line: &CartLine) -> Price {
    Price::new(line_total(line), state.currency())
}
