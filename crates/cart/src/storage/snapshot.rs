//! Persisted snapshot format.
//!
//! Current format (version 1):
//!
//! ```json
//! { "version": 1, "saved_at": "2026-01-01T00:00:00Z", "currency": "USD",
//!   "lines": [ { "product_id": "sku1", "name": "Widget", "unit_price": "10",
//!                "image": null, "quantity": 3 } ] }
//! ```
//!
//! Earlier clients stored the cart as a bare JSON array of catalog products
//! (`_id`, `name`, `price`, `image`, optional `qty`). That shape is still
//! accepted on read and converted; it is never written.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopfront_core::{CurrencyCode, ProductId};
use thiserror::Error;

use super::StorageError;
use crate::error::LineError;
use crate::state::{CartLine, CartState};

/// Version written by [`encode_snapshot`].
pub const SNAPSHOT_VERSION: u64 = 1;

/// Reasons a stored value cannot be turned into a cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected snapshot shape: {0}")]
    UnexpectedShape(&'static str),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u64),

    #[error("snapshot currency {found} does not match cart currency {expected}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    #[error("invalid line: {0}")]
    InvalidLine(#[from] LineError),
}

#[derive(Debug, Serialize)]
struct SnapshotOut<'a> {
    version: u64,
    saved_at: DateTime<Utc>,
    currency: CurrencyCode,
    lines: &'a [CartLine],
}

#[derive(Debug, Deserialize)]
struct SnapshotIn {
    currency: CurrencyCode,
    lines: Vec<CartLine>,
}

/// Product shape written by earlier clients.
#[derive(Debug, Deserialize)]
struct LegacyItem {
    #[serde(rename = "_id")]
    id: ProductId,
    name: String,
    price: Decimal,
    #[serde(default)]
    image: Option<String>,
    /// Cart quantity. The product's own `quantity` field is catalog stock.
    #[serde(default)]
    qty: Option<u32>,
}

/// Serialize a cart to the current snapshot format.
///
/// # Errors
///
/// Returns `StorageError::Serialize` if serialization fails.
pub fn encode_snapshot(state: &CartState) -> Result<String, StorageError> {
    let out = SnapshotOut {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        currency: state.currency(),
        lines: state.lines(),
    };
    Ok(serde_json::to_string(&out)?)
}

/// Parse a stored value into a cart in `currency`.
///
/// `null` decodes to an empty cart.
///
/// # Errors
///
/// Returns `SnapshotError` if the value is not a valid cart of a known format.
pub fn decode_snapshot(raw: &str, currency: CurrencyCode) -> Result<CartState, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;

    if value.is_null() {
        return Ok(CartState::empty(currency));
    }
    if value.is_array() {
        return decode_legacy(value, currency);
    }
    if !value.is_object() {
        return Err(SnapshotError::UnexpectedShape("expected an object or array"));
    }

    let version = value
        .get("version")
        .ok_or(SnapshotError::UnexpectedShape("missing version"))?
        .as_u64()
        .ok_or(SnapshotError::UnexpectedShape("version is not an integer"))?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let snapshot: SnapshotIn = serde_json::from_value(value)?;
    if snapshot.currency != currency {
        return Err(SnapshotError::CurrencyMismatch {
            expected: currency,
            found: snapshot.currency,
        });
    }
    Ok(CartState::from_lines(currency, snapshot.lines)?)
}

/// Convert a legacy product array, merging repeated products.
fn decode_legacy(value: Value, currency: CurrencyCode) -> Result<CartState, SnapshotError> {
    let items: Vec<LegacyItem> = serde_json::from_value(value)?;

    let mut lines: Vec<CartLine> = Vec::with_capacity(items.len());
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        let quantity = item.qty.unwrap_or(1);
        if let Some(&at) = index.get(&item.id) {
            if let Some(line) = lines.get_mut(at) {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            continue;
        }
        index.insert(item.id.clone(), lines.len());
        lines.push(CartLine {
            product_id: item.id,
            name: item.name,
            unit_price: item.price,
            image: item.image,
            quantity,
        });
    }

    Ok(CartState::from_lines(currency, lines)?)
}
