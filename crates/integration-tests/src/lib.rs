//! Integration tests for the shopfront cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - sessions, restarts and hydration over real files
//! - `cart_invariants` - randomized operation sequences against cart invariants
//! - `cart_subscriptions` - subscriber fan-out across sessions
//!
//! This library holds the shared fixtures.

use std::path::Path;

use shopfront_cart::{Cart, CartStorage, FileStore};
use shopfront_core::{CatalogItem, CurrencyCode, Price};

/// Storage key used by every fixture.
pub const TEST_KEY: &str = "cart-product";

/// Catalog item priced in whole dollars.
#[must_use]
pub fn product(id: &str, name: &str, dollars: i64) -> CatalogItem {
    CatalogItem::new(id, name, Price::from_cents(dollars * 100, CurrencyCode::USD))
}

/// The product used by the end-to-end scenario.
#[must_use]
pub fn widget() -> CatalogItem {
    product("sku1", "Widget", 10)
}

/// A small catalog for randomized tests.
#[must_use]
pub fn catalog() -> Vec<CatalogItem> {
    vec![
        widget(),
        product("sku2", "Gadget", 25).with_image("https://media.example/gadget.png"),
        product("sku3", "Sprocket", 3),
        product("sku4", "Gift card", 0),
        CatalogItem::new(
            "sku5",
            "Sticker",
            Price::from_cents(199, CurrencyCode::USD),
        ),
    ]
}

/// Open a cart session over files in `dir`, as a fresh process would.
///
/// # Panics
///
/// Panics if the directory cannot be opened.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_session(dir: &Path) -> Cart {
    let store = FileStore::open(dir).expect("open file store");
    Cart::hydrate(CartStorage::new(store, TEST_KEY), CurrencyCode::USD)
}

/// Path of the snapshot file `file_session` writes.
#[must_use]
pub fn snapshot_path(dir: &Path) -> std::path::PathBuf {
    dir.join(format!("{TEST_KEY}.json"))
}
