//! Shopfront Cart - client-side shopping cart core.
//!
//! The cart is a single owned session object that survives restarts through
//! a durable key-value slot, notifies every interested view when it changes,
//! and computes totals on read. It never fetches catalog data; UI code hands
//! it [`CatalogItem`](shopfront_core::CatalogItem)s.
//!
//! # Modules
//!
//! - [`engine`] - [`Cart`], the only writer of cart state and storage
//! - [`state`] - [`CartState`] snapshots and [`CartLine`]s
//! - [`storage`] - [`CartStorage`] adapter, [`KeyValueStore`] backends, snapshot format
//! - [`totals`] - pure line/grand total and item count functions
//! - [`subscription`] - subscriber registry (`Idle`/`Active`)
//! - [`config`] - environment configuration
//!
//! # Example
//!
//! ```
//! use shopfront_cart::{Cart, CartStorage, MemoryStore, totals};
//! use shopfront_core::{CatalogItem, CurrencyCode, Price};
//!
//! let store = MemoryStore::new();
//! let mut cart = Cart::hydrate(CartStorage::new(store.clone(), "cart"), CurrencyCode::USD);
//!
//! let widget = CatalogItem::new("sku1", "Widget", Price::from_cents(1000, CurrencyCode::USD));
//! let _ = cart.add_item(&widget, 3).expect("valid item");
//! assert_eq!(totals::grand_total_price(cart.state()).display(), "$30.00");
//!
//! // A new session over the same storage sees the same cart.
//! let reloaded = Cart::hydrate(CartStorage::new(store, "cart"), CurrencyCode::USD);
//! assert_eq!(reloaded.state(), cart.state());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod storage;
pub mod subscription;
pub mod totals;

pub use config::{CartConfig, ConfigError};
pub use engine::{Cart, Outcome};
pub use error::{CartError, LineError};
pub use state::{CartLine, CartState};
pub use storage::{CartStorage, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use subscription::{SubscriptionId, SubscriptionStatus};
