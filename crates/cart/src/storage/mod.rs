//! Durable cart persistence.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] abstracts durable client storage (one string value per key)
//! - [`FileStore`] keeps one file per key and survives process restarts
//! - [`MemoryStore`] keeps values in-process (tests, embedders)
//! - [`CartStorage`] is the adapter the cart engine talks to: it owns the
//!   storage key and the snapshot format, and can be inert when no durable
//!   storage exists (server rendering, disabled by config)
//!
//! Hydration is defensive: anything that cannot be turned into a valid cart
//! (missing key, bad JSON, unknown version, invalid line) loads as an empty
//! cart with a warning. Writes overwrite the whole snapshot.

mod file;
mod memory;
mod snapshot;

pub use file::{FileStore, validate_key};
pub use memory::MemoryStore;
pub use snapshot::{SNAPSHOT_VERSION, SnapshotError, decode_snapshot, encode_snapshot};

use shopfront_core::CurrencyCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::CartState;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Storage key is not usable by the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable key-value storage for string values.
///
/// Implementations must be thread-safe (`Send + Sync`) so a cart can move
/// between threads, even though all cart access is single-writer.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Persistent store adapter for the cart snapshot.
pub struct CartStorage {
    backend: Option<Box<dyn KeyValueStore>>,
    key: String,
}

impl CartStorage {
    /// Default storage slot, shared with carts written by earlier clients.
    pub const DEFAULT_KEY: &'static str = "cart-product";

    /// Create an adapter over `backend`, storing the cart under `key`.
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            key: key.into(),
        }
    }

    /// An adapter with no durable storage behind it.
    ///
    /// `load` returns an empty cart and `save` succeeds without doing anything.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            backend: None,
            key: Self::DEFAULT_KEY.to_owned(),
        }
    }

    #[must_use]
    pub const fn is_inert(&self) -> bool {
        self.backend.is_none()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Hydrate the cart from storage.
    ///
    /// Never fails: read errors and invalid snapshots degrade to an empty
    /// cart in `currency`.
    #[must_use]
    pub fn load(&self, currency: CurrencyCode) -> CartState {
        let Some(backend) = &self.backend else {
            debug!("Cart storage is inert, starting with an empty cart");
            return CartState::empty(currency);
        };

        let raw = match backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored cart found");
                return CartState::empty(currency);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                return CartState::empty(currency);
            }
        };

        match decode_snapshot(&raw, currency) {
            Ok(state) => {
                info!(
                    key = %self.key,
                    lines = state.len(),
                    "Cart hydrated from storage"
                );
                state
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unusable stored cart");
                CartState::empty(currency)
            }
        }
    }

    /// Write the full cart snapshot, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let raw = encode_snapshot(state)?;
        backend.set(&self.key, &raw)?;
        debug!(key = %self.key, lines = state.len(), "Cart snapshot saved");
        Ok(())
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage")
            .field("key", &self.key)
            .field("inert", &self.is_inert())
            .finish()
    }
}
