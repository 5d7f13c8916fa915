//! In-process key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StorageError};

/// Key-value store held in memory.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the cart wrote, or hand the same "browser storage" to a second cart to
/// simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Raw value under `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.map().get(key).cloned()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_values() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(other.raw("k").as_deref(), Some("v"));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("nope").unwrap(), None);
    }
}
