//! In-memory state store
//!
//! Keeps values in a hash map behind a read-write lock. Useful for tests
//! and for callers that manage durability themselves.

use crate::error::{IndexError, Result};
use crate::storage::StateStore;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Volatile key→bytes store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<AHashMap<String, Vec<u8>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(IndexError::Storage("store is closed".to_string()));
        }
        Ok(())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn initialize(&self) -> Result<()> {
        self.ensure_open()
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn clear(&self) -> Result<()> {
        self.ensure_open()?;
        self.entries.write().clear();
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_retrieve() {
        let store = MemoryStore::new();
        store.initialize().unwrap();

        store.store("state", b"payload").unwrap();
        assert_eq!(store.retrieve("state").unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.retrieve("missing").unwrap(), None);

        // Replacement overwrites
        store.store("state", b"updated").unwrap();
        assert_eq!(store.retrieve("state").unwrap(), Some(b"updated".to_vec()));
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        store.store("a", b"1").unwrap();
        store.store("b", b"2").unwrap();
        assert_eq!(store.len(), 2);

        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.retrieve("a").unwrap(), None);
    }

    #[test]
    fn test_closed_store_rejects_operations() {
        let store = MemoryStore::new();
        store.store("a", b"1").unwrap();
        store.close().unwrap();

        assert!(matches!(
            store.store("b", b"2"),
            Err(IndexError::Storage(_))
        ));
        assert!(store.retrieve("a").is_err());
        assert!(store.clear().is_err());
        // close is idempotent
        assert!(store.close().is_ok());
    }
}
