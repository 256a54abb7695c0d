//! Persistent Key/Value Slots
//!
//! The client persists exactly two values across sessions: the bearer token
//! and the theme preference. Both live in single named slots of a
//! [`KeyValueStore`], which is injected so tests never touch real storage.
//!
//! - Browser: `localStorage` (implemented by the UI crate)
//! - Native: [`FileStore`], a JSON file in the data directory
//! - Tests: [`MemoryStore`]

#[cfg(feature = "native")]
mod file;

#[cfg(feature = "native")]
pub use file::FileStore;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Slot holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Slot holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Single-key persistent storage
pub trait KeyValueStore {
    /// Read a slot. Unreadable storage reads as empty.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a slot
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a slot. Deleting a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt state file: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process-local store, lost on exit
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one slot
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token"), None);

        // Removing twice is fine
        store.remove("token").unwrap();
    }

    #[test]
    fn test_clones_share_slots() {
        let store = MemoryStore::with("theme", "dark");
        let shared = Arc::new(store.clone());

        shared.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }
}
