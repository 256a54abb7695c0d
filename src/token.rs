//! Bearer Token Store
//!
//! The token is opaque: it is never parsed, validated or refreshed here.
//! A 401 from the server is the only expiry signal.

use crate::store::{KeyValueStore, StoreError, TOKEN_KEY};

/// Bearer token persisted in one store slot
#[derive(Debug, Clone)]
pub struct TokenStore<S> {
    store: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current token, if any. Empty strings count as absent.
    pub fn get(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// Whether protected pages may be shown
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_set_get_clear() {
        let tokens = TokenStore::new(MemoryStore::new());
        assert!(!tokens.is_present());

        tokens.set("abc").unwrap();
        assert_eq!(tokens.get().as_deref(), Some("abc"));
        assert!(tokens.is_present());

        tokens.clear().unwrap();
        assert_eq!(tokens.get(), None);
    }

    #[test]
    fn test_empty_token_is_absent() {
        let tokens = TokenStore::new(MemoryStore::with(TOKEN_KEY, ""));
        assert!(!tokens.is_present());
    }
}
