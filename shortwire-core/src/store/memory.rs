//! In-memory state store

use super::StateStore;
use crate::error::StoreResult;
use crate::types::{MappingState, ShortKey};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local state store backed by a map
///
/// State survives actor deactivation but not process restart. This is
/// the default backend for tests and for embedding the runtime without
/// a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<ShortKey, MappingState>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted mappings
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the persisted copy directly, bypassing any actor
    ///
    /// Test hook: lets assertions inspect what is actually durable,
    /// independent of any in-memory actor state.
    pub fn persisted(&self, key: &ShortKey) -> Option<MappingState> {
        self.entries.read().get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    async fn load(&self, key: &ShortKey) -> StoreResult<Option<MappingState>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn save(&self, key: &ShortKey, state: &MappingState) -> StoreResult<()> {
        self.entries.write().insert(key.clone(), state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> ShortKey {
        ShortKey::new(raw).unwrap()
    }

    #[tokio::test]
    async fn load_absent_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load(&key("A1B2")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let store = MemoryStore::new();
        let k = key("A1B2");
        let state = MappingState::with_target(k.clone(), "https://example.com");

        store.save(&k, &state).await.unwrap();
        assert_eq!(store.load(&k).await.unwrap(), Some(state));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn save_is_last_write_wins() {
        let store = MemoryStore::new();
        let k = key("A1B2");

        store
            .save(&k, &MappingState::with_target(k.clone(), "https://one.example"))
            .await
            .unwrap();
        store
            .save(&k, &MappingState::with_target(k.clone(), "https://two.example"))
            .await
            .unwrap();

        let loaded = store.load(&k).await.unwrap().unwrap();
        assert_eq!(loaded.target.as_deref(), Some("https://two.example"));
        assert_eq!(store.len(), 1);
    }
}
