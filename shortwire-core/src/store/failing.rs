//! Fault-injecting state store wrapper

use super::StateStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{MappingState, ShortKey};
use std::sync::atomic::{AtomicBool, Ordering};

/// A store wrapper whose loads and saves can be made to fail on demand
///
/// Useful for exercising persistence failure paths: flip `fail_saves`
/// and a `set` will report `Persistence` while leaving the in-memory
/// actor state ahead of storage, exactly as the contract allows.
#[derive(Debug, Default)]
pub struct FailingStore<S> {
    inner: S,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl<S> FailingStore<S> {
    /// Wrap a store with all faults disabled
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_loads: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Toggle failure of every subsequent load
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of every subsequent save
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: StateStore> StateStore for FailingStore<S> {
    async fn load(&self, key: &ShortKey) -> StoreResult<Option<MappingState>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Injected { key: key.clone() });
        }
        self.inner.load(key).await
    }

    async fn save(&self, key: &ShortKey, state: &MappingState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Injected { key: key.clone() });
        }
        self.inner.save(key, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn key(raw: &str) -> ShortKey {
        ShortKey::new(raw).unwrap()
    }

    #[tokio::test]
    async fn passes_through_when_healthy() {
        let store = FailingStore::new(MemoryStore::new());
        let k = key("A1B2");
        let state = MappingState::with_target(k.clone(), "https://example.com");

        store.save(&k, &state).await.unwrap();
        assert_eq!(store.load(&k).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn injected_save_fault_leaves_durable_state_untouched() {
        let store = FailingStore::new(MemoryStore::new());
        let k = key("A1B2");

        store
            .save(&k, &MappingState::with_target(k.clone(), "https://one.example"))
            .await
            .unwrap();

        store.fail_saves(true);
        let err = store
            .save(&k, &MappingState::with_target(k.clone(), "https://two.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Injected { .. }));

        // The durable copy is still the last successful save.
        let durable = store.inner().persisted(&k).unwrap();
        assert_eq!(durable.target.as_deref(), Some("https://one.example"));
    }

    #[tokio::test]
    async fn injected_load_fault_surfaces() {
        let store = FailingStore::new(MemoryStore::new());
        store.fail_loads(true);
        assert!(matches!(
            store.load(&key("A1B2")).await,
            Err(StoreError::Injected { .. })
        ));
    }
}
