//! The mapping actor
//!
//! One `MappingActor` instance exists per active key. It holds the only
//! in-memory copy of that key's `MappingState`, serializes every read and
//! write against it, and flushes to the durable store before a write is
//! acknowledged.
//!
//! Lifecycle per key: inactive → activating (state loaded from the store)
//! → active (serially handling operations) → deactivated (evicted between
//! operations). Re-activation reloads from the store.

use crate::error::{MappingError, MappingResult, StoreError, StoreResult};
use crate::store::StateStore;
use crate::types::{MappingState, ShortKey};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Validate a target URL before any state mutation
///
/// The core only rejects empty and whitespace-only targets; deeper URL
/// validation belongs to the front doors.
pub(crate) fn validate_target(target: &str) -> MappingResult<()> {
    if target.trim().is_empty() {
        return Err(MappingError::InvalidTarget(
            "target must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A single operation addressed to one key's actor
pub(crate) enum Command {
    /// Return the in-memory target; no storage round-trip
    Get {
        reply: oneshot::Sender<MappingResult<Option<String>>>,
    },
    /// Replace the target and persist before acknowledging
    Set {
        target: String,
        reply: oneshot::Sender<MappingResult<()>>,
    },
}

impl Command {
    /// Answer the command with the persistence failure that prevented
    /// the actor from activating
    pub(crate) fn fail(self, err: StoreError) {
        match self {
            Command::Get { reply } => {
                let _ = reply.send(Err(MappingError::Persistence(err)));
            }
            Command::Set { reply, .. } => {
                let _ = reply.send(Err(MappingError::Persistence(err)));
            }
        }
    }
}

/// Per-key state machine bridging in-memory state to durable storage
///
/// The actor exclusively owns its `MappingState` for the duration of one
/// activation; the store owns the authoritative copy across activations.
pub struct MappingActor<S> {
    key: ShortKey,
    state: MappingState,
    store: Arc<S>,
}

impl<S: StateStore> MappingActor<S> {
    /// Activate the actor for a key
    ///
    /// Loads the persisted state, or starts from the empty state if the
    /// key has never been written. A load error fails the activation.
    pub async fn activate(key: ShortKey, store: Arc<S>) -> StoreResult<Self> {
        let state = store
            .load(&key)
            .await?
            .unwrap_or_else(|| MappingState::empty(key.clone()));
        tracing::debug!(key = %key, populated = state.target.is_some(), "activated mapping actor");
        Ok(Self { key, state, store })
    }

    /// The key this actor owns
    pub fn key(&self) -> &ShortKey {
        &self.key
    }

    /// The current in-memory target, or `None` if never set
    pub fn target(&self) -> Option<&str> {
        self.state.target.as_deref()
    }

    /// Replace the target and persist before returning
    ///
    /// On save failure the in-memory value stays updated: the operation
    /// reports the failure so the caller knows durability was not
    /// achieved, and storage catches up on the next successful save or
    /// reload. There is no automatic retry and no rollback.
    pub async fn set_target(&mut self, target: impl Into<String>) -> MappingResult<()> {
        let target = target.into();
        validate_target(&target)?;

        self.state.target = Some(target);
        tracing::info!(key = %self.key, url = %self.state.target.as_deref().unwrap_or_default(), "saving mapping");
        self.store
            .save(&self.key, &self.state)
            .await
            .map_err(MappingError::from)
    }

    /// Execute one queued command against the actor's state
    pub(crate) async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Get { reply } => {
                tracing::debug!(key = %self.key, "retrieving mapping");
                let _ = reply.send(Ok(self.target().map(str::to_owned)));
            }
            Command::Set { target, reply } => {
                let _ = reply.send(self.set_target(target).await);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FailingStore, MemoryStore};

    fn key(raw: &str) -> ShortKey {
        ShortKey::new(raw).unwrap()
    }

    #[tokio::test]
    async fn activates_empty_for_unseen_key() {
        let store = Arc::new(MemoryStore::new());
        let actor = MappingActor::activate(key("A1B2"), store).await.unwrap();
        assert_eq!(actor.target(), None);
    }

    #[tokio::test]
    async fn activates_with_persisted_state() {
        let store = Arc::new(MemoryStore::new());
        let k = key("A1B2");
        store
            .save(&k, &MappingState::with_target(k.clone(), "https://example.com"))
            .await
            .unwrap();

        let actor = MappingActor::activate(k, store).await.unwrap();
        assert_eq!(actor.target(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn activation_fails_when_load_fails() {
        let store = Arc::new(FailingStore::new(MemoryStore::new()));
        store.fail_loads(true);

        let result = MappingActor::activate(key("A1B2"), store).await;
        assert!(matches!(result, Err(StoreError::Injected { .. })));
    }

    #[tokio::test]
    async fn set_persists_before_acknowledging() {
        let store = Arc::new(MemoryStore::new());
        let k = key("A1B2");
        let mut actor = MappingActor::activate(k.clone(), Arc::clone(&store))
            .await
            .unwrap();

        actor.set_target("https://example.com/page").await.unwrap();

        let durable = store.persisted(&k).unwrap();
        assert_eq!(durable.target.as_deref(), Some("https://example.com/page"));
    }

    #[tokio::test]
    async fn rejects_empty_target_before_mutation() {
        let store = Arc::new(MemoryStore::new());
        let k = key("A1B2");
        let mut actor = MappingActor::activate(k.clone(), Arc::clone(&store))
            .await
            .unwrap();

        let err = actor.set_target("   ").await.unwrap_err();
        assert!(matches!(err, MappingError::InvalidTarget(_)));
        // Neither memory nor storage was touched.
        assert_eq!(actor.target(), None);
        assert!(store.persisted(&k).is_none());
    }

    #[tokio::test]
    async fn failed_save_leaves_memory_ahead_of_storage() {
        let store = Arc::new(FailingStore::new(MemoryStore::new()));
        let k = key("A1B2");
        let mut actor = MappingActor::activate(k.clone(), Arc::clone(&store))
            .await
            .unwrap();

        actor.set_target("https://one.example").await.unwrap();

        store.fail_saves(true);
        let err = actor.set_target("https://two.example").await.unwrap_err();
        assert!(matches!(err, MappingError::Persistence(_)));

        // Memory holds the attempted value; storage holds the last durable one.
        assert_eq!(actor.target(), Some("https://two.example"));
        let durable = store.inner().persisted(&k).unwrap();
        assert_eq!(durable.target.as_deref(), Some("https://one.example"));
    }
}
