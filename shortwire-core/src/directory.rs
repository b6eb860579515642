//! Key directory: resolves each key to its single owning actor
//!
//! The directory is the key-to-single-owner resolver: one tokio task per
//! active key, fed by a bounded, ordered mailbox. Operations targeting
//! the same key queue behind each other and never interleave; distinct
//! keys run in parallel. Evicting a key drops its mailbox sender: any
//! queued operations drain first, then the task exits, and the next
//! reference re-activates the actor from the durable store.

use crate::actor::{Command, MappingActor};
use crate::error::{MappingError, MappingResult};
use crate::store::StateStore;
use crate::types::ShortKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Configuration for the directory
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Bound on each per-key mailbox; senders beyond it wait their turn
    pub mailbox_capacity: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
        }
    }
}

/// A registered activation: the mailbox sender plus the generation that
/// created it, so a draining task never evicts its successor's entry.
struct Entry {
    generation: u64,
    tx: mpsc::Sender<Command>,
}

#[derive(Default)]
struct Registry {
    entries: Mutex<HashMap<ShortKey, Entry>>,
    generations: AtomicU64,
}

impl Registry {
    fn deregister(&self, key: &ShortKey, generation: u64) {
        let mut entries = self.entries.lock();
        if entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            entries.remove(key);
        }
    }
}

/// Statistics about the directory
#[derive(Debug, Clone)]
pub struct DirectoryStats {
    /// Number of keys with a live actor instance
    pub active_actors: usize,
}

/// The per-key actor coordinator
///
/// Manages activation on first reference, routes operations to each
/// key's owning actor, and evicts actors on request.
///
/// # Example
///
/// ```
/// use shortwire_core::{MappingDirectory, MappingError, MemoryStore, ShortKey};
///
/// # async fn demo() -> Result<(), MappingError> {
/// let directory = MappingDirectory::new(MemoryStore::new());
/// let key = ShortKey::new("A1B2").unwrap();
///
/// assert_eq!(directory.get(&key).await?, None);
/// directory.set(&key, "https://example.com/page").await?;
/// assert_eq!(
///     directory.get(&key).await?.as_deref(),
///     Some("https://example.com/page"),
/// );
/// # Ok(())
/// # }
/// ```
pub struct MappingDirectory<S> {
    store: Arc<S>,
    config: DirectoryConfig,
    registry: Arc<Registry>,
}

impl<S: StateStore> MappingDirectory<S> {
    /// Create a directory with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, DirectoryConfig::default())
    }

    /// Create a directory with the given configuration
    pub fn with_config(store: S, config: DirectoryConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            registry: Arc::new(Registry::default()),
        }
    }

    /// The durable store backing this directory
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the mapping for a key, activating its actor if needed
    ///
    /// `None` means the key has never been written; callers treat this
    /// as "key unknown", not as an error. The result always reflects the
    /// most recent durable write observed by the current activation.
    pub async fn get(&self, key: &ShortKey) -> MappingResult<Option<String>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(key, Command::Get { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| MappingError::ActorGone(key.clone()))?
    }

    /// Replace the mapping for a key, durably, activating its actor if
    /// needed
    ///
    /// An `Ok` return guarantees the new mapping is persisted and will
    /// be visible to any subsequent `get` on this key, including after a
    /// later re-activation.
    pub async fn set(&self, key: &ShortKey, target: impl Into<String>) -> MappingResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(
            key,
            Command::Set {
                target: target.into(),
                reply: reply_tx,
            },
        )
        .await?;
        reply_rx
            .await
            .map_err(|_| MappingError::ActorGone(key.clone()))?
    }

    /// Evict the actor for a key
    ///
    /// Operations already queued still complete; the next reference
    /// re-activates from the durable store. Returns false if the key had
    /// no live actor.
    pub fn deactivate(&self, key: &ShortKey) -> bool {
        self.registry.entries.lock().remove(key).is_some()
    }

    /// Evict every active actor
    pub fn deactivate_all(&self) {
        self.registry.entries.lock().clear();
    }

    /// Get statistics about the directory
    pub fn stats(&self) -> DirectoryStats {
        let entries = self.registry.entries.lock();
        DirectoryStats {
            active_actors: entries
                .values()
                .filter(|entry| !entry.tx.is_closed())
                .count(),
        }
    }

    /// Queue a command on the key's owning actor
    ///
    /// Retries once if the actor was evicted between resolution and
    /// send; a second failure surfaces as `ActorGone` rather than
    /// looping.
    async fn dispatch(&self, key: &ShortKey, mut cmd: Command) -> MappingResult<()> {
        for _ in 0..2 {
            let tx = self.resolve(key);
            match tx.send(cmd).await {
                Ok(()) => return Ok(()),
                Err(mpsc::error::SendError(returned)) => cmd = returned,
            }
        }
        Err(MappingError::ActorGone(key.clone()))
    }

    /// Resolve the owning mailbox for a key, spawning the actor task on
    /// first reference
    fn resolve(&self, key: &ShortKey) -> mpsc::Sender<Command> {
        let mut entries = self.registry.entries.lock();
        if let Some(entry) = entries.get(key) {
            if !entry.tx.is_closed() {
                return entry.tx.clone();
            }
        }

        let (tx, rx) = mpsc::channel(self.config.mailbox_capacity);
        let generation = self.registry.generations.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            key.clone(),
            Entry {
                generation,
                tx: tx.clone(),
            },
        );

        tokio::spawn(run_actor(
            key.clone(),
            generation,
            Arc::clone(&self.store),
            rx,
            Arc::clone(&self.registry),
        ));
        tx
    }
}

/// The per-key task: activate, then serially execute queued operations
/// until evicted
async fn run_actor<S: StateStore>(
    key: ShortKey,
    generation: u64,
    store: Arc<S>,
    mut mailbox: mpsc::Receiver<Command>,
    registry: Arc<Registry>,
) {
    match MappingActor::activate(key.clone(), store).await {
        Ok(mut actor) => {
            while let Some(cmd) = mailbox.recv().await {
                actor.handle(cmd).await;
            }
            registry.deregister(&key, generation);
            tracing::debug!(key = %key, "mapping actor deactivated");
        }
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "mapping actor activation failed");
            // Unregister first so the next reference re-activates, then
            // fail everything already queued behind the load.
            registry.deregister(&key, generation);
            mailbox.close();
            while let Some(cmd) = mailbox.recv().await {
                cmd.fail(err.clone());
            }
        }
    }
}
