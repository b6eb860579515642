//! Durable state store backends
//!
//! This module defines the `StateStore` trait for pluggable persistence
//! and provides three implementations:
//! - `MemoryStore`: process-local map (default for tests and embedding)
//! - `FileStore`: one JSON document per key, durable across restarts
//! - `FailingStore`: fault-injecting wrapper for exercising failure paths
//!
//! The store holds the authoritative copy of each `MappingState` across
//! activations. It is shared across all keys, but each mapping actor only
//! ever touches its own key, so there is no cross-key contention at this
//! layer.

mod failing;
mod file;
mod memory;

pub use failing::FailingStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::types::{MappingState, ShortKey};
use std::future::Future;

/// Trait for durable state store backends
///
/// Semantics are last-write-wins per key. A key that has never been
/// saved loads as `Ok(None)`; absence is a normal outcome, never an
/// error. Implementations must not retry internally; retry policy
/// belongs to the caller.
pub trait StateStore: Send + Sync + 'static {
    /// Load the persisted state for a key, or `None` if the key is unseen
    fn load(
        &self,
        key: &ShortKey,
    ) -> impl Future<Output = StoreResult<Option<MappingState>>> + Send;

    /// Persist the state for a key, replacing any previous value
    fn save(
        &self,
        key: &ShortKey,
        state: &MappingState,
    ) -> impl Future<Output = StoreResult<()>> + Send;
}
