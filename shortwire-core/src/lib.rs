//! Shortwire core - keyed mapping actors with durable state
//!
//! This crate maps short keys to long URLs through a per-key actor
//! runtime: each key is owned, at any instant, by at most one actor
//! instance, which serializes all reads and writes to that key's state
//! and persists it durably before acknowledging a write.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Shortener<S>                        │
//! │  (front door - issues keys, resolves them back)          │
//! ├──────────────────────────────────────────────────────────┤
//! │                  MappingDirectory<S>                     │
//! │  (key-to-single-owner resolver)                          │
//! │                                                          │
//! │   key "A1B2" ──► mailbox ──► MappingActor (task)         │
//! │   key "C3D4" ──► mailbox ──► MappingActor (task)  ...    │
//! │                                  │                       │
//! │                        load / save (own key only)        │
//! │                                  ▼                       │
//! │                        ┌──────────────────┐              │
//! │                        │  StateStore (S)  │              │
//! │                        └──────────────────┘              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core concepts
//!
//! ## Single writer per key
//!
//! All operations targeting the same key are strictly serialized through
//! that key's mailbox; operations on distinct keys run in parallel. A
//! `set` followed by a `get` on the same key, issued by any callers,
//! always observes the write - there are no read-after-write races and
//! no explicit locks around state.
//!
//! ## Activation and durability
//!
//! An actor is created on first reference to its key and loads its state
//! from the `StateStore`. Writes persist synchronously before the
//! operation completes, so an acknowledged `set` survives eviction and
//! re-activation. Eviction may happen at any time between operations;
//! the next reference simply reloads.
//!
//! ## Absence is not an error
//!
//! Resolving a key that was never written returns `None`. Callers branch
//! on it as their not-found condition; only store failures surface as
//! errors.
//!
//! # Customization points
//!
//! The store seam is a trait:
//!
//! - `StateStore`: persistence backend (`MemoryStore` for tests and
//!   embedding, `FileStore` for one JSON document per key on disk,
//!   `FailingStore` for fault injection)

// Modules
pub mod actor;
pub mod directory;
pub mod error;
pub mod shortener;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use actor::MappingActor;
pub use directory::{DirectoryConfig, DirectoryStats, MappingDirectory};
pub use error::{KeyError, MappingError, MappingResult, ShortenError, StoreError, StoreResult};
pub use shortener::{Shortener, DEFAULT_KEY_ATTEMPTS};
pub use store::{FailingStore, FileStore, MemoryStore, StateStore};
pub use types::{MappingState, ShortKey, GENERATED_KEY_LEN, MAX_KEY_LEN};
