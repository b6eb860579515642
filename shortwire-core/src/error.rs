//! Error types for the shortwire runtime

use crate::types::{ShortKey, MAX_KEY_LEN};
use thiserror::Error;

/// Errors from short key validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key is empty
    #[error("short key is empty")]
    Empty,

    /// The key exceeds the maximum length
    #[error("short key is {0} bytes, maximum is {MAX_KEY_LEN}")]
    TooLong(usize),

    /// The key contains a character outside `[A-Za-z0-9_-]`
    #[error("short key contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Errors from the durable state store
///
/// These are `Clone` on purpose: a failed activation load must be
/// reported to every operation queued behind it, so the store surfaces
/// failures as messages rather than wrapped source errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An I/O failure while loading or saving
    #[error("store i/o failure for key {key}: {message}")]
    Io { key: ShortKey, message: String },

    /// The persisted state exists but could not be decoded
    #[error("corrupt state for key {key}: {message}")]
    Corrupt { key: ShortKey, message: String },

    /// A fault injected by a test store
    #[error("injected store fault for key {key}")]
    Injected { key: ShortKey },
}

impl StoreError {
    /// An I/O failure for the given key
    pub fn io(key: &ShortKey, err: impl std::fmt::Display) -> Self {
        Self::Io {
            key: key.clone(),
            message: err.to_string(),
        }
    }

    /// A decode failure for the given key
    pub fn corrupt(key: &ShortKey, err: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            key: key.clone(),
            message: err.to_string(),
        }
    }
}

/// Errors from mapping operations
///
/// A `get` that finds nothing is *not* an error: it returns `None`, and
/// callers branch on it as their not-found condition.
#[derive(Debug, Clone, Error)]
pub enum MappingError {
    /// The target was rejected before any state mutation
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The durable store failed; the operation did not achieve durability
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// The actor for this key went away while the operation was in flight
    #[error("mapping actor for key {0} is gone")]
    ActorGone(ShortKey),
}

/// Errors from the key-issuing front door
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    /// The underlying mapping operation failed
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Every generated key collided with an existing mapping
    #[error("no free short key after {attempts} attempts")]
    KeysExhausted { attempts: usize },
}

/// Result type using MappingError
pub type MappingResult<T> = std::result::Result<T, MappingError>;

/// Result type using StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;
