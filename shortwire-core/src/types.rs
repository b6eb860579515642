//! Core type definitions for the shortwire runtime
//!
//! These are the identity and state types shared by the store, the
//! mapping actor, and the front door.

use crate::error::KeyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of characters in a generated short key.
pub const GENERATED_KEY_LEN: usize = 8;

/// Upper bound on accepted key length.
///
/// Keys double as store file names, so they stay short and flat.
pub const MAX_KEY_LEN: usize = 64;

/// The short identifier a URL is shortened to
///
/// A `ShortKey` is both the public route segment and the actor-addressing
/// identity: all operations for one key are owned by one actor instance.
/// Keys are restricted to `[A-Za-z0-9_-]` so they can be embedded in URLs
/// and used verbatim as file names by the file-backed store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortKey(String);

impl ShortKey {
    /// Create a key from the given string, validating the key charset
    pub fn new(key: impl Into<String>) -> Result<Self, KeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(KeyError::Empty);
        }
        if key.len() > MAX_KEY_LEN {
            return Err(KeyError::TooLong(key.len()));
        }
        if let Some(ch) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(KeyError::InvalidChar(ch));
        }
        Ok(Self(key))
    }

    /// Generate a new random key
    ///
    /// Keys are 8 uppercase hex characters drawn from a v4 UUID, matching
    /// the route segments the resolution front door hands out.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..GENERATED_KEY_LEN].to_ascii_uppercase())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShortKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ShortKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortKey> for String {
    fn from(key: ShortKey) -> Self {
        key.0
    }
}

/// The persisted state of one mapping
///
/// Exactly one `MappingState` exists per distinct key across the system.
/// `target` is `None` until the first successful write; callers treat that
/// as "key unknown", not as an error. The `key` field repeats the actor's
/// own addressing key so the persisted document stays self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingState {
    /// The key this state belongs to
    pub key: ShortKey,
    /// The full URL the key resolves to, if ever set
    pub target: Option<String>,
}

impl MappingState {
    /// The empty/default state for a key that has never been written
    pub fn empty(key: ShortKey) -> Self {
        Self { key, target: None }
    }

    /// The state holding the given target
    pub fn with_target(key: ShortKey, target: impl Into<String>) -> Self {
        Self {
            key,
            target: Some(target.into()),
        }
    }
}
