//! The key-issuing and resolution front door
//!
//! Wraps a `MappingDirectory` with the two flows the outer service
//! drives: issuing a fresh short key for a submitted URL, and resolving
//! a short key back to its target. Key-collision policy lives here, not
//! in the core: a colliding candidate key is discarded and a new one is
//! drawn, up to a bounded number of attempts.

use crate::actor::validate_target;
use crate::directory::MappingDirectory;
use crate::error::{MappingResult, ShortenError};
use crate::store::StateStore;
use crate::types::ShortKey;

/// Default number of candidate keys drawn before giving up
pub const DEFAULT_KEY_ATTEMPTS: usize = 4;

/// Front-door service issuing and resolving short keys
pub struct Shortener<S> {
    directory: MappingDirectory<S>,
    max_attempts: usize,
}

impl<S: StateStore> Shortener<S> {
    /// Create a front door over the given directory
    pub fn new(directory: MappingDirectory<S>) -> Self {
        Self::with_max_attempts(directory, DEFAULT_KEY_ATTEMPTS)
    }

    /// Create a front door with a custom collision-retry bound
    pub fn with_max_attempts(directory: MappingDirectory<S>, max_attempts: usize) -> Self {
        Self {
            directory,
            max_attempts,
        }
    }

    /// The directory this front door drives
    pub fn directory(&self) -> &MappingDirectory<S> {
        &self.directory
    }

    /// Issue a short key for the given target URL
    ///
    /// Draws a random key, retries on collision, and durably writes the
    /// mapping before returning the key.
    pub async fn shorten(&self, target: &str) -> Result<ShortKey, ShortenError> {
        validate_target(target)?;

        for attempt in 1..=self.max_attempts {
            let key = ShortKey::generate();
            if self.directory.get(&key).await?.is_some() {
                tracing::debug!(key = %key, attempt, "short key collision, drawing again");
                continue;
            }
            self.directory.set(&key, target).await?;
            tracing::info!(key = %key, url = %target, "issued short key");
            return Ok(key);
        }

        Err(ShortenError::KeysExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolve a short key to its target URL
    ///
    /// `None` is the not-found condition: the key was never issued (or
    /// its mapping was never written). It is indistinguishable from a
    /// key whose actor simply has not been activated yet, since both load the
    /// same empty durable state.
    pub async fn resolve(&self, key: &ShortKey) -> MappingResult<Option<String>> {
        self.directory.get(key).await
    }
}
