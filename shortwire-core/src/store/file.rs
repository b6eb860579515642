//! File-backed state store
//!
//! Stores each mapping as `{base_dir}/{key}.json`. The key charset is
//! restricted to `[A-Za-z0-9_-]` (see `ShortKey`), so keys are safe to
//! use verbatim as file names.

use super::StateStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{MappingState, ShortKey};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Durable state store writing one JSON document per key
///
/// Saves go through a temp file followed by a rename, so a crash mid-save
/// never truncates the last durable state.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory this store writes under
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn state_path(&self, key: &ShortKey) -> PathBuf {
        self.base_dir.join(format!("{}.json", key.as_str()))
    }

    fn temp_path(&self, key: &ShortKey) -> PathBuf {
        self.base_dir.join(format!("{}.json.tmp", key.as_str()))
    }
}

impl StateStore for FileStore {
    async fn load(&self, key: &ShortKey) -> StoreResult<Option<MappingState>> {
        let path = self.state_path(key);
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|err| StoreError::corrupt(key, err)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(key, err)),
        }
    }

    async fn save(&self, key: &ShortKey, state: &MappingState) -> StoreResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|err| StoreError::io(key, err))?;

        let bytes = serde_json::to_vec(state).map_err(|err| StoreError::io(key, err))?;

        // Only one actor writes a given key at a time, so the temp name
        // cannot race with another writer of the same key.
        let temp = self.temp_path(key);
        fs::write(&temp, &bytes)
            .await
            .map_err(|err| StoreError::io(key, err))?;
        fs::rename(&temp, self.state_path(key))
            .await
            .map_err(|err| StoreError::io(key, err))?;

        tracing::debug!(key = %key, bytes = bytes.len(), "saved mapping state");
        Ok(())
    }
}
