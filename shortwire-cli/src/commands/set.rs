//! Write a mapping for a chosen key.

use anyhow::{Context, Result};
use shortwire_core::{FileStore, MappingDirectory, ShortKey};
use std::path::Path;

/// Durably write a mapping from a chosen key to a URL.
pub async fn set_mapping(data_dir: &Path, raw_key: &str, url: &str) -> Result<()> {
    let key: ShortKey = raw_key
        .parse()
        .with_context(|| format!("Invalid short key '{}'", raw_key))?;
    let directory = MappingDirectory::new(FileStore::new(data_dir));

    directory
        .set(&key, url)
        .await
        .with_context(|| format!("Failed to write mapping for '{}'", key))?;

    println!("{key} -> {url}");
    Ok(())
}
