//! Resolve a short key to its target URL.

use anyhow::{bail, Context, Result};
use shortwire_core::{FileStore, MappingDirectory, ShortKey};
use std::path::Path;

/// Resolve a short key and print its target.
///
/// An unknown key is a not-found condition: the command fails with a
/// message rather than printing nothing.
pub async fn resolve_key(data_dir: &Path, raw_key: &str) -> Result<()> {
    let key: ShortKey = raw_key
        .parse()
        .with_context(|| format!("Invalid short key '{}'", raw_key))?;
    let directory = MappingDirectory::new(FileStore::new(data_dir));

    match directory.get(&key).await? {
        Some(target) => {
            println!("{target}");
            Ok(())
        }
        None => bail!("No mapping for key '{key}'"),
    }
}
