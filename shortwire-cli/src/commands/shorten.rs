//! Issue a short key for a URL.

use anyhow::{Context, Result};
use shortwire_core::{FileStore, MappingDirectory, Shortener};
use std::path::Path;

/// Issue a short key for the given URL and print it.
pub async fn shorten_url(data_dir: &Path, url: &str, json: bool) -> Result<()> {
    let shortener = Shortener::new(MappingDirectory::new(FileStore::new(data_dir)));
    let key = shortener
        .shorten(url)
        .await
        .with_context(|| format!("Failed to shorten '{}'", url))?;

    if json {
        let payload = serde_json::json!({ "key": key.as_str(), "target": url });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{key}");
    }
    Ok(())
}
