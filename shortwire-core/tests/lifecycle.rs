//! End-to-end tests for the mapping actor lifecycle

use shortwire_core::{
    FailingStore, FileStore, MappingDirectory, MappingError, MemoryStore, ShortKey, Shortener,
};
use tempfile::TempDir;

fn key(raw: &str) -> ShortKey {
    ShortKey::new(raw).unwrap()
}

#[tokio::test]
async fn full_lifecycle_of_one_key() {
    // Create the actor for key "A1B2": it has never been written.
    let directory = MappingDirectory::new(MemoryStore::new());
    let k = key("A1B2");
    assert_eq!(directory.get(&k).await.unwrap(), None);

    // Write, then read back within the same activation.
    directory.set(&k, "https://example.com/page").await.unwrap();
    assert_eq!(
        directory.get(&k).await.unwrap().as_deref(),
        Some("https://example.com/page")
    );

    // Deactivate and reactivate: the store reproduces the mapping.
    directory.deactivate(&k);
    assert_eq!(
        directory.get(&k).await.unwrap().as_deref(),
        Some("https://example.com/page")
    );
}

#[tokio::test]
async fn acknowledged_writes_survive_a_process_restart() {
    let dir = TempDir::new().unwrap();
    let k = key("A1B2");

    {
        let directory = MappingDirectory::new(FileStore::new(dir.path()));
        directory.set(&k, "https://example.com/page").await.unwrap();
    }

    // A brand-new directory over the same data directory, as after a
    // restart: activation reloads the durable state.
    let directory = MappingDirectory::new(FileStore::new(dir.path()));
    assert_eq!(
        directory.get(&k).await.unwrap().as_deref(),
        Some("https://example.com/page")
    );
}

#[tokio::test]
async fn unacknowledged_writes_do_not_survive_eviction() {
    let directory = MappingDirectory::new(FailingStore::new(MemoryStore::new()));
    let k = key("A1B2");

    directory.set(&k, "https://durable.example").await.unwrap();

    directory.store().fail_saves(true);
    let err = directory.set(&k, "https://lost.example").await.unwrap_err();
    assert!(matches!(err, MappingError::Persistence(_)));

    // The attempted value is visible while the activation lives...
    assert_eq!(
        directory.get(&k).await.unwrap().as_deref(),
        Some("https://lost.example")
    );

    // ...but a fresh activation sees only what was durable.
    directory.deactivate(&k);
    assert_eq!(
        directory.get(&k).await.unwrap().as_deref(),
        Some("https://durable.example")
    );
}

#[tokio::test]
async fn shortener_issues_resolvable_keys_over_a_file_store() {
    let dir = TempDir::new().unwrap();
    let shortener = Shortener::new(MappingDirectory::new(FileStore::new(dir.path())));

    let k = shortener.shorten("https://example.com/page").await.unwrap();
    assert_eq!(
        shortener.resolve(&k).await.unwrap().as_deref(),
        Some("https://example.com/page")
    );

    // The issued mapping is already durable: a fresh stack over the same
    // directory resolves it too.
    let reopened = Shortener::new(MappingDirectory::new(FileStore::new(dir.path())));
    assert_eq!(
        reopened.resolve(&k).await.unwrap().as_deref(),
        Some("https://example.com/page")
    );
}

#[tokio::test]
async fn many_keys_resolve_independently() {
    let directory = std::sync::Arc::new(MappingDirectory::new(MemoryStore::new()));

    let mut handles = Vec::new();
    for i in 0..32 {
        let d = std::sync::Arc::clone(&directory);
        handles.push(tokio::spawn(async move {
            let k = ShortKey::new(format!("KEY{i:02}")).unwrap();
            d.set(&k, format!("https://example.com/{i}")).await.unwrap();
            (k, i)
        }));
    }

    for handle in handles {
        let (k, i) = handle.await.unwrap();
        assert_eq!(
            directory.get(&k).await.unwrap().as_deref(),
            Some(format!("https://example.com/{i}").as_str())
        );
    }
    assert_eq!(directory.stats().active_actors, 32);
}
