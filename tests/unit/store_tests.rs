//! Unit tests for the user stores' uniqueness guarantees
use std::collections::HashSet;
use std::sync::Arc;

use credential_backend::storage::{
    EmailCase, FlatFileUserStore, MemoryUserStore, StoreError, UserStore,
};
use futures_util::future::join_all;
use tempfile::TempDir;

/// Race `writers` concurrent creates of one email; return (successes, duplicates)
async fn race_creates<S: UserStore + 'static>(store: Arc<S>, writers: usize) -> (usize, usize) {
    let tasks = (0..writers).map(|i| {
        let store = store.clone();
        tokio::spawn(async move { store.create("race@x.com", &format!("hash-{i}")).await })
    });

    let mut created = 0;
    let mut duplicates = 0;
    for outcome in join_all(tasks).await {
        match outcome.unwrap() {
            Ok(_) => created += 1,
            Err(StoreError::DuplicateEmail) => duplicates += 1,
            Err(e) => panic!("unexpected store error: {e}"),
        }
    }
    (created, duplicates)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_store_concurrent_creates() {
    let store = Arc::new(MemoryUserStore::default());
    let (created, duplicates) = race_creates(store.clone(), 32).await;

    assert_eq!(created, 1);
    assert_eq!(duplicates, 31);
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_flat_file_store_concurrent_creates() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlatFileUserStore::new(dir.path(), EmailCase::Sensitive).unwrap());
    let (created, duplicates) = race_creates(store.clone(), 32).await;

    assert_eq!(created, 1);
    assert_eq!(duplicates, 31);
    assert_eq!(std::fs::read_dir(dir.path().join("users")).unwrap().count(), 1);
    assert_eq!(std::fs::read_dir(dir.path().join("staging")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_ids_are_unique_across_records() {
    let store = MemoryUserStore::default();
    let mut ids = HashSet::new();
    for i in 0..50 {
        let record = store.create(&format!("user{i}@x.com"), "hash").await.unwrap();
        assert!(ids.insert(record.id));
    }
}

#[tokio::test]
async fn test_lookup_has_no_side_effects() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileUserStore::new(dir.path(), EmailCase::Sensitive).unwrap();

    assert!(store.find_by_email("ghost@x.com").await.unwrap().is_none());
    assert_eq!(std::fs::read_dir(dir.path().join("users")).unwrap().count(), 0);
}
