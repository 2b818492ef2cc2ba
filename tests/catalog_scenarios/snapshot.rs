//! A catalog written to a snapshot comes back intact.

use std::sync::Arc;

use stacks::{Executor, MemoryStore};

use crate::test_utils::run;

#[tokio::test]
async fn test_catalog_survives_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let store = Arc::new(MemoryStore::new());
    let e = Executor::with_store(store.clone());
    run(&e, "add book", &["Dune", "Herbert", "111", "412"]).await;
    run(&e, "add book", &["Mort", "Pratchett", "333", "288"]).await;
    run(&e, "add borrower", &["Sam", "sam1", "555-0100"]).await;
    run(&e, "checkout book", &["333", "sam1"]).await;
    let written = store.save_snapshot(&path).unwrap();
    assert_eq!(written, store.key_count());

    let restored = Arc::new(MemoryStore::load_snapshot(&path).unwrap());
    assert_eq!(restored.keys(), store.keys());

    let e = Executor::with_store(restored);
    assert_eq!(
        run(&e, "list books", &["isbn"]).await,
        "Dune, 111, Herbert, 412\nMort, 333, Pratchett, 288"
    );
    assert_eq!(
        run(&e, "borrowed by", &["sam1"]).await,
        "Books checked out by sam1: Mort"
    );
    assert_eq!(run(&e, "check indexes", &[]).await, "All indexes are consistent.");
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(MemoryStore::load_snapshot(&path).is_err());
}
