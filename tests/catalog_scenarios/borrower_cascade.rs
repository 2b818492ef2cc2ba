//! Removing a borrower returns every book they hold.

use stacks_core::keys::BORROWING;
use stacks_storage::{FaultRule, StoreOp};

use crate::test_utils::{faulty_executor, raw, run};

const HELD: [&str; 3] = ["111", "222", "333"];

async fn borrower_holding_three(e: &stacks::Executor) {
    run(e, "add book", &["Dune", "Herbert", "111", "412"]).await;
    run(e, "add book", &["Good Omens", "Pratchett", "Gaiman", "222", "288"]).await;
    run(e, "add book", &["Mort", "Pratchett", "333", "288"]).await;
    run(e, "add borrower", &["Sam", "sam1", "555-0100"]).await;
    for isbn in HELD {
        run(e, "checkout book", &[isbn, "sam1"]).await;
    }
}

#[tokio::test]
async fn test_all_returns_clear_both_maps() {
    let (_store, e) = faulty_executor();
    borrower_holding_three(&e).await;

    assert_eq!(
        run(&e, "rm borrower", &["sam1"]).await,
        "Borrower removed successfully!"
    );
    assert!(raw(&e).field_names(BORROWING).await.is_empty());
    assert!(!raw(&e).object_exists("borrowed-by-sam1").await);
    assert!(!raw(&e).object_exists("borrower-sam1").await);
    assert_eq!(run(&e, "check indexes", &[]).await, "All indexes are consistent.");
}

#[tokio::test]
async fn test_failed_return_leaves_it_for_retry() {
    let (store, e) = faulty_executor();
    borrower_holding_three(&e).await;
    store.inject(
        FaultRule::new(StoreOp::HDel, BORROWING)
            .member("222")
            .times(1),
    );

    let out = run(&e, "rm borrower", &["sam1"]).await;
    assert!(
        out.starts_with("The store could not complete the request"),
        "{}",
        out
    );
    assert!(out.contains("checkout of book with ISBN 222"), "{}", out);

    // Only the unreturned book is left on either side
    assert_eq!(raw(&e).field_names(BORROWING).await, vec!["222"]);
    assert_eq!(
        raw(&e).field_names("borrowed-by-sam1").await,
        vec!["222"]
    );
    assert_eq!(
        run(&e, "borrowed by", &["sam1"]).await,
        "Books checked out by sam1: Good Omens"
    );

    // The record is gone but the leftover mirror keeps the command retryable
    assert_eq!(
        run(&e, "rm borrower", &["sam1"]).await,
        "Borrower removed successfully!"
    );
    assert!(raw(&e).field_names(BORROWING).await.is_empty());
    assert!(!raw(&e).object_exists("borrowed-by-sam1").await);
    assert_eq!(
        run(&e, "rm borrower", &["sam1"]).await,
        "Borrower with username sam1 does not exist."
    );
}

#[tokio::test]
async fn test_store_outage_reports_instead_of_panicking() {
    let (store, e) = faulty_executor();
    borrower_holding_three(&e).await;
    store.set_offline(true);

    // Existence checks assume the worst while the store is down
    assert_eq!(
        run(&e, "add book", &["Emma", "Austen", "444", "474"]).await,
        "Adding book failed! Make sure a book with this isbn doesn't already exist."
    );

    store.set_offline(false);
    assert_eq!(
        run(&e, "borrower of", &["111"]).await,
        "sam1 is the borrower of the book with ISBN 111."
    );
    assert!(store.injected_failures() > 0);
}
