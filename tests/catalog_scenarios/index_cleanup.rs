//! Index values disappear with their last reference.

use stacks::Executor;
use stacks_core::keys::{AUTHORS, BOOK_NAMES, ISBNS, PAGE_COUNTS};

use crate::test_utils::{raw, run};

#[tokio::test]
async fn test_removing_only_book_clears_its_values() {
    let e = Executor::in_memory();
    run(&e, "add book", &["Solaris", "X", "555", "204"]).await;
    assert_eq!(raw(&e).sorted_index_values(AUTHORS).await, vec!["X"]);

    assert_eq!(run(&e, "rm book", &["555"]).await, "Book removed successfully!");
    assert!(raw(&e).sorted_index_values(AUTHORS).await.is_empty());
    assert!(raw(&e).sorted_index_values(BOOK_NAMES).await.is_empty());
    assert!(raw(&e).sorted_index_values(PAGE_COUNTS).await.is_empty());
    assert!(raw(&e).sorted_index_values(ISBNS).await.is_empty());
    assert!(!raw(&e).object_exists("authors-555").await);
    assert_eq!(run(&e, "list books", &["author"]).await, "No books found.");
}

#[tokio::test]
async fn test_shared_value_survives_partial_removal() {
    let e = Executor::in_memory();
    run(&e, "add book", &["Mort", "Pratchett", "333", "288"]).await;
    run(&e, "add book", &["Good Omens", "Pratchett", "Gaiman", "222", "288"]).await;

    run(&e, "rm book", &["222"]).await;
    assert_eq!(raw(&e).sorted_index_values(AUTHORS).await, vec!["Pratchett"]);
    assert_eq!(raw(&e).sorted_index_values(PAGE_COUNTS).await, vec!["288"]);
    assert_eq!(
        run(&e, "search books", &["author", "Pratchett"]).await,
        "Mort, 333, Pratchett, 288"
    );
}

#[tokio::test]
async fn test_edit_retires_abandoned_values() {
    let e = Executor::in_memory();
    run(&e, "add book", &["Emma", "Austen", "444", "474"]).await;
    run(&e, "edit book", &["444", "Persuasion", "Jane Austen", "249"]).await;

    assert_eq!(raw(&e).sorted_index_values(BOOK_NAMES).await, vec!["Persuasion"]);
    assert_eq!(raw(&e).sorted_index_values(AUTHORS).await, vec!["Jane Austen"]);
    assert_eq!(raw(&e).sorted_index_values(PAGE_COUNTS).await, vec!["249"]);
    assert_eq!(raw(&e).read_sequence("authors-444").await, vec!["Jane Austen"]);
}

#[tokio::test]
async fn test_borrower_name_index_follows_edits() {
    let e = Executor::in_memory();
    run(&e, "add borrower", &["Sam", "sam1", "555-0100"]).await;
    run(&e, "add borrower", &["Sam", "sam2", "555-0101"]).await;

    run(&e, "edit borrower", &["sam1", "Samantha", "555-0199"]).await;
    assert_eq!(
        run(&e, "search borrowers", &["name", "Sam"]).await,
        "Sam, sam2, 555-0101"
    );
    run(&e, "rm borrower", &["sam2"]).await;
    assert_eq!(
        raw(&e).sorted_index_values(stacks_core::keys::BORROWER_NAMES).await,
        vec!["Samantha"]
    );
}
