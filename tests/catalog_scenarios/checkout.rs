//! A book has at most one borrower at a time.

use stacks::Executor;
use stacks_core::keys::BORROWING;
use stacks_storage::{FaultRule, StoreOp};

use crate::test_utils::{faulty_executor, raw, run};

async fn two_borrowers_one_book(e: &Executor) {
    run(e, "add book", &["Dune", "Herbert", "111", "412"]).await;
    run(e, "add borrower", &["Sam", "sam1", "555-0100"]).await;
    run(e, "add borrower", &["Ana", "ana2", "555-0102"]).await;
}

#[tokio::test]
async fn test_second_checkout_is_refused() {
    let e = Executor::in_memory();
    two_borrowers_one_book(&e).await;

    run(&e, "checkout book", &["111", "sam1"]).await;
    assert_eq!(
        run(&e, "checkout book", &["111", "ana2"]).await,
        "There was a problem checking out the book. Make sure the book isn't already checked out."
    );
    assert_eq!(
        run(&e, "borrower of", &["111"]).await,
        "sam1 is the borrower of the book with ISBN 111."
    );
    assert_eq!(
        run(&e, "borrowed by", &["ana2"]).await,
        "No books found for the borrower with username ana2."
    );
}

#[tokio::test]
async fn test_checkout_requires_both_records() {
    let e = Executor::in_memory();
    two_borrowers_one_book(&e).await;

    assert_eq!(
        run(&e, "checkout book", &["999", "sam1"]).await,
        "Book with ISBN 999 does not exist."
    );
    assert_eq!(
        run(&e, "checkout book", &["111", "nobody"]).await,
        "Borrower with username nobody does not exist."
    );
    assert!(raw(&e).field_names(BORROWING).await.is_empty());
}

#[tokio::test]
async fn test_returned_book_can_go_out_again() {
    let e = Executor::in_memory();
    two_borrowers_one_book(&e).await;

    run(&e, "checkout book", &["111", "sam1"]).await;
    run(&e, "rm borrower", &["sam1"]).await;
    assert_eq!(
        run(&e, "checkout book", &["111", "ana2"]).await,
        "Book with ISBN 111 has been checked out to ana2"
    );
}

#[tokio::test]
async fn test_removing_book_ends_its_checkout() {
    let e = Executor::in_memory();
    two_borrowers_one_book(&e).await;
    run(&e, "checkout book", &["111", "sam1"]).await;

    run(&e, "rm book", &["111"]).await;
    assert_eq!(
        run(&e, "borrowed by", &["sam1"]).await,
        "No books found for the borrower with username sam1."
    );
    assert_eq!(run(&e, "check indexes", &[]).await, "All indexes are consistent.");
}

#[tokio::test]
async fn test_failed_mirror_write_undoes_checkout() {
    let (store, e) = faulty_executor();
    two_borrowers_one_book(&e).await;
    store.inject(FaultRule::new(StoreOp::HSet, "borrowed-by-sam1"));

    let out = run(&e, "checkout book", &["111", "sam1"]).await;
    assert!(out.ends_with("the checkout was undone"), "{}", out);
    assert!(raw(&e).field_names(BORROWING).await.is_empty());

    store.clear();
    assert_eq!(
        run(&e, "checkout book", &["111", "ana2"]).await,
        "Book with ISBN 111 has been checked out to ana2"
    );
}
