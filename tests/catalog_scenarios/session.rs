//! A full operator session from empty catalog to borrower removal.

use stacks::Executor;

use crate::test_utils::run;

#[tokio::test]
async fn test_checkout_then_borrower_removal() {
    let e = Executor::in_memory();

    assert_eq!(
        run(&e, "add book", &["Dune", "Herbert", "111", "412"]).await,
        "Book added successfully!"
    );
    assert_eq!(
        run(&e, "search books", &["isbn", "111"]).await,
        "Dune, 111, Herbert, 412"
    );
    assert_eq!(
        run(&e, "add borrower", &["Sam", "sam1", "555-0100"]).await,
        "Borrower added successfully!"
    );
    assert_eq!(
        run(&e, "checkout book", &["111", "sam1"]).await,
        "Book with ISBN 111 has been checked out to sam1"
    );
    assert_eq!(
        run(&e, "borrower of", &["111"]).await,
        "sam1 is the borrower of the book with ISBN 111."
    );
    assert_eq!(
        run(&e, "borrowed by", &["sam1"]).await,
        "Books checked out by sam1: Dune"
    );

    assert_eq!(
        run(&e, "rm borrower", &["sam1"]).await,
        "Borrower removed successfully!"
    );
    assert_eq!(
        run(&e, "borrower of", &["111"]).await,
        "The borrower for the book with ISBN 111 cannot be found."
    );
    assert_eq!(run(&e, "check indexes", &[]).await, "All indexes are consistent.");
}

#[tokio::test]
async fn test_edit_replaces_every_view() {
    let e = Executor::in_memory();
    run(&e, "add book", &["Dune", "Herbert", "111", "412"]).await;
    run(&e, "add borrower", &["Sam", "sam1", "555-0100"]).await;
    run(&e, "checkout book", &["111", "sam1"]).await;

    assert_eq!(
        run(&e, "edit book", &["111", "Dune Messiah", "Frank Herbert", "256"]).await,
        "Book edited successfully!"
    );
    assert_eq!(
        run(&e, "search books", &["isbn", "111"]).await,
        "Dune Messiah, 111, Frank Herbert, 256"
    );
    assert_eq!(
        run(&e, "search books", &["name", "Dune"]).await,
        "No books with name Dune were found."
    );
    assert_eq!(
        run(&e, "search books", &["author", "Herbert"]).await,
        "No books by author Herbert were found."
    );
    // The borrower's mirror carries the new name
    assert_eq!(
        run(&e, "borrowed by", &["sam1"]).await,
        "Books checked out by sam1: Dune Messiah"
    );
    assert_eq!(run(&e, "check indexes", &[]).await, "All indexes are consistent.");
}

#[tokio::test]
async fn test_malformed_lines() {
    let e = Executor::in_memory();
    assert_eq!(run(&e, "lend book", &["111"]).await, "Please provide a valid input.");
    assert!(run(&e, "add borrower", &["Sam", "sam1"])
        .await
        .starts_with("'add borrower' takes exactly 3 arguments."));
    assert_eq!(
        run(&e, "list books", &["colour"]).await,
        "Invalid sort type, please use 'name', 'author', 'page count', or 'isbn'."
    );
    assert_eq!(
        run(&e, "search borrowers", &["phone", "555"]).await,
        "Invalid search type entered. Please use 'name' or 'username'."
    );
}

#[tokio::test]
async fn test_listings_group_by_index_value() {
    let e = Executor::in_memory();
    run(&e, "add book", &["Mort", "Pratchett", "333", "288"]).await;
    run(&e, "add book", &["Good Omens", "Pratchett", "Gaiman", "222", "288"]).await;
    run(&e, "add book", &["Dune", "Herbert", "111", "412"]).await;

    assert_eq!(
        run(&e, "list books", &["isbn"]).await,
        "Dune, 111, Herbert, 412\n\
         Good Omens, 222, Pratchett, Gaiman, 288\n\
         Mort, 333, Pratchett, 288"
    );
    let by_pages = run(&e, "list books", &["page count"]).await;
    assert!(by_pages.starts_with("Page count: 288\n"));
    assert!(by_pages.ends_with("Page count: 412\nDune, 111, Herbert, 412"));

    let by_author = run(&e, "list books", &["author"]).await;
    let headings: Vec<&str> = by_author
        .lines()
        .filter(|line| line.starts_with("Author: "))
        .collect();
    assert_eq!(headings, ["Author: Gaiman", "Author: Herbert", "Author: Pratchett"]);
}
