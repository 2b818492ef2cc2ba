//! The typed API used by embedding applications.

use stacks::{Book, BookSearch, BookSort, BorrowerSearch, Error, IndexViolation, Stacks};

#[tokio::test]
async fn test_typed_round_trip() {
    let stacks = Stacks::in_memory();
    stacks.ping().await.unwrap();

    stacks
        .add_book("Good Omens", &["Pratchett", "Gaiman"], "222", "288")
        .await
        .unwrap();
    let found = stacks.search_books(BookSearch::Isbn, "222").await.unwrap();
    assert_eq!(
        found,
        vec![Book {
            name: "Good Omens".to_string(),
            authors: vec!["Pratchett".to_string(), "Gaiman".to_string()],
            isbn: "222".to_string(),
            pages: "288".to_string(),
        }]
    );

    stacks
        .edit_book(Book {
            name: "Good Omens".to_string(),
            authors: vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()],
            isbn: "222".to_string(),
            pages: "412".to_string(),
        })
        .await
        .unwrap();
    let groups = stacks.list_books(BookSort::Author).await.unwrap();
    let headings: Vec<&str> = groups.iter().map(|g| g.heading.as_str()).collect();
    assert_eq!(headings, ["Neil Gaiman", "Terry Pratchett"]);
}

#[tokio::test]
async fn test_typed_errors() {
    let stacks = Stacks::in_memory();
    stacks.add_borrower("Sam", "sam1", "555-0100").await.unwrap();

    let err = stacks
        .add_borrower("Sam", "sam1", "555-0100")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateBorrower { .. }));

    let err = stacks.checkout("999", "sam1").await.unwrap_err();
    assert_eq!(
        err,
        Error::BookNotFound {
            isbn: "999".to_string()
        }
    );

    let err = stacks.remove_book("999").await.unwrap_err();
    assert!(matches!(err, Error::BookNotFound { .. }));
}

#[tokio::test]
async fn test_borrowers_through_api() {
    let stacks = Stacks::in_memory();
    stacks.add_book("Dune", &["Herbert"], "111", "412").await.unwrap();
    stacks.add_borrower("Sam", "sam1", "555-0100").await.unwrap();
    stacks.add_borrower("Ana", "ana2", "555-0102").await.unwrap();
    stacks.checkout("111", "ana2").await.unwrap();

    assert_eq!(stacks.borrowed_by("ana2").await.unwrap(), vec!["Dune"]);
    assert_eq!(
        stacks.borrower_of("111").await.unwrap(),
        Some("ana2".to_string())
    );

    let sams = stacks
        .search_borrowers(BorrowerSearch::Name, "Sam")
        .await
        .unwrap();
    assert_eq!(sams.len(), 1);
    assert_eq!(sams[0].username, "sam1");

    let groups = stacks.list_borrowers().await.unwrap();
    let headings: Vec<&str> = groups.iter().map(|g| g.heading.as_str()).collect();
    assert_eq!(headings, ["Ana", "Sam"]);

    stacks.remove_borrower("ana2").await.unwrap();
    assert_eq!(stacks.borrower_of("111").await.unwrap(), None);
    assert_eq!(stacks.check_indexes().await.unwrap(), Vec::<IndexViolation>::new());
}
