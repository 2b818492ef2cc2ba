//! Index integrity audit.
//!
//! Walks the stored catalog and reports every place where the derived
//! structures disagree with the primary records. The audit only reads.
//!
//! Checks performed:
//! - every parent index value has a non-empty member set
//! - every member names an existing record that still carries the value
//! - every listed book and borrower is referenced by each index it belongs to
//! - every `isbns` entry names an existing book
//! - every `borrowing` entry names an existing book and borrower
//! - every `borrowing` entry has its `borrowed-by` mirror, and vice versa
//!
//! Records that no index lists at all cannot be found without a key scan,
//! which the store contract does not offer.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use stacks_core::keys::{book_key, borrowed_by_key, borrower_key, BORROWING, ISBNS};
use stacks_storage::StoreAdapter;

use crate::books::BookEngine;
use crate::borrowers::BorrowerEngine;
use crate::index::{RefCountedIndex, AUTHOR_INDEX, BORROWER_NAME_INDEX, NAME_INDEX, PAGE_INDEX};

/// One inconsistency between records and indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexViolation {
    /// A value is listed in its index but nothing references it.
    OrphanValue {
        /// Index label
        index: &'static str,
        /// The unreferenced value
        value: String,
    },
    /// A member set names a record that does not exist.
    DanglingMember {
        /// Index label
        index: &'static str,
        /// Indexed value
        value: String,
        /// isbn or username with no record
        member: String,
    },
    /// A member set names a record whose attribute has since changed.
    StaleMember {
        /// Index label
        index: &'static str,
        /// Indexed value
        value: String,
        /// isbn or username of the record
        member: String,
    },
    /// A record's attribute is not (fully) indexed.
    MissingReference {
        /// Index label
        index: &'static str,
        /// The record's value for the attribute
        value: String,
        /// isbn or username of the record
        member: String,
    },
    /// The isbn index lists a book that does not exist.
    DanglingIsbn {
        /// The listed isbn
        isbn: String,
    },
    /// A checkout has no entry in the borrower's mirror.
    UnmirroredCheckout {
        /// The checked-out book
        isbn: String,
        /// The borrower named in `borrowing`
        username: String,
    },
    /// A checkout names a book that does not exist.
    CheckoutOfMissingBook {
        /// The checked-out isbn
        isbn: String,
        /// The borrower named in `borrowing`
        username: String,
    },
    /// A checkout names a borrower who does not exist.
    CheckoutByMissingBorrower {
        /// The checked-out book
        isbn: String,
        /// The username with no record
        username: String,
    },
    /// A mirror entry has no matching checkout.
    UnbackedMirror {
        /// Owner of the mirror
        username: String,
        /// The book the mirror claims
        isbn: String,
    },
}

impl fmt::Display for IndexViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexViolation::OrphanValue { index, value } => {
                write!(f, "{} index lists '{}' but nothing references it", index, value)
            }
            IndexViolation::DanglingMember {
                index,
                value,
                member,
            } => write!(
                f,
                "{} index maps '{}' to '{}', which does not exist",
                index, value, member
            ),
            IndexViolation::StaleMember {
                index,
                value,
                member,
            } => write!(
                f,
                "{} index maps '{}' to '{}', which no longer has that value",
                index, value, member
            ),
            IndexViolation::MissingReference {
                index,
                value,
                member,
            } => write!(
                f,
                "'{}' is missing from the {} index under '{}'",
                member, index, value
            ),
            IndexViolation::DanglingIsbn { isbn } => {
                write!(f, "isbn index lists {}, which does not exist", isbn)
            }
            IndexViolation::UnmirroredCheckout { isbn, username } => write!(
                f,
                "book with ISBN {} is checked out to {} but missing from their borrowed books",
                isbn, username
            ),
            IndexViolation::CheckoutOfMissingBook { isbn, username } => write!(
                f,
                "book with ISBN {} is checked out to {} but does not exist",
                isbn, username
            ),
            IndexViolation::CheckoutByMissingBorrower { isbn, username } => write!(
                f,
                "book with ISBN {} is checked out to {}, who does not exist",
                isbn, username
            ),
            IndexViolation::UnbackedMirror { username, isbn } => write!(
                f,
                "{} lists book with ISBN {} as borrowed but it is not checked out to them",
                username, isbn
            ),
        }
    }
}

/// Record attribute a reference-counted index is built from.
#[derive(Debug, Clone, Copy)]
enum Attribute {
    BookName,
    Author,
    Pages,
    BorrowerName,
}

const INDEXED: [Attribute; 4] = [
    Attribute::BookName,
    Attribute::Author,
    Attribute::Pages,
    Attribute::BorrowerName,
];

impl Attribute {
    fn index(self) -> RefCountedIndex {
        match self {
            Attribute::BookName => NAME_INDEX,
            Attribute::Author => AUTHOR_INDEX,
            Attribute::Pages => PAGE_INDEX,
            Attribute::BorrowerName => BORROWER_NAME_INDEX,
        }
    }

    fn record_key(self, member: &str) -> String {
        match self {
            Attribute::BorrowerName => borrower_key(member),
            _ => book_key(member),
        }
    }

    /// The values `member`'s record currently has, or `None` if it cannot be read.
    async fn current(self, store: &StoreAdapter, member: &str) -> Option<Vec<String>> {
        match self {
            Attribute::BorrowerName => {
                let borrower = BorrowerEngine::new(store.clone()).fetch(member).await?;
                Some(vec![borrower.name])
            }
            _ => {
                let book = BookEngine::new(store.clone()).fetch(member).await?;
                Some(match self {
                    Attribute::Author => book.authors,
                    Attribute::Pages => vec![book.pages],
                    _ => vec![book.name],
                })
            }
        }
    }
}

/// Audit the whole catalog. An empty result means every index is consistent.
pub async fn audit(store: &StoreAdapter) -> Vec<IndexViolation> {
    let mut violations = Vec::new();

    for attribute in INDEXED {
        check_members(store, attribute, &mut violations).await;
    }
    check_books(store, &mut violations).await;
    check_borrowers(store, &mut violations).await;
    check_borrowing(store, &mut violations).await;

    violations
}

/// Parent values must have members, and members must exist and still
/// carry the value they are filed under.
async fn check_members(
    store: &StoreAdapter,
    attribute: Attribute,
    violations: &mut Vec<IndexViolation>,
) {
    let index = attribute.index();
    for value in index.values(store).await {
        let members = index.members(store, &value).await;
        if members.is_empty() {
            violations.push(IndexViolation::OrphanValue {
                index: index.label,
                value: value.clone(),
            });
        }
        for member in members {
            if !store.object_exists(&attribute.record_key(&member)).await {
                violations.push(IndexViolation::DanglingMember {
                    index: index.label,
                    value: value.clone(),
                    member,
                });
                continue;
            }
            let current = attribute.current(store, &member).await;
            if matches!(current, Some(values) if !values.contains(&value)) {
                violations.push(IndexViolation::StaleMember {
                    index: index.label,
                    value: value.clone(),
                    member,
                });
            }
        }
    }
}

/// Every listed book must be referenced by the index of each attribute.
async fn check_books(store: &StoreAdapter, violations: &mut Vec<IndexViolation>) {
    let books = BookEngine::new(store.clone());
    let names = parent_values(store, NAME_INDEX).await;
    let pages = parent_values(store, PAGE_INDEX).await;
    let authors = parent_values(store, AUTHOR_INDEX).await;

    for isbn in store.sorted_index_values(ISBNS).await {
        let Some(book) = books.fetch(&isbn).await else {
            violations.push(IndexViolation::DanglingIsbn { isbn });
            continue;
        };
        check_reference(store, NAME_INDEX, &names, &book.name, &isbn, violations).await;
        check_reference(store, PAGE_INDEX, &pages, &book.pages, &isbn, violations).await;
        for author in &book.authors {
            check_reference(store, AUTHOR_INDEX, &authors, author, &isbn, violations).await;
        }
    }
}

/// Every indexed borrower must be indexed under the name it actually has.
async fn check_borrowers(store: &StoreAdapter, violations: &mut Vec<IndexViolation>) {
    let borrowers = BorrowerEngine::new(store.clone());
    let ordered = BORROWER_NAME_INDEX.values(store).await;
    let names: HashSet<String> = ordered.iter().cloned().collect();

    let mut seen = BTreeSet::new();
    for name in &ordered {
        for username in BORROWER_NAME_INDEX.members(store, name).await {
            if !seen.insert(username.clone()) {
                continue;
            }
            if let Some(borrower) = borrowers.fetch(&username).await {
                check_reference(
                    store,
                    BORROWER_NAME_INDEX,
                    &names,
                    &borrower.name,
                    &username,
                    violations,
                )
                .await;
            }
        }
    }
}

/// `borrowing` and the `borrowed-by` mirrors must agree entry for entry.
async fn check_borrowing(store: &StoreAdapter, violations: &mut Vec<IndexViolation>) {
    let isbns = store.field_names(BORROWING).await;
    let holders = store.field_values(BORROWING).await;

    let mut usernames: BTreeSet<String> = holders.iter().cloned().collect();
    for (isbn, username) in isbns.iter().zip(&holders) {
        if !store.object_exists(&book_key(isbn)).await {
            violations.push(IndexViolation::CheckoutOfMissingBook {
                isbn: isbn.clone(),
                username: username.clone(),
            });
        }
        if !store.object_exists(&borrower_key(username)).await {
            violations.push(IndexViolation::CheckoutByMissingBorrower {
                isbn: isbn.clone(),
                username: username.clone(),
            });
        }
        if store
            .get_field(&borrowed_by_key(username), isbn)
            .await
            .is_none()
        {
            violations.push(IndexViolation::UnmirroredCheckout {
                isbn: isbn.clone(),
                username: username.clone(),
            });
        }
    }

    for name in BORROWER_NAME_INDEX.values(store).await {
        usernames.extend(BORROWER_NAME_INDEX.members(store, &name).await);
    }
    for username in usernames {
        for isbn in store.field_names(&borrowed_by_key(&username)).await {
            let holder = store.get_field(BORROWING, &isbn).await;
            if holder.as_deref() != Some(username.as_str()) {
                violations.push(IndexViolation::UnbackedMirror {
                    username: username.clone(),
                    isbn,
                });
            }
        }
    }
}

async fn parent_values(store: &StoreAdapter, index: RefCountedIndex) -> HashSet<String> {
    index.values(store).await.into_iter().collect()
}

async fn check_reference(
    store: &StoreAdapter,
    index: RefCountedIndex,
    parent: &HashSet<String>,
    value: &str,
    member: &str,
    violations: &mut Vec<IndexViolation>,
) {
    let referenced = parent.contains(value)
        && index
            .members(store, value)
            .await
            .iter()
            .any(|m| m == member);
    if !referenced {
        violations.push(IndexViolation::MissingReference {
            index: index.label,
            value: value.to_string(),
            member: member.to_string(),
        });
    }
}
