//! Borrower command handlers.

use stacks_core::Borrower;
use stacks_engine::{BorrowerSearch, Catalog};

use crate::{Output, Result};

/// Handle `add borrower`.
pub async fn add_borrower(catalog: &Catalog, borrower: Borrower) -> Result<Output> {
    catalog.borrowers().add(&borrower).await?;
    Ok(Output::BorrowerAdded {
        username: borrower.username,
    })
}

/// Handle `rm borrower`.
pub async fn remove_borrower(catalog: &Catalog, username: String) -> Result<Output> {
    catalog.borrowers().remove(&username).await?;
    Ok(Output::BorrowerRemoved { username })
}

/// Handle `edit borrower`.
pub async fn edit_borrower(catalog: &Catalog, borrower: Borrower) -> Result<Output> {
    catalog.borrowers().edit(&borrower).await?;
    Ok(Output::BorrowerEdited {
        username: borrower.username,
    })
}

/// Handle `borrowed by`.
pub async fn borrowed_by(catalog: &Catalog, username: String) -> Result<Output> {
    let books = catalog.borrowers().borrowed_by(&username).await;
    Ok(Output::BorrowedBy { username, books })
}

/// Handle `search borrowers`.
pub async fn search_borrowers(
    catalog: &Catalog,
    by: BorrowerSearch,
    query: String,
) -> Result<Output> {
    let borrowers = catalog.borrowers().search(by, &query).await;
    Ok(Output::Borrowers {
        by,
        query,
        borrowers,
    })
}

/// Handle `list borrowers`.
pub async fn list_borrowers(catalog: &Catalog) -> Result<Output> {
    let groups = catalog.borrowers().list().await;
    Ok(Output::BorrowerListing { groups })
}
