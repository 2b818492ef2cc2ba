//! Borrower operations.

use stacks_core::Borrower;
use stacks_engine::{BorrowerSearch, Group};

use super::{unexpected, Stacks};
use crate::{Command, Output, Result};

impl Stacks {
    /// Add a borrower.
    pub async fn add_borrower(&self, name: &str, username: &str, phone: &str) -> Result<()> {
        let borrower = Borrower {
            name: name.to_string(),
            username: username.to_string(),
            phone: phone.to_string(),
        };
        match self.executor.execute(Command::AddBorrower { borrower }).await? {
            Output::BorrowerAdded { .. } => Ok(()),
            other => Err(unexpected("add borrower", &other)),
        }
    }

    /// Remove a borrower, returning every book they hold.
    pub async fn remove_borrower(&self, username: &str) -> Result<()> {
        match self
            .executor
            .execute(Command::RemoveBorrower {
                username: username.to_string(),
            })
            .await?
        {
            Output::BorrowerRemoved { .. } => Ok(()),
            other => Err(unexpected("rm borrower", &other)),
        }
    }

    /// Replace a borrower's name and phone.
    pub async fn edit_borrower(&self, borrower: Borrower) -> Result<()> {
        match self.executor.execute(Command::EditBorrower { borrower }).await? {
            Output::BorrowerEdited { .. } => Ok(()),
            other => Err(unexpected("edit borrower", &other)),
        }
    }

    /// Names of the books a borrower holds.
    pub async fn borrowed_by(&self, username: &str) -> Result<Vec<String>> {
        match self
            .executor
            .execute(Command::BorrowedBy {
                username: username.to_string(),
            })
            .await?
        {
            Output::BorrowedBy { books, .. } => Ok(books),
            other => Err(unexpected("borrowed by", &other)),
        }
    }

    /// Search borrowers by name or username.
    pub async fn search_borrowers(
        &self,
        by: BorrowerSearch,
        query: &str,
    ) -> Result<Vec<Borrower>> {
        match self
            .executor
            .execute(Command::SearchBorrowers {
                by,
                query: query.to_string(),
            })
            .await?
        {
            Output::Borrowers { borrowers, .. } => Ok(borrowers),
            other => Err(unexpected("search borrowers", &other)),
        }
    }

    /// List every borrower, grouped by name.
    pub async fn list_borrowers(&self) -> Result<Vec<Group<Borrower>>> {
        match self.executor.execute(Command::ListBorrowers).await? {
            Output::BorrowerListing { groups } => Ok(groups),
            other => Err(unexpected("list borrowers", &other)),
        }
    }
}
