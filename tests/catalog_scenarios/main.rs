//! Cross-crate catalog scenarios.
//!
//! Each module drives the catalog through the command layer, the way the
//! shell does, and then inspects the raw store to check what was written.
//!
//! ```bash
//! cargo test --test catalog_scenarios
//! ```

mod test_utils;

mod borrower_cascade;
mod checkout;
mod embedded_api;
mod index_cleanup;
mod session;
mod snapshot;
