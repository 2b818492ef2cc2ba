//! Index audit handler.

use stacks_engine::Catalog;
use tracing::warn;

use crate::{Output, Result};

/// Handle `check indexes`.
pub async fn check_indexes(catalog: &Catalog) -> Result<Output> {
    let violations = catalog.audit().await;
    if !violations.is_empty() {
        warn!(target: "stacks::shell", count = violations.len(), "Index audit found problems");
    }
    Ok(Output::IndexReport { violations })
}
