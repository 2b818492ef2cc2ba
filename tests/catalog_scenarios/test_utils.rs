//! Shared helpers for catalog scenarios.

use std::sync::Arc;

use stacks::{Executor, StoreAdapter};
use stacks_storage::{FaultyStore, MemoryStore};

/// An executor over a store that can be told to fail.
pub fn faulty_executor() -> (Arc<FaultyStore<MemoryStore>>, Executor) {
    let store = Arc::new(FaultyStore::new(MemoryStore::new()));
    let executor = Executor::with_store(store.clone());
    (store, executor)
}

/// Run a command line the way the shell does and return the printed text.
pub async fn run(executor: &Executor, name: &str, args: &[&str]) -> String {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    match executor.execute_args(name, &args).await {
        Ok(output) => output.to_string(),
        Err(e) => e.to_string(),
    }
}

/// Adapter over the executor's store, for inspecting raw keys.
pub fn raw(executor: &Executor) -> &StoreAdapter {
    executor.catalog().store()
}
