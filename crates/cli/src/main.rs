//! `stacks` - interactive shell for the library catalog.
//!
//! Startup order: configuration, logging, store (a Redis server when a url
//! is configured, otherwise memory restored from the snapshot when one
//! exists), connectivity check, then either a single command from the
//! command line or the interactive loop. The snapshot is written back when
//! the session ends.

mod args;
mod logging;
mod shell;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stacks_engine::config::DEFAULT_CONFIG_FILE;
use stacks_engine::config::StoreConfig;
use stacks_engine::StacksConfig;
use stacks_executor::Executor;
use stacks_storage::{MemoryStore, PrimitiveStore, RedisStore};
use tracing::{error, info, warn};

use crate::args::Cli;
use crate::shell::{evaluate, parse_line, Line, Shell};

fn load_config(cli: &Cli) -> anyhow::Result<StacksConfig> {
    let mut config = match &cli.config {
        Some(path) => StacksConfig::load(path)?,
        None => StacksConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    cli.apply(&mut config);
    Ok(config)
}

/// Restore the store from `snapshot` if the file exists, else start empty.
fn open_store(snapshot: Option<&Path>, capacity: usize) -> anyhow::Result<MemoryStore> {
    match snapshot {
        Some(path) if path.exists() => {
            let store = MemoryStore::load_snapshot(path)
                .with_context(|| format!("failed to restore {}", path.display()))?;
            info!(target: "stacks::store", path = %path.display(), keys = store.key_count(), "Snapshot restored");
            Ok(store)
        }
        _ => Ok(MemoryStore::with_capacity(capacity)),
    }
}

/// The store commands run against, and the in-memory store to snapshot
/// when the session ends.
async fn open_backend(
    config: &StoreConfig,
) -> anyhow::Result<(Arc<dyn PrimitiveStore>, Option<Arc<MemoryStore>>)> {
    if let Some(url) = &config.url {
        if config.snapshot_path.is_some() {
            warn!(target: "stacks::store", "Snapshot path ignored with a Redis store");
        }
        let store: Arc<dyn PrimitiveStore> = Arc::new(
            RedisStore::connect(url)
                .await
                .context("failed to connect to Redis")?,
        );
        return Ok((store, None));
    }

    let memory = Arc::new(open_store(
        config.snapshot_path.as_deref(),
        config.initial_capacity,
    )?);
    let store: Arc<dyn PrimitiveStore> = memory.clone();
    Ok((store, Some(memory)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.logging.level)?;

    let (store, memory) = open_backend(&config.store).await?;
    let executor = Executor::with_store(store);
    executor
        .catalog()
        .ping()
        .await
        .context("store is not reachable")?;

    let session = match cli.one_shot() {
        Some(input) => {
            if let Line::Command { name, args } = parse_line(&input) {
                println!("{}", evaluate(&executor, &name, &args).await);
            }
            Ok(())
        }
        None => Shell::new(executor, &config).run().await,
    };

    let snapshot = memory
        .as_deref()
        .zip(config.store.snapshot_path.as_deref());
    finish_session(session, snapshot)
}

/// Write the snapshot whatever the session's outcome, then report the outcome.
fn finish_session(
    session: anyhow::Result<()>,
    snapshot: Option<(&MemoryStore, &Path)>,
) -> anyhow::Result<()> {
    let saved = match snapshot {
        Some((store, path)) => store
            .save_snapshot(path)
            .map(|_| ())
            .with_context(|| format!("failed to save {}", path.display())),
        None => Ok(()),
    };

    match (session, saved) {
        (Err(e), Err(save)) => {
            error!(target: "stacks::shell", error = %e, "Session ended with an error");
            Err(save)
        }
        (session, saved) => session.and(saved),
    }
}
