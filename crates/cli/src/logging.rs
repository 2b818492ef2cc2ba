//! Logging bootstrap.
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! takes precedence over the configured level.

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{}'", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))
}
