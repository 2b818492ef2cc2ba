use std::path::PathBuf;

use clap::Parser;
use stacks_engine::StacksConfig;

/// Stacks - library catalog shell
#[derive(Parser, Debug)]
#[command(name = "stacks")]
#[command(version)]
#[command(about = "Interactive shell for the Stacks library catalog", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./stacks.toml if present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Snapshot file loaded at startup and saved on exit
    #[arg(short = 's', long = "snapshot")]
    pub snapshot: Option<PathBuf>,

    /// Redis server to use instead of the in-memory store
    #[arg(long = "redis-url")]
    pub redis_url: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "stacks::index=debug")
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Run one command line and exit instead of starting the shell
    #[arg(trailing_var_arg = true)]
    pub line: Vec<String>,
}

impl Cli {
    /// Apply flag overrides on top of file configuration.
    pub fn apply(&self, config: &mut StacksConfig) {
        if let Some(path) = &self.snapshot {
            config.store.snapshot_path = Some(path.clone());
        }
        if let Some(url) = &self.redis_url {
            config.store.url = Some(url.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }

    /// The one-shot command line, if any was given.
    pub fn one_shot(&self) -> Option<String> {
        if self.line.is_empty() {
            None
        } else {
            Some(self.line.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["stacks", "--snapshot", "cat.json", "--log-level", "debug"]);
        let mut config = StacksConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.store.snapshot_path, Some(PathBuf::from("cat.json")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(cli.one_shot(), None);
    }

    #[test]
    fn test_redis_url_flag() {
        let cli = Cli::parse_from(["stacks", "--redis-url", "redis://cache:6379", "list", "books"]);
        let mut config = StacksConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.store.url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(cli.one_shot().as_deref(), Some("list books"));
    }

    #[test]
    fn test_trailing_words_form_one_line() {
        let cli = Cli::parse_from(["stacks", "search", "books", "name,", "Dune"]);
        assert_eq!(cli.one_shot().as_deref(), Some("search books name, Dune"));
    }
}
