//! The interactive read-eval-print loop.
//!
//! A line is a command name made of its first two words followed by a
//! comma-separated argument list:
//!
//! ```text
//! add book Good Omens, Pratchett, Gaiman, 222, 288
//! list books page count
//! ```

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use stacks_engine::StacksConfig;
use stacks_executor::{Executor, COMMANDS};
use tracing::{debug, info, warn};

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    /// Blank input
    Empty,
    /// `q`, `quit` or `exit`
    Quit,
    /// A command name and its arguments
    Command {
        /// First two words joined by a single space
        name: String,
        /// Comma-separated remainder, each piece trimmed
        args: Vec<String>,
    },
}

/// Split off the first whitespace-delimited word.
fn next_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

/// Parse one line of input.
pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if matches!(line, "q" | "quit" | "exit") {
        return Line::Quit;
    }

    let (first, rest) = next_word(line);
    let (second, rest) = next_word(rest);
    let name = if second.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, second)
    };

    let rest = rest.trim();
    let args = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(|arg| arg.trim().to_string()).collect()
    };
    Line::Command { name, args }
}

/// Usage text printed at startup.
pub fn banner() -> String {
    let mut text = String::from("How to use the Stacks catalog:\n");
    for spec in COMMANDS {
        text.push_str(&format!("  {:<52} {}\n", spec.usage, spec.summary));
    }
    text.push_str("  q                                                    Quit");
    text
}

/// Run one command and produce the text to print.
pub async fn evaluate(executor: &Executor, name: &str, args: &[String]) -> String {
    match executor.execute_args(name, args).await {
        Ok(output) => output.to_string(),
        Err(e) => {
            debug!(target: "stacks::shell", command = name, error = ?e, "Command failed");
            e.to_string()
        }
    }
}

/// The interactive shell.
pub struct Shell {
    executor: Executor,
    prompt: String,
    history_file: Option<PathBuf>,
}

impl Shell {
    /// Create a shell over `executor` using the `[shell]` settings.
    pub fn new(executor: Executor, config: &StacksConfig) -> Self {
        Self {
            executor,
            prompt: config.shell.prompt.clone(),
            history_file: config.shell.history_file.clone(),
        }
    }

    /// Read and run lines until the operator quits.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &self.history_file {
            if let Err(e) = editor.load_history(path) {
                debug!(target: "stacks::shell", path = %path.display(), error = %e, "No history loaded");
            }
        }

        println!("{}", banner());
        info!(target: "stacks::shell", "Shell started");

        loop {
            match editor.readline(&self.prompt) {
                Ok(input) => match parse_line(&input) {
                    Line::Empty => continue,
                    Line::Quit => break,
                    Line::Command { name, args } => {
                        let _ = editor.add_history_entry(input.as_str());
                        println!("{}", evaluate(&self.executor, &name, &args).await);
                    }
                },
                // Ctrl-C drops the current line only
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(path) = &self.history_file {
            if let Err(e) = editor.save_history(path) {
                warn!(target: "stacks::shell", path = %path.display(), error = %e, "History not saved");
            }
        }
        info!(target: "stacks::shell", "Shell exited");
        Ok(())
    }
}
