//! Tracing setup.
//!
//! The interactive chat owns the terminal, so it only logs when a file is
//! given. One-shot commands log warnings to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const FILE_DEFAULT_FILTER: &str = "localchat=debug";
const STDERR_DEFAULT_FILTER: &str = "localchat=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Full-screen UI; without a log file nothing is written.
    Interactive,
    /// Plain command output; warnings go to stderr.
    Command,
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Calling it twice is harmless; the second call is ignored.
pub fn init_tracing(
    log_file: Option<&Path>,
    target: LogTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter_or(FILE_DEFAULT_FILTER))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
        return Ok(());
    }

    if target == LogTarget::Command {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter_or(STDERR_DEFAULT_FILTER))
            .with_writer(std::io::stderr)
            .try_init();
    }

    Ok(())
}
