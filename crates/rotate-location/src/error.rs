//! Location error types

use thiserror::Error;

/// Errors that can occur while inspecting or modifying a location
#[derive(Error, Debug)]
pub enum LocationError {
    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External program could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// External program exited unsuccessfully
    #[error("Command failed ({status}): {command}{}", format_stderr(.stderr))]
    Command {
        /// Shell-quoted command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Location string cannot be parsed
    #[error("Invalid location: {0}")]
    InvalidSpec(String),
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
