//! Engine error types

use thiserror::Error;

/// Errors that can occur while configuring or running the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Timestamp pattern does not compile or lacks required groups
    #[error("Invalid timestamp pattern: {0}")]
    InvalidPattern(String),

    /// Include or exclude glob cannot be translated
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Pattern matched but the captured values are not a calendar date
    #[error("Invalid timestamp in {name}: {reason}")]
    InvalidTimestamp {
        /// Entry name the pattern matched
        name: String,
        /// Which component was out of range
        reason: String,
    },
}
