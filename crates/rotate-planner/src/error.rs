//! Error types for planner operations

use thiserror::Error;

/// Errors that can occur while rotating a location
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Location failed a pre-flight check
    #[error("Sanity check failed for {location}: {reason}")]
    SanityCheck {
        /// Location name
        location: String,
        /// What was wrong
        reason: String,
    },

    /// Location layer error (listing or removal)
    #[error("Location error: {0}")]
    Location(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
