//! Rotation Domain Layer
//!
//! This crate contains the value types and trait interfaces shared by every
//! other layer of `rotate-backups`. It holds no I/O and no policy beyond the
//! calendar arithmetic that defines retention periods.
//!
//! ## Key Concepts
//!
//! - **Backup**: One timestamped entry discovered under a location
//! - **Frequency**: A retention granularity (minutely → yearly)
//! - **Period key**: The calendar bucket a backup falls into for one frequency
//! - **Rotation scheme**: How many periods of each frequency to keep
//! - **Decision**: The set of frequencies that justify keeping a backup
//! - **Location**: A backup container, local or remote (see [`traits::Location`])
//!
//! ## Architecture
//!
//! - Pure value types and calendar logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;
pub mod decision;
pub mod flags;
pub mod frequency;
pub mod removal;
pub mod retention;
pub mod traits;

// Re-exports for convenience
pub use backup::Backup;
pub use decision::{Action, Decision, RotationRecord};
pub use flags::RotationFlags;
pub use frequency::{Frequency, PeriodKey};
pub use removal::{IoSchedulingClass, RemovalCommand, DEFAULT_REMOVAL_COMMAND};
pub use retention::{RetentionPeriod, RotationScheme};
pub use traits::Location;
