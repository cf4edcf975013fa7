//! Trait definitions for external interactions
//!
//! These traits define the boundaries between rotation logic and
//! infrastructure. Implementations live in `rotate-location`.

use crate::RemovalCommand;

/// A backup container the engine can scan and the planner can prune
///
/// Local directories and directories on SSH hosts are handled uniformly
/// through this interface; callers never branch on the concrete type.
///
/// Implemented by the infrastructure layer (rotate-location)
pub trait Location {
    /// Error type for listing and removal
    type Error;

    /// Entries directly under the location (full paths)
    fn list(&self) -> Result<Vec<String>, Self::Error>;

    /// Remove one entry by running `command` through this location's
    /// execution context
    fn remove(&self, entry: &str, command: &RemovalCommand) -> Result<(), Self::Error>;

    /// Whether the location exists (and is a directory)
    fn exists(&self) -> bool;

    /// Whether the location's entries can be listed
    fn is_readable(&self) -> bool;

    /// Whether entries can be removed with the default command
    fn is_writable(&self) -> bool;

    /// Key shared by locations on the same physical target (mount point or
    /// remote host). Work on locations with equal keys is serialized.
    fn identity_key(&self) -> String;

    /// Whether the location lives on another host
    fn is_remote(&self) -> bool;

    /// Human readable name used in logs and reports
    fn name(&self) -> String;
}
