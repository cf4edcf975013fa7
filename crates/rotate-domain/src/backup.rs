//! Backup module - a timestamped entry discovered under a location

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A rotation subject: one entry under a location plus the timestamp parsed
/// from its name
///
/// Backups are immutable and order chronologically; entries sharing a
/// timestamp are ordered lexicographically by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Backup {
    path: String,
    timestamp: NaiveDateTime,
    location: String,
}

impl Backup {
    /// Create a new backup
    ///
    /// `location` is the display name of the location the entry was found in.
    pub fn new(
        path: impl Into<String>,
        timestamp: NaiveDateTime,
        location: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp,
            location: location.into(),
        }
    }

    /// Full path of the entry
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last component of the path
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// Timestamp parsed from the entry name
    pub fn timestamp(&self) -> &NaiveDateTime {
        &self.timestamp
    }

    /// Display name of the containing location
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl Ord for Backup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.location.cmp(&other.location))
    }
}

impl PartialOrd for Backup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Last `/`-separated component of a path, ignoring trailing separators
///
/// Works on remote paths too, which is why it does not go through
/// `std::path::Path`.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}
