//! Per-location outcome reports

use rotate_domain::{Action, RotationRecord};
use serde::{Deserialize, Serialize};

/// How a location's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Every planned removal succeeded (or was simulated)
    Completed,

    /// At least one removal failed
    PartiallyFailed,

    /// Nothing was attempted (failed sanity check or listing)
    Aborted,
}

/// A removal that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalFailure {
    /// Path of the backup
    pub path: String,

    /// Error reported by the location
    pub error: String,
}

/// Result of rotating one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Location name
    pub location: String,

    /// How the run ended
    pub outcome: Outcome,

    /// Whether removals were only simulated
    pub dry_run: bool,

    /// One record per backup, chronological
    pub records: Vec<RotationRecord>,

    /// Removals that failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RemovalFailure>,

    /// Why the run was aborted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationReport {
    /// Report for a location that was not rotated
    pub fn aborted(location: impl Into<String>, dry_run: bool, error: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            outcome: Outcome::Aborted,
            dry_run,
            records: Vec::new(),
            failures: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether the run ended without sanity or removal errors
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    /// Number of preserved backups
    pub fn preserved_count(&self) -> usize {
        self.count(Action::Preserved)
    }

    /// Number of backups removed (or that would be, under dry-run)
    ///
    /// Entries whose removal failed are not counted.
    pub fn removed_count(&self) -> usize {
        self.count(Action::Removed).saturating_sub(self.failures.len())
    }

    /// Whether removing `path` failed
    pub fn is_failed(&self, path: &str) -> bool {
        self.failures.iter().any(|f| f.path == path)
    }

    fn count(&self, action: Action) -> usize {
        self.records.iter().filter(|r| r.action == action).count()
    }
}
