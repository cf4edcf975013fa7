//! Decision module - keep/remove verdicts and the records reported for them

use crate::{Backup, Frequency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What happens to a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Kept because at least one frequency matched
    Preserved,

    /// Queued for removal (or simulated, under dry-run)
    Removed,
}

/// Verdict for one backup
///
/// A backup is preserved iff its matched-frequency set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The backup this decision is about
    pub backup: Backup,

    /// Every frequency whose selection includes this backup
    pub matched_frequencies: BTreeSet<Frequency>,
}

impl Decision {
    /// Create a decision with no matches yet (i.e. "remove")
    pub fn new(backup: Backup) -> Self {
        Self {
            backup,
            matched_frequencies: BTreeSet::new(),
        }
    }

    /// Whether the backup is kept
    pub fn is_preserved(&self) -> bool {
        !self.matched_frequencies.is_empty()
    }

    /// The action implied by this decision
    pub fn action(&self) -> Action {
        if self.is_preserved() {
            Action::Preserved
        } else {
            Action::Removed
        }
    }

    /// Structured record for reporting
    pub fn to_record(&self) -> RotationRecord {
        RotationRecord {
            path: self.backup.path().to_string(),
            action: self.action(),
            matched_frequencies: self.matched_frequencies.iter().copied().collect(),
        }
    }
}

/// Reporting contract: one record per backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRecord {
    /// Path of the backup
    pub path: String,

    /// Preserved or removed
    pub action: Action,

    /// Frequencies justifying preservation (empty when removed)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_frequencies: Vec<Frequency>,
}
