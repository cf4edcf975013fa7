//! Configuration for rotation runs
//!
//! Controls simulation, sanity-check enforcement and parallelism.

use rotate_domain::RemovalCommand;
use serde::{Deserialize, Serialize};

/// Configuration for the planner and the rotation worker
///
/// # Examples
///
/// ```
/// use rotate_planner::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert!(!config.dry_run);
/// assert!(!config.parallel);
///
/// let config = PlannerConfig::simulation();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Dry-run mode: log and report removals without executing them
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Continue with a location whose sanity checks failed
    /// Default: false
    #[serde(default)]
    pub force: bool,

    /// Rotate locations concurrently (locations sharing a mount point or
    /// host are still handled one at a time)
    /// Default: false
    #[serde(default)]
    pub parallel: bool,

    /// Upper bound on concurrently rotated locations
    /// Default: available parallelism of the host
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Command removing one backup
    /// Default: `rm -Rf`
    #[serde(default)]
    pub removal_command: RemovalCommand,
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            parallel: false,
            max_workers: default_max_workers(),
            removal_command: RemovalCommand::default(),
        }
    }
}

impl PlannerConfig {
    /// Default configuration with dry-run enabled
    pub fn simulation() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Worker pool size, never below one
    pub fn worker_count(&self) -> usize {
        self.max_workers.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert!(!config.dry_run);
        assert!(!config.force);
        assert!(!config.parallel);
        assert!(config.max_workers >= 1);
        assert!(!config.removal_command.is_custom());
    }

    #[test]
    fn test_worker_count_floor() {
        let config = PlannerConfig {
            max_workers: 0,
            ..PlannerConfig::default()
        };
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(config.dry_run);
        assert!(!config.force);
        assert_eq!(config.removal_command, RemovalCommand::default());
    }
}
