//! Rotation of a single location

use std::fmt::Display;

use rotate_domain::{Decision, Location};
use rotate_engine::{BackupCollector, Classifier};

use crate::{LocationReport, Outcome, PlannerConfig, PlannerError, RemovalFailure};

/// Turns classifier decisions for one location into removals
///
/// Responsible for:
/// - Sanity checks before anything is listed or removed
/// - Scanning the location once and classifying its backups
/// - Executing (or, under dry-run, only reporting) the removals
///
/// # Examples
///
/// ```no_run
/// use rotate_domain::{Frequency, RetentionPeriod, RotationFlags, RotationScheme};
/// use rotate_engine::{BackupCollector, Classifier};
/// use rotate_location::LocalLocation;
/// use rotate_planner::{Planner, PlannerConfig};
///
/// let scheme = RotationScheme::new().with(Frequency::Daily, RetentionPeriod::Count(7));
/// let planner = Planner::new(
///     PlannerConfig::simulation(),
///     BackupCollector::default(),
///     Classifier::new(scheme, RotationFlags::default()),
/// );
///
/// let report = planner.rotate(&LocalLocation::new("/srv/backups"));
/// println!("{} backups would be removed", report.removed_count());
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    collector: BackupCollector,
    classifier: Classifier,
}

impl Planner {
    /// Create a planner for one location's rotation settings
    pub fn new(config: PlannerConfig, collector: BackupCollector, classifier: Classifier) -> Self {
        Self {
            config,
            collector,
            classifier,
        }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Verify the location can be rotated
    ///
    /// Writability is only checked for real runs with the default removal
    /// command. Custom commands may not need write access.
    pub fn sanity_check<L: Location>(&self, location: &L) -> Result<(), PlannerError> {
        let failure = |reason: &str| PlannerError::SanityCheck {
            location: location.name(),
            reason: reason.to_string(),
        };

        if !location.exists() {
            return Err(failure("directory does not exist"));
        }
        if !location.is_readable() {
            return Err(failure("directory is not readable"));
        }
        if !self.config.dry_run
            && !self.config.removal_command.is_custom()
            && !location.is_writable()
        {
            return Err(failure(
                "directory is not writable (use a custom removal command to skip this check)",
            ));
        }
        Ok(())
    }

    /// Scan and classify without removing anything
    pub fn plan<L>(&self, location: &L) -> Result<Vec<Decision>, PlannerError>
    where
        L: Location,
        L::Error: Display,
    {
        let backups = self
            .collector
            .collect(location)
            .map_err(|e| PlannerError::Location(e.to_string()))?;
        Ok(self.classifier.classify(&backups))
    }

    /// Rotate one location
    ///
    /// Never fails as a whole: sanity-check and listing problems abort the
    /// location (unless `force` is set) and removal failures are collected
    /// while the remaining entries are still processed.
    pub fn rotate<L>(&self, location: &L) -> LocationReport
    where
        L: Location,
        L::Error: Display,
    {
        let name = location.name();
        let dry_run = self.config.dry_run;

        if let Err(e) = self.sanity_check(location) {
            if self.config.force {
                tracing::warn!("{} (continuing because of --force)", e);
            } else {
                tracing::error!("{}", e);
                return LocationReport::aborted(name, dry_run, e.to_string());
            }
        }

        let decisions = match self.plan(location) {
            Ok(decisions) => decisions,
            Err(e) if self.config.force => {
                tracing::warn!("Failed to list {}: {} (continuing because of --force)", name, e);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to list {}: {}", name, e);
                return LocationReport::aborted(name, dry_run, e.to_string());
            }
        };

        let mut records = Vec::with_capacity(decisions.len());
        let mut failures = Vec::new();

        for decision in &decisions {
            let path = decision.backup.path();
            if decision.is_preserved() {
                let frequencies: Vec<&str> = decision
                    .matched_frequencies
                    .iter()
                    .map(|f| f.as_str())
                    .collect();
                tracing::info!(
                    "Preserving {} (matches {} retention period{})",
                    path,
                    frequencies.join(", "),
                    if frequencies.len() == 1 { "" } else { "s" }
                );
            } else if dry_run {
                tracing::info!("DRY RUN: Would delete {}", path);
            } else {
                tracing::info!("Deleting {}", path);
                if let Err(e) = location.remove(path, &self.config.removal_command) {
                    tracing::error!("Failed to delete {}: {}", path, e);
                    failures.push(RemovalFailure {
                        path: path.to_string(),
                        error: e.to_string(),
                    });
                }
            }
            records.push(decision.to_record());
        }

        if decisions.iter().all(Decision::is_preserved) {
            tracing::info!("Nothing to do in {} (all backups preserved)", name);
        }

        LocationReport {
            location: name,
            outcome: if failures.is_empty() {
                Outcome::Completed
            } else {
                Outcome::PartiallyFailed
            },
            dry_run,
            records,
            failures,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotate_domain::{Action, Frequency, RemovalCommand, RetentionPeriod, RotationFlags, RotationScheme};
    use std::collections::HashSet;
    use std::fmt;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockError(String);

    impl fmt::Display for MockError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// In-memory location recording every removal
    struct MockLocation {
        entries: Mutex<Vec<String>>,
        exists: bool,
        readable: bool,
        writable: bool,
        listable: bool,
        failing: HashSet<String>,
        removed: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl MockLocation {
        fn new(names: &[&str]) -> Self {
            Self {
                entries: Mutex::new(names.iter().map(|n| format!("/mock/{}", n)).collect()),
                exists: true,
                readable: true,
                writable: true,
                listable: true,
                failing: HashSet::new(),
                removed: Mutex::new(Vec::new()),
            }
        }

        fn removed(&self) -> Vec<String> {
            self.removed.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }
    }

    impl Location for MockLocation {
        type Error = MockError;

        fn list(&self) -> Result<Vec<String>, Self::Error> {
            if self.listable {
                Ok(self.entries.lock().unwrap().clone())
            } else {
                Err(MockError("permission denied".to_string()))
            }
        }

        fn remove(&self, entry: &str, command: &RemovalCommand) -> Result<(), Self::Error> {
            if self.failing.contains(entry) {
                return Err(MockError(format!("cannot remove {}", entry)));
            }
            self.entries.lock().unwrap().retain(|e| e != entry);
            self.removed
                .lock()
                .unwrap()
                .push((entry.to_string(), command.command_line(entry)));
            Ok(())
        }

        fn exists(&self) -> bool {
            self.exists
        }

        fn is_readable(&self) -> bool {
            self.readable
        }

        fn is_writable(&self) -> bool {
            self.writable
        }

        fn identity_key(&self) -> String {
            "mock".to_string()
        }

        fn is_remote(&self) -> bool {
            false
        }

        fn name(&self) -> String {
            "/mock".to_string()
        }
    }

    fn daily_planner(config: PlannerConfig, days: u64) -> Planner {
        let scheme = RotationScheme::new().with(Frequency::Daily, RetentionPeriod::Count(days));
        Planner::new(
            config,
            BackupCollector::default(),
            Classifier::new(scheme, RotationFlags::default()),
        )
    }

    fn week() -> MockLocation {
        MockLocation::new(&[
            "2014-06-24@20:06",
            "2014-06-25@20:03",
            "2014-06-26@20:04",
            "2014-06-27@20:02",
            "notes.txt",
        ])
    }

    #[test]
    fn test_rotate_removes_expired() {
        let location = week();
        let report = daily_planner(PlannerConfig::default(), 2).rotate(&location);

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.removed_count(), 2);
        assert_eq!(
            location.removed(),
            vec!["/mock/2014-06-24@20:06", "/mock/2014-06-25@20:03"]
        );
        assert!(location.entries.lock().unwrap().contains(&"/mock/notes.txt".to_string()));
    }

    #[test]
    fn test_dry_run_removes_nothing() {
        let location = week();
        let report = daily_planner(PlannerConfig::simulation(), 2).rotate(&location);

        assert!(report.dry_run);
        assert_eq!(report.removed_count(), 2);
        assert!(location.removed().is_empty());
    }

    #[test]
    fn test_missing_location_aborts() {
        let mut location = week();
        location.exists = false;
        let report = daily_planner(PlannerConfig::default(), 2).rotate(&location);

        assert_eq!(report.outcome, Outcome::Aborted);
        assert!(report.error.unwrap().contains("does not exist"));
        assert!(location.removed().is_empty());
    }

    #[test]
    fn test_force_continues_after_failed_sanity_check() {
        let mut location = week();
        location.writable = false;
        let config = PlannerConfig {
            force: true,
            ..PlannerConfig::default()
        };
        let report = daily_planner(config, 2).rotate(&location);

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(location.removed().len(), 2);
    }

    #[test]
    fn test_force_with_unlistable_location_removes_nothing() {
        let mut location = week();
        location.exists = false;
        location.listable = false;
        let config = PlannerConfig {
            force: true,
            ..PlannerConfig::default()
        };
        let report = daily_planner(config, 2).rotate(&location);

        assert_eq!(report.outcome, Outcome::Completed);
        assert!(report.records.is_empty());
        assert!(location.removed().is_empty());
    }

    #[test]
    fn test_custom_command_skips_writability_check() {
        let mut location = week();
        location.writable = false;
        let config = PlannerConfig {
            removal_command: RemovalCommand::new(vec!["trash-put".to_string()]).unwrap(),
            ..PlannerConfig::default()
        };
        let planner = daily_planner(config, 2);
        assert!(planner.sanity_check(&location).is_ok());

        let report = planner.rotate(&location);
        assert_eq!(report.outcome, Outcome::Completed);
        let removed = location.removed.lock().unwrap();
        assert_eq!(removed[0].1, vec!["trash-put", "/mock/2014-06-24@20:06"]);
    }

    #[test]
    fn test_removal_failure_does_not_stop_remaining() {
        let mut location = week();
        location.failing.insert("/mock/2014-06-24@20:06".to_string());
        let report = daily_planner(PlannerConfig::default(), 2).rotate(&location);

        assert_eq!(report.outcome, Outcome::PartiallyFailed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/mock/2014-06-24@20:06");
        assert_eq!(report.removed_count(), 1);
        assert_eq!(location.removed(), vec!["/mock/2014-06-25@20:03"]);
    }

    #[test]
    fn test_every_removal_failing_removes_nothing() {
        let mut location = MockLocation::new(&["2014-06-29@20:01", "2014-06-30@20:03"]);
        location.failing.insert("/mock/2014-06-29@20:01".to_string());
        let report = daily_planner(PlannerConfig::default(), 1).rotate(&location);

        assert_eq!(report.outcome, Outcome::PartiallyFailed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.removed_count(), 0);
        assert_eq!(report.preserved_count(), 1);
    }

    #[test]
    fn test_dry_run_skips_writability_check() {
        let mut location = week();
        location.writable = false;
        let planner = daily_planner(PlannerConfig::simulation(), 2);
        assert!(planner.sanity_check(&location).is_ok());

        let report = planner.rotate(&location);
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.removed_count(), 2);
        assert!(location.removed().is_empty());
    }

    #[test]
    fn test_dry_run_still_requires_readable_location() {
        let mut location = week();
        location.readable = false;
        let report = daily_planner(PlannerConfig::simulation(), 2).rotate(&location);
        assert_eq!(report.outcome, Outcome::Aborted);
    }

    #[test]
    fn test_records_carry_matched_frequencies() {
        let location = week();
        let report = daily_planner(PlannerConfig::simulation(), 1).rotate(&location);
        let last = report.records.last().unwrap();
        assert_eq!(last.action, Action::Preserved);
        assert_eq!(last.matched_frequencies, vec![Frequency::Daily]);
    }
}
