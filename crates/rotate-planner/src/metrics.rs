//! Metrics collection for rotation runs

use rotate_domain::Frequency;
use std::collections::BTreeMap;

use crate::{LocationReport, Outcome};

/// Counters aggregated over the location reports of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationMetrics {
    /// Backups preserved
    pub preserved: usize,

    /// Backups removed (or simulated, under dry-run)
    pub removed: usize,

    /// Removals that failed
    pub failed: usize,

    /// Preserved backups per matching frequency
    pub matches: BTreeMap<Frequency, usize>,

    /// Locations rotated (whatever the outcome)
    pub locations: usize,

    /// Locations aborted before any removal
    pub aborted_locations: usize,

    /// Wall-clock duration of the run in milliseconds
    pub total_runtime_ms: u64,
}

impl RotationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a set of reports
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a LocationReport>) -> Self {
        let mut metrics = Self::new();
        for report in reports {
            metrics.record_report(report);
        }
        metrics
    }

    /// Add one location's report
    pub fn record_report(&mut self, report: &LocationReport) {
        self.locations += 1;
        if report.outcome == Outcome::Aborted {
            self.aborted_locations += 1;
        }

        self.preserved += report.preserved_count();
        self.removed += report.removed_count();
        self.failed += report.failures.len();

        for record in &report.records {
            for frequency in &record.matched_frequencies {
                *self.matches.entry(*frequency).or_insert(0) += 1;
            }
        }
    }

    /// Whether every location completed without errors
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.aborted_locations == 0
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Rotation Summary".to_string(),
            "================".to_string(),
            format!("Locations: {}", self.locations),
            format!("Preserved: {}", self.preserved),
            format!("Removed: {}", self.removed),
        ];

        if self.failed > 0 {
            lines.push(format!("Failed removals: {}", self.failed));
        }
        if self.aborted_locations > 0 {
            lines.push(format!("Aborted locations: {}", self.aborted_locations));
        }
        lines.push(format!("Total runtime: {}ms", self.total_runtime_ms));

        if !self.matches.is_empty() {
            lines.push(String::new());
            lines.push("Matches by frequency:".to_string());
            for (frequency, count) in &self.matches {
                lines.push(format!("  {}: {}", frequency, count));
            }
        }

        lines.join("\n")
    }
}
