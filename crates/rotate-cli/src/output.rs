//! Output formatting for the CLI.

use colored::*;
use rotate_domain::{backup, Action};
use rotate_planner::{LocationReport, Outcome, RotationMetrics};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

use crate::cli::CliFormat;
use crate::error::Result;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the reports of a run.
    pub fn format_run(&self, reports: &[LocationReport], metrics: &RotationMetrics) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_run_json(reports, metrics),
            CliFormat::Text => Ok(self.format_run_text(reports, metrics)),
        }
    }

    fn format_run_json(&self, reports: &[LocationReport], metrics: &RotationMetrics) -> Result<String> {
        let matches: serde_json::Map<String, serde_json::Value> = metrics
            .matches
            .iter()
            .map(|(frequency, count)| (frequency.to_string(), serde_json::json!(count)))
            .collect();

        let output = serde_json::json!({
            "locations": reports,
            "summary": {
                "locations": metrics.locations,
                "aborted_locations": metrics.aborted_locations,
                "preserved": metrics.preserved,
                "removed": metrics.removed,
                "failed": metrics.failed,
                "matches": matches,
                "total_runtime_ms": metrics.total_runtime_ms,
                "success": metrics.is_clean(),
            }
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_run_text(&self, reports: &[LocationReport], metrics: &RotationMetrics) -> String {
        if reports.is_empty() {
            return self.colorize("No locations rotated.", "yellow");
        }

        let mut sections: Vec<String> = reports.iter().map(|r| self.format_report(r)).collect();
        sections.push(self.format_summary_table(reports));

        let totals = format!(
            "{} preserved, {} {}, {} failed",
            metrics.preserved,
            metrics.removed,
            if reports.iter().any(|r| r.dry_run) { "would be removed" } else { "removed" },
            metrics.failed
        );
        sections.push(if metrics.is_clean() {
            self.success(&totals)
        } else {
            self.error(&totals)
        });

        sections.join("\n\n")
    }

    /// Format the records of one location.
    pub fn format_report(&self, report: &LocationReport) -> String {
        let mut heading = format!("{}: {}", report.location, self.outcome(report.outcome));
        if report.dry_run {
            heading.push_str(" (dry run)");
        }

        let mut lines = vec![heading];
        if let Some(error) = &report.error {
            lines.push(self.error(error));
            return lines.join("\n");
        }

        if report.records.is_empty() {
            lines.push(self.colorize("No backups found.", "yellow"));
        } else {
            lines.push(self.format_records_table(report));
        }
        for failure in &report.failures {
            lines.push(self.error(&format!("{}: {}", failure.path, failure.error)));
        }
        lines.join("\n")
    }

    fn format_records_table(&self, report: &LocationReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Backup", "Action", "Matches"]);

        for record in &report.records {
            let action = match record.action {
                Action::Preserved => self.colorize("preserve", "green"),
                Action::Removed if report.dry_run => self.colorize("would remove", "yellow"),
                Action::Removed if report.is_failed(&record.path) => self.colorize("failed", "red"),
                Action::Removed => self.colorize("remove", "red"),
            };
            let matches: Vec<&str> = record.matched_frequencies.iter().map(|f| f.as_str()).collect();
            builder.push_record([
                backup::file_name(&record.path).to_string(),
                action,
                matches.join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn format_summary_table(&self, reports: &[LocationReport]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Location", "Outcome", "Preserved", "Removed", "Failed"]);

        for report in reports {
            builder.push_record([
                report.location.clone(),
                self.outcome(report.outcome),
                report.preserved_count().to_string(),
                report.removed_count().to_string(),
                report.failures.len().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn outcome(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Completed => self.colorize("completed", "green"),
            Outcome::PartiallyFailed => self.colorize("partially failed", "yellow"),
            Outcome::Aborted => self.colorize("aborted", "red"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
