//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use rotate_domain::{Frequency, RemovalCommand, RotationFlags, RotationScheme};

use crate::error::{CliError, Result};
use crate::expression::parse_retention;

/// Rotate backups in local or remote directories according to a retention
/// scheme (hourly, daily, weekly, monthly and yearly counts).
#[derive(Debug, Parser)]
#[command(name = "rotate-backups")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of minutely backups to preserve
    #[arg(short = 'M', long, value_name = "COUNT")]
    pub minutely: Option<String>,

    /// Number of hourly backups to preserve
    #[arg(short = 'H', long, value_name = "COUNT")]
    pub hourly: Option<String>,

    /// Number of daily backups to preserve
    #[arg(short, long, value_name = "COUNT")]
    pub daily: Option<String>,

    /// Number of weekly backups to preserve
    #[arg(short, long, value_name = "COUNT")]
    pub weekly: Option<String>,

    /// Number of monthly backups to preserve
    #[arg(short, long, value_name = "COUNT")]
    pub monthly: Option<String>,

    /// Number of yearly backups to preserve
    #[arg(short, long, value_name = "COUNT")]
    pub yearly: Option<String>,

    /// Only process backups whose name matches this shell pattern
    #[arg(short = 'I', long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Never process backups whose name matches this shell pattern
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Select the last N periods with backups instead of the last N periods
    #[arg(short, long)]
    pub relaxed: bool,

    /// Preserve the newest backup of each period instead of the oldest
    #[arg(short, long)]
    pub prefer_recent: bool,

    /// Regular expression with named groups year, month and day (optionally
    /// hour, minute and second) matching backup timestamps
    #[arg(short, long, value_name = "REGEX")]
    pub timestamp_pattern: Option<String>,

    /// I/O scheduling class for removals (idle, best-effort or realtime)
    #[arg(short, long, value_name = "CLASS")]
    pub ionice: Option<String>,

    /// Command used to remove backups (default: rm -Rf)
    #[arg(short = 'C', long, value_name = "CMD")]
    pub removal_command: Option<String>,

    /// Configuration file (default: /etc/rotate-backups.toml and
    /// ~/.rotate-backups.toml)
    #[arg(short, long, value_name = "PATH", env = "ROTATE_BACKUPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run listings and removals through sudo
    #[arg(short, long)]
    pub use_sudo: bool,

    /// Login user for remote locations
    #[arg(long, value_name = "USER")]
    pub ssh_user: Option<String>,

    /// Collect regular files at any depth below each location
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Report what would be removed without removing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Continue with locations that fail their sanity checks
    #[arg(short, long)]
    pub force: bool,

    /// Rotate locations on different disks or hosts concurrently
    #[arg(short = 'P', long)]
    pub parallel: bool,

    /// Maximum number of locations rotated at once in parallel mode
    #[arg(short = 'j', long, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = CliFormat::Text)]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Directories to rotate (`/path` or `host:/path`); defaults to every
    /// configured location
    #[arg(value_name = "LOCATION")]
    pub locations: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human readable summary (default)
    Text,
    /// JSON report
    Json,
}

impl Cli {
    /// Retention scheme given by the frequency options
    pub fn rotation_scheme(&self) -> Result<RotationScheme> {
        let options = [
            (Frequency::Minutely, &self.minutely),
            (Frequency::Hourly, &self.hourly),
            (Frequency::Daily, &self.daily),
            (Frequency::Weekly, &self.weekly),
            (Frequency::Monthly, &self.monthly),
            (Frequency::Yearly, &self.yearly),
        ];

        let mut scheme = RotationScheme::new();
        for (frequency, value) in options {
            if let Some(value) = value {
                scheme.set(frequency, parse_retention(value)?);
            }
        }
        Ok(scheme)
    }

    /// Selection flags given by the filter options
    pub fn rotation_flags(&self) -> RotationFlags {
        let base = if self.relaxed {
            RotationFlags::relaxed()
        } else {
            RotationFlags::default()
        };
        RotationFlags {
            prefer_recent: self.prefer_recent,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            ..base
        }
    }

    /// Removal command template, split on whitespace
    pub fn removal_command_template(&self) -> Result<Option<Vec<String>>> {
        match &self.removal_command {
            None => Ok(None),
            Some(command) => {
                let template: Vec<String> = command.split_whitespace().map(str::to_string).collect();
                RemovalCommand::new(template.clone()).map_err(CliError::Config)?;
                Ok(Some(template))
            }
        }
    }
}
