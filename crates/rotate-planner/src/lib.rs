//! Rotate Planner
//!
//! Turns rotation decisions into removals, one location at a time or in
//! parallel.
//!
//! # Overview
//!
//! The planner is responsible for:
//! - **Sanity checks**: refusing to touch missing, unreadable or (for the
//!   default removal command) unwritable locations unless forced
//! - **Removal**: executing the removal command through the location, or
//!   only reporting it under dry-run
//! - **Scheduling**: rotating locations concurrently while serializing
//!   locations that share a mount point or SSH host
//! - **Metrics collection**: aggregating per-location reports
//!
//! # Usage
//!
//! ## One location
//!
//! ```no_run
//! use rotate_domain::{Frequency, RetentionPeriod, RotationFlags, RotationScheme};
//! use rotate_engine::{BackupCollector, Classifier};
//! use rotate_location::LocalLocation;
//! use rotate_planner::{Planner, PlannerConfig};
//!
//! let scheme = RotationScheme::new()
//!     .with(Frequency::Daily, RetentionPeriod::Count(7))
//!     .with(Frequency::Monthly, RetentionPeriod::Always);
//! let planner = Planner::new(
//!     PlannerConfig::default(),
//!     BackupCollector::default(),
//!     Classifier::new(scheme, RotationFlags::default()),
//! );
//!
//! let report = planner.rotate(&LocalLocation::new("/srv/backups"));
//! println!("{:?}: {} removed", report.outcome, report.removed_count());
//! ```
//!
//! # Configuration
//!
//! ```toml
//! dry_run = false
//! force = false
//! parallel = true
//! max_workers = 4
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod planner;
mod report;
mod worker;

pub use config::PlannerConfig;
pub use error::PlannerError;
pub use metrics::RotationMetrics;
pub use planner::Planner;
pub use report::{LocationReport, Outcome, RemovalFailure};
pub use worker::{RotationJob, RotationWorker};
