//! Rotate Engine
//!
//! Decides which backups to keep under a multi-frequency rotation scheme.
//!
//! The engine provides:
//! - Timestamp extraction from entry names (default or custom pattern)
//! - Include/exclude filtering with shell-style globs
//! - Backup collection from any [`Location`](rotate_domain::Location)
//! - Classification into preserved and removed backups
//!
//! # Examples
//!
//! ```
//! use rotate_domain::{Frequency, RetentionPeriod, RotationFlags, RotationScheme};
//! use rotate_engine::{BackupCollector, Classifier};
//!
//! let collector = BackupCollector::default();
//! let backups = collector.scan_entries(
//!     "/srv/backups",
//!     vec![
//!         "/srv/backups/2014-06-29".to_string(),
//!         "/srv/backups/2014-06-30".to_string(),
//!         "/srv/backups/README".to_string(),
//!     ],
//! );
//!
//! let scheme = RotationScheme::new().with(Frequency::Daily, RetentionPeriod::Count(1));
//! let decisions = Classifier::new(scheme, RotationFlags::default()).classify(&backups);
//!
//! assert_eq!(decisions.len(), 2);
//! assert!(!decisions[0].is_preserved());
//! assert!(decisions[1].is_preserved());
//! ```

#![warn(missing_docs)]

mod classifier;
mod collect;
mod error;
mod filter;
mod timestamp;

pub use classifier::Classifier;
pub use collect::BackupCollector;
pub use error::EngineError;
pub use filter::{FilenameFilter, FilterVerdict};
pub use timestamp::{TimestampExtractor, DEFAULT_TIMESTAMP_PATTERN};
