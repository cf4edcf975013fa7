//! Scanning locations into timestamped backups

use chrono::NaiveDateTime;
use rotate_domain::{backup::file_name, Backup, Location, RotationFlags};

use crate::{EngineError, FilenameFilter, FilterVerdict, TimestampExtractor};

/// Turns location listings into chronologically sorted backups
#[derive(Debug, Clone, Default)]
pub struct BackupCollector {
    extractor: TimestampExtractor,
    filter: FilenameFilter,
}

impl BackupCollector {
    /// Create a collector from an extractor and a filter
    pub fn new(extractor: TimestampExtractor, filter: FilenameFilter) -> Self {
        Self { extractor, filter }
    }

    /// Create a collector from rotation flags and an optional custom pattern
    pub fn from_flags(
        flags: &RotationFlags,
        timestamp_pattern: Option<&str>,
    ) -> Result<Self, EngineError> {
        let extractor = match timestamp_pattern {
            Some(pattern) => TimestampExtractor::with_pattern(pattern)?,
            None => TimestampExtractor::new(),
        };
        tracing::debug!("Using timestamp pattern {}", extractor.pattern());
        let filter = FilenameFilter::new(&flags.include, &flags.exclude)?;
        Ok(Self::new(extractor, filter))
    }

    /// List `location` once and collect its backups
    pub fn collect<L: Location>(&self, location: &L) -> Result<Vec<Backup>, L::Error> {
        let name = location.name();
        tracing::info!("Scanning {} for backups", name);
        let entries = location.list()?;
        let backups = self.scan_entries(&name, entries);
        if !backups.is_empty() {
            tracing::info!("Found {} timestamped backups in {}", backups.len(), name);
        }
        Ok(backups)
    }

    /// Collect backups from an already listed set of entries
    ///
    /// Entries without a timestamp, entries filtered out and entries with
    /// impossible calendar values are skipped.
    pub fn scan_entries<I>(&self, location: &str, entries: I) -> Vec<Backup>
    where
        I: IntoIterator<Item = String>,
    {
        let mut backups = Vec::new();

        for path in entries {
            match self.scan_entry(&path) {
                Scanned::Backup(timestamp) => backups.push(Backup::new(path, timestamp, location)),
                Scanned::Filtered(FilterVerdict::Excluded) => {
                    tracing::debug!("Excluded {} (it matched the exclude list)", path);
                }
                Scanned::Filtered(_) => {
                    tracing::debug!("Excluded {} (it didn't match the include list)", path);
                }
                Scanned::NoTimestamp => {
                    tracing::debug!("Failed to match timestamp in {}", path);
                }
                Scanned::InvalidTimestamp(e) => {
                    tracing::warn!("Ignoring {}: {}", path, e);
                }
            }
        }

        backups.sort();
        backups
    }

    // Name filters run first so filtered entries never produce warnings.
    fn scan_entry(&self, path: &str) -> Scanned {
        let name = file_name(path);
        match self.filter.check(name) {
            FilterVerdict::Accepted => {}
            verdict => return Scanned::Filtered(verdict),
        }
        match self.extractor.extract(name) {
            Ok(Some(timestamp)) => Scanned::Backup(timestamp),
            Ok(None) => Scanned::NoTimestamp,
            Err(e) => Scanned::InvalidTimestamp(e),
        }
    }
}

/// What scanning one entry produced
#[derive(Debug)]
enum Scanned {
    Backup(NaiveDateTime),
    Filtered(FilterVerdict),
    NoTimestamp,
    InvalidTimestamp(EngineError),
}
