//! Rotation classifier
//!
//! For every configured frequency the backups are bucketed into calendar
//! periods, one representative is chosen per period, and the most recent
//! representatives allowed by the retention period are marked as matching
//! that frequency. A backup is preserved when any frequency matched it.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rotate_domain::{
    Backup, Decision, Frequency, PeriodKey, RetentionPeriod, RotationFlags, RotationScheme,
};

/// Maps backups to keep/remove decisions
#[derive(Debug, Clone)]
pub struct Classifier {
    scheme: RotationScheme,
    flags: RotationFlags,
}

impl Classifier {
    /// Create a classifier for one rotation scheme
    pub fn new(scheme: RotationScheme, flags: RotationFlags) -> Self {
        Self { scheme, flags }
    }

    /// Decide the fate of every backup
    ///
    /// Decisions are returned in chronological order regardless of the
    /// input order. An empty scheme removes everything; refusing such a
    /// scheme is the caller's job.
    pub fn classify(&self, backups: &[Backup]) -> Vec<Decision> {
        let mut decisions: Vec<Decision> = backups.iter().cloned().map(Decision::new).collect();
        decisions.sort_by(|a, b| a.backup.cmp(&b.backup));

        let Some(newest) = decisions.last().map(|d| *d.backup.timestamp()) else {
            return decisions;
        };

        for (frequency, retention) in self.scheme.iter() {
            if !retention.is_preserving() {
                continue;
            }

            let selected = self.select(frequency, retention, &decisions, &newest);
            tracing::debug!(
                "{} retention {} selected {} backup(s)",
                frequency,
                retention,
                selected.len()
            );
            for index in selected {
                decisions[index].matched_frequencies.insert(frequency);
            }
        }

        decisions
    }

    /// Indices of the representatives `frequency` preserves
    fn select(
        &self,
        frequency: Frequency,
        retention: RetentionPeriod,
        decisions: &[Decision],
        newest: &NaiveDateTime,
    ) -> Vec<usize> {
        let representatives = self.representatives(frequency, decisions);

        let count = match retention {
            RetentionPeriod::Unset => return Vec::new(),
            RetentionPeriod::Always => return representatives,
            RetentionPeriod::Count(count) => count,
        };

        let window = if self.flags.strict {
            frequency.window_start(newest, count)
        } else {
            None
        };
        let candidates: Vec<usize> = match window {
            Some(minimum) => representatives
                .into_iter()
                .filter(|&index| *decisions[index].backup.timestamp() >= minimum)
                .collect(),
            None => representatives,
        };

        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        let skip = candidates.len().saturating_sub(limit);
        candidates[skip..].to_vec()
    }

    /// One backup per period, periods in chronological order
    fn representatives(&self, frequency: Frequency, decisions: &[Decision]) -> Vec<usize> {
        let mut periods: BTreeMap<PeriodKey, usize> = BTreeMap::new();
        for (index, decision) in decisions.iter().enumerate() {
            let key = frequency.period_key(decision.backup.timestamp());
            if self.flags.prefer_recent {
                periods.insert(key, index);
            } else {
                periods.entry(key).or_insert(index);
            }
        }
        periods.into_values().collect()
    }
}
