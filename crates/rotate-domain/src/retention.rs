//! Retention module - how many periods of each frequency to keep

use crate::Frequency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Retention specification for one frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPeriod {
    /// Frequency not configured; preserves nothing
    #[default]
    Unset,

    /// Keep the representatives of this many periods (0 preserves nothing)
    Count(u64),

    /// Keep the representative of every period
    Always,
}

impl RetentionPeriod {
    /// Whether this specification can preserve any backup at all
    pub fn is_preserving(&self) -> bool {
        match self {
            RetentionPeriod::Unset => false,
            RetentionPeriod::Count(count) => *count > 0,
            RetentionPeriod::Always => true,
        }
    }
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPeriod::Unset => f.write_str("unset"),
            RetentionPeriod::Count(count) => write!(f, "{}", count),
            RetentionPeriod::Always => f.write_str("always"),
        }
    }
}

impl std::str::FromStr for RetentionPeriod {
    type Err = String;

    /// Parse `always` (any case) or a non-negative integer
    ///
    /// Arithmetic expressions are the configuration layer's concern; they
    /// must be evaluated before reaching this type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("always") {
            return Ok(RetentionPeriod::Always);
        }
        value
            .parse::<u64>()
            .map(RetentionPeriod::Count)
            .map_err(|_| format!("Invalid retention period: {}", s))
    }
}

/// Per-frequency retention configuration
///
/// # Examples
///
/// ```
/// use rotate_domain::{Frequency, RetentionPeriod, RotationScheme};
///
/// let scheme = RotationScheme::new()
///     .with(Frequency::Daily, RetentionPeriod::Count(7))
///     .with(Frequency::Yearly, RetentionPeriod::Always);
///
/// assert_eq!(scheme.get(Frequency::Daily), RetentionPeriod::Count(7));
/// assert_eq!(scheme.get(Frequency::Hourly), RetentionPeriod::Unset);
/// assert!(!scheme.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationScheme {
    periods: BTreeMap<Frequency, RetentionPeriod>,
}

impl RotationScheme {
    /// Create an empty scheme (every frequency unset)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, frequency: Frequency, period: RetentionPeriod) -> Self {
        self.set(frequency, period);
        self
    }

    /// Set the retention for one frequency
    pub fn set(&mut self, frequency: Frequency, period: RetentionPeriod) {
        if period == RetentionPeriod::Unset {
            self.periods.remove(&frequency);
        } else {
            self.periods.insert(frequency, period);
        }
    }

    /// Retention for one frequency (`Unset` when not configured)
    pub fn get(&self, frequency: Frequency) -> RetentionPeriod {
        self.periods.get(&frequency).copied().unwrap_or_default()
    }

    /// True when no frequency can preserve anything
    pub fn is_empty(&self) -> bool {
        !self.periods.values().any(RetentionPeriod::is_preserving)
    }

    /// Configured frequencies, finest granularity first
    pub fn iter(&self) -> impl Iterator<Item = (Frequency, RetentionPeriod)> + '_ {
        self.periods.iter().map(|(frequency, period)| (*frequency, *period))
    }
}

impl fmt::Display for RotationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(frequency, period)| format!("{}={}", frequency, period))
            .collect();
        if parts.is_empty() {
            f.write_str("(empty)")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
