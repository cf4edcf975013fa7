//! Timestamp extraction from entry names

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::EngineError;

/// Pattern used when no custom timestamp pattern is configured
///
/// A required `YYYY MM DD` followed by an optional `hh mm` and an optional
/// `ss`, each component separated by any run of non-digit characters.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = r"(?x)
    (?P<year>\d{4}) \D*
    (?P<month>\d{2}) \D*
    (?P<day>\d{2})
    (?:
        \D* (?P<hour>\d{2}) \D* (?P<minute>\d{2})
        (?: \D* (?P<second>\d{2}) )?
    )?
";

const REQUIRED_GROUPS: [&str; 3] = ["year", "month", "day"];

/// Parses fuzzy calendar timestamps out of entry names
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    pattern: Regex,
}

impl Default for TimestampExtractor {
    fn default() -> Self {
        Self {
            pattern: default_pattern().clone(),
        }
    }
}

fn default_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| match Regex::new(DEFAULT_TIMESTAMP_PATTERN) {
        Ok(pattern) => pattern,
        Err(e) => unreachable!("built-in timestamp pattern is valid: {}", e),
    })
}

impl TimestampExtractor {
    /// Extractor using [`DEFAULT_TIMESTAMP_PATTERN`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor using a caller supplied regular expression
    ///
    /// The pattern must define the named groups `year`, `month` and `day`;
    /// `hour`, `minute` and `second` are optional and default to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotate_engine::TimestampExtractor;
    ///
    /// let extractor = TimestampExtractor::with_pattern(
    ///     r"-(?P<day>\d{2})-(?P<month>\d{2})-(?P<year>\d{4})\.",
    /// ).unwrap();
    /// let timestamp = extractor
    ///     .extract("prometheus-grafana-production-09-04-2020.tar.gz")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(timestamp.to_string(), "2020-04-09 00:00:00");
    ///
    /// assert!(TimestampExtractor::with_pattern(r"(?P<year>\d{4})").is_err());
    /// ```
    pub fn with_pattern(pattern: &str) -> Result<Self, EngineError> {
        let pattern =
            Regex::new(pattern).map_err(|e| EngineError::InvalidPattern(e.to_string()))?;

        let names: Vec<&str> = pattern.capture_names().flatten().collect();
        let missing: Vec<&str> = REQUIRED_GROUPS
            .iter()
            .copied()
            .filter(|group| !names.contains(group))
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::InvalidPattern(format!(
                "missing named group(s) {} in {}",
                missing.join(", "),
                pattern.as_str()
            )));
        }

        Ok(Self { pattern })
    }

    /// The compiled pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Extract the timestamp encoded in `name`
    ///
    /// Returns `Ok(None)` when the pattern does not match and
    /// [`EngineError::InvalidTimestamp`] when it matches impossible calendar
    /// values.
    pub fn extract(&self, name: &str) -> Result<Option<NaiveDateTime>, EngineError> {
        let Some(captures) = self.pattern.captures(name) else {
            return Ok(None);
        };

        let invalid = |reason: String| EngineError::InvalidTimestamp {
            name: name.to_string(),
            reason,
        };

        let year = component(&captures, "year").map_err(invalid)?;
        let month = component(&captures, "month").map_err(invalid)?;
        let day = component(&captures, "day").map_err(invalid)?;
        let hour = component(&captures, "hour").map_err(invalid)?;
        let minute = component(&captures, "minute").map_err(invalid)?;
        let second = component(&captures, "second").map_err(invalid)?;

        let year = i32::try_from(year).map_err(|_| invalid(format!("year {}", year)))?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid(format!("no such date {:04}-{:02}-{:02}", year, month, day)))?;
        let timestamp = date.and_hms_opt(hour, minute, second).ok_or_else(|| {
            invalid(format!("no such time {:02}:{:02}:{:02}", hour, minute, second))
        })?;

        Ok(Some(timestamp))
    }
}

/// Numeric value of a named group, zero when the group did not participate
fn component(captures: &Captures<'_>, group: &str) -> Result<u32, String> {
    match captures.name(group) {
        Some(value) => value
            .as_str()
            .parse()
            .map_err(|_| format!("{} {:?} is not a number", group, value.as_str())),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(name: &str) -> Option<String> {
        TimestampExtractor::new()
            .extract(name)
            .unwrap()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    #[test]
    fn test_date_and_time_with_separators() {
        assert_eq!(extract("2014-06-30@20:03"), Some("2014-06-30 20:03:00".to_string()));
        assert_eq!(
            extract("backup-2016-01-10_21-15-00"),
            Some("2016-01-10 21:15:00".to_string())
        );
        assert_eq!(
            extract("galera_backup_db4.sl.example.lab_2016-03-17_10-00"),
            Some("2016-03-17 10:00:00".to_string())
        );
    }

    #[test]
    fn test_compact_and_date_only() {
        assert_eq!(extract("snapshot-201808030034"), Some("2018-08-03 00:34:00".to_string()));
        assert_eq!(extract("laptop-20140630.tar.gz"), Some("2014-06-30 00:00:00".to_string()));
        assert_eq!(
            extract("db 2014 06 30 08 15 42.sql"),
            Some("2014-06-30 08:15:42".to_string())
        );
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        assert_eq!(extract("some-random-directory"), None);
        assert_eq!(extract("rotate-backups.toml"), None);
    }

    #[test]
    fn test_impossible_calendar_value() {
        let err = TimestampExtractor::new()
            .extract("snapshot-180731150101")
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("snapshot-180731150101"));

        assert!(TimestampExtractor::new().extract("2014-02-30").is_err());
        assert!(TimestampExtractor::new().extract("2014-06-30@25:00").is_err());
    }

    #[test]
    fn test_custom_pattern_with_time() {
        let extractor = TimestampExtractor::with_pattern(
            r"--(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})--(?P<hour>\d{2})-(?P<minute>\d{2})-(?P<second>\d{2})",
        )
        .unwrap();
        let timestamp = extractor.extract("My-File--2009-12-31--23-59-59.txt").unwrap();
        assert_eq!(
            timestamp.map(|ts| ts.to_string()),
            Some("2009-12-31 23:59:59".to_string())
        );
    }

    #[test]
    fn test_custom_pattern_rejected() {
        assert!(matches!(
            TimestampExtractor::with_pattern(r"(?P<year>\d{4})-(?P<month>\d{2})"),
            Err(EngineError::InvalidPattern(message)) if message.contains("day")
        ));
        assert!(TimestampExtractor::with_pattern(r"(?P<year>\d{4}").is_err());
    }

    #[test]
    fn test_custom_pattern_non_numeric_group() {
        let extractor =
            TimestampExtractor::with_pattern(r"(?P<year>\w{4})-(?P<month>\d{2})-(?P<day>\d{2})")
                .unwrap();
        assert!(extractor.extract("abcd-01-02").is_err());
    }
}
