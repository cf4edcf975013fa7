//! Frequency module - retention granularities and their calendar buckets

use chrono::{Datelike, Months, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named retention granularity
///
/// Frequencies are ordered from the finest to the coarsest granularity:
/// minutely < hourly < daily < weekly < monthly < yearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One period per calendar minute
    Minutely,

    /// One period per calendar hour
    Hourly,

    /// One period per calendar day
    Daily,

    /// One period per ISO week
    Weekly,

    /// One period per calendar month
    Monthly,

    /// One period per calendar year
    Yearly,
}

/// Calendar bucket of a timestamp for one frequency
///
/// Keys of the same frequency sort chronologically. Keys of different
/// frequencies are not meant to be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey(i32, u32, u32, u32, u32);

impl Frequency {
    /// All frequencies, finest granularity first
    pub const ALL: [Frequency; 6] = [
        Frequency::Minutely,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Get the frequency name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Minutely => "minutely",
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Compute the period a timestamp belongs to for this frequency
    ///
    /// Weekly periods use the ISO week-numbering year, so the last days of
    /// December can belong to week 1 of the following year.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rotate_domain::Frequency;
    ///
    /// let monday = NaiveDate::from_ymd_opt(2014, 6, 30).unwrap().and_hms_opt(8, 0, 0).unwrap();
    /// let wednesday = NaiveDate::from_ymd_opt(2014, 7, 2).unwrap().and_hms_opt(20, 0, 0).unwrap();
    ///
    /// assert_eq!(Frequency::Weekly.period_key(&monday), Frequency::Weekly.period_key(&wednesday));
    /// assert_ne!(Frequency::Monthly.period_key(&monday), Frequency::Monthly.period_key(&wednesday));
    /// ```
    pub fn period_key(&self, timestamp: &NaiveDateTime) -> PeriodKey {
        let (year, month, day) = (timestamp.year(), timestamp.month(), timestamp.day());
        match self {
            Frequency::Minutely => {
                PeriodKey(year, month, day, timestamp.hour(), timestamp.minute())
            }
            Frequency::Hourly => PeriodKey(year, month, day, timestamp.hour(), 0),
            Frequency::Daily => PeriodKey(year, month, day, 0, 0),
            Frequency::Weekly => {
                let week = timestamp.iso_week();
                PeriodKey(week.year(), week.week(), 0, 0, 0)
            }
            Frequency::Monthly => PeriodKey(year, month, 0, 0, 0),
            Frequency::Yearly => PeriodKey(year, 0, 0, 0, 0),
        }
    }

    /// Start of the time window covering `count` units of this frequency
    /// before `newest`
    ///
    /// Month and year arithmetic clamps to the end of shorter months.
    /// Returns `None` when the window reaches beyond the representable
    /// calendar range, i.e. when the window is unbounded.
    pub fn window_start(&self, newest: &NaiveDateTime, count: u64) -> Option<NaiveDateTime> {
        let units = i64::try_from(count).ok()?;
        let delta = match self {
            Frequency::Minutely => TimeDelta::try_minutes(units),
            Frequency::Hourly => TimeDelta::try_hours(units),
            Frequency::Daily => TimeDelta::try_days(units),
            Frequency::Weekly => TimeDelta::try_weeks(units),
            Frequency::Monthly => {
                let months = u32::try_from(count).ok()?;
                return newest.checked_sub_months(Months::new(months));
            }
            Frequency::Yearly => {
                let months = u32::try_from(count).ok()?.checked_mul(12)?;
                return newest.checked_sub_months(Months::new(months));
            }
        };
        delta.and_then(|delta| newest.checked_sub_signed(delta))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_granularity_order() {
        assert!(Frequency::Minutely < Frequency::Hourly);
        assert!(Frequency::Hourly < Frequency::Daily);
        assert!(Frequency::Daily < Frequency::Weekly);
        assert!(Frequency::Weekly < Frequency::Monthly);
        assert!(Frequency::Monthly < Frequency::Yearly);

        let mut sorted = Frequency::ALL;
        sorted.sort();
        assert_eq!(sorted, Frequency::ALL);
    }

    #[test]
    fn test_hourly_and_minutely_keys() {
        let a = at(2016, 1, 10, 21, 15);
        let b = at(2016, 1, 10, 21, 45);
        assert_eq!(Frequency::Hourly.period_key(&a), Frequency::Hourly.period_key(&b));
        assert_ne!(Frequency::Minutely.period_key(&a), Frequency::Minutely.period_key(&b));
        assert!(Frequency::Minutely.period_key(&a) < Frequency::Minutely.period_key(&b));
    }

    #[test]
    fn test_weekly_key_uses_iso_year() {
        // 2014-12-29 is the Monday of ISO week 1 of 2015
        let late_december = at(2014, 12, 29, 12, 0);
        let early_january = at(2015, 1, 2, 12, 0);
        let mid_december = at(2014, 12, 22, 12, 0);

        let weekly = Frequency::Weekly;
        assert_eq!(weekly.period_key(&late_december), weekly.period_key(&early_january));
        assert!(weekly.period_key(&mid_december) < weekly.period_key(&late_december));
    }

    #[test]
    fn test_window_start_calendar_units() {
        let newest = at(2014, 7, 2, 20, 3);
        assert_eq!(Frequency::Hourly.window_start(&newest, 24), Some(at(2014, 7, 1, 20, 3)));
        assert_eq!(Frequency::Daily.window_start(&newest, 7), Some(at(2014, 6, 25, 20, 3)));
        assert_eq!(Frequency::Weekly.window_start(&newest, 4), Some(at(2014, 6, 4, 20, 3)));
        assert_eq!(Frequency::Monthly.window_start(&newest, 12), Some(at(2013, 7, 2, 20, 3)));
        assert_eq!(Frequency::Yearly.window_start(&newest, 2), Some(at(2012, 7, 2, 20, 3)));
    }

    #[test]
    fn test_window_start_clamps_month_end() {
        let newest = at(2014, 3, 31, 0, 0);
        assert_eq!(Frequency::Monthly.window_start(&newest, 1), Some(at(2014, 2, 28, 0, 0)));
    }

    #[test]
    fn test_window_start_unbounded() {
        let newest = at(2014, 3, 31, 0, 0);
        assert_eq!(Frequency::Minutely.window_start(&newest, u64::MAX), None);
        assert_eq!(Frequency::Yearly.window_start(&newest, 1_000_000), None);
    }

    proptest! {
        #[test]
        fn prop_period_keys_are_monotonic(a in 0i64..2_000_000_000, b in 0i64..2_000_000_000) {
            let base = at(1970, 1, 1, 0, 0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let earlier = base + TimeDelta::try_seconds(lo).unwrap();
            let later = base + TimeDelta::try_seconds(hi).unwrap();
            for frequency in Frequency::ALL {
                prop_assert!(frequency.period_key(&earlier) <= frequency.period_key(&later));
            }
        }
    }
}
