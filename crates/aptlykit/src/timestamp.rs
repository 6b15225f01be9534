//! Timestamp tokens for naming generated artifacts
//!
//! Tokens are compact, UTC and lexicographically sortable
//! (`20151001T2300Z`), so snapshot names sort by creation time.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Weekday};

/// Placeholder replaced by the timestamp token in name templates
pub const TIMESTAMP_PLACEHOLDER: &str = "%T";

/// Granularity of a timestamp token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Minute,
    Second,
}

impl Precision {
    fn pattern(self) -> &'static str {
        match self {
            Self::Minute => "%Y%m%dT%H%MZ",
            Self::Second => "%Y%m%dT%H%M%SZ",
        }
    }
}

/// Format a UTC instant with minute precision (`20151001T2300Z`)
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format_timestamp_with(ts, Precision::Minute)
}

pub fn format_timestamp_with(ts: &NaiveDateTime, precision: Precision) -> String {
    ts.format(precision.pattern()).to_string()
}

/// Replace `%T` in `template` with the token for `ts`
pub fn expand_timestamped_name(template: &str, ts: &NaiveDateTime) -> String {
    template.replace(TIMESTAMP_PLACEHOLDER, &format_timestamp(ts))
}

/// Boundary a timestamp is rounded down to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Every day at `time`
    Daily { time: NaiveTime },
    /// Every `weekday` at `time`
    Weekly { weekday: Weekday, time: NaiveTime },
}

impl Schedule {
    /// Parse a daily schedule from `HH:MM`
    pub fn daily(time: &str) -> Result<Self> {
        Ok(Self::Daily {
            time: parse_time(time)?,
        })
    }

    /// Parse a weekly schedule from a weekday name (`sat`, `Saturday`) and `HH:MM`
    pub fn weekly(weekday: &str, time: &str) -> Result<Self> {
        let weekday = weekday
            .parse::<Weekday>()
            .map_err(|_| Error::InvalidSchedule(format!("unknown weekday '{weekday}'")))?;
        Ok(Self::Weekly {
            weekday,
            time: parse_time(time)?,
        })
    }
}

fn parse_time(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| Error::InvalidSchedule(format!("expected HH:MM, got '{time}'")))
}

/// Round `ts` down to the most recent boundary of `schedule`.
///
/// A timestamp exactly on a boundary is returned unchanged.
pub fn round_timestamp(ts: &NaiveDateTime, schedule: &Schedule) -> NaiveDateTime {
    match *schedule {
        Schedule::Daily { time } => {
            let candidate = ts.date().and_time(time);
            if candidate > *ts {
                candidate - TimeDelta::days(1)
            } else {
                candidate
            }
        }
        Schedule::Weekly { weekday, time } => {
            let days_back = (ts.weekday().num_days_from_monday() + 7
                - weekday.num_days_from_monday())
                % 7;
            let candidate = ts.date().and_time(time) - TimeDelta::days(i64::from(days_back));
            if candidate > *ts {
                candidate - TimeDelta::weeks(1)
            } else {
                candidate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&at(2015, 10, 1, 23, 0)), "20151001T2300Z");
    }

    #[test]
    fn test_format_timestamp_seconds() {
        let ts = NaiveDate::from_ymd_opt(2015, 10, 1)
            .unwrap()
            .and_hms_opt(23, 0, 42)
            .unwrap();
        assert_eq!(format_timestamp_with(&ts, Precision::Second), "20151001T230042Z");
        assert_eq!(format_timestamp(&ts), "20151001T2300Z");
    }

    #[test]
    fn test_tokens_sort_chronologically() {
        let earlier = format_timestamp(&at(2015, 9, 30, 23, 59));
        let later = format_timestamp(&at(2015, 10, 1, 0, 0));
        assert!(earlier < later);
    }

    #[test]
    fn test_expand_timestamped_name() {
        assert_eq!(
            expand_timestamped_name("debian-main-%T", &at(2015, 10, 1, 23, 0)),
            "debian-main-20151001T2300Z"
        );
        assert_eq!(
            expand_timestamped_name("static", &at(2015, 10, 1, 23, 0)),
            "static"
        );
    }

    #[test]
    fn test_round_daily() {
        let schedule = Schedule::daily("22:00").unwrap();
        assert_eq!(
            round_timestamp(&at(2015, 10, 1, 23, 0), &schedule),
            at(2015, 10, 1, 22, 0)
        );
        assert_eq!(
            round_timestamp(&at(2015, 10, 1, 21, 0), &schedule),
            at(2015, 9, 30, 22, 0)
        );
        assert_eq!(
            round_timestamp(&at(2015, 10, 1, 22, 0), &schedule),
            at(2015, 10, 1, 22, 0)
        );
    }

    #[test]
    fn test_round_weekly() {
        // 2015-10-01 is a Thursday.
        let schedule = Schedule::weekly("sat", "22:00").unwrap();
        assert_eq!(
            round_timestamp(&at(2015, 10, 1, 23, 0), &schedule),
            at(2015, 9, 26, 22, 0)
        );
        assert_eq!(
            round_timestamp(&at(2015, 10, 3, 21, 0), &schedule),
            at(2015, 9, 26, 22, 0)
        );
        assert_eq!(
            round_timestamp(&at(2015, 10, 3, 23, 0), &schedule),
            at(2015, 10, 3, 22, 0)
        );
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(matches!(
            Schedule::daily("25:99"),
            Err(Error::InvalidSchedule(_))
        ));
        assert!(matches!(
            Schedule::weekly("someday", "10:00"),
            Err(Error::InvalidSchedule(_))
        ));
    }
}
