//! The nine-field time tuple used as both input and output of resolution.
//!
//! The layout follows the classic broken-down time convention: calendar
//! fields, then weekday (Monday = 0), day of year (1-based) and a DST flag
//! (-1 unknown, 0 standard, 1 daylight saving).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// DST flag value meaning "not known". Every computed result carries it,
/// since the engine has no time zone to consult.
pub const DST_UNKNOWN: i8 = -1;

/// A point in time as a broken-down tuple.
///
/// Supplied by the caller as the anchor of a resolution and never mutated.
/// The same shape is returned as the result, see [`ResultInstant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceInstant {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 1-31, must exist in `month`
    pub day: u32,
    /// 0-23
    pub hour: u32,
    /// 0-59
    pub minute: u32,
    /// 0-59
    pub second: u32,
    /// 0-6, Monday = 0
    pub weekday: u32,
    /// 1-366
    pub year_day: u32,
    /// -1, 0 or 1
    pub is_dst: i8,
}

/// The resolved instant. Same shape as the reference it was derived from.
pub type ResultInstant = ReferenceInstant;

impl ReferenceInstant {
    /// Build a tuple from a naive datetime, deriving weekday and day of year.
    ///
    /// Sub-second precision is dropped.
    pub fn from_naive(dt: NaiveDateTime, is_dst: i8) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            weekday: dt.weekday().num_days_from_monday(),
            year_day: dt.ordinal(),
            is_dst,
        }
    }

    /// Check every field and convert to a `NaiveDateTime`.
    ///
    /// Out-of-range fields are rejected, never normalized: `day = 31` in
    /// April is an error, not May 1st. `weekday` and `year_day` are only
    /// range-checked; they do not have to agree with the date.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInput`] naming the first offending field.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        check_range("month", self.month, 1, 12)?;
        check_range("day", self.day, 1, 31)?;
        check_range("hour", self.hour, 0, 23)?;
        check_range("minute", self.minute, 0, 59)?;
        check_range("second", self.second, 0, 59)?;
        check_range("weekday", self.weekday, 0, 6)?;
        check_range("year_day", self.year_day, 1, 366)?;
        if !(-1..=1).contains(&self.is_dst) {
            return Err(ResolveError::InvalidInput(format!(
                "is_dst must be -1, 0 or 1, got {}",
                self.is_dst
            )));
        }

        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            ResolveError::InvalidInput(format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            ))
        })?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second).ok_or_else(
            || {
                ResolveError::InvalidInput(format!(
                    "{:02}:{:02}:{:02} is not a time of day",
                    self.hour, self.minute, self.second
                ))
            },
        )?;
        Ok(date.and_time(time))
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ResolveError::InvalidInput(format!(
            "{field} must be in {min}..={max}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceInstant {
        // Wednesday, February 18, 2026, 14:30:15
        let dt = NaiveDate::from_ymd_opt(2026, 2, 18)
            .unwrap()
            .and_hms_opt(14, 30, 15)
            .unwrap();
        ReferenceInstant::from_naive(dt, 0)
    }

    #[test]
    fn test_from_naive_derives_weekday_and_year_day() {
        let inst = sample();
        assert_eq!(inst.weekday, 2); // Wednesday
        assert_eq!(inst.year_day, 49);
        assert_eq!(inst.is_dst, 0);
    }

    #[test]
    fn test_to_naive_round_trips_fields() {
        let inst = sample();
        let dt = inst.to_naive().unwrap();
        assert_eq!(dt.to_string(), "2026-02-18 14:30:15");
    }

    #[test]
    fn test_rejects_month_out_of_range() {
        let mut inst = sample();
        inst.month = 13;
        let err = inst.to_naive().unwrap_err().to_string();
        assert!(err.contains("Invalid input"), "got: {err}");
        assert!(err.contains("month"), "got: {err}");
    }

    #[test]
    fn test_rejects_nonexistent_date() {
        let mut inst = sample();
        inst.day = 30; // February 30th
        let err = inst.to_naive().unwrap_err().to_string();
        assert!(err.contains("not a calendar date"), "got: {err}");
    }

    #[test]
    fn test_rejects_leap_day_in_common_year() {
        let mut inst = sample();
        inst.year = 2025;
        inst.day = 29;
        assert!(inst.to_naive().is_err());

        inst.year = 2024;
        assert!(inst.to_naive().is_ok());
    }

    #[test]
    fn test_rejects_hour_24() {
        let mut inst = sample();
        inst.hour = 24;
        assert!(matches!(inst.to_naive(), Err(ResolveError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_bad_dst_flag() {
        let mut inst = sample();
        inst.is_dst = 2;
        assert!(inst.to_naive().is_err());
    }

    #[test]
    fn test_inconsistent_weekday_is_tolerated() {
        let mut inst = sample();
        inst.weekday = 6;
        inst.year_day = 1;
        assert!(inst.to_naive().is_ok());
    }

    #[test]
    fn test_serializes_as_named_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["year"], 2026);
        assert_eq!(json["year_day"], 49);
        assert_eq!(json["is_dst"], 0);
    }
}
