//! Calendar arithmetic for matched rules.
//!
//! Minute offsets are exact elapsed time applied to the whole instant, so
//! they carry through hours, days, months and years. Day and week offsets
//! move the calendar date by whole days and leave the time of day alone.
//! Everything is checked: a result outside chrono's range is an
//! [`Overflow`](ResolveError::Overflow), never a wrapped value.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{ResolveError, Result};
use crate::grammar::{DefaultTimePolicy, Offset};
use crate::instant::{ReferenceInstant, ResultInstant, DST_UNKNOWN};
use crate::vocabulary::{BaseDelta, NumeralValue};

/// Apply `policy` (and `offset`, for quantity rules) to `reference`.
///
/// `anchor` is the time of day forced by [`DefaultTimePolicy::AnchorTime`].
///
/// # Errors
///
/// - [`ResolveError::InvalidInput`] if `reference` is not a valid instant, or
///   the policy needs an offset and none was given.
/// - [`ResolveError::Overflow`] if the quantity or the resulting date is out
///   of range.
pub fn apply(
    reference: &ReferenceInstant,
    offset: Option<&Offset>,
    policy: DefaultTimePolicy,
    anchor: NaiveTime,
) -> Result<ResultInstant> {
    let base = reference.to_naive()?;

    let result = match policy {
        DefaultTimePolicy::Identity => return Ok(*reference),
        DefaultTimePolicy::AnchorTime { day_shift } => {
            shift_days(base.date(), day_shift)?.and_time(anchor)
        }
        DefaultTimePolicy::ApplyOffset => {
            let offset = offset.ok_or_else(|| {
                ResolveError::InvalidInput("offset policy without a bound quantity".to_string())
            })?;
            apply_offset(base, offset)?
        }
    };

    Ok(ReferenceInstant::from_naive(result, DST_UNKNOWN))
}

/// Signed quantity of `offset`, in units of `offset.unit`.
pub fn signed_quantity(offset: &Offset) -> Result<i64> {
    let n = match offset.quantity {
        NumeralValue::Exact(n) => n,
        NumeralValue::OutOfRange => {
            return Err(ResolveError::Overflow(
                "quantity does not fit in a 64-bit integer".to_string(),
            ));
        }
    };
    n.checked_mul(offset.direction.sign())
        .ok_or_else(|| ResolveError::Overflow(format!("cannot negate quantity {n}")))
}

fn apply_offset(base: NaiveDateTime, offset: &Offset) -> Result<NaiveDateTime> {
    let signed = signed_quantity(offset)?;

    match offset.unit.base_delta() {
        BaseDelta::Seconds(per_unit) => {
            let seconds = signed.checked_mul(per_unit).ok_or_else(|| {
                ResolveError::Overflow(format!("{signed} {:?} in seconds", offset.unit))
            })?;
            TimeDelta::try_seconds(seconds)
                .and_then(|delta| base.checked_add_signed(delta))
                .ok_or_else(|| {
                    ResolveError::Overflow(format!("{base} shifted by {seconds} seconds"))
                })
        }
        BaseDelta::Days(per_unit) => {
            let days = signed.checked_mul(per_unit).ok_or_else(|| {
                ResolveError::Overflow(format!("{signed} {:?} in days", offset.unit))
            })?;
            Ok(shift_days(base.date(), days)?.and_time(base.time()))
        }
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ResolveError::Overflow(format!("{date} shifted by {days} days")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Direction;
    use crate::vocabulary::Unit;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> ReferenceInstant {
        let dt = NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap();
        ReferenceInstant::from_naive(dt, 0)
    }

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    fn off(n: i64, unit: Unit, direction: Direction) -> Offset {
        Offset {
            quantity: NumeralValue::Exact(n),
            unit,
            direction,
        }
    }

    fn stamp(inst: &ResultInstant) -> String {
        inst.to_naive().unwrap().to_string()
    }

    #[test]
    fn test_identity_returns_reference_bit_for_bit() {
        // weekday deliberately inconsistent; identity must not recompute it
        let mut reference = at(2026, 2, 18, 14, 30, 15);
        reference.weekday = 6;
        let out = apply(&reference, None, DefaultTimePolicy::Identity, nine()).unwrap();
        assert_eq!(out, reference);
    }

    #[test]
    fn test_minutes_roll_over_year_end() {
        let reference = at(2025, 12, 31, 23, 58, 30);
        let o = off(5, Unit::Minute, Direction::Future);
        let out = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        assert_eq!(stamp(&out), "2026-01-01 00:03:30");
        assert_eq!(out.year_day, 1);
        assert_eq!(out.weekday, 3); // Thursday
        assert_eq!(out.is_dst, DST_UNKNOWN);
    }

    #[test]
    fn test_minutes_backwards_across_leap_day() {
        let reference = at(2024, 3, 1, 0, 2, 0);
        let o = off(5, Unit::Minute, Direction::Past);
        let out = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        assert_eq!(stamp(&out), "2024-02-29 23:57:00");
    }

    #[test]
    fn test_days_keep_time_of_day() {
        let reference = at(2026, 2, 25, 14, 30, 15);
        let o = off(7, Unit::Day, Direction::Future);
        let out = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        assert_eq!(stamp(&out), "2026-03-04 14:30:15");
    }

    #[test]
    fn test_week_equals_seven_days() {
        let reference = at(2026, 12, 28, 8, 0, 0);
        let week = off(1, Unit::Week, Direction::Future);
        let days = off(7, Unit::Day, Direction::Future);
        let a = apply(&reference, Some(&week), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        let b = apply(&reference, Some(&days), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        assert_eq!(a, b);
        assert_eq!(stamp(&a), "2027-01-04 08:00:00");
    }

    #[test]
    fn test_anchor_time_policies() {
        let reference = at(2026, 2, 28, 22, 45, 10);
        let tomorrow = apply(
            &reference,
            None,
            DefaultTimePolicy::AnchorTime { day_shift: 1 },
            nine(),
        )
        .unwrap();
        assert_eq!(stamp(&tomorrow), "2026-03-01 09:00:00");

        let yesterday = apply(
            &reference,
            None,
            DefaultTimePolicy::AnchorTime { day_shift: -1 },
            nine(),
        )
        .unwrap();
        assert_eq!(stamp(&yesterday), "2026-02-27 09:00:00");
    }

    #[test]
    fn test_repeated_application_does_not_drift() {
        let mut inst = at(2026, 1, 1, 0, 0, 0);
        let o = off(1, Unit::Minute, Direction::Future);
        for _ in 0..(60 * 24 * 3) {
            inst = apply(&inst, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap();
        }
        assert_eq!(stamp(&inst), "2026-01-04 00:00:00");
    }

    #[test]
    fn test_out_of_range_quantity_is_overflow() {
        let reference = at(2026, 1, 1, 0, 0, 0);
        let o = Offset {
            quantity: NumeralValue::OutOfRange,
            unit: Unit::Minute,
            direction: Direction::Future,
        };
        let err = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap_err();
        assert!(matches!(err, ResolveError::Overflow(_)), "got: {err}");
    }

    #[test]
    fn test_huge_minute_count_is_overflow() {
        let reference = at(2026, 1, 1, 0, 0, 0);
        let o = off(i64::MAX / 2, Unit::Minute, Direction::Future);
        let err = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap_err();
        assert!(err.to_string().contains("Overflow"), "got: {err}");
    }

    #[test]
    fn test_date_past_calendar_limit_is_overflow() {
        let reference = at(2026, 1, 1, 0, 0, 0);
        let o = off(1_000_000_000, Unit::Week, Direction::Past);
        let err = apply(&reference, Some(&o), DefaultTimePolicy::ApplyOffset, nine()).unwrap_err();
        assert!(matches!(err, ResolveError::Overflow(_)));
    }

    #[test]
    fn test_invalid_reference_is_rejected() {
        let mut reference = at(2026, 1, 1, 0, 0, 0);
        reference.minute = 60;
        let err = apply(&reference, None, DefaultTimePolicy::Identity, nine()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInput(_)));
    }

    #[test]
    fn test_offset_policy_requires_offset() {
        let reference = at(2026, 1, 1, 0, 0, 0);
        assert!(apply(&reference, None, DefaultTimePolicy::ApplyOffset, nine()).is_err());
    }
}
