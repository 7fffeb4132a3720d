//! Acquiring the reference instant the engine resolves against.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use reltime_engine::ReferenceInstant;

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("invalid time zone '{name}'"))
}

/// The reference instant in `tz`: `at` if given, otherwise the current time.
///
/// `at` is either RFC 3339 (converted into `tz`) or a wall-clock
/// `YYYY-MM-DD HH:MM:SS` interpreted in `tz`.
pub fn reference_instant(at: Option<&str>, tz: Tz) -> Result<ReferenceInstant> {
    let local = match at {
        None => Utc::now().with_timezone(&tz),
        Some(s) => parse_at(s, tz)?,
    };
    Ok(to_reference(&local))
}

fn parse_at(s: &str, tz: Tz) -> Result<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz));
    }
    let naive = NaiveDateTime::parse_from_str(s, LOCAL_FORMAT).with_context(|| {
        format!("invalid reference '{s}': expected RFC 3339 or YYYY-MM-DD HH:MM:SS")
    })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("invalid reference '{s}': does not exist in {}", tz.name()))
}

fn to_reference(local: &DateTime<Tz>) -> ReferenceInstant {
    let is_dst = !local.offset().dst_offset().is_zero();
    ReferenceInstant::from_naive(local.naive_local(), i8::from(is_dst))
}

pub fn format_instant(inst: &ReferenceInstant) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        inst.year, inst.month, inst.day, inst.hour, inst.minute, inst.second
    )
}
