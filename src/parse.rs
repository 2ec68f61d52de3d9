// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ISO 8601 parsing and string → timestamp conversion.
//!
//! Accepted shape:
//!
//! ```text
//! YYYY{-/.}MM{-/.}DD[{T| }HH:MM[:SS[.f{1,3}]]][Z|±HH:MM]
//! ```
//!
//! Missing time components are zero and a missing zone is `+00:00`. The
//! year may carry a sign and more than four digits, so that every string the
//! codecs emit parses back.
//!
//! The `try_parse_*` functions report failures; the `parse_*` wrappers
//! collapse any failure to `0`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::civil::{to_fts, to_timestamp, to_timestamp_ms};
use crate::constants::{MS_PER_SEC, SEC_PER_DAY, SEC_PER_HOUR, SEC_PER_MIN};
use crate::error::{TimeError, TimeResult};
use crate::time_zone::{parse_offset, TimeZoneOffset};
use crate::types::{CivilDate, DateTime, Month};
use crate::validation::{is_valid_date, is_valid_date_time, is_valid_time};

const DATE: &str = r"([+-]?\d{4,})[-/.](\d{2})[-/.](\d{2})";
const TIME: &str = r"(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d+))?)?";

static ISO8601_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^{DATE}(?:[Tt ]{TIME})?(Z|z|[+-]\d{{2}}:\d{{2}})?$"
    ))
    .expect("valid ISO 8601 pattern")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{DATE}$")).expect("valid date pattern"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{TIME}$")).expect("valid time pattern"));

fn malformed(input: &str) -> TimeError {
    TimeError::MalformedInput(input.to_owned())
}

fn int_group<T: std::str::FromStr>(caps: &Captures<'_>, i: usize, input: &str) -> TimeResult<T> {
    caps.get(i)
        .map_or("0", |m| m.as_str())
        .parse()
        .map_err(|_| malformed(input))
}

/// Milliseconds of a decimal fraction of a second. Digits past the third
/// are truncated.
fn fraction_ms(digits: Option<&str>, input: &str) -> TimeResult<i32> {
    let Some(digits) = digits else {
        return Ok(0);
    };
    let head = digits.get(..3).unwrap_or(digits);
    let value: i32 = head.parse().map_err(|_| malformed(input))?;
    Ok(value * 10_i32.pow(3 - head.len() as u32))
}

/// `(hour, min, sec, ms)` from the time groups starting at `first`.
fn time_groups(caps: &Captures<'_>, first: usize, input: &str) -> TimeResult<(i32, i32, i32, i32)> {
    Ok((
        int_group(caps, first, input)?,
        int_group(caps, first + 1, input)?,
        int_group(caps, first + 2, input)?,
        fraction_ms(caps.get(first + 3).map(|m| m.as_str()), input)?,
    ))
}

/// Split an ISO 8601 string into its wall-clock fields and zone.
///
/// ```
/// use tempcal::{parse_iso8601, DateTime};
///
/// let (dt, tz) = parse_iso8601("2024-02-29T12:34:56.5+05:30").unwrap();
/// assert_eq!(dt, DateTime::new(2024, 2, 29, 12, 34, 56, 500));
/// assert_eq!(tz.to_seconds(), 19_800);
/// ```
pub fn parse_iso8601(input: &str) -> TimeResult<(DateTime, TimeZoneOffset)> {
    let caps = ISO8601_RE.captures(input.trim()).ok_or_else(|| malformed(input))?;

    let year = int_group(&caps, 1, input)?;
    let month = int_group(&caps, 2, input)?;
    let day = int_group(&caps, 3, input)?;
    let (hour, min, sec, ms) = time_groups(&caps, 4, input)?;
    let tz = match caps.get(8) {
        Some(zone) => parse_offset(zone.as_str())?,
        None => TimeZoneOffset::UTC,
    };

    if !is_valid_date_time(year, month, day, hour, min, sec, ms) {
        return Err(TimeError::InvalidDateTime);
    }
    Ok((DateTime::new(year, month, day, hour, min, sec, ms), tz))
}

/// `YYYY-MM-DD` (any of `-`, `/`, `.` as separator).
pub fn parse_date(input: &str) -> TimeResult<CivilDate> {
    let caps = DATE_RE.captures(input.trim()).ok_or_else(|| malformed(input))?;
    let date = CivilDate::new(
        int_group(&caps, 1, input)?,
        int_group(&caps, 2, input)?,
        int_group(&caps, 3, input)?,
    );
    if !is_valid_date(date.year, date.month, date.day) {
        return Err(TimeError::InvalidDateTime);
    }
    Ok(date)
}

/// `HH:MM[:SS[.f]]` as `(hour, min, sec, ms)`.
pub fn parse_time(input: &str) -> TimeResult<(i32, i32, i32, i32)> {
    let caps = TIME_RE.captures(input.trim()).ok_or_else(|| malformed(input))?;
    let (hour, min, sec, ms) = time_groups(&caps, 1, input)?;
    if !is_valid_time(hour, min, sec, ms) {
        return Err(TimeError::InvalidDateTime);
    }
    Ok((hour, min, sec, ms))
}

// ── String → timestamp ───────────────────────────────────────────────────

/// Unix seconds of an ISO 8601 string: the fields read as UTC, plus the
/// parsed zone offset.
///
/// ```
/// use tempcal::try_parse_ts;
///
/// assert_eq!(try_parse_ts("2024-02-29T12:34:56Z"), Ok(1_709_210_096));
/// assert_eq!(try_parse_ts("2024-02-29 01:00+01:00"), Ok(1_709_168_400 + 3_600));
/// assert!(try_parse_ts("2024-02-30").is_err());
/// ```
pub fn try_parse_ts(input: &str) -> TimeResult<i64> {
    let (dt, tz) = parse_iso8601(input)?;
    to_timestamp(dt.year, dt.month, dt.day, dt.hour, dt.min, dt.sec)?
        .checked_add(tz.to_seconds())
        .ok_or(TimeError::ArithmeticOverflow)
}

/// Unix milliseconds; see [`try_parse_ts`].
pub fn try_parse_ts_ms(input: &str) -> TimeResult<i64> {
    let (dt, tz) = parse_iso8601(input)?;
    to_timestamp_ms(dt.year, dt.month, dt.day, dt.hour, dt.min, dt.sec, dt.ms)?
        .checked_add(tz.to_seconds() * MS_PER_SEC)
        .ok_or(TimeError::ArithmeticOverflow)
}

/// Fractional Unix seconds; see [`try_parse_ts`].
pub fn try_parse_fts(input: &str) -> TimeResult<f64> {
    let (dt, tz) = parse_iso8601(input)?;
    to_fts(dt.year, dt.month, dt.day, dt.hour, dt.min, dt.sec, dt.ms)
        .map(|fts| fts + tz.to_seconds() as f64)
}

/// [`try_parse_ts`], or `0` on failure.
pub fn parse_ts(input: &str) -> i64 {
    try_parse_ts(input).unwrap_or(0)
}

/// [`try_parse_ts_ms`], or `0` on failure.
pub fn parse_ts_ms(input: &str) -> i64 {
    try_parse_ts_ms(input).unwrap_or(0)
}

/// [`try_parse_fts`], or `0.0` on failure.
pub fn parse_fts(input: &str) -> f64 {
    try_parse_fts(input).unwrap_or(0.0)
}

// ── Small fields ─────────────────────────────────────────────────────────

/// Month number (`1..=12`) of an English short or full month name,
/// case-insensitively.
///
/// ```
/// use tempcal::month_number;
///
/// assert_eq!(month_number("feb"), Ok(2));
/// assert_eq!(month_number("SEPTEMBER"), Ok(9));
/// assert!(month_number("Sept").is_err());
/// ```
pub fn month_number(name: &str) -> TimeResult<i32> {
    Month::from_name(name)
        .map(Month::number)
        .ok_or_else(|| TimeError::InvalidMonthName(name.to_owned()))
}

/// Second of day of `HH`, `HH:MM` or `HH:MM:SS`.
pub fn try_sec_of_day_from_str(input: &str) -> TimeResult<i64> {
    let mut parts = [0_i32; 3];
    let mut count = 0;
    for part in input.trim().split(':') {
        if count == parts.len() || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(input));
        }
        parts[count] = part.parse().map_err(|_| malformed(input))?;
        count += 1;
    }
    let [hour, min, sec] = parts;
    if !is_valid_time(hour, min, sec, 0) {
        return Err(TimeError::InvalidDateTime);
    }
    Ok(hour as i64 * SEC_PER_HOUR + min as i64 * SEC_PER_MIN + sec as i64)
}

/// [`try_sec_of_day_from_str`], or `86400` (one past the last valid second)
/// on failure.
pub fn sec_of_day_from_str(input: &str) -> i64 {
    try_sec_of_day_from_str(input).unwrap_or(SEC_PER_DAY)
}
