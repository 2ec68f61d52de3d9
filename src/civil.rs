// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timestamp ⇄ civil date-time conversion and per-field projections.
//!
//! Every function here routes through the fast kernel in
//! [`fast_date`](crate::fast_date); there is no per-year iteration.
//!
//! | Direction | Seconds | Milliseconds | Floating seconds |
//! |-----------|---------|--------------|------------------|
//! | fields → instant | [`to_timestamp`] | [`to_timestamp_ms`] | [`to_fts`] |
//! | instant → fields | [`to_date_time`] | [`to_date_time_ms`] | [`fts_to_date_time`] |

use crate::constants::{
    MS_PER_SEC, SEC_PER_DAY, SEC_PER_HOUR, SEC_PER_MIN, UNIX_EPOCH_YEAR,
};
use crate::error::{TimeError, TimeResult};
use crate::fast_date::{date_from_days, days_from_date, split_unix_day, year_from_days};
use crate::floor_math::{floor_div, floor_div_mod, floor_mod};
use crate::types::{DateTime, Weekday};
use crate::validation::{is_leap_year, is_valid_date_time, num_days_in_month, num_days_in_year};

// ═══════════════════════════════════════════════════════════════════════════
// Fields → instant
// ═══════════════════════════════════════════════════════════════════════════

/// Seconds since 1970-01-01T00:00:00Z of a UTC civil date-time.
///
/// A `(day, month, year)` argument order is detected (`day >= 1970` with
/// `year <= 31`) and swapped before validation.
///
/// # Errors
///
/// [`TimeError::InvalidDateTime`] when any field is out of range, and
/// [`TimeError::ArithmeticOverflow`] when the instant does not fit in `i64`.
///
/// # Examples
///
/// ```
/// use tempcal::to_timestamp;
///
/// assert_eq!(to_timestamp(2024, 2, 29, 12, 34, 56), Ok(1_709_210_096));
/// assert_eq!(to_timestamp(29, 2, 2024, 12, 34, 56), Ok(1_709_210_096));
/// assert!(to_timestamp(2023, 2, 29, 0, 0, 0).is_err());
/// ```
pub fn to_timestamp(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
) -> TimeResult<i64> {
    let (year, day) = swap_transposed(year, day);
    if !is_valid_date_time(year, month, day, hour, min, sec, 0) {
        return Err(TimeError::InvalidDateTime);
    }
    let sec_of_day = hour as i64 * SEC_PER_HOUR + min as i64 * SEC_PER_MIN + sec as i64;
    days_from_date(year, month, day)
        .checked_mul(SEC_PER_DAY)
        .and_then(|s| s.checked_add(sec_of_day))
        .ok_or(TimeError::ArithmeticOverflow)
}

/// Milliseconds since the epoch of a UTC civil date-time.
///
/// Same swap rule and error kinds as [`to_timestamp`]. Callers that need the
/// integer sentinel can map failure with
/// `.unwrap_or(ERROR_TIMESTAMP)`.
pub fn to_timestamp_ms(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    ms: i32,
) -> TimeResult<i64> {
    if !(0..MS_PER_SEC as i32).contains(&ms) {
        return Err(TimeError::InvalidDateTime);
    }
    to_timestamp(year, month, day, hour, min, sec)?
        .checked_mul(MS_PER_SEC)
        .and_then(|t| t.checked_add(ms as i64))
        .ok_or(TimeError::ArithmeticOverflow)
}

/// Floating seconds since the epoch of a UTC civil date-time.
pub fn to_fts(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    ms: i32,
) -> TimeResult<f64> {
    if !(0..MS_PER_SEC as i32).contains(&ms) {
        return Err(TimeError::InvalidDateTime);
    }
    let ts = to_timestamp(year, month, day, hour, min, sec)?;
    Ok(ts as f64 + ms as f64 / MS_PER_SEC as f64)
}

#[inline]
const fn swap_transposed(year: i64, day: i32) -> (i64, i32) {
    if day as i64 >= UNIX_EPOCH_YEAR && year >= 1 && year <= 31 {
        (day as i64, year as i32)
    } else {
        (year, day)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Instant → fields
// ═══════════════════════════════════════════════════════════════════════════

/// Civil UTC fields of a second timestamp; `ms` is always `0`.
///
/// Total over `i64`.
///
/// ```
/// use tempcal::{to_date_time, DateTime};
///
/// assert_eq!(to_date_time(0), DateTime::new(1970, 1, 1, 0, 0, 0, 0));
/// assert_eq!(to_date_time(-1), DateTime::new(1969, 12, 31, 23, 59, 59, 0));
/// ```
pub const fn to_date_time(ts: i64) -> DateTime {
    let split = split_unix_day(ts);
    let date = date_from_days(split.days);
    let s = split.sec_of_day;
    DateTime {
        year: date.year,
        month: date.month,
        day: date.day,
        hour: (s / SEC_PER_HOUR) as i32,
        min: ((s % SEC_PER_HOUR) / SEC_PER_MIN) as i32,
        sec: (s % SEC_PER_MIN) as i32,
        ms: 0,
    }
}

/// Civil UTC fields of a millisecond timestamp.
pub const fn to_date_time_ms(ts_ms: i64) -> DateTime {
    let (ts, ms) = floor_div_mod(ts_ms, MS_PER_SEC);
    let mut dt = to_date_time(ts);
    dt.ms = ms as i32;
    dt
}

/// Civil UTC fields of a floating timestamp; milliseconds are truncated
/// toward the earlier instant. Non-finite input maps to the epoch.
pub fn fts_to_date_time(fts: f64) -> DateTime {
    if !fts.is_finite() {
        return to_date_time(0);
    }
    let whole = fts.floor();
    let ms = (((fts - whole) * MS_PER_SEC as f64) as i32).clamp(0, MS_PER_SEC as i32 - 1);
    let mut dt = to_date_time(whole as i64);
    dt.ms = ms;
    dt
}

impl DateTime {
    #[inline]
    pub const fn from_ts(ts: i64) -> Self {
        to_date_time(ts)
    }

    #[inline]
    pub const fn from_ts_ms(ts_ms: i64) -> Self {
        to_date_time_ms(ts_ms)
    }

    /// Seconds since the epoch; `ms` is ignored but must be in range.
    pub fn to_ts(&self) -> TimeResult<i64> {
        if !(0..MS_PER_SEC as i32).contains(&self.ms) {
            return Err(TimeError::InvalidDateTime);
        }
        to_timestamp(self.year, self.month, self.day, self.hour, self.min, self.sec)
    }

    pub fn to_ts_ms(&self) -> TimeResult<i64> {
        to_timestamp_ms(
            self.year, self.month, self.day, self.hour, self.min, self.sec, self.ms,
        )
    }

    pub fn to_fts(&self) -> TimeResult<f64> {
        to_fts(
            self.year, self.month, self.day, self.hour, self.min, self.sec, self.ms,
        )
    }

    pub const fn is_valid(&self) -> bool {
        is_valid_date_time(
            self.year, self.month, self.day, self.hour, self.min, self.sec, self.ms,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Day numbers and weekdays
// ═══════════════════════════════════════════════════════════════════════════

/// Whole days since 1970-01-01, floored.
#[inline]
pub const fn ts_to_unix_day(ts: i64) -> i64 {
    floor_div(ts, SEC_PER_DAY)
}

/// Midnight of a day number, saturating at the `i64` bounds.
#[inline]
pub const fn unix_day_to_ts(day: i64) -> i64 {
    day.saturating_mul(SEC_PER_DAY)
}

/// Whole elapsed days from `start` to `stop`, floored; negative when
/// `stop < start`.
#[inline]
pub const fn days_between(start: i64, stop: i64) -> i64 {
    (stop as i128 - start as i128).div_euclid(SEC_PER_DAY as i128) as i64
}

/// Weekday of a timestamp; 1970-01-01 was a Thursday.
///
/// ```
/// use tempcal::{weekday_of_ts, Weekday};
///
/// assert_eq!(weekday_of_ts(0), Weekday::Thu);
/// assert_eq!(weekday_of_ts(86_400), Weekday::Fri);
/// assert_eq!(weekday_of_ts(-1), Weekday::Wed);
/// ```
#[inline]
pub const fn weekday_of_ts(ts: i64) -> Weekday {
    weekday_of_unix_day(ts_to_unix_day(ts))
}

#[inline]
pub const fn weekday_of_unix_day(day: i64) -> Weekday {
    Weekday::from_index(floor_mod(day, 7) + 4)
}

#[inline]
pub const fn weekday_of_date(year: i64, month: i32, day: i32) -> Weekday {
    weekday_of_unix_day(days_from_date(year, month, day))
}

/// Weekday index `0..=6` (Sunday = 0) of a civil date.
#[inline]
pub const fn day_of_week_date(year: i64, month: i32, day: i32) -> i64 {
    weekday_of_date(year, month, day).index()
}

// ═══════════════════════════════════════════════════════════════════════════
// Field projections
// ═══════════════════════════════════════════════════════════════════════════

#[inline]
pub const fn year_of_ts(ts: i64) -> i64 {
    year_from_days(ts_to_unix_day(ts))
}

#[inline]
pub const fn year_of_ts_ms(ts_ms: i64) -> i64 {
    year_of_ts(floor_div(ts_ms, MS_PER_SEC))
}

#[inline]
pub const fn month_of_ts(ts: i64) -> i32 {
    date_from_days(ts_to_unix_day(ts)).month
}

#[inline]
pub const fn day_of_month(ts: i64) -> i32 {
    date_from_days(ts_to_unix_day(ts)).day
}

/// Ordinal day, `1..=366`.
#[inline]
pub const fn day_of_year(ts: i64) -> i32 {
    let days = ts_to_unix_day(ts);
    let year = year_from_days(days);
    (days - days_from_date(year, 1, 1) + 1) as i32
}

#[inline]
pub const fn hour_of_day(ts: i64) -> i32 {
    (floor_mod(ts, SEC_PER_DAY) / SEC_PER_HOUR) as i32
}

#[inline]
pub const fn min_of_day(ts: i64) -> i32 {
    (floor_mod(ts, SEC_PER_DAY) / SEC_PER_MIN) as i32
}

#[inline]
pub const fn min_of_hour(ts: i64) -> i32 {
    (floor_mod(ts, SEC_PER_HOUR) / SEC_PER_MIN) as i32
}

#[inline]
pub const fn sec_of_day(ts: i64) -> i32 {
    floor_mod(ts, SEC_PER_DAY) as i32
}

#[inline]
pub const fn sec_of_min(ts: i64) -> i32 {
    floor_mod(ts, SEC_PER_MIN) as i32
}

#[inline]
pub const fn is_leap_year_ts(ts: i64) -> bool {
    is_leap_year(year_of_ts(ts))
}

#[inline]
pub const fn num_days_in_year_ts(ts: i64) -> i32 {
    num_days_in_year(year_of_ts(ts))
}

#[inline]
pub const fn num_days_in_month_ts(ts: i64) -> i32 {
    let date = date_from_days(ts_to_unix_day(ts));
    num_days_in_month(date.year, date.month)
}
