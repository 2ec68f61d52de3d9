// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Leap-year law and range predicates for dates, times and offsets.

use crate::constants::{MAX_UTC_OFFSET_SEC, MIN_UTC_OFFSET_SEC, SEC_PER_MIN};

/// Gregorian leap-year test.
///
/// `y & 3 == 0` is divisibility by 4; among multiples of 4, `y % 25 != 0`
/// excludes centuries and `y & 15 == 0` restores multiples of 400.
///
/// # Examples
///
/// ```
/// use tempcal::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2024));
/// assert!(is_leap_year(-4));
/// ```
#[inline(always)]
pub const fn is_leap_year(year: i64) -> bool {
    (year & 3) == 0 && ((year % 25) != 0 || (year & 15) == 0)
}

/// Days in `month` of `year`; `0` when `month` is outside `1..=12`.
#[inline]
pub const fn num_days_in_month(year: i64, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[inline]
pub const fn num_days_in_year(year: i64) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Whether `(year, month, day)` is a real proleptic Gregorian date.
///
/// Fields are checked as given; no argument order is guessed here. The year
/// itself is unbounded; range limits belong to the conversions that turn it
/// into a timestamp.
pub const fn is_valid_date(year: i64, month: i32, day: i32) -> bool {
    day >= 1 && day <= num_days_in_month(year, month)
}

#[inline]
pub const fn is_valid_time(hour: i32, min: i32, sec: i32, ms: i32) -> bool {
    hour >= 0 && hour <= 23 && min >= 0 && min <= 59 && sec >= 0 && sec <= 59 && ms >= 0 && ms <= 999
}

#[inline]
pub const fn is_valid_date_time(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    ms: i32,
) -> bool {
    is_valid_date(year, month, day) && is_valid_time(hour, min, sec, ms)
}

/// Offset components: hour in `0..=23`, minute in `0..=59`.
#[inline]
pub const fn is_valid_time_zone(hour: i32, min: i32) -> bool {
    hour >= 0 && hour <= 23 && min >= 0 && min <= 59
}

/// A signed offset in `[-12h, +14h]` and a whole number of minutes.
#[inline]
pub const fn is_valid_utc_offset(offset_sec: i64) -> bool {
    offset_sec >= MIN_UTC_OFFSET_SEC
        && offset_sec <= MAX_UTC_OFFSET_SEC
        && offset_sec % SEC_PER_MIN == 0
}
