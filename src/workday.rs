// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Weekend / workday classification and month-edge workday helpers.
//!
//! A workday is any date that is neither Saturday nor Sunday; holidays are
//! not modelled. Month-level queries enumerate the days of the month.
//!
//! The `*_workday_month` timestamp helpers return [`ERROR_TIMESTAMP`] when
//! the month has no workday, which only happens for an invalid month.

use crate::boundaries::end_of_day;
use crate::civil::{
    month_of_ts, to_date_time, ts_to_unix_day, weekday_of_date, weekday_of_unix_day, year_of_ts,
};
use crate::constants::{ERROR_TIMESTAMP, MS_PER_SEC, SEC_PER_DAY};
use crate::fast_date::days_from_date;
use crate::units::ms_to_sec;
use crate::validation::{is_valid_date, num_days_in_month};

// ── Classification ───────────────────────────────────────────────────────

#[inline]
pub const fn is_weekend(ts: i64) -> bool {
    is_weekend_unix_day(ts_to_unix_day(ts))
}

#[inline]
pub const fn is_weekend_unix_day(day: i64) -> bool {
    weekday_of_unix_day(day).is_weekend()
}

#[inline]
pub const fn is_workday(ts: i64) -> bool {
    !is_weekend(ts)
}

#[inline]
pub const fn is_workday_ms(ts_ms: i64) -> bool {
    is_workday(ms_to_sec(ts_ms))
}

/// Whether `(year, month, day)` is a valid date falling Monday to Friday.
#[inline]
pub const fn is_workday_date(year: i64, month: i32, day: i32) -> bool {
    is_valid_date(year, month, day) && !weekday_of_date(year, month, day).is_weekend()
}

#[inline]
pub const fn is_weekend_date(year: i64, month: i32, day: i32) -> bool {
    is_valid_date(year, month, day) && weekday_of_date(year, month, day).is_weekend()
}

// ── Month enumeration ────────────────────────────────────────────────────

/// Day-of-month of the first workday; `0` when there is none.
///
/// ```
/// use tempcal::first_workday_day;
///
/// assert_eq!(first_workday_day(2024, 6), 3);
/// ```
pub const fn first_workday_day(year: i64, month: i32) -> i32 {
    let days = num_days_in_month(year, month);
    let mut day = 1;
    while day <= days {
        if is_workday_date(year, month, day) {
            return day;
        }
        day += 1;
    }
    0
}

/// Day-of-month of the last workday; `0` when there is none.
pub const fn last_workday_day(year: i64, month: i32) -> i32 {
    let mut day = num_days_in_month(year, month);
    while day >= 1 {
        if is_workday_date(year, month, day) {
            return day;
        }
        day -= 1;
    }
    0
}

pub const fn count_workdays_in_month(year: i64, month: i32) -> i32 {
    let days = num_days_in_month(year, month);
    let mut total = 0;
    let mut day = 1;
    while day <= days {
        if is_workday_date(year, month, day) {
            total += 1;
        }
        day += 1;
    }
    total
}

/// 1-based position of `day` among the month's workdays; `0` if `day` is
/// not a workday.
pub const fn workday_index_in_month(year: i64, month: i32, day: i32) -> i32 {
    if !is_workday_date(year, month, day) {
        return 0;
    }
    let mut index = 0;
    let mut current = 1;
    while current <= day {
        if is_workday_date(year, month, current) {
            index += 1;
        }
        current += 1;
    }
    index
}

pub const fn is_first_workday_of_month(year: i64, month: i32, day: i32) -> bool {
    is_workday_date(year, month, day) && first_workday_day(year, month) == day
}

pub const fn is_last_workday_of_month(year: i64, month: i32, day: i32) -> bool {
    is_workday_date(year, month, day) && last_workday_day(year, month) == day
}

/// Whether `day` is among the first `count` workdays of its month.
///
/// `false` when `count <= 0` or `count` exceeds the month's workdays.
pub const fn is_within_first_workdays_of_month(year: i64, month: i32, day: i32, count: i32) -> bool {
    if count <= 0 || count > count_workdays_in_month(year, month) {
        return false;
    }
    let index = workday_index_in_month(year, month, day);
    index > 0 && index <= count
}

/// Whether `day` is among the last `count` workdays of its month.
pub const fn is_within_last_workdays_of_month(year: i64, month: i32, day: i32, count: i32) -> bool {
    let total = count_workdays_in_month(year, month);
    if count <= 0 || count > total {
        return false;
    }
    let index = workday_index_in_month(year, month, day);
    index > 0 && index >= total - count + 1
}

// ── Timestamp forms ──────────────────────────────────────────────────────

pub const fn is_first_workday_of_month_ts(ts: i64) -> bool {
    let dt = to_date_time(ts);
    is_first_workday_of_month(dt.year, dt.month, dt.day)
}

pub const fn is_last_workday_of_month_ts(ts: i64) -> bool {
    let dt = to_date_time(ts);
    is_last_workday_of_month(dt.year, dt.month, dt.day)
}

pub const fn is_within_first_workdays_of_month_ts(ts: i64, count: i32) -> bool {
    let dt = to_date_time(ts);
    is_within_first_workdays_of_month(dt.year, dt.month, dt.day, count)
}

pub const fn is_within_last_workdays_of_month_ts(ts: i64, count: i32) -> bool {
    let dt = to_date_time(ts);
    is_within_last_workdays_of_month(dt.year, dt.month, dt.day, count)
}

pub const fn is_first_workday_of_month_ms(ts_ms: i64) -> bool {
    is_first_workday_of_month_ts(ms_to_sec(ts_ms))
}

pub const fn is_last_workday_of_month_ms(ts_ms: i64) -> bool {
    is_last_workday_of_month_ts(ms_to_sec(ts_ms))
}

pub const fn is_within_first_workdays_of_month_ms(ts_ms: i64, count: i32) -> bool {
    is_within_first_workdays_of_month_ts(ms_to_sec(ts_ms), count)
}

pub const fn is_within_last_workdays_of_month_ms(ts_ms: i64, count: i32) -> bool {
    is_within_last_workdays_of_month_ts(ms_to_sec(ts_ms), count)
}

// ── Month-edge instants ──────────────────────────────────────────────────

const fn day_start(year: i64, month: i32, day: i32) -> i64 {
    if day <= 0 {
        return ERROR_TIMESTAMP;
    }
    match days_from_date(year, month, day).checked_mul(SEC_PER_DAY) {
        Some(ts) => ts,
        None => ERROR_TIMESTAMP,
    }
}

const fn day_end(year: i64, month: i32, day: i32) -> i64 {
    let start = day_start(year, month, day);
    if start == ERROR_TIMESTAMP {
        start
    } else {
        end_of_day(start)
    }
}

const fn to_ms(ts: i64, extra_ms: i64) -> i64 {
    if ts == ERROR_TIMESTAMP {
        return ERROR_TIMESTAMP;
    }
    match ts.checked_mul(MS_PER_SEC) {
        Some(ms) => ms.saturating_add(extra_ms),
        None => ERROR_TIMESTAMP,
    }
}

/// Midnight of the first workday of `(year, month)`, or [`ERROR_TIMESTAMP`].
pub const fn start_of_first_workday_month(year: i64, month: i32) -> i64 {
    day_start(year, month, first_workday_day(year, month))
}

pub const fn end_of_first_workday_month(year: i64, month: i32) -> i64 {
    day_end(year, month, first_workday_day(year, month))
}

pub const fn start_of_last_workday_month(year: i64, month: i32) -> i64 {
    day_start(year, month, last_workday_day(year, month))
}

pub const fn end_of_last_workday_month(year: i64, month: i32) -> i64 {
    day_end(year, month, last_workday_day(year, month))
}

pub const fn start_of_first_workday_month_ms(year: i64, month: i32) -> i64 {
    to_ms(start_of_first_workday_month(year, month), 0)
}

pub const fn end_of_first_workday_month_ms(year: i64, month: i32) -> i64 {
    to_ms(end_of_first_workday_month(year, month), MS_PER_SEC - 1)
}

pub const fn start_of_last_workday_month_ms(year: i64, month: i32) -> i64 {
    to_ms(start_of_last_workday_month(year, month), 0)
}

pub const fn end_of_last_workday_month_ms(year: i64, month: i32) -> i64 {
    to_ms(end_of_last_workday_month(year, month), MS_PER_SEC - 1)
}

/// [`start_of_first_workday_month`] for the month containing `ts`.
pub const fn start_of_first_workday_month_ts(ts: i64) -> i64 {
    start_of_first_workday_month(year_of_ts(ts), month_of_ts(ts))
}

pub const fn end_of_first_workday_month_ts(ts: i64) -> i64 {
    end_of_first_workday_month(year_of_ts(ts), month_of_ts(ts))
}

pub const fn start_of_last_workday_month_ts(ts: i64) -> i64 {
    start_of_last_workday_month(year_of_ts(ts), month_of_ts(ts))
}

pub const fn end_of_last_workday_month_ts(ts: i64) -> i64 {
    end_of_last_workday_month(year_of_ts(ts), month_of_ts(ts))
}
