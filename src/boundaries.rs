// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Start / end of minute, hour, day, week, month, year and arbitrary periods.
//!
//! All bucketing uses [`floor_mod`], so an instant before 1970 lands in the
//! bucket that contains it rather than the one after it. Ends are inclusive:
//! `end_of_X(ts) == start_of_next_X(ts) - 1`.
//!
//! Weeks start on Sunday. Results that would leave the `i64` range saturate.

use crate::civil::{
    day_of_month, num_days_in_month_ts, ts_to_unix_day, weekday_of_ts, weekday_of_unix_day,
};
use crate::constants::{
    DAYS_PER_WEEK, MS_PER_DAY, MS_PER_SEC, SEC_AT_2000, SEC_AT_2100, SEC_PER_100_YEARS,
    SEC_PER_400_YEARS, SEC_PER_4_YEARS, SEC_PER_DAY, SEC_PER_FIRST_100_YEARS, SEC_PER_HOUR,
    SEC_PER_LEAP_YEAR, SEC_PER_MIN, SEC_PER_YEAR,
};
use crate::error::TimeResult;
use crate::fast_date::{days_from_date, year_from_days};
use crate::floor_math::floor_mod;
use crate::types::Weekday;
use crate::units::ms_to_sec;
use crate::validation::{num_days_in_month, num_days_in_year};

// ── Periods ──────────────────────────────────────────────────────────────

/// First second of the `period`-second bucket containing `ts`.
///
/// `period` must be positive.
#[inline]
pub const fn start_of_period(period: i64, ts: i64) -> i64 {
    ts.saturating_sub(floor_mod(ts, period))
}

/// Last second of the `period`-second bucket containing `ts`.
#[inline]
pub const fn end_of_period(period: i64, ts: i64) -> i64 {
    start_of_period(period, ts).saturating_add(period - 1)
}

// ── Minute / hour / day ──────────────────────────────────────────────────

#[inline]
pub const fn start_of_min(ts: i64) -> i64 {
    start_of_period(SEC_PER_MIN, ts)
}

#[inline]
pub const fn end_of_min(ts: i64) -> i64 {
    end_of_period(SEC_PER_MIN, ts)
}

#[inline]
pub const fn start_of_next_min(ts: i64) -> i64 {
    start_of_min(ts).saturating_add(SEC_PER_MIN)
}

#[inline]
pub const fn start_of_hour(ts: i64) -> i64 {
    start_of_period(SEC_PER_HOUR, ts)
}

#[inline]
pub const fn end_of_hour(ts: i64) -> i64 {
    end_of_period(SEC_PER_HOUR, ts)
}

#[inline]
pub const fn start_of_next_hour(ts: i64) -> i64 {
    start_of_hour(ts).saturating_add(SEC_PER_HOUR)
}

/// Midnight UTC of the day containing `ts`.
///
/// ```
/// use tempcal::start_of_day;
///
/// assert_eq!(start_of_day(1_709_210_096), 1_709_164_800);
/// assert_eq!(start_of_day(-1), -86_400);
/// ```
#[inline]
pub const fn start_of_day(ts: i64) -> i64 {
    start_of_period(SEC_PER_DAY, ts)
}

#[inline]
pub const fn end_of_day(ts: i64) -> i64 {
    end_of_period(SEC_PER_DAY, ts)
}

#[inline]
pub const fn start_of_prev_day(ts: i64) -> i64 {
    start_of_day(ts).saturating_sub(SEC_PER_DAY)
}

/// Midnight `days` days after the day containing `ts`.
#[inline]
pub const fn start_of_next_day(ts: i64, days: i64) -> i64 {
    start_of_day(ts).saturating_add(days.saturating_mul(SEC_PER_DAY))
}

#[inline]
pub const fn start_of_day_ms(ts_ms: i64) -> i64 {
    ts_ms.saturating_sub(floor_mod(ts_ms, MS_PER_DAY))
}

#[inline]
pub const fn end_of_day_ms(ts_ms: i64) -> i64 {
    start_of_day_ms(ts_ms).saturating_add(MS_PER_DAY - 1)
}

// ── Week ─────────────────────────────────────────────────────────────────

/// Sunday 00:00 of the week containing `ts`.
#[inline]
pub const fn start_of_week(ts: i64) -> i64 {
    start_of_day(ts).saturating_sub(weekday_of_ts(ts).index() * SEC_PER_DAY)
}

/// Saturday 23:59:59 of the week containing `ts`.
#[inline]
pub const fn end_of_week(ts: i64) -> i64 {
    start_of_day(ts).saturating_add((DAYS_PER_WEEK - weekday_of_ts(ts).index()) * SEC_PER_DAY - 1)
}

/// Saturday 00:00 of the week containing `ts`.
#[inline]
pub const fn start_of_saturday(ts: i64) -> i64 {
    start_of_day(ts).saturating_add((Weekday::Sat.index() - weekday_of_ts(ts).index()) * SEC_PER_DAY)
}

// ── Month ────────────────────────────────────────────────────────────────

#[inline]
pub const fn start_of_month(ts: i64) -> i64 {
    start_of_day(ts).saturating_sub((day_of_month(ts) as i64 - 1) * SEC_PER_DAY)
}

#[inline]
pub const fn end_of_month(ts: i64) -> i64 {
    end_of_day(ts)
        .saturating_add((num_days_in_month_ts(ts) - day_of_month(ts)) as i64 * SEC_PER_DAY)
}

/// Midnight of the last Sunday of the month containing `ts`.
pub const fn last_sunday_of_month(ts: i64) -> i64 {
    let last_day = ts_to_unix_day(end_of_month(ts));
    let back = weekday_of_unix_day(last_day).index();
    (last_day - back).saturating_mul(SEC_PER_DAY)
}

/// Day-of-month of the last Sunday of `(year, month)`; `0` for an invalid month.
pub const fn last_sunday_month_day(year: i64, month: i32) -> i32 {
    let days = num_days_in_month(year, month);
    if days == 0 {
        return 0;
    }
    days - crate::civil::day_of_week_date(year, month, days) as i32
}

// ── Year ─────────────────────────────────────────────────────────────────

/// Midnight of January 1st of the year containing `ts`.
///
/// Instants in `[1970, 2100)` take a four-year-cycle shortcut; everything
/// else peels 400-, 100-, 4- and 1-year blocks off 2000-01-01. The general
/// path is carried in `i128` so that years whose first second precedes
/// `i64::MIN` saturate instead of wrapping.
///
/// ```
/// use tempcal::start_of_year;
///
/// assert_eq!(start_of_year(1_709_210_096), 1_704_067_200);
/// assert_eq!(start_of_year(-1), -31_536_000);
/// ```
pub const fn start_of_year(ts: i64) -> i64 {
    if ts >= 0 && ts < SEC_AT_2100 {
        const TWO_YEARS: i64 = 2 * SEC_PER_YEAR;
        const THREE_YEARS: i64 = TWO_YEARS + SEC_PER_LEAP_YEAR;
        // 1970, 1971, 1972 (leap), 1973.
        let into_cycle = floor_mod(ts, SEC_PER_4_YEARS);
        let year_offset = if into_cycle < SEC_PER_YEAR {
            0
        } else if into_cycle < TWO_YEARS {
            SEC_PER_YEAR
        } else if into_cycle < THREE_YEARS {
            TWO_YEARS
        } else {
            THREE_YEARS
        };
        return ts - into_cycle + year_offset;
    }
    saturate(start_of_year_peeled(ts as i128))
}

const fn start_of_year_peeled(ts: i128) -> i128 {
    const YEAR: i128 = SEC_PER_YEAR as i128;
    const LEAP_YEAR: i128 = SEC_PER_LEAP_YEAR as i128;
    const FOUR_YEARS: i128 = SEC_PER_4_YEARS as i128;
    const FOUR_PLAIN_YEARS: i128 = 4 * YEAR;
    const FIRST_CENTURY: i128 = SEC_PER_FIRST_100_YEARS as i128;
    const CENTURY: i128 = SEC_PER_100_YEARS as i128;

    let mut secs = ts - SEC_AT_2000 as i128;
    let into_400 = secs.rem_euclid(SEC_PER_400_YEARS as i128);
    let mut start = secs - into_400 + SEC_AT_2000 as i128;
    secs = into_400;

    if secs >= FIRST_CENTURY {
        secs -= FIRST_CENTURY;
        start += FIRST_CENTURY;
        while secs >= CENTURY {
            secs -= CENTURY;
            start += CENTURY;
        }
        // A non-leap century year opens four plain years.
        if secs < FOUR_PLAIN_YEARS {
            return start + secs - secs % YEAR;
        }
        secs -= FOUR_PLAIN_YEARS;
        start += FOUR_PLAIN_YEARS;
    }

    let into_4 = secs % FOUR_YEARS;
    start += secs - into_4;
    secs = into_4;

    if secs >= LEAP_YEAR {
        secs -= LEAP_YEAR;
        start += LEAP_YEAR;
    }
    start + secs - secs % YEAR
}

const fn saturate(v: i128) -> i64 {
    if v < i64::MIN as i128 {
        i64::MIN
    } else if v > i64::MAX as i128 {
        i64::MAX
    } else {
        v as i64
    }
}

/// Last second of the year containing `ts`.
pub const fn end_of_year(ts: i64) -> i64 {
    let year = year_from_days(ts_to_unix_day(ts));
    let next = days_from_date(year, 1, 1) as i128 + num_days_in_year(year) as i128;
    saturate(next * SEC_PER_DAY as i128 - 1)
}

#[inline]
pub const fn start_of_next_year(ts: i64) -> i64 {
    end_of_year(ts).saturating_add(1)
}

/// Midnight of January 1st of `year`.
pub fn start_of_year_date(year: i64) -> TimeResult<i64> {
    crate::civil::to_timestamp(year, 1, 1, 0, 0, 0)
}

#[inline]
pub const fn start_of_year_ms(ts_ms: i64) -> i64 {
    start_of_year(ms_to_sec(ts_ms)).saturating_mul(MS_PER_SEC)
}

#[inline]
pub const fn end_of_year_ms(ts_ms: i64) -> i64 {
    end_of_year(ms_to_sec(ts_ms))
        .saturating_mul(MS_PER_SEC)
        .saturating_add(MS_PER_SEC - 1)
}
