// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Branch-free conversion between day counts and civil dates.
//!
//! | Direction | Function | Algorithm |
//! |-----------|----------|-----------|
//! | seconds → days | [`split_unix_day`] | floor division by 86 400 |
//! | date → days | [`days_from_date`] | March-based era arithmetic (Hinnant) |
//! | days → date | [`date_from_days`] | reversed-era multiply-by-reciprocal (Joffe) |
//! | days → year | [`year_from_days`] | the year half of the above |
//!
//! The day-to-date direction counts *backwards* from a far-future anchor so
//! that every intermediate stays in unsigned 64-bit range; the multiplies by
//! `C1`, `C2` and `C3` replace the divisions by 36 524.25, 365.25 and the
//! month length table.  All day counts whose year fits in `±1.8·10¹²` are
//! exact, which covers every `i64` second count.

use crate::constants::SEC_PER_DAY;
use crate::floor_math::{floor_div_mod, mul_hi_u64};
use crate::types::{CivilDate, DaySplit};

/// Days from March 1st to the first of each month, March first.
const MARCH_DOY: [i64; 12] = [0, 31, 61, 92, 122, 153, 184, 214, 245, 275, 306, 337];

/// Days from 0000-03-01 to 1970-01-01.
const DAYS_0000_03_01_TO_EPOCH: i64 = 719_468;

// ── Reversed-era constants ───────────────────────────────────────────────

const ERAS: u64 = 4_726_498_270;
const D_SHIFT: u64 = 146_097 * ERAS - 719_469;
const Y_SHIFT: u64 = 400 * ERAS - 1;
const C1: u64 = 505_054_698_555_331;
const C2: u64 = 50_504_432_782_230_121;
const C3: u64 = 8_619_973_866_219_416;
const YPT_SCALE: u64 = 782_432;
const YPT_BUMP: u64 = 126_464;
const SHIFT_JAN_FEB: u64 = 191_360;
const SHIFT_OTHER: u64 = 977_792;

/// Split signed seconds into `(days, sec_of_day)` with `sec_of_day ∈ [0, 86399]`.
#[inline(always)]
pub const fn split_unix_day(ts: i64) -> DaySplit {
    let (days, sec_of_day) = floor_div_mod(ts, SEC_PER_DAY);
    DaySplit { days, sec_of_day }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
///
/// `month` is clamped to `1..=12`. `day` is not checked against the month
/// length, so out-of-range days roll into the neighbouring month.
///
/// # Examples
///
/// ```
/// use tempcal::days_from_date;
///
/// assert_eq!(days_from_date(1970, 1, 1), 0);
/// assert_eq!(days_from_date(2000, 2, 29), 11_016);
/// assert_eq!(days_from_date(1969, 12, 31), -1);
/// ```
#[inline]
pub const fn days_from_date(year: i64, month: i32, day: i32) -> i64 {
    let month = if month < 1 {
        1
    } else if month > 12 {
        12
    } else {
        month
    };
    let y = year - if month <= 2 { 1 } else { 0 };
    let m = (if month >= 3 { month - 3 } else { month + 9 }) as usize;
    let doy = MARCH_DOY[m] + day as i64 - 1;

    if y >= 0 {
        let y = y as u64;
        let era = y / 400;
        let yoe = y - era * 400;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy as u64;
        (era * 146_097 + doe) as i64 - DAYS_0000_03_01_TO_EPOCH
    } else {
        let era = (y - 399) / 400;
        let yoe = y - era * 400;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - DAYS_0000_03_01_TO_EPOCH
    }
}

/// Shared front half of [`date_from_days`] / [`year_from_days`].
///
/// Returns `(yrs, ypt, bump)`: the March-based year counted from the
/// reversed anchor, the scaled position inside it, and whether the date
/// falls in January/February of the following civil year.
#[inline(always)]
const fn reversed_year(days: i64) -> (u64, u64, bool) {
    let rev = D_SHIFT.wrapping_sub(days as u64);
    let cen = mul_hi_u64(rev, C1);
    let jul = rev.wrapping_add(cen).wrapping_sub(cen / 4);
    let num_hi = mul_hi_u64(jul, C2);
    let num_low = jul.wrapping_mul(C2);
    let yrs = Y_SHIFT.wrapping_sub(num_hi);
    let ypt = mul_hi_u64(YPT_SCALE, num_low);
    (yrs, ypt, ypt < YPT_BUMP)
}

/// Civil date of a day count since 1970-01-01.
///
/// # Examples
///
/// ```
/// use tempcal::{date_from_days, CivilDate};
///
/// assert_eq!(date_from_days(0), CivilDate::new(1970, 1, 1));
/// assert_eq!(date_from_days(11_016), CivilDate::new(2000, 2, 29));
/// assert_eq!(date_from_days(-1), CivilDate::new(1969, 12, 31));
/// ```
#[inline]
pub const fn date_from_days(days: i64) -> CivilDate {
    let (yrs, ypt, bump) = reversed_year(days);
    let shift = if bump { SHIFT_JAN_FEB } else { SHIFT_OTHER };
    let n = (yrs & 3)
        .wrapping_mul(512)
        .wrapping_add(shift)
        .wrapping_sub(ypt);
    let d = mul_hi_u64(n & 0xFFFF, C3);
    CivilDate {
        year: yrs.wrapping_add(bump as u64) as i64,
        month: (n >> 16) as i32,
        day: d as i32 + 1,
    }
}

/// Year of a day count since 1970-01-01.
#[inline]
pub const fn year_from_days(days: i64) -> i64 {
    let (yrs, _, bump) = reversed_year(days);
    yrs.wrapping_add(bump as u64) as i64
}
