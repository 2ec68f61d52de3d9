// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Reference conversions used to cross-check the fast kernel.
//!
//! Nothing here is on a production path.  [`civil_from_days`] and
//! [`date_to_unix_day`] are the textbook era formulas with plain signed
//! division; [`to_timestamp`] is the historical peel loop that counts 400-,
//! 100-, 4- and 1-year blocks down from [`MAX_YEAR`] and re-biases around
//! 2000-01-01.
//!
//! The peel loop is exact for years in `[LEGACY_MIN_YEAR, MAX_YEAR]`;
//! outside that window the block sum leaves `i64` range.

use crate::constants::{
    MAX_TIMESTAMP, MAX_YEAR, SEC_AT_2000, SEC_PER_100_YEARS, SEC_PER_400_YEARS, SEC_PER_4_YEARS,
    SEC_PER_DAY, SEC_PER_HOUR, SEC_PER_MIN, SEC_PER_YEAR,
};
use crate::error::{TimeError, TimeResult};
use crate::types::CivilDate;
use crate::validation::{is_leap_year, is_valid_date_time};

/// Earliest year [`to_timestamp`] can represent.
pub const LEGACY_MIN_YEAR: i64 = -2_625;

/// Textbook days → civil date.
pub const fn civil_from_days(days: i64) -> CivilDate {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    CivilDate {
        year,
        month: month as i32,
        day: day as i32,
    }
}

/// Textbook civil date → days, using `(153·m + 2) / 5` for the month offset.
pub const fn date_to_unix_day(year: i64, month: i32, day: i32) -> i64 {
    let y = year - if month <= 2 { 1 } else { 0 };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let m = (month + if month > 2 { -3 } else { 9 }) as i64;
    let doy = (153 * m + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Peel-loop date-time → timestamp.
///
/// Applies the same `(day, month, year)` transposition repair and validation
/// as [`crate::to_timestamp`].
pub fn to_timestamp(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
) -> TimeResult<i64> {
    if day as i64 >= crate::constants::UNIX_EPOCH_YEAR && (1..=31).contains(&year) {
        return to_timestamp(day as i64, month, year as i32, hour, min, sec);
    }
    if !is_valid_date_time(year, month, day, hour, min, sec, 0) {
        return Err(TimeError::InvalidDateTime);
    }
    if !(LEGACY_MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(TimeError::ArithmeticOverflow);
    }

    let mut years = MAX_YEAR - year;
    let mut secs = 0_i64;

    let n_400 = years / 400;
    secs += n_400 * SEC_PER_400_YEARS;
    years -= n_400 * 400;

    let n_100 = years / 100;
    secs += n_100 * SEC_PER_100_YEARS;
    years -= n_100 * 100;

    let n_4 = years / 4;
    secs += n_4 * SEC_PER_4_YEARS;
    years -= n_4 * 4;

    secs += years * SEC_PER_YEAR;
    secs = MAX_TIMESTAMP - secs + SEC_AT_2000;

    const LEAP_MONTH_DOY: [i64; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];
    const MONTH_DOY: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let table = if is_leap_year(year) {
        &LEAP_MONTH_DOY
    } else {
        &MONTH_DOY
    };
    secs += (table[(month - 1) as usize] + day as i64 - 1) * SEC_PER_DAY;
    secs += SEC_PER_HOUR * hour as i64 + SEC_PER_MIN * min as i64 + sec as i64;
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{days_from_date, to_date_time, to_timestamp as fast_to_timestamp};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_agrees(ts: i64) {
        let dt = to_date_time(ts);
        let split = crate::split_unix_day(ts);
        assert_eq!(dt.date(), civil_from_days(split.days), "ts={ts}");
        let back = to_timestamp(dt.year, dt.month, dt.day, dt.hour, dt.min, dt.sec);
        assert_eq!(back, Ok(ts), "ts={ts} dt={dt:?}");
        assert_eq!(
            fast_to_timestamp(dt.year, dt.month, dt.day, dt.hour, dt.min, dt.sec),
            Ok(ts)
        );
    }

    #[test]
    fn test_known_legacy_values() {
        assert_eq!(to_timestamp(1970, 1, 1, 0, 0, 0), Ok(0));
        assert_eq!(to_timestamp(2000, 1, 1, 0, 0, 0), Ok(SEC_AT_2000));
        assert_eq!(to_timestamp(2024, 2, 29, 12, 34, 56), Ok(1_709_210_096));
        assert_eq!(to_timestamp(1969, 12, 31, 23, 59, 59), Ok(-1));
        assert_eq!(to_timestamp(2024, 2, 30, 0, 0, 0), Err(TimeError::InvalidDateTime));
        assert_eq!(
            to_timestamp(-3_000, 1, 1, 0, 0, 0),
            Err(TimeError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_unix_day_formulas_agree() {
        for year in [-2_625_i64, -401, -400, -1, 0, 1, 1582, 1900, 2000, 2100, 9_999] {
            for month in 1..=12 {
                for day in [1, 15, 28] {
                    assert_eq!(
                        date_to_unix_day(year, month, day),
                        days_from_date(year, month, day)
                    );
                }
            }
        }
    }

    #[test]
    fn test_one_million_timestamps_agree() {
        let mut rng = StdRng::seed_from_u64(20_240_229);
        let lower = days_from_date(LEGACY_MIN_YEAR, 1, 1) * SEC_PER_DAY;
        let upper = MAX_TIMESTAMP;
        for i in 0..1_000_000_u32 {
            let ts = match i % 3 {
                0 => rng.gen_range(-10_000_000_000_i64..=10_000_000_000),
                1 => rng.gen_range(lower..=lower + 1_000_000_000_000),
                _ => rng.gen_range(upper - 1_000_000_000_000..=upper),
            };
            assert_agrees(ts);
        }
    }

    #[test]
    fn test_range_edges() {
        assert_agrees(days_from_date(LEGACY_MIN_YEAR, 1, 1) * SEC_PER_DAY);
        assert_agrees(MAX_TIMESTAMP);
        assert_agrees(0);
        assert_agrees(-1);
        assert_agrees(crate::constants::SEC_AT_2100 - 1);
    }
}
