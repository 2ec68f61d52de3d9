// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date helpers.
//!
//! Free functions return plain `f64` day counts for callers that do not
//! need the typed [`Time<JD>`] wrapper.

use qtty::*;

use super::instant::Time;
use super::scales::{JD, MJD};
use crate::constants::{SEC_PER_DAY, UNIX_EPOCH_JD, UNIX_EPOCH_JDN};
use crate::fast_date::days_from_date;

impl Time<JD> {
    /// J1900.0: 1900-01-00T12:00 (JD 2 415 020.0).
    pub const J1900: Self = Self::new(2_415_020.0);

    /// J2000.0: 2000-01-01T12:00 (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    fn centuries_since(&self, epoch: Self) -> Centuries {
        Centuries::new((*self - epoch).value() / Self::JULIAN_CENTURY.value())
    }

    /// Julian centuries since J1900.0, the time argument of the lunation
    /// series.
    #[inline]
    pub fn julian_centuries_since_j1900(&self) -> Centuries {
        self.centuries_since(Self::J1900)
    }

    /// Julian centuries since J2000.0.
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        self.centuries_since(Self::J2000)
    }

    #[inline]
    pub fn to_mjd(&self) -> Time<MJD> {
        self.to()
    }
}

// ── Plain day counts ─────────────────────────────────────────────────────

/// Julian Date of fractional Unix seconds.
///
/// ```
/// use tempcal::fts_to_jd;
///
/// assert_eq!(fts_to_jd(0.0), 2_440_587.5);
/// assert_eq!(fts_to_jd(43_200.0), 2_440_588.0);
/// ```
#[inline]
pub fn fts_to_jd(fts: f64) -> f64 {
    UNIX_EPOCH_JD + fts / SEC_PER_DAY as f64
}

#[inline]
pub fn ts_to_jd(ts: i64) -> f64 {
    fts_to_jd(ts as f64)
}

/// Fractional Unix seconds of a Julian Date.
#[inline]
pub fn jd_to_fts(jd: f64) -> f64 {
    (jd - UNIX_EPOCH_JD) * SEC_PER_DAY as f64
}

#[inline]
pub fn fts_to_mjd(fts: f64) -> f64 {
    fts_to_jd(fts) - super::scales::MJD_EPOCH.value()
}

#[inline]
pub fn ts_to_mjd(ts: i64) -> f64 {
    fts_to_mjd(ts as f64)
}

/// Julian Date of a proleptic Gregorian date-time. Fields are not validated.
pub fn gregorian_to_jd(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    ms: i32,
) -> f64 {
    let sec_of_day = hour as f64 * 3_600.0 + min as f64 * 60.0 + sec as f64 + ms as f64 / 1_000.0;
    UNIX_EPOCH_JD + days_from_date(year, month, day) as f64 + sec_of_day / SEC_PER_DAY as f64
}

/// Julian Day Number (the integer JD at noon) of a civil date.
///
/// ```
/// use tempcal::gregorian_to_jdn;
///
/// assert_eq!(gregorian_to_jdn(2000, 1, 1), 2_451_545);
/// ```
#[inline]
pub const fn gregorian_to_jdn(year: i64, month: i32, day: i32) -> i64 {
    days_from_date(year, month, day) + UNIX_EPOCH_JDN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centuries() {
        let jd = Time::<JD>::J2000 + Days::new(36_525.0 * 3.0);
        assert!((jd.julian_centuries() - Centuries::new(3.0)).abs() < Centuries::new(1e-12));
        assert!((Time::<JD>::J2000.julian_centuries_since_j1900().value() - 0.99997262).abs() < 1e-8);
    }

    #[test]
    fn test_plain_helpers() {
        assert_eq!(ts_to_jd(86_400), 2_440_588.5);
        assert_eq!(ts_to_mjd(0), 40_587.0);
        assert_eq!(fts_to_mjd(43_200.0), 40_587.5);
        assert_eq!(jd_to_fts(2_440_588.5), 86_400.0);
        assert_eq!(gregorian_to_jd(2000, 1, 1, 12, 0, 0, 0), 2_451_545.0);
        assert_eq!(gregorian_to_jd(1970, 1, 1, 0, 0, 0, 0), UNIX_EPOCH_JD);
        assert_eq!(gregorian_to_jdn(1970, 1, 1), 2_440_588);
        assert_eq!(gregorian_to_jdn(-4713, 11, 24), 0);
    }

    #[test]
    fn test_matches_typed_instant() {
        let ts = 1_709_210_096;
        let typed = Time::<JD>::from_unix_seconds(ts as f64);
        assert!((typed.value() - ts_to_jd(ts)).abs() < 1e-9);
        assert!((typed.to_mjd().value() - ts_to_mjd(ts)).abs() < 1e-9);
    }
}
