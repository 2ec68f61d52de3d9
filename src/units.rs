// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scalar rescaling between seconds, milliseconds, microseconds, minutes
//! and hours.
//!
//! Upscaling goes through the [`Rescale`] trait: integer inputs multiply
//! exactly (saturating at the `i64` bounds), floating inputs are scaled and
//! rounded half-to-even.
//!
//! ```
//! use tempcal::Rescale;
//!
//! assert_eq!(3_i32.sec_to_ms(), 3_000);
//! assert_eq!(1.25_f64.sec_to_ms(), 1_250);
//! assert_eq!(0.5_f64.scale_by(1), 0);
//! assert_eq!(2_i64.hour_to_sec(), 7_200);
//! ```
//!
//! Downscaling of integer counts uses floor division, so `-1 ms` belongs to
//! second `-1`, not to second `0`.

use crate::constants::{
    MS_PER_HOUR, MS_PER_MIN, MS_PER_SEC, NS_PER_SEC, SEC_PER_HOUR, SEC_PER_MIN, US_PER_MS,
    US_PER_SEC,
};
use crate::floor_math::{floor_div, floor_mod};

/// Upscale a scalar time quantity to a finer integer unit.
pub trait Rescale: Copy {
    /// `self · factor`, exact for integers and rounded half-to-even for floats.
    fn scale_by(self, factor: i64) -> i64;

    #[inline]
    fn sec_to_ms(self) -> i64 {
        self.scale_by(MS_PER_SEC)
    }

    #[inline]
    fn sec_to_us(self) -> i64 {
        self.scale_by(US_PER_SEC)
    }

    #[inline]
    fn ms_to_us(self) -> i64 {
        self.scale_by(US_PER_MS)
    }

    #[inline]
    fn min_to_sec(self) -> i64 {
        self.scale_by(SEC_PER_MIN)
    }

    #[inline]
    fn min_to_ms(self) -> i64 {
        self.scale_by(MS_PER_MIN)
    }

    #[inline]
    fn hour_to_sec(self) -> i64 {
        self.scale_by(SEC_PER_HOUR)
    }

    #[inline]
    fn hour_to_ms(self) -> i64 {
        self.scale_by(MS_PER_HOUR)
    }
}

macro_rules! impl_rescale_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Rescale for $t {
                #[inline]
                fn scale_by(self, factor: i64) -> i64 {
                    (self as i64).saturating_mul(factor)
                }
            }
        )*
    };
}

macro_rules! impl_rescale_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Rescale for $t {
                #[inline]
                fn scale_by(self, factor: i64) -> i64 {
                    // `as` saturates and maps NaN to 0.
                    (self as f64 * factor as f64).round_ties_even() as i64
                }
            }
        )*
    };
}

impl_rescale_int!(i8, i16, i32, i64, u8, u16, u32);
impl_rescale_float!(f32, f64);

// ── Downscaling ──────────────────────────────────────────────────────────

#[inline]
pub const fn ms_to_sec(ts_ms: i64) -> i64 {
    floor_div(ts_ms, MS_PER_SEC)
}

#[inline]
pub const fn us_to_sec(ts_us: i64) -> i64 {
    floor_div(ts_us, US_PER_SEC)
}

#[inline]
pub const fn us_to_ms(ts_us: i64) -> i64 {
    floor_div(ts_us, US_PER_MS)
}

#[inline]
pub const fn ms_to_min(ms: i64) -> i64 {
    floor_div(ms, MS_PER_MIN)
}

#[inline]
pub const fn ms_to_hour(ms: i64) -> i64 {
    floor_div(ms, MS_PER_HOUR)
}

#[inline]
pub const fn sec_to_min(sec: i64) -> i64 {
    floor_div(sec, SEC_PER_MIN)
}

#[inline]
pub const fn sec_to_hour(sec: i64) -> i64 {
    floor_div(sec, SEC_PER_HOUR)
}

// ── Floating projections ─────────────────────────────────────────────────

#[inline]
pub fn ms_to_fsec(ts_ms: i64) -> f64 {
    ts_ms as f64 / MS_PER_SEC as f64
}

#[inline]
pub fn us_to_fsec(ts_us: i64) -> f64 {
    ts_us as f64 / US_PER_SEC as f64
}

#[inline]
pub fn min_to_fsec(min: f64) -> f64 {
    min * SEC_PER_MIN as f64
}

#[inline]
pub fn hour_to_fsec(hour: f64) -> f64 {
    hour * SEC_PER_HOUR as f64
}

#[inline]
pub fn sec_to_fmin(sec: f64) -> f64 {
    sec / SEC_PER_MIN as f64
}

#[inline]
pub fn sec_to_fhour(sec: f64) -> f64 {
    sec / SEC_PER_HOUR as f64
}

// ── Sub-second parts ─────────────────────────────────────────────────────

/// Millisecond-of-second of a millisecond timestamp, in `[0, 999]`.
#[inline]
pub const fn ms_of_ts(ts_ms: i64) -> i64 {
    floor_mod(ts_ms, MS_PER_SEC)
}

/// Fractional part of `fts` in units of `1/scale`, rounded; always `>= 0`.
#[inline]
fn frac_of_sec(fts: f64, scale: i64) -> i64 {
    ((fts - fts.floor()) * scale as f64).round() as i64
}

/// Millisecond part of a floating timestamp. May reach `1000` by rounding.
#[inline]
pub fn ms_of_sec(fts: f64) -> i64 {
    frac_of_sec(fts, MS_PER_SEC)
}

#[inline]
pub fn us_of_sec(fts: f64) -> i64 {
    frac_of_sec(fts, US_PER_SEC)
}

#[inline]
pub fn ns_of_sec(fts: f64) -> i64 {
    frac_of_sec(fts, NS_PER_SEC)
}

/// 24-hour clock to 12-hour clock: `0 → 12`, `13..=23 → h − 12`, otherwise
/// unchanged.
#[inline]
pub const fn hour_24_to_12(hour: i32) -> i32 {
    match hour {
        0 => 12,
        13..=23 => hour - 12,
        _ => hour,
    }
}
