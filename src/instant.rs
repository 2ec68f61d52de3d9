// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scale-parameterised floating instants.
//!
//! [`Time<S>`] stores a [`Days`] quantity whose epoch is fixed by the
//! compile-time marker `S: TimeScale`. It complements the integer
//! timestamp API: use `i64` seconds for calendar arithmetic and `Time<S>`
//! where a continuous day count is wanted (Julian dates, OADate values,
//! the Moon model).
//!
//! All scales are civil UTC day counts, so conversions between them and to
//! `chrono::DateTime<Utc>` are exact constant offsets with no ΔT term.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

use chrono::Utc;
use qtty::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::civil::fts_to_date_time;
use crate::constants::UNIX_EPOCH_JD;
use crate::types::DateTime;

// ═══════════════════════════════════════════════════════════════════════════
// TimeScale trait
// ═══════════════════════════════════════════════════════════════════════════

/// Marker for a day count starting at a fixed Julian Date.
pub trait TimeScale: Copy + fmt::Debug + PartialEq + PartialOrd + 'static {
    const LABEL: &'static str;

    /// Julian Date of day zero.
    const EPOCH_JD: Days;

    /// Native day count → absolute JD.
    #[inline(always)]
    fn to_jd(value: Days) -> Days {
        value + Self::EPOCH_JD
    }

    /// Absolute JD → native day count.
    #[inline(always)]
    fn from_jd(jd: Days) -> Days {
        jd - Self::EPOCH_JD
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Time<S>
// ═══════════════════════════════════════════════════════════════════════════

/// A point on scale `S`; layout-identical to a single `f64`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeScale> {
    days: Days,
    _scale: PhantomData<S>,
}

impl<S: TimeScale> Time<S> {
    /// Raw day count on this scale.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self::from_days(Days::new(value))
    }

    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self {
            days,
            _scale: PhantomData,
        }
    }

    /// Instant at `fts` fractional seconds since the Unix epoch.
    ///
    /// ```
    /// use tempcal::{Time, JD, UnixTime};
    ///
    /// let t = Time::<UnixTime>::from_unix_seconds(43_200.0);
    /// assert_eq!(t.value(), 0.5);
    /// assert_eq!(t.to::<JD>().value(), 2_440_588.0);
    /// ```
    #[inline]
    pub fn from_unix_seconds(fts: f64) -> Self {
        let jd = Days::new(UNIX_EPOCH_JD) + Seconds::new(fts).to::<Day>();
        Self::from_julian_day(jd)
    }

    /// Instant at whole Unix seconds `ts`.
    #[inline]
    pub fn from_ts(ts: i64) -> Self {
        Self::from_unix_seconds(ts as f64)
    }

    #[inline]
    pub const fn quantity(&self) -> Days {
        self.days
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.days.value()
    }

    /// Absolute Julian Date of this instant.
    #[inline]
    pub fn julian_day(&self) -> Days {
        S::to_jd(self.days)
    }

    #[inline]
    pub fn julian_day_value(&self) -> f64 {
        self.julian_day().value()
    }

    #[inline]
    pub fn from_julian_day(jd: Days) -> Self {
        Self::from_days(S::from_jd(jd))
    }

    /// Fractional seconds since the Unix epoch.
    #[inline]
    pub fn unix_seconds(&self) -> f64 {
        (self.julian_day() - Days::new(UNIX_EPOCH_JD))
            .to::<Second>()
            .value()
    }

    /// Re-express on scale `T`.
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Time<T> {
        Time::from_julian_day(self.julian_day())
    }

    /// Civil fields, millisecond precision. Non-finite values map to the
    /// epoch.
    pub fn to_date_time(&self) -> DateTime {
        fts_to_date_time(self.unix_seconds())
    }

    /// `None` for non-finite values and outside chrono's range.
    pub fn to_utc(&self) -> Option<chrono::DateTime<Utc>> {
        let fts = self.unix_seconds();
        if !fts.is_finite() {
            return None;
        }
        let whole = fts.floor();
        let nanos = (((fts - whole) * 1e9) as u32).min(999_999_999);
        chrono::DateTime::<Utc>::from_timestamp(whole as i64, nanos)
    }

    pub fn from_utc(datetime: chrono::DateTime<Utc>) -> Self {
        let fraction = f64::from(datetime.timestamp_subsec_nanos()) / 1e9;
        Self::from_unix_seconds(datetime.timestamp() as f64 + fraction)
    }
}

impl<S: TimeScale> fmt::Display for Time<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", S::LABEL, self.value())
    }
}

#[cfg(feature = "serde")]
impl<S: TimeScale> Serialize for Time<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.value().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeScale> Deserialize<'de> for Time<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl<S: TimeScale> Add<Days> for Time<S> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Days) -> Self {
        Self::from_days(self.days + rhs)
    }
}

impl<S: TimeScale> Sub<Days> for Time<S> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Days) -> Self {
        Self::from_days(self.days - rhs)
    }
}

/// Signed span between two instants on one scale.
impl<S: TimeScale> Sub for Time<S> {
    type Output = Days;

    #[inline]
    fn sub(self, rhs: Self) -> Days {
        self.days - rhs.days
    }
}
