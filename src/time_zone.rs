// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed numeric UTC offsets.
//!
//! Only `±HH:MM` offsets are modelled; there is no time-zone database. The
//! canonical form is a signed second count in `[-12h, +14h]`, always a whole
//! number of minutes.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{MS_PER_SEC, SEC_PER_HOUR, SEC_PER_MIN};
use crate::error::{TimeError, TimeResult};
use crate::validation::{is_valid_time_zone, is_valid_utc_offset};

/// A fixed offset from UTC split into sign, hours and minutes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeZoneOffset {
    pub hour: i32,
    pub min: i32,
    pub is_positive: bool,
}

impl Default for TimeZoneOffset {
    fn default() -> Self {
        Self::UTC
    }
}

impl TimeZoneOffset {
    pub const UTC: Self = Self {
        hour: 0,
        min: 0,
        is_positive: true,
    };

    /// Build from components, rejecting out-of-range fields and totals
    /// outside `[-12h, +14h]`.
    pub fn new(hour: i32, min: i32, is_positive: bool) -> TimeResult<Self> {
        let tz = Self {
            hour,
            min,
            is_positive,
        };
        if tz.is_valid() {
            Ok(tz)
        } else {
            Err(TimeError::InvalidTimeZone)
        }
    }

    /// Split a signed offset in seconds.
    ///
    /// ```
    /// use tempcal::TimeZoneOffset;
    ///
    /// let tz = TimeZoneOffset::from_seconds(-(5 * 3_600 + 30 * 60)).unwrap();
    /// assert_eq!((tz.hour, tz.min, tz.is_positive), (5, 30, false));
    /// assert_eq!(tz.to_string(), "-05:30");
    /// assert!(TimeZoneOffset::from_seconds(15 * 3_600).is_err());
    /// ```
    pub fn from_seconds(offset_sec: i64) -> TimeResult<Self> {
        if !is_valid_utc_offset(offset_sec) {
            return Err(TimeError::InvalidTimeZone);
        }
        Ok(Self::split(offset_sec))
    }

    const fn split(offset_sec: i64) -> Self {
        let abs = offset_sec.unsigned_abs() as i64;
        Self {
            hour: (abs / SEC_PER_HOUR) as i32,
            min: ((abs / SEC_PER_MIN) % 60) as i32,
            is_positive: offset_sec >= 0,
        }
    }

    #[inline]
    pub const fn to_seconds(&self) -> i64 {
        let magnitude = self.hour as i64 * SEC_PER_HOUR + self.min as i64 * SEC_PER_MIN;
        if self.is_positive {
            magnitude
        } else {
            -magnitude
        }
    }

    pub const fn is_valid(&self) -> bool {
        is_valid_time_zone(self.hour, self.min) && is_valid_utc_offset(self.to_seconds())
    }

    /// Whole minutes within `[-12h, +14h]`.
    #[inline]
    pub const fn is_valid_offset_seconds(offset_sec: i64) -> bool {
        is_valid_utc_offset(offset_sec)
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_positive { '+' } else { '-' };
        write!(f, "{sign}{:02}:{:02}", self.hour, self.min)
    }
}

impl FromStr for TimeZoneOffset {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_offset(s)
    }
}

/// Parse `Z`, an empty string (UTC) or `±HH:MM`.
pub fn parse_offset(input: &str) -> TimeResult<TimeZoneOffset> {
    let s = input.trim();
    if s.is_empty() || s == "Z" || s == "z" {
        return Ok(TimeZoneOffset::UTC);
    }
    let bytes = s.as_bytes();
    let is_positive = match bytes[0] {
        b'+' => true,
        b'-' => false,
        _ => return Err(TimeError::MalformedInput(input.to_owned())),
    };
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(TimeError::MalformedInput(input.to_owned()));
    }
    let two_digits = |i: usize| -> TimeResult<i32> {
        let (a, b) = (bytes[i], bytes[i + 1]);
        if a.is_ascii_digit() && b.is_ascii_digit() {
            Ok(((a - b'0') * 10 + (b - b'0')) as i32)
        } else {
            Err(TimeError::MalformedInput(input.to_owned()))
        }
    };
    TimeZoneOffset::new(two_digits(1)?, two_digits(4)?, is_positive)
}

/// `±HH:MM` rendering of a signed offset in seconds; seconds below a
/// minute are dropped.
pub fn format_offset(offset_sec: i64) -> String {
    TimeZoneOffset::split(offset_sec).to_string()
}

/// `±HHMM`, as emitted by the `%z` specifier.
pub(crate) fn format_offset_compact(offset_sec: i64) -> String {
    let tz = TimeZoneOffset::split(offset_sec);
    let sign = if tz.is_positive { '+' } else { '-' };
    format!("{sign}{:02}{:02}", tz.hour, tz.min)
}

// ── Shifting instants ────────────────────────────────────────────────────

/// Local wall-clock seconds → UTC seconds.
#[inline]
pub const fn to_utc(local: i64, utc_offset_sec: i64) -> i64 {
    local.saturating_sub(utc_offset_sec)
}

/// UTC seconds → local wall-clock seconds.
#[inline]
pub const fn to_local(utc: i64, utc_offset_sec: i64) -> i64 {
    utc.saturating_add(utc_offset_sec)
}

#[inline]
pub const fn to_utc_ms(local_ms: i64, utc_offset_sec: i64) -> i64 {
    local_ms.saturating_sub(utc_offset_sec * MS_PER_SEC)
}

#[inline]
pub const fn to_local_ms(utc_ms: i64, utc_offset_sec: i64) -> i64 {
    utc_ms.saturating_add(utc_offset_sec * MS_PER_SEC)
}
