// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed-layout string codecs and OLE Automation dates.
//!
//! | Family | Layout |
//! |--------|--------|
//! | ISO 8601 local | `YYYY-MM-DDTHH:MM:SS[.mmm]` |
//! | ISO 8601 UTC | `…Z` |
//! | ISO 8601 offset | `…±HH:MM` |
//! | MQL5 | `YYYY.MM.DD HH:MM:SS`, `YYYY.MM.DD`, `HH:MM:SS` |
//! | Human readable | `YYYY-MM-DD HH:MM:SS[.mmm]` |
//! | Windows file name | `YYYY-MM-DD_HH-MM-SS[_mmm]` |
//! | OADate | days since 1899-12-30 as `f64` |
//!
//! The offset variants annotate the instant; they never shift it. Years in
//! `0..=9999` are four digits, others carry an explicit sign.

use crate::civil::{fts_to_date_time, to_date_time, to_date_time_ms, to_fts};
use crate::constants::{MS_PER_DAY, OLE_EPOCH, SEC_PER_DAY};
use crate::error::TimeResult;
use crate::format::{IsoDate, Padded};
use crate::time_zone::format_offset;
use crate::types::DateTime;

// ── Builders ─────────────────────────────────────────────────────────────

fn date_part(dt: &DateTime, sep: char) -> String {
    if sep == '-' {
        IsoDate(dt.year, dt.month, dt.day).to_string()
    } else {
        format!("{}{sep}{:02}{sep}{:02}", Padded(dt.year, 4), dt.month, dt.day)
    }
}

fn time_part(dt: &DateTime, sep: char) -> String {
    format!("{:02}{sep}{:02}{sep}{:02}", dt.hour, dt.min, dt.sec)
}

fn iso(dt: &DateTime, with_ms: bool) -> String {
    let mut out = date_part(dt, '-');
    out.push('T');
    out.push_str(&time_part(dt, ':'));
    if with_ms {
        out.push_str(&format!(".{:03}", dt.ms));
    }
    out
}

// ── ISO 8601 ─────────────────────────────────────────────────────────────

/// `YYYY-MM-DDTHH:MM:SS`, no zone designator.
pub fn to_iso8601(ts: i64) -> String {
    iso(&to_date_time(ts), false)
}

/// `YYYY-MM-DDTHH:MM:SS.mmm`.
pub fn to_iso8601_ms(ts_ms: i64) -> String {
    iso(&to_date_time_ms(ts_ms), true)
}

/// `YYYY-MM-DDTHH:MM:SS.mmm` from fractional seconds.
pub fn to_iso8601_fts(fts: f64) -> String {
    iso(&fts_to_date_time(fts), true)
}

/// ```
/// use tempcal::to_iso8601_utc;
///
/// assert_eq!(to_iso8601_utc(1_709_210_096), "2024-02-29T12:34:56Z");
/// ```
pub fn to_iso8601_utc(ts: i64) -> String {
    let mut out = to_iso8601(ts);
    out.push('Z');
    out
}

pub fn to_iso8601_utc_ms(ts_ms: i64) -> String {
    let mut out = to_iso8601_ms(ts_ms);
    out.push('Z');
    out
}

/// Fields of `ts` followed by `±HH:MM` for `utc_offset_sec`.
pub fn to_iso8601_with_offset(ts: i64, utc_offset_sec: i64) -> String {
    let mut out = to_iso8601(ts);
    out.push_str(&format_offset(utc_offset_sec));
    out
}

pub fn to_iso8601_with_offset_ms(ts_ms: i64, utc_offset_sec: i64) -> String {
    let mut out = to_iso8601_ms(ts_ms);
    out.push_str(&format_offset(utc_offset_sec));
    out
}

/// `YYYY-MM-DD`.
pub fn to_iso8601_date(ts: i64) -> String {
    date_part(&to_date_time(ts), '-')
}

/// `HH:MM:SS`.
pub fn to_iso8601_time(ts: i64) -> String {
    time_part(&to_date_time(ts), ':')
}

/// `HH:MM:SSZ`.
pub fn to_iso8601_time_utc(ts: i64) -> String {
    let mut out = to_iso8601_time(ts);
    out.push('Z');
    out
}

// ── MQL5 ─────────────────────────────────────────────────────────────────

/// `YYYY.MM.DD HH:MM:SS`.
pub fn to_mql5_date_time(ts: i64) -> String {
    let dt = to_date_time(ts);
    format!("{} {}", date_part(&dt, '.'), time_part(&dt, ':'))
}

pub fn to_mql5_date_time_ms(ts_ms: i64) -> String {
    let dt = to_date_time_ms(ts_ms);
    format!("{} {}", date_part(&dt, '.'), time_part(&dt, ':'))
}

/// `YYYY.MM.DD`.
pub fn to_mql5_date(ts: i64) -> String {
    date_part(&to_date_time(ts), '.')
}

pub fn to_mql5_date_ms(ts_ms: i64) -> String {
    date_part(&to_date_time_ms(ts_ms), '.')
}

/// `HH:MM:SS`.
pub fn to_mql5_time(ts: i64) -> String {
    time_part(&to_date_time(ts), ':')
}

pub fn to_mql5_time_ms(ts_ms: i64) -> String {
    time_part(&to_date_time_ms(ts_ms), ':')
}

// ── Display and file-name forms ──────────────────────────────────────────

/// `YYYY-MM-DD HH:MM:SS`.
pub fn to_human_readable(ts: i64) -> String {
    let dt = to_date_time(ts);
    format!("{} {}", date_part(&dt, '-'), time_part(&dt, ':'))
}

/// `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn to_human_readable_ms(ts_ms: i64) -> String {
    let dt = to_date_time_ms(ts_ms);
    format!("{} {}.{:03}", date_part(&dt, '-'), time_part(&dt, ':'), dt.ms)
}

/// `YYYY-MM-DD_HH-MM-SS`, free of characters Windows rejects in file names.
pub fn to_windows_filename(ts: i64) -> String {
    let dt = to_date_time(ts);
    format!("{}_{}", date_part(&dt, '-'), time_part(&dt, '-'))
}

/// `YYYY-MM-DD_HH-MM-SS_mmm`.
pub fn to_windows_filename_ms(ts_ms: i64) -> String {
    let dt = to_date_time_ms(ts_ms);
    format!("{}_{}_{:03}", date_part(&dt, '-'), time_part(&dt, '-'), dt.ms)
}

// ══════════════════════════════════════════════════════════════════════════
// OLE Automation dates
// ══════════════════════════════════════════════════════════════════════════

/// ```
/// use tempcal::{ts_to_oadate, oadate_to_ts};
///
/// assert_eq!(ts_to_oadate(0), 25_569.0);
/// assert_eq!(ts_to_oadate(43_200), 25_569.5);
/// assert_eq!(oadate_to_ts(25_569.5), 43_200);
/// ```
#[inline]
pub fn ts_to_oadate(ts: i64) -> f64 {
    OLE_EPOCH as f64 + ts as f64 / SEC_PER_DAY as f64
}

#[inline]
pub fn fts_to_oadate(fts: f64) -> f64 {
    OLE_EPOCH as f64 + fts / SEC_PER_DAY as f64
}

#[inline]
pub fn ts_ms_to_oadate(ts_ms: i64) -> f64 {
    OLE_EPOCH as f64 + ts_ms as f64 / MS_PER_DAY as f64
}

/// Unix seconds, truncated toward zero.
#[inline]
pub fn oadate_to_ts(oadate: f64) -> i64 {
    ((oadate - OLE_EPOCH as f64) * SEC_PER_DAY as f64) as i64
}

/// Unix milliseconds, truncated toward zero.
#[inline]
pub fn oadate_to_ts_ms(oadate: f64) -> i64 {
    ((oadate - OLE_EPOCH as f64) * MS_PER_DAY as f64) as i64
}

#[inline]
pub fn oadate_to_fts(oadate: f64) -> f64 {
    (oadate - OLE_EPOCH as f64) * SEC_PER_DAY as f64
}

/// OADate of a civil date-time.
pub fn to_oadate(
    year: i64,
    month: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    ms: i32,
) -> TimeResult<f64> {
    to_fts(year, month, day, hour, min, sec, ms).map(fts_to_oadate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimeError;

    const LEAP_DAY: i64 = 1_709_210_096;

    #[test]
    fn test_iso_forms() {
        assert_eq!(to_iso8601(LEAP_DAY), "2024-02-29T12:34:56");
        assert_eq!(to_iso8601_utc(LEAP_DAY), "2024-02-29T12:34:56Z");
        assert_eq!(to_iso8601_ms(LEAP_DAY * 1_000 + 42), "2024-02-29T12:34:56.042");
        assert_eq!(to_iso8601_utc_ms(LEAP_DAY * 1_000), "2024-02-29T12:34:56.000Z");
        assert_eq!(to_iso8601_fts(LEAP_DAY as f64 + 0.5), "2024-02-29T12:34:56.500");
        assert_eq!(to_iso8601_date(LEAP_DAY), "2024-02-29");
        assert_eq!(to_iso8601_time(LEAP_DAY), "12:34:56");
        assert_eq!(to_iso8601_time_utc(LEAP_DAY), "12:34:56Z");
    }

    #[test]
    fn test_offset_annotates_without_shifting() {
        assert_eq!(
            to_iso8601_with_offset(LEAP_DAY, 5 * 3_600 + 30 * 60),
            "2024-02-29T12:34:56+05:30"
        );
        assert_eq!(
            to_iso8601_with_offset_ms(LEAP_DAY * 1_000 + 1, -3 * 3_600),
            "2024-02-29T12:34:56.001-03:00"
        );
    }

    #[test]
    fn test_before_epoch() {
        assert_eq!(to_iso8601_utc(-1), "1969-12-31T23:59:59Z");
        assert_eq!(to_iso8601_utc_ms(-1), "1969-12-31T23:59:59.999Z");
        assert_eq!(to_iso8601_date(-62_167_219_200), "0000-01-01");
    }

    #[test]
    fn test_mql5_forms() {
        assert_eq!(to_mql5_date_time(LEAP_DAY), "2024.02.29 12:34:56");
        assert_eq!(to_mql5_date(LEAP_DAY), "2024.02.29");
        assert_eq!(to_mql5_time(LEAP_DAY), "12:34:56");
        assert_eq!(to_mql5_date_time_ms(LEAP_DAY * 1_000 + 999), "2024.02.29 12:34:56");
        assert_eq!(to_mql5_date_ms(0), "1970.01.01");
        assert_eq!(to_mql5_time_ms(1_500), "00:00:01");
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(to_human_readable(LEAP_DAY), "2024-02-29 12:34:56");
        assert_eq!(to_human_readable_ms(LEAP_DAY * 1_000 + 7), "2024-02-29 12:34:56.007");
        assert_eq!(to_windows_filename(LEAP_DAY), "2024-02-29_12-34-56");
        assert_eq!(to_windows_filename_ms(LEAP_DAY * 1_000 + 7), "2024-02-29_12-34-56_007");
    }

    #[test]
    fn test_oadate() {
        assert_eq!(ts_to_oadate(0), 25_569.0);
        assert_eq!(ts_ms_to_oadate(-86_400_000), 25_568.0);
        assert_eq!(fts_to_oadate(21_600.0), 25_569.25);
        assert_eq!(oadate_to_ts(25_570.0), 86_400);
        assert_eq!(oadate_to_ts_ms(25_569.25), 21_600_000);
        assert_eq!(oadate_to_fts(25_568.5), -43_200.0);
        // Truncation toward zero, not floor.
        assert_eq!(oadate_to_ts(25_569.0 - 0.5 / 86_400.0), 0);
        assert_eq!(to_oadate(1899, 12, 30, 0, 0, 0, 0), Ok(0.0));
        assert_eq!(to_oadate(1970, 1, 1, 12, 0, 0, 0), Ok(25_569.5));
        assert_eq!(to_oadate(2023, 2, 29, 0, 0, 0, 0), Err(TimeError::InvalidDateTime));
    }
}
