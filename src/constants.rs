// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Named durations, epoch offsets and error sentinels.
//!
//! | Group | Constants |
//! |-------|-----------|
//! | Sub-second scales | [`NS_PER_SEC`], [`US_PER_SEC`], [`MS_PER_SEC`] |
//! | Civil durations | [`SEC_PER_MIN`] … [`SEC_PER_LEAP_YEAR`] |
//! | Gregorian cycles | [`SEC_PER_4_YEARS`], [`SEC_PER_100_YEARS`], [`SEC_PER_400_YEARS`] |
//! | Epochs | [`UNIX_EPOCH_YEAR`], [`OLE_EPOCH`], [`NTP_UNIX_OFFSET`], [`UNIX_EPOCH_JD`] |
//! | Sentinels | [`ERROR_TIMESTAMP`], [`ERROR_YEAR`], [`MAX_TIMESTAMP`], [`MAX_YEAR`], [`MIN_YEAR`] |

// ── Sub-second scales ─────────────────────────────────────────────────────

pub const NS_PER_US: i64 = 1_000;
pub const NS_PER_MS: i64 = 1_000_000;
pub const NS_PER_SEC: i64 = 1_000_000_000;
pub const US_PER_MS: i64 = 1_000;
pub const US_PER_SEC: i64 = 1_000_000;
pub const MS_PER_SEC: i64 = 1_000;

// ── Civil durations ───────────────────────────────────────────────────────

pub const SEC_PER_MIN: i64 = 60;
pub const SEC_PER_HOUR: i64 = 3_600;
pub const SEC_PER_DAY: i64 = 86_400;
pub const SEC_PER_WEEK: i64 = 7 * SEC_PER_DAY;
pub const SEC_PER_YEAR: i64 = 365 * SEC_PER_DAY;
pub const SEC_PER_LEAP_YEAR: i64 = 366 * SEC_PER_DAY;

pub const MS_PER_MIN: i64 = SEC_PER_MIN * MS_PER_SEC;
pub const MS_PER_HOUR: i64 = SEC_PER_HOUR * MS_PER_SEC;
pub const MS_PER_DAY: i64 = SEC_PER_DAY * MS_PER_SEC;

pub const MIN_PER_HOUR: i64 = 60;
pub const MIN_PER_DAY: i64 = 1_440;
pub const HOURS_PER_DAY: i64 = 24;
pub const DAYS_PER_WEEK: i64 = 7;
pub const MONTHS_PER_YEAR: i64 = 12;

// ── Gregorian cycles ──────────────────────────────────────────────────────

/// Four years containing exactly one leap day.
pub const SEC_PER_4_YEARS: i64 = 1_461 * SEC_PER_DAY;
/// A century whose first year is not a leap year (24 leap days).
pub const SEC_PER_100_YEARS: i64 = 36_524 * SEC_PER_DAY;
/// A century starting on a multiple of 400 (25 leap days).
pub const SEC_PER_FIRST_100_YEARS: i64 = 36_525 * SEC_PER_DAY;
pub const SEC_PER_400_YEARS: i64 = 146_097 * SEC_PER_DAY;
pub const DAYS_PER_400_YEARS: i64 = 146_097;

// ── Epochs ────────────────────────────────────────────────────────────────

pub const UNIX_EPOCH_YEAR: i64 = 1970;
/// 2000-01-01T00:00:00Z.
pub const SEC_AT_2000: i64 = 946_684_800;
/// 2100-01-01T00:00:00Z, the first non-leap century after the epoch.
pub const SEC_AT_2100: i64 = 4_102_444_800;
/// Days between 1899-12-30 (OADate zero) and 1970-01-01.
pub const OLE_EPOCH: i64 = 25_569;
/// Seconds between the NTP era origin (1900-01-01) and the Unix epoch.
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;
/// Julian Date of 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Days between JD 0 and 1970-01-01 at midnight, for integer day numbers.
pub const UNIX_EPOCH_JDN: i64 = 2_440_588;

// ── Sentinels and range pivots ────────────────────────────────────────────

/// Timestamp returned where an operation has no representable answer.
pub const ERROR_TIMESTAMP: i64 = 9_223_372_036_854_770_000;
/// Year returned where an operation has no representable answer.
pub const ERROR_YEAR: i64 = ERROR_TIMESTAMP;
/// Pivot used by the legacy peel-loop conversions.
pub const MAX_TIMESTAMP: i64 = 9_223_371_890_843_040_000;
pub const MAX_YEAR: i64 = 292_277_022_000;
pub const MIN_YEAR: i64 = -2_967_369_602_200;

/// Offset bounds accepted for fixed UTC offsets.
pub const MIN_UTC_OFFSET_SEC: i64 = -12 * SEC_PER_HOUR;
pub const MAX_UTC_OFFSET_SEC: i64 = 14 * SEC_PER_HOUR;
