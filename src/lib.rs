// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar arithmetic over Unix timestamps.
//!
//! Instants are signed counts since 1970-01-01T00:00:00Z on the proleptic
//! Gregorian calendar without leap seconds:
//!
//! | Name | Type | Unit |
//! |------|------|------|
//! | `ts` | `i64` | seconds |
//! | `ts_ms` | `i64` | milliseconds |
//! | `ts_us` | `i64` | microseconds |
//! | `fts` | `f64` | seconds with fraction |
//!
//! # Layers
//!
//! - Kernel: [`split_unix_day`], [`days_from_date`], [`date_from_days`] exact
//!   over the full `i64` range, with the peel-loop [`legacy`] path kept as
//!   an oracle.
//! - Civil fields and boundaries: [`to_timestamp`], [`to_date_time`],
//!   [`start_of_day`], [`end_of_month`], [`start_of_period`], …
//! - Workdays and ISO weeks: [`first_workday_day`], [`to_iso_week_date`].
//! - Text: [`format`] (`strftime`-like), ISO-8601 / MQL5 renderers,
//!   [`parse_iso8601`] and the `try_parse_*` family, OLE Automation dates.
//! - Astronomy: typed instants [`Time<S>`] over [`JD`], [`MJD`],
//!   [`UnixTime`] and [`OADate`]; [`MoonPhase`].
//! - Runtime: [`clock`] helpers, [`ElapsedTimer`] / [`DeadlineTimer`] and
//!   the [`ntp`] client, pool, background runner and process-wide service.
//!
//! # Time scales
//!
//! | Marker | Epoch (JD) |
//! |--------|------------|
//! | [`JD`] | 0 |
//! | [`MJD`] | 2 400 000.5 |
//! | [`UnixTime`] | 2 440 587.5 |
//! | [`OADate`] | 2 415 018.5 |

mod boundaries;
mod civil;
mod codec;
mod error;
mod fast_date;
mod floor_math;
mod format;
pub(crate) mod instant;
mod iso_week;
mod julian;
mod moon;
mod parse;
pub(crate) mod scales;
mod time_zone;
mod timer;
mod types;
mod units;
mod validation;
mod workday;

pub mod clock;
pub mod constants;
pub mod legacy;
pub mod ntp;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use boundaries::*;
pub use civil::*;
pub use codec::*;
pub use error::{NtpError, TimeError, TimeResult};
pub use fast_date::{date_from_days, days_from_date, split_unix_day, year_from_days};
pub use floor_math::{floor_div, floor_div_mod, floor_mod, mul_hi_u64, mul_hi_u64_portable};
pub use format::{format, format_ms};
pub use instant::{Time, TimeScale};
pub use iso_week::*;
pub use julian::{fts_to_jd, fts_to_mjd, gregorian_to_jd, gregorian_to_jdn, jd_to_fts, ts_to_jd, ts_to_mjd};
pub use moon::*;
pub use ntp::{
    Aggregation, NtpClient, NtpPool, NtpPoolConfig, NtpPoolRunner, NtpSample, NtpServerConfig,
    NtpTimeService,
};
pub use parse::*;
pub use scales::{OADate, UnixTime, JD, MJD};
pub use time_zone::{
    format_offset, parse_offset, to_local, to_local_ms, to_utc, to_utc_ms, TimeZoneOffset,
};
pub use timer::{DeadlineTimer, ElapsedTimer};
pub use types::{CivilDate, DateTime, DaySplit, Month, NameCase, Weekday};
pub use units::*;
pub use validation::*;
pub use workday::*;

// ── Type aliases ──────────────────────────────────────────────────────────

/// Julian Date; alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;

/// Modified Julian Date, `JD − 2 400 000.5`; alias for [`Time<MJD>`].
pub type ModifiedJulianDate = Time<MJD>;
