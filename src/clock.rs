// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock and monotonic readings.
//!
//! Wall-clock values come from `chrono::Utc::now()`; the monotonic counter
//! is measured from a process-wide [`Instant`] captured on first use.

use std::sync::LazyLock;
use std::time::Instant;

use chrono::{DateTime, Utc};

static MONO_ORIGIN: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Current UTC time.
#[inline]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Microseconds since the Unix epoch from the realtime clock.
#[inline]
pub fn now_realtime_us() -> i64 {
    Utc::now().timestamp_micros()
}

/// Whole seconds since the Unix epoch.
#[inline]
pub fn ts() -> i64 {
    Utc::now().timestamp()
}

#[inline]
pub fn ts_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[inline]
pub fn ts_us() -> i64 {
    now_realtime_us()
}

/// Fractional seconds since the Unix epoch, microsecond resolution.
#[inline]
pub fn fts() -> f64 {
    now_realtime_us() as f64 / 1e6
}

/// Monotonic nanoseconds since the first call in this process.
///
/// Never decreases; saturates at `i64::MAX` after about 292 years.
pub fn mono_ns() -> i64 {
    i64::try_from(MONO_ORIGIN.elapsed().as_nanos()).unwrap_or(i64::MAX)
}
