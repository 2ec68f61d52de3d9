// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Monotonic stopwatch and deadline.
//!
//! Both timers count signed nanoseconds on the process-wide monotonic axis
//! of [`mono_ns`](crate::clock::mono_ns). Methods taking an explicit `now`
//! interpret it on that same axis, in the unit named by their suffix; this
//! makes the timers testable without sleeping.
//!
//! Mutators take `&mut self`; share a timer across threads behind a lock.

use std::time::Duration;

use crate::clock::mono_ns;
use crate::constants::{NS_PER_MS, NS_PER_SEC};

#[inline]
const fn ms_to_ns(ms: i64) -> i64 {
    ms.saturating_mul(NS_PER_MS)
}

#[inline]
const fn sec_to_ns(sec: i64) -> i64 {
    sec.saturating_mul(NS_PER_SEC)
}

#[inline]
fn ns_to_duration(ns: i64) -> Duration {
    Duration::from_nanos(ns.max(0) as u64)
}

#[inline]
fn duration_to_ns(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════
// ElapsedTimer
// ═══════════════════════════════════════════════════════════════════════════

/// Stopwatch over the monotonic clock.
///
/// ```
/// use tempcal::ElapsedTimer;
///
/// let mut timer = ElapsedTimer::default();
/// assert!(!timer.is_running());
/// timer.restart_ms(1_000);
/// assert_eq!(timer.elapsed_ms_at(1_250), 250);
/// assert_eq!(timer.elapsed_ms_at(900), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedTimer {
    start_ns: Option<i64>,
}

impl ElapsedTimer {
    /// Timer that is already running when `start` is true.
    pub fn new(start: bool) -> Self {
        let mut timer = Self::default();
        if start {
            timer.start();
        }
        timer
    }

    #[inline]
    pub fn started() -> Self {
        Self::new(true)
    }

    pub fn start(&mut self) {
        self.start_ns = Some(mono_ns());
    }

    /// Elapsed time so far; the timer then restarts from now.
    pub fn restart(&mut self) -> Duration {
        let now = mono_ns();
        let delta = self.elapsed_ns_at(now);
        self.start_ns = Some(now);
        ns_to_duration(delta)
    }

    /// Restart at `now_ms`, returning the milliseconds elapsed before it.
    pub fn restart_ms(&mut self, now_ms: i64) -> i64 {
        let now = ms_to_ns(now_ms);
        let delta = self.elapsed_ns_at(now);
        self.start_ns = Some(now);
        delta / NS_PER_MS
    }

    pub fn restart_sec(&mut self, now_sec: i64) -> i64 {
        let now = sec_to_ns(now_sec);
        let delta = self.elapsed_ns_at(now);
        self.start_ns = Some(now);
        delta / NS_PER_SEC
    }

    /// Stop the timer; elapsed readings become zero.
    pub fn invalidate(&mut self) {
        self.start_ns = None;
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.start_ns.is_some()
    }

    /// Start point on the monotonic axis, in nanoseconds.
    #[inline]
    pub const fn start_time(&self) -> Option<i64> {
        self.start_ns
    }

    /// Start point in milliseconds; `0` when not running.
    pub fn ms_since_reference(&self) -> i64 {
        self.start_ns.map_or(0, |s| s.div_euclid(NS_PER_MS))
    }

    // ── readings ──────────────────────────────────────────────────────

    pub fn elapsed(&self) -> Duration {
        ns_to_duration(self.elapsed_ns())
    }

    pub fn elapsed_ns(&self) -> i64 {
        self.elapsed_ns_at(mono_ns())
    }

    /// Nanoseconds from the start to `now_ns`, clamped at zero.
    pub fn elapsed_ns_at(&self, now_ns: i64) -> i64 {
        self.start_ns
            .map_or(0, |start| now_ns.saturating_sub(start).max(0))
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ns() / NS_PER_MS
    }

    pub fn elapsed_ms_at(&self, now_ms: i64) -> i64 {
        self.elapsed_ns_at(ms_to_ns(now_ms)) / NS_PER_MS
    }

    pub fn elapsed_sec(&self) -> i64 {
        self.elapsed_ns() / NS_PER_SEC
    }

    pub fn elapsed_sec_at(&self, now_sec: i64) -> i64 {
        self.elapsed_ns_at(sec_to_ns(now_sec)) / NS_PER_SEC
    }

    /// `true` once `timeout_ms` has passed; always `true` for a
    /// non-positive timeout and `false` when not running.
    pub fn has_expired(&self, timeout_ms: i64) -> bool {
        self.is_running() && (timeout_ms <= 0 || self.elapsed_ms() >= timeout_ms)
    }

    pub fn has_expired_sec(&self, timeout_sec: i64) -> bool {
        self.is_running() && (timeout_sec <= 0 || self.elapsed_ns() >= sec_to_ns(timeout_sec))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DeadlineTimer
// ═══════════════════════════════════════════════════════════════════════════

const FOREVER: i64 = i64::MAX;

/// Deadline over the monotonic clock, possibly infinite.
///
/// ```
/// use tempcal::DeadlineTimer;
///
/// let mut timer = DeadlineTimer::default();
/// timer.start_at(5_000_000);
/// assert!(!timer.has_expired_ms(4));
/// assert!(timer.has_expired_ms(5));
/// timer.set_forever();
/// assert!(timer.is_forever());
/// assert!(!timer.has_expired_sec(i64::MAX / 1_000_000_000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadlineTimer {
    deadline_ns: Option<i64>,
}

impl DeadlineTimer {
    pub fn from_timeout(timeout: Duration) -> Self {
        let mut timer = Self::default();
        timer.start(timeout);
        timer
    }

    pub fn from_timeout_ms(timeout_ms: i64) -> Self {
        let mut timer = Self::default();
        timer.start_ms(timeout_ms);
        timer
    }

    pub fn from_timeout_sec(timeout_sec: i64) -> Self {
        let mut timer = Self::default();
        timer.start_sec(timeout_sec);
        timer
    }

    /// Arm at an absolute point on the monotonic axis.
    pub fn start_at(&mut self, deadline_ns: i64) {
        self.deadline_ns = Some(deadline_ns);
    }

    /// Arm `timeout` from now, saturating to forever.
    pub fn start(&mut self, timeout: Duration) {
        self.start_ns(duration_to_ns(timeout));
    }

    /// Non-positive timeouts expire immediately.
    pub fn start_ms(&mut self, timeout_ms: i64) {
        self.start_ns(ms_to_ns(timeout_ms));
    }

    pub fn start_sec(&mut self, timeout_sec: i64) {
        self.start_ns(sec_to_ns(timeout_sec));
    }

    fn start_ns(&mut self, timeout_ns: i64) {
        let now = mono_ns();
        self.start_at(now.saturating_add(timeout_ns.max(0)));
    }

    pub fn stop(&mut self) {
        self.deadline_ns = None;
    }

    pub fn set_forever(&mut self) {
        self.deadline_ns = Some(FOREVER);
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.deadline_ns.is_some()
    }

    #[inline]
    pub fn is_forever(&self) -> bool {
        self.deadline_ns == Some(FOREVER)
    }

    /// Deadline in monotonic nanoseconds; `None` when stopped.
    #[inline]
    pub const fn deadline(&self) -> Option<i64> {
        self.deadline_ns
    }

    /// `0` when stopped.
    pub fn deadline_ms(&self) -> i64 {
        self.deadline_ns.map_or(0, |d| d.div_euclid(NS_PER_MS))
    }

    pub fn deadline_sec(&self) -> i64 {
        self.deadline_ns.map_or(0, |d| d.div_euclid(NS_PER_SEC))
    }

    // ── expiry ────────────────────────────────────────────────────────

    pub fn has_expired(&self) -> bool {
        self.has_expired_at(mono_ns())
    }

    /// A forever deadline never expires.
    pub fn has_expired_at(&self, now_ns: i64) -> bool {
        match self.deadline_ns {
            Some(FOREVER) | None => false,
            Some(d) => now_ns >= d,
        }
    }

    pub fn has_expired_ms(&self, now_ms: i64) -> bool {
        self.has_expired_at(ms_to_ns(now_ms))
    }

    pub fn has_expired_sec(&self, now_sec: i64) -> bool {
        self.has_expired_at(sec_to_ns(now_sec))
    }

    // ── remaining ─────────────────────────────────────────────────────

    /// Zero once expired or stopped; `Duration::MAX` when forever.
    pub fn remaining_time(&self) -> Duration {
        if self.is_forever() {
            return Duration::MAX;
        }
        ns_to_duration(self.remaining_ns_at(mono_ns()))
    }

    pub fn remaining_ns_at(&self, now_ns: i64) -> i64 {
        match self.deadline_ns {
            None => 0,
            Some(FOREVER) => i64::MAX,
            Some(d) => d.saturating_sub(now_ns).max(0),
        }
    }

    /// `i64::MAX` when forever.
    pub fn remaining_time_ms(&self) -> i64 {
        match self.remaining_ns_at(mono_ns()) {
            i64::MAX => i64::MAX,
            ns => ns / NS_PER_MS,
        }
    }

    pub fn remaining_time_sec(&self) -> i64 {
        match self.remaining_ns_at(mono_ns()) {
            i64::MAX => i64::MAX,
            ns => ns / NS_PER_SEC,
        }
    }

    // ── adjustment ────────────────────────────────────────────────────

    /// Move a running, finite deadline by `delta_ns`, saturating at
    /// forever. Negative values pull the deadline earlier.
    pub fn add_ns(&mut self, delta_ns: i64) {
        if let Some(d) = self.deadline_ns.filter(|&d| d != FOREVER) {
            self.deadline_ns = Some(d.saturating_add(delta_ns));
        }
    }

    pub fn add(&mut self, extend_by: Duration) {
        self.add_ns(duration_to_ns(extend_by));
    }

    pub fn add_ms(&mut self, delta_ms: i64) {
        self.add_ns(ms_to_ns(delta_ms));
    }

    pub fn add_sec(&mut self, delta_sec: i64) {
        self.add_ns(sec_to_ns(delta_sec));
    }
}
