// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Background measurement of a shared [`NtpPool`].
//!
//! The runner owns one worker thread. The worker measures, then sleeps on a
//! condition variable for the configured interval; [`stop`] and
//! [`force_measure`] wake it early.
//!
//! [`stop`]: NtpPoolRunner::stop
//! [`force_measure`]: NtpPoolRunner::force_measure

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use super::client::{NtpQuery, UdpQuery};
use super::pool::{NtpPool, NtpSample};
use crate::clock::now_realtime_us;
use crate::constants::US_PER_SEC;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
struct Signal {
    stop: bool,
    force: bool,
}

enum Wake {
    Measure,
    Stop,
}

/// State shared between the handle and its worker thread.
#[derive(Debug, Default)]
struct Shared {
    signal: Mutex<Signal>,
    wake: Condvar,
    running: AtomicBool,
    last_measure_ok: AtomicBool,
    measure_count: AtomicU64,
    fail_count: AtomicU64,
    last_update_realtime_us: AtomicI64,
    last_success_realtime_us: AtomicI64,
}

impl Shared {
    fn measure<Q: NtpQuery>(&self, pool: &NtpPool<Q>) -> bool {
        let ok = pool.measure();
        self.measure_count.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.fail_count.fetch_add(1, Ordering::Relaxed);
        }
        self.last_measure_ok.store(ok, Ordering::Relaxed);
        let now = now_realtime_us();
        self.last_update_realtime_us.store(now, Ordering::Relaxed);
        if ok {
            self.last_success_realtime_us.store(now, Ordering::Relaxed);
        }
        debug!(ok, offset_us = pool.offset_us(), "ntp runner cycle");
        ok
    }

    /// Sleep until `interval` elapses or a stop or force request arrives.
    fn wait(&self, interval: Duration) -> Wake {
        let deadline = Instant::now().checked_add(interval);
        let mut signal = self.signal.lock();
        while !signal.stop && !signal.force {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut signal, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut signal),
            }
        }
        if signal.stop {
            return Wake::Stop;
        }
        signal.force = false;
        Wake::Measure
    }
}

fn run<Q: NtpQuery>(
    pool: Arc<NtpPool<Q>>,
    shared: Arc<Shared>,
    interval: Duration,
    measure_immediately: bool,
) {
    if measure_immediately && !shared.signal.lock().stop {
        shared.measure(&pool);
    }
    while let Wake::Measure = shared.wait(interval) {
        shared.measure(&pool);
    }
    shared.running.store(false, Ordering::Release);
    debug!("ntp runner exited");
}

/// Periodic [`NtpPool::measure`] on a worker thread.
///
/// The pool is shared through an [`Arc`], so readers may keep querying it
/// directly while the runner updates it. Dropping the runner stops the
/// worker.
///
/// ```no_run
/// use std::time::Duration;
/// use tempcal::ntp::NtpPoolRunner;
/// use tempcal::{NtpPool, NtpPoolConfig};
///
/// let pool = NtpPool::new(NtpPoolConfig::default());
/// pool.set_default_servers();
/// let runner = NtpPoolRunner::new(pool);
/// runner.start(Duration::from_secs(30), true);
/// println!("utc ≈ {} ms", runner.utc_time_ms());
/// runner.stop();
/// ```
#[derive(Debug)]
pub struct NtpPoolRunner<Q: NtpQuery = UdpQuery> {
    pool: Arc<NtpPool<Q>>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<Q: NtpQuery + 'static> NtpPoolRunner<Q> {
    /// Spawn the worker. `interval` is raised to 1 ms if shorter.
    ///
    /// Returns `false` when the worker is already running or the thread
    /// could not be spawned.
    pub fn start(&self, interval: Duration, measure_immediately: bool) -> bool {
        let mut worker = self.worker.lock();
        if self.shared.running.load(Ordering::Acquire) {
            return false;
        }
        if let Some(stale) = worker.take() {
            join_worker(stale);
        }

        *self.shared.signal.lock() = Signal::default();
        self.shared.running.store(true, Ordering::Release);
        let interval = interval.max(MIN_INTERVAL);
        let pool = Arc::clone(&self.pool);
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("tempcal-ntp".into())
            .spawn(move || run(pool, shared, interval, measure_immediately));
        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                info!(interval_ms = interval.as_millis() as u64, "ntp runner started");
                true
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::Release);
                warn!(error = %err, "ntp runner thread spawn failed");
                false
            }
        }
    }
}

impl<Q: NtpQuery> NtpPoolRunner<Q> {
    pub fn new(pool: NtpPool<Q>) -> Self {
        Self::from_shared(Arc::new(pool))
    }

    /// Runner over a pool that other owners keep using.
    pub fn from_shared(pool: Arc<NtpPool<Q>>) -> Self {
        Self {
            pool,
            shared: Arc::default(),
            worker: Mutex::new(None),
        }
    }

    pub fn pool(&self) -> &Arc<NtpPool<Q>> {
        &self.pool
    }

    /// Wake the worker and wait for it to exit. No-op when idle.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();
        self.shared.signal.lock().stop = true;
        self.shared.wake.notify_all();
        if let Some(handle) = worker.take() {
            join_worker(handle);
            info!("ntp runner stopped");
        }
        self.shared.running.store(false, Ordering::Release);
    }

    pub fn running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Ask the worker for a cycle now instead of at the end of its
    /// interval. `false` when the worker is not running.
    pub fn force_measure(&self) -> bool {
        if !self.running() {
            return false;
        }
        self.shared.signal.lock().force = true;
        self.shared.wake.notify_one();
        true
    }

    /// One cycle on the calling thread, counted like a background cycle.
    pub fn measure_now(&self) -> bool {
        self.shared.measure(&self.pool)
    }

    // ── pool readers ──────────────────────────────────────────────────

    pub fn offset_us(&self) -> i64 {
        self.pool.offset_us()
    }

    pub fn delay_us(&self) -> i64 {
        self.pool.delay_us()
    }

    pub fn stratum(&self) -> i32 {
        self.pool.stratum()
    }

    pub fn last_error_code(&self) -> i32 {
        self.pool.last_error_code()
    }

    pub fn utc_time_us(&self) -> i64 {
        self.pool.utc_time_us()
    }

    pub fn utc_time_ms(&self) -> i64 {
        self.pool.utc_time_ms()
    }

    pub fn utc_time_sec(&self) -> i64 {
        self.utc_time_us() / US_PER_SEC
    }

    pub fn last_samples(&self) -> Vec<NtpSample> {
        self.pool.last_samples()
    }

    // ── counters ──────────────────────────────────────────────────────

    /// Whether the most recent cycle updated the offset.
    pub fn last_measure_ok(&self) -> bool {
        self.shared.last_measure_ok.load(Ordering::Relaxed)
    }

    /// Cycles attempted, successful or not.
    pub fn measure_count(&self) -> u64 {
        self.shared.measure_count.load(Ordering::Relaxed)
    }

    pub fn fail_count(&self) -> u64 {
        self.shared.fail_count.load(Ordering::Relaxed)
    }

    /// Local realtime (µs) of the last cycle; `0` before the first.
    pub fn last_update_realtime_us(&self) -> i64 {
        self.shared.last_update_realtime_us.load(Ordering::Relaxed)
    }

    /// Local realtime (µs) of the last accepted cycle; `0` before the first.
    pub fn last_success_realtime_us(&self) -> i64 {
        self.shared.last_success_realtime_us.load(Ordering::Relaxed)
    }
}

impl<Q: NtpQuery> Drop for NtpPoolRunner<Q> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn join_worker(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("ntp runner thread panicked");
    }
}
