// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Process-wide NTP time.
//!
//! [`NtpTimeService::global`] is a lazily created singleton that owns at
//! most one [`NtpPoolRunner`]. The UTC readers start it on first use, so a
//! caller that only wants corrected time never manages a pool:
//!
//! ```no_run
//! use tempcal::ntp::NtpTimeService;
//!
//! let utc_ms = NtpTimeService::global().utc_time_ms();
//! # let _ = utc_ms;
//! NtpTimeService::global().shutdown();
//! ```
//!
//! Servers and pool configuration are fixed while the service runs; set
//! them before [`init`](NtpTimeService::init) or after
//! [`shutdown`](NtpTimeService::shutdown).

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

use super::client::{NtpQuery, UdpQuery};
use super::pool::{default_servers, NtpPool, NtpPoolConfig, NtpSample, NtpServerConfig};
use super::runner::{NtpPoolRunner, DEFAULT_INTERVAL};
use crate::clock::now_realtime_us;
use crate::constants::{US_PER_MS, US_PER_SEC};

static GLOBAL: LazyLock<NtpTimeService> = LazyLock::new(NtpTimeService::new);

struct ServiceState<Q: NtpQuery> {
    interval: Duration,
    /// `None` selects [`default_servers`].
    servers: Option<Vec<NtpServerConfig>>,
    pool_cfg: NtpPoolConfig,
    runner: Option<NtpPoolRunner<Q>>,
}

/// Lifecycle wrapper around one background pool runner.
pub struct NtpTimeService<Q: NtpQuery = UdpQuery> {
    make_query: Box<dyn Fn() -> Q + Send + Sync>,
    /// Serializes `init` and `shutdown`; never held by readers.
    lifecycle: Mutex<()>,
    state: Mutex<ServiceState<Q>>,
}

impl NtpTimeService {
    /// Service over real UDP exchanges.
    pub fn new() -> Self {
        Self::with_query(UdpQuery::default)
    }

    /// The process-wide instance.
    pub fn global() -> &'static NtpTimeService {
        &GLOBAL
    }
}

impl Default for NtpTimeService {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: NtpQuery + 'static> NtpTimeService<Q> {
    /// Start with the configured interval ([`DEFAULT_INTERVAL`] unless an
    /// earlier [`init_with`](Self::init_with) changed it).
    pub fn init(&self) -> bool {
        let interval = self.state.lock().interval;
        self.init_with(interval)
    }

    /// Build a pool, measure once on the calling thread, then hand the pool
    /// to a runner cycling every `interval`.
    ///
    /// Returns `true` at once when already running; otherwise whether the
    /// first measurement was accepted. The runner keeps going after a failed
    /// first measurement.
    pub fn init_with(&self, interval: Duration) -> bool {
        let _lifecycle = self.lifecycle.lock();
        let (cfg, servers) = {
            let mut st = self.state.lock();
            if st.runner.as_ref().is_some_and(NtpPoolRunner::running) {
                return true;
            }
            st.interval = interval;
            (st.pool_cfg.clone(), st.servers.clone())
        };

        let pool = NtpPool::with_query(cfg, (self.make_query)());
        pool.set_servers(servers.unwrap_or_else(default_servers));
        let runner = NtpPoolRunner::new(pool);
        let ok = runner.measure_now();
        if !runner.start(interval, false) {
            return false;
        }
        info!(ok, offset_us = runner.offset_us(), "ntp time service started");
        self.state.lock().runner = Some(runner);
        ok
    }

    /// Start unless already running.
    pub fn ensure_started(&self) {
        if !self.running() {
            self.init();
        }
    }

    /// Offset in µs; starts the service if needed.
    pub fn offset_us(&self) -> i64 {
        self.ensure_started();
        self.with_runner(0, NtpPoolRunner::offset_us)
    }

    /// Corrected UTC in µs; starts the service if needed and falls back to
    /// the local clock when it cannot.
    pub fn utc_time_us(&self) -> i64 {
        self.ensure_started();
        self.state
            .lock()
            .runner
            .as_ref()
            .map_or_else(now_realtime_us, NtpPoolRunner::utc_time_us)
    }

    pub fn utc_time_ms(&self) -> i64 {
        self.utc_time_us() / US_PER_MS
    }

    pub fn utc_time_sec(&self) -> i64 {
        self.utc_time_us() / US_PER_SEC
    }
}

impl<Q: NtpQuery> NtpTimeService<Q> {
    /// Service whose pools query through a fresh `make_query()` each time
    /// it starts.
    pub fn with_query(make_query: impl Fn() -> Q + Send + Sync + 'static) -> Self {
        Self {
            make_query: Box::new(make_query),
            lifecycle: Mutex::new(()),
            state: Mutex::new(ServiceState {
                interval: DEFAULT_INTERVAL,
                servers: None,
                pool_cfg: NtpPoolConfig::default(),
                runner: None,
            }),
        }
    }

    /// Stop and drop the runner. No-op when not started.
    pub fn shutdown(&self) {
        let _lifecycle = self.lifecycle.lock();
        let runner = self.state.lock().runner.take();
        if let Some(runner) = runner {
            runner.stop();
            info!("ntp time service stopped");
        }
    }

    pub fn running(&self) -> bool {
        self.state
            .lock()
            .runner
            .as_ref()
            .is_some_and(NtpPoolRunner::running)
    }

    fn with_runner<T>(&self, idle: T, read: impl FnOnce(&NtpPoolRunner<Q>) -> T) -> T {
        self.state.lock().runner.as_ref().map_or(idle, read)
    }

    // ── runner counters; zero or empty before init ────────────────────

    pub fn last_measure_ok(&self) -> bool {
        self.with_runner(false, NtpPoolRunner::last_measure_ok)
    }

    pub fn measure_count(&self) -> u64 {
        self.with_runner(0, NtpPoolRunner::measure_count)
    }

    pub fn fail_count(&self) -> u64 {
        self.with_runner(0, NtpPoolRunner::fail_count)
    }

    pub fn last_update_realtime_us(&self) -> i64 {
        self.with_runner(0, NtpPoolRunner::last_update_realtime_us)
    }

    pub fn last_success_realtime_us(&self) -> i64 {
        self.with_runner(0, NtpPoolRunner::last_success_realtime_us)
    }

    pub fn last_samples(&self) -> Vec<NtpSample> {
        self.with_runner(Vec::new(), NtpPoolRunner::last_samples)
    }

    /// No cycle within `max_age`, or none at all.
    pub fn stale(&self, max_age: Duration) -> bool {
        let last = self.last_update_realtime_us();
        if last == 0 {
            return true;
        }
        let max_age_us = i64::try_from(max_age.as_micros()).unwrap_or(i64::MAX);
        now_realtime_us().saturating_sub(last) > max_age_us
    }

    // ── configuration; rejected while running ─────────────────────────

    pub fn set_servers(&self, servers: Vec<NtpServerConfig>) -> bool {
        self.configure(|st| st.servers = Some(servers))
    }

    pub fn set_default_servers(&self) -> bool {
        self.configure(|st| st.servers = Some(default_servers()))
    }

    /// Forget custom servers; the next start uses the default list.
    pub fn clear_servers(&self) -> bool {
        self.configure(|st| st.servers = None)
    }

    pub fn set_pool_config(&self, cfg: NtpPoolConfig) -> bool {
        self.configure(|st| st.pool_cfg = cfg)
    }

    pub fn pool_config(&self) -> NtpPoolConfig {
        self.state.lock().pool_cfg.clone()
    }

    fn configure(&self, apply: impl FnOnce(&mut ServiceState<Q>)) -> bool {
        let mut st = self.state.lock();
        if st.runner.as_ref().is_some_and(NtpPoolRunner::running) {
            return false;
        }
        apply(&mut st);
        true
    }
}

impl<Q: NtpQuery> Drop for NtpTimeService<Q> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<Q: NtpQuery> fmt::Debug for NtpTimeService<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NtpTimeService")
            .field("running", &self.running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::FakeServers;
    use super::*;
    use crate::clock::ts_ms;

    fn open_server(host: &str) -> NtpServerConfig {
        NtpServerConfig {
            min_interval: Duration::ZERO,
            ..NtpServerConfig::new(host)
        }
    }

    fn service_over(hosts: &[&str]) -> NtpTimeService<FakeServers> {
        let service = NtpTimeService::with_query(|| FakeServers::default().with("a", 700, 8));
        assert!(service.set_servers(hosts.iter().map(|h| open_server(h)).collect()));
        assert!(service.set_pool_config(NtpPoolConfig {
            min_valid_samples: 1,
            rng_seed: 3,
            ..NtpPoolConfig::default()
        }));
        service
    }

    #[test]
    fn test_idle_service_reports_nothing() {
        let service = service_over(&["a"]);
        assert!(!service.running());
        assert!(service.stale(Duration::from_secs(3_600)));
        assert_eq!(service.measure_count(), 0);
        assert!(!service.last_measure_ok());
        assert!(service.last_samples().is_empty());
        service.shutdown();
    }

    #[test]
    fn test_init_measures_once_and_locks_configuration() {
        let service = service_over(&["a"]);
        assert!(service.init());
        assert!(service.running());
        assert_eq!(service.measure_count(), 1);
        assert!(service.last_measure_ok());
        assert_eq!(service.offset_us(), 700);
        assert!(!service.stale(Duration::from_secs(3_600)));
        assert_eq!(service.last_samples().len(), 1);

        assert!(!service.set_servers(Vec::new()));
        assert!(!service.set_pool_config(NtpPoolConfig::default()));
        assert!(!service.clear_servers());
        assert_eq!(service.pool_config().min_valid_samples, 1);

        // Already running: no second measurement.
        assert!(service.init());
        assert_eq!(service.measure_count(), 1);

        assert!((service.utc_time_ms() - ts_ms()).abs() < 1_000);
        assert!((service.utc_time_sec() * 1_000 - ts_ms()).abs() < 2_000);

        service.shutdown();
        assert!(!service.running());
        assert_eq!(service.measure_count(), 0);
        assert!(service.set_default_servers());
        service.shutdown();
    }

    #[test]
    fn test_readers_start_the_service() {
        let service = service_over(&["a"]);
        let utc_us = service.utc_time_us();
        assert!(service.running());
        assert_eq!(service.offset_us(), 700);
        assert!(utc_us > 0);
    }

    #[test]
    fn test_failed_first_measure_keeps_runner() {
        let service = service_over(&["down"]);
        assert!(!service.init_with(Duration::from_secs(3_600)));
        assert!(service.running());
        assert!(!service.last_measure_ok());
        assert_eq!(service.fail_count(), 1);
        assert_eq!(service.last_success_realtime_us(), 0);
        assert_eq!(service.offset_us(), 0);
    }

    #[test]
    fn test_global_is_one_instance() {
        assert!(std::ptr::eq(NtpTimeService::global(), NtpTimeService::global()));
        assert_eq!(NtpTimeService::global().pool_config(), NtpPoolConfig::default());
    }
}
