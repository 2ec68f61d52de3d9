// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Multi-server offset estimation.
//!
//! Each measurement cycle queries a random subset of eligible servers,
//! aggregates the accepted offsets and folds the estimate into the
//! published offset with an exponential moving average.
//!
//! A server becomes ineligible for `min_interval` after every query and,
//! after consecutive failures, for an exponentially growing backoff capped
//! at `backoff_max`.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::client::{NtpQuery, UdpQuery, DEFAULT_PORT};
use crate::clock::now_realtime_us;
use crate::constants::US_PER_MS;
use crate::error::NtpError;

const SEED_SCRAMBLE: u64 = 0x9E37_79B9_7F4A_7C15;
const MAD_TRIM_FACTOR: i64 = 3;

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// How accepted offsets are combined into one estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregation {
    /// Median; an even count averages the two central values.
    #[default]
    Median,
    /// Offset of the lowest-delay sample, ties to the lower stratum.
    BestDelay,
    /// Mean of the samples within three MADs of the median.
    MedianMadTrim,
}

/// One upstream server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NtpServerConfig {
    pub host: String,
    pub port: u16,
    /// Minimum spacing between two queries of this server.
    pub min_interval: Duration,
    /// Samples slower than this are ignored by aggregation. Zero disables.
    pub max_delay: Duration,
    pub backoff_initial: Duration,
    pub backoff_max: Duration,
}

impl Default for NtpServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            min_interval: Duration::from_secs(15),
            max_delay: Duration::from_millis(250),
            backoff_initial: Duration::from_secs(15),
            backoff_max: Duration::from_secs(600),
        }
    }
}

impl NtpServerConfig {
    /// Default settings for `host` on port 123.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NtpPoolConfig {
    /// Servers queried per cycle.
    pub sample_servers: usize,
    /// Accepted samples needed before the offset is updated.
    pub min_valid_samples: usize,
    pub aggregation: Aggregation,
    /// EWMA weight of a new estimate. `>= 1` adopts it outright, `<= 0`
    /// keeps the old offset.
    pub smoothing_alpha: f64,
    /// Zero seeds from the wall clock.
    pub rng_seed: u64,
}

impl Default for NtpPoolConfig {
    fn default() -> Self {
        Self {
            sample_servers: 5,
            min_valid_samples: 3,
            aggregation: Aggregation::Median,
            smoothing_alpha: 1.0,
            rng_seed: 0,
        }
    }
}

/// Outcome of querying one server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NtpSample {
    pub host: String,
    pub port: u16,
    pub is_ok: bool,
    /// `0` on success, else [`NtpError::code`](crate::NtpError::code).
    pub error_code: i32,
    /// `-1` when the query failed.
    pub stratum: i32,
    /// Server clock minus local clock.
    pub offset_us: i64,
    pub delay_us: i64,
    /// Delay ceiling from the server configuration; `0` means none.
    pub max_delay_us: i64,
}

impl NtpSample {
    /// Successful and within its delay ceiling.
    pub fn is_usable(&self) -> bool {
        self.is_ok && !(self.max_delay_us > 0 && self.delay_us > self.max_delay_us)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Pool
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct ServerState {
    cfg: NtpServerConfig,
    next_allowed: Option<Instant>,
    backoff: Duration,
    fail_count: u32,
}

impl ServerState {
    fn new(cfg: NtpServerConfig) -> Self {
        Self {
            cfg,
            next_allowed: None,
            backoff: Duration::ZERO,
            fail_count: 0,
        }
    }

    fn is_eligible(&self, now: Instant) -> bool {
        self.next_allowed.map_or(true, |t| now >= t)
    }

    fn record(&mut self, sample: &NtpSample, now: Instant) {
        if sample.is_ok {
            self.fail_count = 0;
            self.backoff = Duration::ZERO;
            return;
        }
        self.fail_count += 1;
        self.backoff = if self.backoff.is_zero() {
            self.cfg.backoff_initial
        } else {
            (self.backoff * 2).min(self.cfg.backoff_max)
        };
        self.next_allowed = Some(now + self.backoff);
        warn!(
            host = %self.cfg.host,
            code = sample.error_code,
            failures = self.fail_count,
            backoff_ms = self.backoff.as_millis() as u64,
            "ntp server backing off"
        );
    }
}

#[derive(Debug)]
struct PoolState {
    cfg: NtpPoolConfig,
    servers: Vec<ServerState>,
    last_samples: Vec<NtpSample>,
    offset_us: i64,
    /// Delay and stratum of the sample that stands for the last accepted
    /// estimate.
    delay_us: i64,
    stratum: i32,
    /// `0` after an accepted cycle.
    last_error_code: i32,
    rng: StdRng,
}

/// Offset estimator over a set of servers.
///
/// Measurement cycles ([`measure`](Self::measure),
/// [`measure_n`](Self::measure_n), [`apply_samples`](Self::apply_samples))
/// are serialized. Readers observe either the state before a cycle or the
/// state after it.
///
/// ```no_run
/// use tempcal::{NtpPool, NtpPoolConfig};
///
/// let pool = NtpPool::new(NtpPoolConfig::default());
/// pool.set_default_servers();
/// if pool.measure() {
///     println!("utc ≈ {} ms", pool.utc_time_ms());
/// }
/// ```
#[derive(Debug)]
pub struct NtpPool<Q: NtpQuery = UdpQuery> {
    querier: Q,
    cycle: Mutex<()>,
    state: Mutex<PoolState>,
}

impl NtpPool {
    pub fn new(cfg: NtpPoolConfig) -> Self {
        Self::with_query(cfg, UdpQuery::default())
    }

    /// Same as the free [`default_servers`].
    pub fn default_servers() -> Vec<NtpServerConfig> {
        default_servers()
    }
}

impl Default for NtpPool {
    fn default() -> Self {
        Self::new(NtpPoolConfig::default())
    }
}

impl<Q: NtpQuery> NtpPool<Q> {
    pub fn with_query(cfg: NtpPoolConfig, querier: Q) -> Self {
        let rng = StdRng::seed_from_u64(init_seed(cfg.rng_seed));
        Self {
            querier,
            cycle: Mutex::new(()),
            state: Mutex::new(PoolState {
                cfg,
                servers: Vec::new(),
                last_samples: Vec::new(),
                offset_us: 0,
                delay_us: 0,
                stratum: -1,
                last_error_code: 0,
                rng,
            }),
        }
    }

    pub fn querier(&self) -> &Q {
        &self.querier
    }

    // ── servers ───────────────────────────────────────────────────────

    pub fn set_servers(&self, servers: Vec<NtpServerConfig>) {
        self.state.lock().servers = servers.into_iter().map(ServerState::new).collect();
    }

    pub fn add_server(&self, server: NtpServerConfig) {
        self.state.lock().servers.push(ServerState::new(server));
    }

    pub fn clear_servers(&self) {
        self.state.lock().servers.clear();
    }

    pub fn set_default_servers(&self) {
        self.set_servers(default_servers());
    }

    pub fn server_count(&self) -> usize {
        self.state.lock().servers.len()
    }

    // ── configuration ─────────────────────────────────────────────────

    pub fn config(&self) -> NtpPoolConfig {
        self.state.lock().cfg.clone()
    }

    /// Replace the configuration. The RNG keeps its current state.
    pub fn set_config(&self, cfg: NtpPoolConfig) {
        self.state.lock().cfg = cfg;
    }

    // ── readers ───────────────────────────────────────────────────────

    /// Published offset (UTC minus local realtime) in microseconds.
    pub fn offset_us(&self) -> i64 {
        self.state.lock().offset_us
    }

    /// Round-trip delay of the representative sample of the last accepted
    /// cycle.
    pub fn delay_us(&self) -> i64 {
        self.state.lock().delay_us
    }

    /// `-1` until a cycle is accepted.
    pub fn stratum(&self) -> i32 {
        self.state.lock().stratum
    }

    /// Error of the last cycle: `0` when it was accepted, else the code of
    /// its first failed sample ([`NtpError::E_GENERIC`] if none failed
    /// outright).
    pub fn last_error_code(&self) -> i32 {
        self.state.lock().last_error_code
    }

    pub fn utc_time_us(&self) -> i64 {
        now_realtime_us() + self.offset_us()
    }

    pub fn utc_time_ms(&self) -> i64 {
        self.utc_time_us() / US_PER_MS
    }

    /// Samples of the most recent cycle.
    pub fn last_samples(&self) -> Vec<NtpSample> {
        self.state.lock().last_samples.clone()
    }

    // ── cycles ────────────────────────────────────────────────────────

    /// Query `sample_servers` servers and update the offset.
    ///
    /// Returns `true` when the offset estimate was accepted.
    pub fn measure(&self) -> bool {
        let n = self.state.lock().cfg.sample_servers;
        self.measure_n(n)
    }

    pub fn measure_n(&self, servers_to_sample: usize) -> bool {
        let _cycle = self.cycle.lock();

        let picked = {
            let mut st = self.state.lock();
            let picked = pick_servers(&mut st, servers_to_sample, Instant::now());
            debug!(
                picked = picked.len(),
                servers = st.servers.len(),
                "ntp pool cycle"
            );
            picked
        };

        // No lock is held while servers are queried.
        let samples: Vec<(usize, NtpSample)> = picked
            .into_iter()
            .map(|(idx, cfg)| (idx, self.query_one(&cfg)))
            .collect();

        let mut st = self.state.lock();
        let now = Instant::now();
        for (idx, sample) in &samples {
            // The list may have been replaced while the lock was released.
            if let Some(server) = st
                .servers
                .get_mut(*idx)
                .filter(|s| s.cfg.host == sample.host && s.cfg.port == sample.port)
            {
                server.record(sample, now);
            }
        }
        let samples: Vec<NtpSample> = samples.into_iter().map(|(_, s)| s).collect();
        let updated = publish(&mut st, &samples);
        st.last_samples = samples;
        updated
    }

    /// Aggregate externally obtained samples as if they came from a cycle.
    pub fn apply_samples(&self, samples: &[NtpSample]) -> bool {
        let _cycle = self.cycle.lock();
        let mut st = self.state.lock();
        let updated = publish(&mut st, samples);
        st.last_samples = samples.to_vec();
        updated
    }

    fn query_one(&self, cfg: &NtpServerConfig) -> NtpSample {
        let mut sample = NtpSample {
            host: cfg.host.clone(),
            port: cfg.port,
            stratum: -1,
            max_delay_us: i64::try_from(cfg.max_delay.as_micros()).unwrap_or(i64::MAX),
            ..NtpSample::default()
        };
        match self.querier.query(&cfg.host, cfg.port) {
            Ok(m) => {
                sample.is_ok = true;
                sample.offset_us = m.offset_us;
                sample.delay_us = m.delay_us;
                sample.stratum = i32::from(m.stratum);
                trace!(host = %cfg.host, offset_us = m.offset_us, delay_us = m.delay_us, "ntp pool sample");
            }
            Err(err) => {
                sample.error_code = err.code();
                debug!(host = %cfg.host, error = %err, "ntp pool query failed");
            }
        }
        sample
    }
}

// ── Cycle internals ──────────────────────────────────────────────────────

fn init_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(now_realtime_us);
    (nanos as u64) ^ SEED_SCRAMBLE
}

/// Shuffle the eligible servers, keep `n`, and start their `min_interval`.
fn pick_servers(st: &mut PoolState, n: usize, now: Instant) -> Vec<(usize, NtpServerConfig)> {
    let mut eligible: Vec<usize> = (0..st.servers.len())
        .filter(|&i| st.servers[i].is_eligible(now))
        .collect();
    eligible.shuffle(&mut st.rng);
    eligible.truncate(n);
    eligible
        .into_iter()
        .map(|i| {
            let server = &mut st.servers[i];
            server.next_allowed = Some(now + server.cfg.min_interval);
            (i, server.cfg.clone())
        })
        .collect()
}

/// Aggregate and fold into the published offset, delay, stratum and error
/// code. `false` when too few samples were usable.
fn publish(st: &mut PoolState, samples: &[NtpSample]) -> bool {
    let usable: Vec<&NtpSample> = samples.iter().filter(|s| s.is_usable()).collect();
    let representative = match st.cfg.aggregation {
        Aggregation::BestDelay => best_delay_sample(&usable),
        Aggregation::Median | Aggregation::MedianMadTrim => median_delay_sample(&usable),
    };
    let Some(representative) = representative.filter(|_| usable.len() >= st.cfg.min_valid_samples)
    else {
        st.last_error_code = samples
            .iter()
            .find(|s| !s.is_ok)
            .map_or(NtpError::E_GENERIC, |s| s.error_code);
        debug!(
            usable = usable.len(),
            required = st.cfg.min_valid_samples,
            code = st.last_error_code,
            "ntp measurement discarded"
        );
        return false;
    };

    let mut offsets: Vec<i64> = usable.iter().map(|s| s.offset_us).collect();
    let estimate = match st.cfg.aggregation {
        Aggregation::Median => median(&mut offsets),
        Aggregation::MedianMadTrim => median_mad_trim(&mut offsets),
        Aggregation::BestDelay => representative.offset_us,
    };

    st.offset_us = smooth(st.offset_us, estimate, st.cfg.smoothing_alpha);
    st.delay_us = representative.delay_us;
    st.stratum = representative.stratum;
    st.last_error_code = 0;
    debug!(
        estimate,
        offset_us = st.offset_us,
        delay_us = st.delay_us,
        stratum = st.stratum,
        samples = usable.len(),
        "ntp offset updated"
    );
    true
}

fn smooth(old: i64, estimate: i64, alpha: f64) -> i64 {
    if alpha >= 1.0 {
        estimate
    } else if alpha > 0.0 {
        ((1.0 - alpha) * old as f64 + alpha * estimate as f64) as i64
    } else {
        // Also covers NaN.
        old
    }
}

/// Median of `values`, which must be non-empty; reorders the slice.
pub(crate) fn median(values: &mut [i64]) -> i64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((i128::from(values[mid - 1]) + i128::from(values[mid])) / 2) as i64
    }
}

pub(crate) fn median_mad_trim(values: &mut [i64]) -> i64 {
    let med = median(values);
    let mut deviations: Vec<i64> = values.iter().map(|v| v.abs_diff(med) as i64).collect();
    let mad = median(&mut deviations);
    if mad == 0 {
        return med;
    }
    let threshold = mad.saturating_mul(MAD_TRIM_FACTOR);
    let kept: Vec<i64> = values
        .iter()
        .copied()
        .filter(|v| v.abs_diff(med) as i64 <= threshold)
        .collect();
    if kept.is_empty() {
        return med;
    }
    let sum: i128 = kept.iter().map(|&v| i128::from(v)).sum();
    (sum / kept.len() as i128) as i64
}

/// The fastest sample; ties go to the lower stratum, then to the earlier
/// sample.
pub(crate) fn best_delay_sample<'a>(samples: &[&'a NtpSample]) -> Option<&'a NtpSample> {
    samples.iter().copied().min_by_key(|s| (s.delay_us, s.stratum))
}

/// The sample of median delay; an even count takes the lower middle.
pub(crate) fn median_delay_sample<'a>(samples: &[&'a NtpSample]) -> Option<&'a NtpSample> {
    let mut by_delay = samples.to_vec();
    by_delay.sort_by_key(|s| (s.delay_us, s.stratum));
    by_delay.get(by_delay.len().saturating_sub(1) / 2).copied()
}

// ── Built-in server list ─────────────────────────────────────────────────

const DEFAULT_HOSTS: &[&str] = &[
    "time.google.com",
    "time1.google.com",
    "time2.google.com",
    "time3.google.com",
    "time4.google.com",
    "time.cloudflare.com",
    "time.facebook.com",
    "time1.facebook.com",
    "time2.facebook.com",
    "time3.facebook.com",
    "time4.facebook.com",
    "time5.facebook.com",
    "time.windows.com",
    "time.apple.com",
    "time1.apple.com",
    "time2.apple.com",
    "time3.apple.com",
    "time4.apple.com",
    "time5.apple.com",
    "time6.apple.com",
    "time7.apple.com",
    "time.euro.apple.com",
    "time-a-g.nist.gov",
    "time-b-g.nist.gov",
    "time-c-g.nist.gov",
    "time-d-g.nist.gov",
    "time-a-wwv.nist.gov",
    "time-b-wwv.nist.gov",
    "time-c-wwv.nist.gov",
    "time-d-wwv.nist.gov",
    "time-a-b.nist.gov",
    "time-b-b.nist.gov",
    "time-c-b.nist.gov",
    "time-d-b.nist.gov",
    "time.nist.gov",
    "utcnist.colorado.edu",
    "utcnist2.colorado.edu",
    "ntp1.vniiftri.ru",
    "ntp2.vniiftri.ru",
    "ntp3.vniiftri.ru",
    "ntp4.vniiftri.ru",
    "ntp1.niiftri.irkutsk.ru",
    "ntp2.niiftri.irkutsk.ru",
    "vniiftri.khv.ru",
    "vniiftri2.khv.ru",
    "ntp21.vniiftri.ru",
    "ntp.mobatime.ru",
    "ntp1.stratum1.ru",
    "ntp2.stratum1.ru",
    "ntp3.stratum1.ru",
    "ntp4.stratum1.ru",
    "ntp5.stratum1.ru",
    "ntp2.stratum2.ru",
    "ntp3.stratum2.ru",
    "ntp4.stratum2.ru",
    "ntp5.stratum2.ru",
    "stratum1.net",
    "ntp.time.in.ua",
    "ntp2.time.in.ua",
    "ntp3.time.in.ua",
    "ntp.ru",
    "ts1.aco.net",
    "ts2.aco.net",
    "ntp1.net.berkeley.edu",
    "ntp2.net.berkeley.edu",
    "ntp.gsu.edu",
    "tick.usask.ca",
    "tock.usask.ca",
    "ntp.nsu.ru",
    "ntp.rsu.edu.ru",
    "ntp.nict.jp",
    "x.ns.gin.ntt.net",
    "y.ns.gin.ntt.net",
    "clock.nyc.he.net",
    "clock.sjc.he.net",
    "ntp.fiord.ru",
    "gbg1.ntp.se",
    "gbg2.ntp.se",
    "mmo1.ntp.se",
    "mmo2.ntp.se",
    "sth1.ntp.se",
    "sth2.ntp.se",
    "svl1.ntp.se",
    "svl2.ntp.se",
    "clock.isc.org",
    "pool.ntp.org",
    "europe.pool.ntp.org",
    "asia.pool.ntp.org",
    "ru.pool.ntp.org",
];

/// pool.ntp.org zones expanded as `0.` through `3.` prefixes.
const POOL_ZONES: &[&str] = &[
    "",
    "europe.",
    "asia.",
    "ru.",
    "gentoo.",
    "arch.",
    "fedora.",
    "opensuse.",
    "centos.",
    "debian.",
    "ubuntu.",
    "askozia.",
    "freebsd.",
    "netbsd.",
    "openbsd.",
    "dragonfly.",
    "pfsense.",
    "opnsense.",
    "smartos.",
    "android.",
    "amazon.",
];

/// Built-in list of public servers, throttled for shared use: 60 s between
/// queries, 500 ms delay ceiling, 120 s initial backoff.
pub fn default_servers() -> Vec<NtpServerConfig> {
    let zone_hosts = POOL_ZONES
        .iter()
        .flat_map(|zone| (0..4).map(move |i| format!("{i}.{zone}pool.ntp.org")));
    DEFAULT_HOSTS
        .iter()
        .map(|h| h.to_string())
        .chain(zone_hosts)
        .map(|host| NtpServerConfig {
            host,
            min_interval: Duration::from_secs(60),
            max_delay: Duration::from_millis(500),
            backoff_initial: Duration::from_secs(120),
            backoff_max: Duration::from_secs(600),
            ..NtpServerConfig::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fake::FakeServers;
    use super::*;

    fn sample(offset_us: i64, delay_us: i64) -> NtpSample {
        NtpSample {
            host: "test".into(),
            port: 123,
            is_ok: true,
            stratum: 2,
            offset_us,
            delay_us,
            ..NtpSample::default()
        }
    }

    fn pool_with(cfg: NtpPoolConfig) -> NtpPool<FakeServers> {
        NtpPool::with_query(cfg, FakeServers::default())
    }

    fn seeded(aggregation: Aggregation, min_valid_samples: usize, alpha: f64) -> NtpPoolConfig {
        NtpPoolConfig {
            aggregation,
            min_valid_samples,
            smoothing_alpha: alpha,
            rng_seed: 42,
            ..NtpPoolConfig::default()
        }
    }

    #[test]
    fn test_median_of_three() {
        let pool = pool_with(seeded(Aggregation::Median, 1, 1.0));
        assert!(pool.apply_samples(&[sample(100, 10), sample(200, 10), sample(300, 10)]));
        assert_eq!(pool.offset_us(), 200);
        assert_eq!(pool.last_samples().len(), 3);
    }

    #[test]
    fn test_median_even_count_truncates() {
        assert_eq!(median(&mut [1, 2]), 1);
        assert_eq!(median(&mut [-1, -2]), -1);
        assert_eq!(median(&mut [10, 40, 20, 30]), 25);
        assert_eq!(median(&mut [i64::MAX, i64::MAX]), i64::MAX);
    }

    #[test]
    fn test_mad_trim_drops_outlier() {
        let pool = pool_with(seeded(Aggregation::MedianMadTrim, 1, 1.0));
        assert!(pool.apply_samples(&[sample(100, 10), sample(105, 10), sample(100_000, 10)]));
        assert_eq!(pool.offset_us(), 102);
        assert_eq!(median_mad_trim(&mut [7, 7, 7, 1_000]), 7);
    }

    #[test]
    fn test_best_delay() {
        let pool = pool_with(seeded(Aggregation::BestDelay, 1, 1.0));
        assert!(pool.apply_samples(&[sample(10, 100_000), sample(5, 300_000)]));
        assert_eq!(pool.offset_us(), 10);

        let mut low_stratum = sample(-3, 100);
        low_stratum.stratum = 1;
        let a = sample(8, 100);
        assert_eq!(best_delay_sample(&[&a, &low_stratum]).map(|s| s.offset_us), Some(-3));
        assert_eq!(best_delay_sample(&[]), None);
    }

    #[test]
    fn test_one_apply_publishes_offset_delay_stratum_and_samples() {
        let pool = pool_with(seeded(Aggregation::BestDelay, 1, 1.0));
        assert_eq!((pool.offset_us(), pool.delay_us(), pool.stratum()), (0, 0, -1));

        let mut fast = sample(-40, 900);
        fast.stratum = 1;
        let batch = [sample(70, 5_000), fast, sample(10, 2_000)];
        assert!(pool.apply_samples(&batch));
        assert_eq!(pool.offset_us(), -40);
        assert_eq!(pool.delay_us(), 900);
        assert_eq!(pool.stratum(), 1);
        assert_eq!(pool.last_error_code(), 0);
        assert_eq!(pool.last_samples(), batch);
    }

    #[test]
    fn test_median_strategies_publish_median_delay_sample() {
        let pool = pool_with(seeded(Aggregation::Median, 1, 1.0));
        let mut mid = sample(200, 20);
        mid.stratum = 3;
        assert!(pool.apply_samples(&[sample(100, 30), mid, sample(300, 10)]));
        assert_eq!(pool.offset_us(), 200);
        assert_eq!((pool.delay_us(), pool.stratum()), (20, 3));

        let pool = pool_with(seeded(Aggregation::MedianMadTrim, 1, 1.0));
        assert!(pool.apply_samples(&[sample(5, 40), sample(6, 10), sample(7, 30), sample(8, 20)]));
        assert_eq!(pool.delay_us(), 20);
    }

    #[test]
    fn test_failed_cycle_records_first_error() {
        let pool = pool_with(seeded(Aggregation::Median, 2, 1.0));
        assert!(pool.apply_samples(&[sample(10, 1), sample(20, 3)]));
        let mut kod = sample(0, 0);
        kod.is_ok = false;
        kod.error_code = NtpError::E_KOD;
        let mut bad_mode = kod.clone();
        bad_mode.error_code = NtpError::E_BAD_MODE;

        assert!(!pool.apply_samples(&[sample(99, 1), kod, bad_mode]));
        assert_eq!(pool.last_error_code(), NtpError::E_KOD);
        // The accepted estimate is left in place.
        assert_eq!((pool.offset_us(), pool.delay_us(), pool.stratum()), (15, 1, 2));
        assert_eq!(pool.last_samples().len(), 3);

        assert!(!pool.apply_samples(&[]));
        assert_eq!(pool.last_error_code(), NtpError::E_GENERIC);
        assert!(pool.apply_samples(&[sample(1, 1), sample(3, 1)]));
        assert_eq!(pool.last_error_code(), 0);
    }

    #[test]
    fn test_smoothing_clamp() {
        let pool = pool_with(seeded(Aggregation::Median, 1, -0.5));
        assert!(pool.apply_samples(&[sample(700, 10)]));
        assert_eq!(pool.offset_us(), 0);

        let pool = pool_with(seeded(Aggregation::Median, 1, 2.0));
        assert!(pool.apply_samples(&[sample(500, 10)]));
        assert_eq!(pool.offset_us(), 500);
    }

    #[test]
    fn test_ewma() {
        let pool = pool_with(seeded(Aggregation::Median, 1, 0.25));
        assert!(pool.apply_samples(&[sample(400, 10)]));
        assert_eq!(pool.offset_us(), 100);
        assert!(pool.apply_samples(&[sample(100, 10)]));
        assert_eq!(pool.offset_us(), 100);
    }

    #[test]
    fn test_insufficient_samples() {
        let pool = pool_with(seeded(Aggregation::Median, 2, 1.0));
        let mut failed = sample(900, 10);
        failed.is_ok = false;
        assert!(!pool.apply_samples(&[sample(300, 10), failed]));
        assert_eq!(pool.offset_us(), 0);
        assert_eq!(pool.last_samples().len(), 2);
        assert!(!pool.apply_samples(&[]));
    }

    #[test]
    fn test_slow_samples_are_ignored() {
        let pool = pool_with(seeded(Aggregation::Median, 1, 1.0));
        let mut slow = sample(9_999, 600_000);
        slow.max_delay_us = 500_000;
        assert!(!slow.is_usable());
        assert!(pool.apply_samples(&[slow, sample(50, 10)]));
        assert_eq!(pool.offset_us(), 50);
    }

    fn three_servers(pool: &NtpPool<FakeServers>) {
        pool.set_servers(vec![
            NtpServerConfig::new("a"),
            NtpServerConfig::new("b"),
            NtpServerConfig::new("c"),
        ]);
    }

    #[test]
    fn test_measure_with_fake_servers() {
        let fake = FakeServers::default()
            .with("a", 100, 10)
            .with("b", 200, 20)
            .with("c", 300, 30);
        let pool = NtpPool::with_query(seeded(Aggregation::Median, 3, 1.0), fake);
        three_servers(&pool);
        assert!(pool.measure());
        assert_eq!(pool.offset_us(), 200);
        let mut hosts: Vec<String> = pool.last_samples().into_iter().map(|s| s.host).collect();
        hosts.sort();
        assert_eq!(hosts, ["a", "b", "c"]);
        assert!(pool.last_samples().iter().all(|s| s.max_delay_us == 250_000));
    }

    #[test]
    fn test_min_interval_throttles_servers() {
        let fake = FakeServers::default().with("a", 1, 1).with("b", 2, 1).with("c", 3, 1);
        let pool = NtpPool::with_query(seeded(Aggregation::Median, 1, 1.0), fake);
        three_servers(&pool);
        assert!(pool.measure_n(2));
        assert_eq!(pool.last_samples().len(), 2);
        // Only the one unqueried server is still eligible.
        assert!(pool.measure_n(5));
        assert_eq!(pool.last_samples().len(), 1);
        assert!(!pool.measure());
        assert!(pool.last_samples().is_empty());
        assert_eq!(pool.querier.calls(), 3);
    }

    #[test]
    fn test_failures_back_off() {
        let fake = FakeServers::default().failing("a", NtpError::KissOfDeath);
        let pool = NtpPool::with_query(seeded(Aggregation::Median, 1, 1.0), fake);
        pool.add_server(NtpServerConfig {
            min_interval: Duration::ZERO,
            backoff_initial: Duration::from_secs(30),
            ..NtpServerConfig::new("a")
        });
        assert!(!pool.measure());
        let samples = pool.last_samples();
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].is_ok);
        assert_eq!(samples[0].error_code, NtpError::E_KOD);
        assert_eq!(samples[0].stratum, -1);
        assert_eq!(pool.last_error_code(), NtpError::E_KOD);

        {
            let st = pool.state.lock();
            assert_eq!(st.servers[0].fail_count, 1);
            assert_eq!(st.servers[0].backoff, Duration::from_secs(30));
        }
        assert!(!pool.measure());
        assert!(pool.last_samples().is_empty());
    }

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut state = ServerState::new(NtpServerConfig {
            backoff_initial: Duration::from_secs(15),
            backoff_max: Duration::from_secs(50),
            ..NtpServerConfig::new("x")
        });
        let failed = NtpSample {
            error_code: -1,
            ..NtpSample::default()
        };
        let now = Instant::now();
        let seen: Vec<u64> = (0..4)
            .map(|_| {
                state.record(&failed, now);
                state.backoff.as_secs()
            })
            .collect();
        assert_eq!(seen, [15, 30, 50, 50]);
        assert!(!state.is_eligible(now));

        state.record(&sample(0, 1), now);
        assert_eq!(state.fail_count, 0);
        assert_eq!(state.backoff, Duration::ZERO);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let hosts: Vec<NtpServerConfig> = (0..20)
            .map(|i| NtpServerConfig::new(format!("s{i}")))
            .collect();
        let picks = |seed| {
            let pool = pool_with(NtpPoolConfig {
                rng_seed: seed,
                min_valid_samples: 1,
                ..NtpPoolConfig::default()
            });
            pool.set_servers(hosts.clone());
            pool.measure_n(4);
            pool.last_samples()
                .into_iter()
                .map(|s| s.host)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
        assert_eq!(picks(7).len(), 4);
    }

    #[test]
    fn test_server_management_and_defaults() {
        let pool = pool_with(NtpPoolConfig::default());
        pool.set_default_servers();
        let defaults = NtpPool::default_servers();
        assert_eq!(pool.server_count(), defaults.len());
        assert!(defaults.iter().any(|s| s.host == "time.cloudflare.com"));
        assert!(defaults.iter().any(|s| s.host == "3.amazon.pool.ntp.org"));
        assert!(defaults.iter().all(|s| s.min_interval == Duration::from_secs(60)
            && s.max_delay == Duration::from_millis(500)
            && s.backoff_initial == Duration::from_secs(120)
            && s.port == 123));

        pool.clear_servers();
        assert_eq!(pool.server_count(), 0);
        pool.add_server(NtpServerConfig::new("x"));
        assert_eq!(pool.server_count(), 1);

        let cfg = NtpPoolConfig {
            sample_servers: 2,
            ..NtpPoolConfig::default()
        };
        pool.set_config(cfg.clone());
        assert_eq!(pool.config(), cfg);
    }

    #[test]
    fn test_defaults() {
        let cfg = NtpPoolConfig::default();
        assert_eq!(cfg.sample_servers, 5);
        assert_eq!(cfg.min_valid_samples, 3);
        assert_eq!(cfg.aggregation, Aggregation::Median);
        assert_eq!(cfg.smoothing_alpha, 1.0);
        let server = NtpServerConfig::default();
        assert_eq!(server.port, 123);
        assert_eq!(server.min_interval, Duration::from_secs(15));
        assert_eq!(server.max_delay, Duration::from_millis(250));
        assert_eq!(server.backoff_max, Duration::from_secs(600));
        assert_ne!(init_seed(0), 0);
        assert_eq!(init_seed(9), 9);
    }
}
