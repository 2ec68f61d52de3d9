// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Single-server SNTP client.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, Ordering};
use std::time::Duration;

use tracing::debug;

use super::packet::{build_request, process_reply, NtpMeasurement};
use super::transport::{StdUdpTransport, UdpTransport, DEFAULT_TIMEOUT};
use crate::clock::now_realtime_us;
use crate::constants::{US_PER_MS, US_PER_SEC};
use crate::error::NtpError;

pub const DEFAULT_HOST: &str = "pool.ntp.org";
pub const DEFAULT_PORT: u16 = 123;

thread_local! {
    static LAST_ERROR_CODE: Cell<i32> = const { Cell::new(0) };
}

/// Anything that can measure one server.
///
/// The pool talks to servers only through this trait, so tests substitute
/// scripted answers for real exchanges.
pub trait NtpQuery: Send + Sync {
    fn query(&self, host: &str, port: u16) -> Result<NtpMeasurement, NtpError>;
}

/// [`NtpQuery`] over a datagram transport.
#[derive(Debug, Clone)]
pub struct UdpQuery<T: UdpTransport = StdUdpTransport> {
    transport: T,
    timeout: Duration,
}

impl Default for UdpQuery {
    fn default() -> Self {
        Self::new(StdUdpTransport, DEFAULT_TIMEOUT)
    }
}

impl<T: UdpTransport> UdpQuery<T> {
    pub const fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: UdpTransport> NtpQuery for UdpQuery<T> {
    fn query(&self, host: &str, port: u16) -> Result<NtpMeasurement, NtpError> {
        exchange(&self.transport, host, port, self.timeout, now_realtime_us)
    }
}

/// One request/response with `clock` supplying t1 and t4 in Unix µs.
pub(crate) fn exchange<T: UdpTransport + ?Sized>(
    transport: &T,
    host: &str,
    port: u16,
    timeout: Duration,
    clock: impl Fn() -> i64,
) -> Result<NtpMeasurement, NtpError> {
    let sent_at = clock();
    if sent_at < 0 {
        return Err(NtpError::ClockUnavailable);
    }
    let reply = transport.transact(host, port, &build_request(sent_at), timeout)?;
    // t4 is taken only after the reply is in hand.
    let arrival = clock();
    if arrival < 0 {
        return Err(NtpError::ClockUnavailable);
    }
    process_reply(&reply, arrival)
}

/// Blocking client bound to one server.
///
/// The last outcome is kept in atomics so readers need no lock; the error
/// code of the most recent [`query`](Self::query) on the calling thread is
/// available from [`last_error_code`](Self::last_error_code).
///
/// ```no_run
/// use tempcal::NtpClient;
///
/// let client = NtpClient::new("time.google.com", 123);
/// if client.query() {
///     println!("offset {} µs", client.offset_us());
/// } else {
///     eprintln!("ntp error {}", client.last_error_code());
/// }
/// ```
#[derive(Debug)]
pub struct NtpClient<Q: NtpQuery = UdpQuery> {
    host: String,
    port: u16,
    querier: Q,
    offset_us: AtomicI64,
    delay_us: AtomicI64,
    stratum: AtomicI32,
    success: AtomicBool,
}

impl Default for NtpClient {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl NtpClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_query(host, port, UdpQuery::default())
    }
}

impl<Q: NtpQuery> NtpClient<Q> {
    pub fn with_query(host: impl Into<String>, port: u16, querier: Q) -> Self {
        Self {
            host: host.into(),
            port,
            querier,
            offset_us: AtomicI64::new(0),
            delay_us: AtomicI64::new(0),
            stratum: AtomicI32::new(-1),
            success: AtomicBool::new(false),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Measure the server once and record the outcome.
    ///
    /// On failure the previous offset is kept while delay and stratum are
    /// reset.
    pub fn try_query(&self) -> Result<NtpMeasurement, NtpError> {
        LAST_ERROR_CODE.with(|c| c.set(0));
        match self.querier.query(&self.host, self.port) {
            Ok(m) => {
                debug!(
                    host = %self.host,
                    offset_us = m.offset_us,
                    delay_us = m.delay_us,
                    stratum = m.stratum,
                    "ntp sample"
                );
                self.offset_us.store(m.offset_us, Ordering::Relaxed);
                self.delay_us.store(m.delay_us, Ordering::Relaxed);
                self.stratum.store(i32::from(m.stratum), Ordering::Relaxed);
                self.success.store(true, Ordering::Release);
                Ok(m)
            }
            Err(err) => {
                debug!(host = %self.host, code = err.code(), error = %err, "ntp query rejected");
                LAST_ERROR_CODE.with(|c| c.set(err.code()));
                self.delay_us.store(0, Ordering::Relaxed);
                self.stratum.store(-1, Ordering::Relaxed);
                self.success.store(false, Ordering::Release);
                Err(err)
            }
        }
    }

    /// [`try_query`](Self::try_query) reduced to a success flag.
    pub fn query(&self) -> bool {
        self.try_query().is_ok()
    }

    pub fn success(&self) -> bool {
        self.success.load(Ordering::Acquire)
    }

    pub fn offset_us(&self) -> i64 {
        self.offset_us.load(Ordering::Relaxed)
    }

    pub fn delay_us(&self) -> i64 {
        self.delay_us.load(Ordering::Relaxed)
    }

    /// `-1` until a query succeeds.
    pub fn stratum(&self) -> i32 {
        self.stratum.load(Ordering::Relaxed)
    }

    /// Local realtime clock corrected by the measured offset.
    pub fn utc_time_us(&self) -> i64 {
        now_realtime_us() + self.offset_us()
    }

    pub fn utc_time_ms(&self) -> i64 {
        self.utc_time_us() / US_PER_MS
    }

    pub fn utc_time_sec(&self) -> i64 {
        self.utc_time_us() / US_PER_SEC
    }

    /// Error code of the latest query made on this thread; `0` after success.
    pub fn last_error_code(&self) -> i32 {
        LAST_ERROR_CODE.with(Cell::get)
    }
}

#[cfg(test)]
mod tests {
    use super::super::packet::{encode_reply, PACKET_LEN};
    use super::*;
    use parking_lot::Mutex;

    /// Answers with a fixed pattern relative to the moment of the request.
    struct ScriptedTransport {
        li: u8,
        stratum: u8,
        seen: Mutex<Vec<[u8; PACKET_LEN]>>,
    }

    impl ScriptedTransport {
        fn new(li: u8, stratum: u8) -> Self {
            Self {
                li,
                stratum,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl UdpTransport for ScriptedTransport {
        fn transact(
            &self,
            _host: &str,
            _port: u16,
            request: &[u8; PACKET_LEN],
            _timeout: Duration,
        ) -> Result<[u8; PACKET_LEN], NtpError> {
            self.seen.lock().push(*request);
            let now = now_realtime_us();
            Ok(encode_reply(
                self.li,
                4,
                4,
                self.stratum,
                now - 4_000,
                now - 2_000,
                now - 1_000,
            ))
        }
    }

    struct DeadTransport;

    impl UdpTransport for DeadTransport {
        fn transact(
            &self,
            _host: &str,
            _port: u16,
            _request: &[u8; PACKET_LEN],
            _timeout: Duration,
        ) -> Result<[u8; PACKET_LEN], NtpError> {
            Err(NtpError::Transport {
                code: 111,
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn test_scripted_reply_yields_valid_sample() {
        let query = UdpQuery::new(ScriptedTransport::new(0, 2), DEFAULT_TIMEOUT);
        let client = NtpClient::with_query("fake", 123, query);
        assert!(client.query());
        assert!(client.success());
        assert!(client.delay_us() >= 0);
        assert_eq!(client.stratum(), 2);
        assert_eq!(client.last_error_code(), 0);
        assert!(client.offset_us().abs() < 10_000);

        let seen = client.querier.transport().seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0], 0b00_011_011);
    }

    #[test]
    fn test_rejection_sets_error_code() {
        let query = UdpQuery::new(ScriptedTransport::new(3, 2), DEFAULT_TIMEOUT);
        let client = NtpClient::with_query("fake", 123, query);
        assert_eq!(client.try_query(), Err(NtpError::BadLeapIndicator));
        assert!(!client.success());
        assert_eq!(client.stratum(), -1);
        assert_eq!(client.last_error_code(), NtpError::E_BAD_LI);

        let kod = NtpClient::with_query(
            "fake",
            123,
            UdpQuery::new(ScriptedTransport::new(0, 0), DEFAULT_TIMEOUT),
        );
        assert!(!kod.query());
        assert_eq!(kod.last_error_code(), NtpError::E_KOD);
    }

    #[test]
    fn test_transport_error_passes_code_through() {
        let client =
            NtpClient::with_query("fake", 123, UdpQuery::new(DeadTransport, DEFAULT_TIMEOUT));
        assert!(!client.query());
        assert_eq!(client.last_error_code(), 111);
    }

    #[test]
    fn test_last_error_is_per_thread() {
        let client =
            NtpClient::with_query("fake", 123, UdpQuery::new(DeadTransport, DEFAULT_TIMEOUT));
        assert!(!client.query());
        let other = std::thread::spawn(|| {
            NtpClient::with_query(
                "fake",
                123,
                UdpQuery::new(ScriptedTransport::new(0, 1), DEFAULT_TIMEOUT),
            )
            .last_error_code()
        })
        .join()
        .unwrap();
        assert_eq!(other, 0);
        assert_eq!(client.last_error_code(), 111);
    }

    #[test]
    fn test_unavailable_clock() {
        let res = exchange(
            &ScriptedTransport::new(0, 2),
            "fake",
            123,
            DEFAULT_TIMEOUT,
            || -1,
        );
        assert_eq!(res, Err(NtpError::ClockUnavailable));
        assert_eq!(NtpError::ClockUnavailable.code(), NtpError::E_GENERIC);
    }

    #[test]
    fn test_offset_from_fixed_clock() {
        // Local clock 250 µs behind real time: the offset grows by half of it.
        let transport = ScriptedTransport::new(0, 1);
        let m = exchange(&transport, "fake", 123, DEFAULT_TIMEOUT, || {
            now_realtime_us() - 250
        })
        .unwrap();
        assert_eq!(m.stratum, 1);
        assert!(m.delay_us >= 2_750);
        assert!((300..=625).contains(&m.offset_us), "offset {}", m.offset_us);
    }

    #[test]
    fn test_utc_time_tracks_offset() {
        let client = NtpClient::new("unused.invalid", 123);
        client.offset_us.store(5 * US_PER_SEC, Ordering::Relaxed);
        let diff = client.utc_time_sec() - crate::clock::ts();
        assert!((4..=6).contains(&diff));
        assert_eq!(client.host(), "unused.invalid");
        assert_eq!(client.port(), 123);
    }
}
