// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! SNTP offset measurement.
//!
//! | Layer | Type | Role |
//! |-------|------|------|
//! | wire | [`build_request`], [`process_reply`] | stateless 48-byte codec and RFC 5905 validation |
//! | transport | [`UdpTransport`], [`StdUdpTransport`] | one blocking datagram exchange |
//! | client | [`NtpClient`] | one server, last outcome kept in atomics |
//! | pool | [`NtpPool`] | sampled servers, robust aggregation, smoothed offset |
//! | runner | [`NtpPoolRunner`] | periodic pool cycles on a worker thread |
//! | service | [`NtpTimeService`] | process-wide runner, started on first read |
//!
//! Every failure carries an [`NtpError`](crate::NtpError) whose
//! [`code`](crate::NtpError::code) is stable across layers.

mod client;
#[cfg(test)]
mod fake;
mod packet;
mod pool;
mod runner;
mod service;
mod transport;

pub use client::{NtpClient, NtpQuery, UdpQuery, DEFAULT_HOST, DEFAULT_PORT};
pub use packet::{
    build_request, ntp_to_unix_us, offset_and_delay, process_reply, unix_us_to_ntp,
    NtpMeasurement, PACKET_LEN,
};
pub use pool::{default_servers, Aggregation, NtpPool, NtpPoolConfig, NtpSample, NtpServerConfig};
pub use runner::{NtpPoolRunner, DEFAULT_INTERVAL};
pub use service::NtpTimeService;
pub use transport::{StdUdpTransport, UdpTransport, DEFAULT_TIMEOUT};
