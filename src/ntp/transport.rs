// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Request/response datagram transport.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use tracing::{trace, warn};

use super::packet::PACKET_LEN;
use crate::error::NtpError;

/// Receive timeout used when the caller passes zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// One blocking request/response exchange with a remote host.
///
/// Implementations must either return exactly one full reply or an error;
/// short reads are errors.
pub trait UdpTransport: Send + Sync {
    fn transact(
        &self,
        host: &str,
        port: u16,
        request: &[u8; PACKET_LEN],
        timeout: Duration,
    ) -> Result<[u8; PACKET_LEN], NtpError>;
}

/// `std::net` transport: a fresh socket per exchange, IPv4 preferred.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdUdpTransport;

impl StdUdpTransport {
    fn resolve(host: &str, port: u16) -> Result<SocketAddr, NtpError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| NtpError::from_io(&e))?
            .collect();
        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| NtpError::Transport {
                code: NtpError::E_GENERIC,
                message: format!("{host}: no address"),
            })
    }
}

impl UdpTransport for StdUdpTransport {
    fn transact(
        &self,
        host: &str,
        port: u16,
        request: &[u8; PACKET_LEN],
        timeout: Duration,
    ) -> Result<[u8; PACKET_LEN], NtpError> {
        let io_err = |e: std::io::Error| {
            warn!(host, port, error = %e, "ntp transport failure");
            NtpError::from_io(&e)
        };

        let addr = Self::resolve(host, port)?;
        let bind: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        let socket = UdpSocket::bind(bind).map_err(io_err)?;
        socket.set_read_timeout(Some(timeout)).map_err(io_err)?;
        socket.connect(addr).map_err(io_err)?;

        let sent = socket.send(request).map_err(io_err)?;
        if sent != PACKET_LEN {
            warn!(host, sent, "short ntp send");
            return Err(NtpError::Transport {
                code: NtpError::E_GENERIC,
                message: format!("short send: {sent} bytes"),
            });
        }

        let mut reply = [0u8; PACKET_LEN];
        let received = socket.recv(&mut reply).map_err(io_err)?;
        if received != PACKET_LEN {
            warn!(host, received, "short ntp reply");
            return Err(NtpError::Transport {
                code: NtpError::E_GENERIC,
                message: format!("short read: {received} bytes"),
            });
        }
        trace!(host, %addr, "ntp reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_exchange() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = server.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; PACKET_LEN];
            let (n, peer) = server.recv_from(&mut buf).unwrap();
            assert_eq!(n, PACKET_LEN);
            buf[0] = 0xAA;
            server.send_to(&buf, peer).unwrap();
        });

        let request = [7u8; PACKET_LEN];
        let reply = StdUdpTransport
            .transact("127.0.0.1", port, &request, Duration::from_secs(2))
            .unwrap();
        handle.join().unwrap();
        assert_eq!(reply[0], 0xAA);
        assert_eq!(reply[1], 7);
    }

    #[test]
    fn test_short_reply_is_an_error() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = server.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; PACKET_LEN];
            let (_, peer) = server.recv_from(&mut buf).unwrap();
            server.send_to(&buf[..10], peer).unwrap();
        });

        let err = StdUdpTransport
            .transact("127.0.0.1", port, &[0u8; PACKET_LEN], Duration::from_secs(2))
            .unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, NtpError::Transport { .. }));
    }
}
