// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! SNTP wire format and reply validation.
//!
//! The packet is handled as a raw 48-byte array; fields are read and
//! written big-endian at fixed offsets:
//!
//! | Offset | Field |
//! |--------|-------|
//! | 0 | LI (2 bits) · VN (3 bits) · Mode (3 bits) |
//! | 1 | Stratum |
//! | 2..4 | Poll, precision |
//! | 4..16 | Root delay, root dispersion, reference id |
//! | 16 | Reference timestamp |
//! | 24 | Originate timestamp (t1) |
//! | 32 | Receive timestamp (t2) |
//! | 40 | Transmit timestamp (t3) |
//!
//! Timestamps are NTP-era Q32.32: seconds since 1900 in the high word and a
//! binary fraction of a second in the low word.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{NTP_UNIX_OFFSET, US_PER_SEC};
use crate::error::NtpError;

pub const PACKET_LEN: usize = 48;

const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;
const VERSION_REQUEST: u8 = 3;
const LI_ALARM: u8 = 3;
const STRATUM_UNSYNC: u8 = 16;

const ORIGINATE_AT: usize = 24;
const RECEIVE_AT: usize = 32;
const TRANSMIT_AT: usize = 40;

/// Result of one validated exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NtpMeasurement {
    /// Server clock minus local clock.
    pub offset_us: i64,
    /// Round-trip network delay.
    pub delay_us: i64,
    pub stratum: u8,
}

// ── Timestamp conversion ─────────────────────────────────────────────────

/// Unix microseconds to an NTP Q32.32 timestamp.
///
/// The fraction is rounded up so that [`ntp_to_unix_us`] recovers the input
/// exactly.
pub const fn unix_us_to_ntp(unix_us: i64) -> u64 {
    let sec = unix_us.div_euclid(US_PER_SEC) + NTP_UNIX_OFFSET;
    let us = unix_us.rem_euclid(US_PER_SEC) as u64;
    let frac = ((us << 32) + (US_PER_SEC as u64 - 1)) / US_PER_SEC as u64;
    ((sec as u32 as u64) << 32) | frac
}

/// NTP Q32.32 timestamp to Unix microseconds; `None` before 1970.
pub const fn ntp_to_unix_us(ntp: u64) -> Option<i64> {
    let sec = (ntp >> 32) as i64 - NTP_UNIX_OFFSET;
    if sec < 0 {
        return None;
    }
    let frac_us = ((ntp & 0xFFFF_FFFF) * US_PER_SEC as u64) >> 32;
    Some(sec * US_PER_SEC + frac_us as i64)
}

/// RFC 5905 clock offset and round-trip delay.
///
/// `t1` client transmit, `t2` server receive, `t3` server transmit,
/// `t4` client receive.
///
/// ```
/// use tempcal::ntp::offset_and_delay;
///
/// // Server 500 µs ahead, 2 ms each way, 1 ms processing.
/// let (offset, delay) = offset_and_delay(0, 2_500, 3_500, 5_000);
/// assert_eq!(offset, 500);
/// assert_eq!(delay, 4_000);
/// ```
#[inline]
pub const fn offset_and_delay(t1: i64, t2: i64, t3: i64, t4: i64) -> (i64, i64) {
    let offset = ((t2 - t1) + (t3 - t4)) / 2;
    let delay = (t4 - t1) - (t3 - t2);
    (offset, delay)
}

// ── Encode / decode ──────────────────────────────────────────────────────

/// Client request (LI 0, VN 3, mode 3) carrying only the transmit timestamp.
pub fn build_request(now_us: i64) -> [u8; PACKET_LEN] {
    let mut pkt = [0u8; PACKET_LEN];
    pkt[0] = (VERSION_REQUEST << 3) | MODE_CLIENT;
    write_ts(&mut pkt, TRANSMIT_AT, unix_us_to_ntp(now_us));
    pkt
}

/// Validate a server reply received at `arrival_us` and derive the
/// measurement.
///
/// Checks run in a fixed order and stop at the first failure: mode,
/// version, leap indicator, kiss-of-death, stratum range, timestamp
/// decoding, server monotonicity, non-negative delay.
pub fn process_reply(
    reply: &[u8; PACKET_LEN],
    arrival_us: i64,
) -> Result<NtpMeasurement, NtpError> {
    let li = reply[0] >> 6;
    let vn = (reply[0] >> 3) & 0x07;
    let mode = reply[0] & 0x07;
    let stratum = reply[1];

    if mode != MODE_SERVER {
        return Err(NtpError::BadMode);
    }
    if !(3..=4).contains(&vn) {
        return Err(NtpError::BadVersion);
    }
    if li == LI_ALARM {
        return Err(NtpError::BadLeapIndicator);
    }
    if stratum == 0 {
        return Err(NtpError::KissOfDeath);
    }
    if stratum >= STRATUM_UNSYNC {
        return Err(NtpError::BadStratum);
    }

    let decode = |at| ntp_to_unix_us(read_ts(reply, at)).ok_or(NtpError::BadTimestamp);
    let t1 = decode(ORIGINATE_AT)?;
    let t2 = decode(RECEIVE_AT)?;
    let t3 = decode(TRANSMIT_AT)?;
    if t3 < t2 {
        return Err(NtpError::BadTimestamp);
    }

    let (offset_us, delay_us) = offset_and_delay(t1, t2, t3, arrival_us);
    if delay_us < 0 {
        return Err(NtpError::BadTimestamp);
    }
    Ok(NtpMeasurement {
        offset_us,
        delay_us,
        stratum,
    })
}

fn read_ts(pkt: &[u8; PACKET_LEN], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&pkt[at..at + 8]);
    u64::from_be_bytes(word)
}

fn write_ts(pkt: &mut [u8; PACKET_LEN], at: usize, ts: u64) {
    pkt[at..at + 8].copy_from_slice(&ts.to_be_bytes());
}

/// Server reply for fake transports.
#[cfg(test)]
pub(crate) fn encode_reply(
    li: u8,
    vn: u8,
    mode: u8,
    stratum: u8,
    t1_us: i64,
    t2_us: i64,
    t3_us: i64,
) -> [u8; PACKET_LEN] {
    let mut pkt = [0u8; PACKET_LEN];
    pkt[0] = (li << 6) | (vn << 3) | mode;
    pkt[1] = stratum;
    write_ts(&mut pkt, ORIGINATE_AT, unix_us_to_ntp(t1_us));
    write_ts(&mut pkt, RECEIVE_AT, unix_us_to_ntp(t2_us));
    write_ts(&mut pkt, TRANSMIT_AT, unix_us_to_ntp(t3_us));
    pkt
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_709_210_096_123_456;

    fn good(stratum: u8) -> [u8; PACKET_LEN] {
        encode_reply(0, 4, 4, stratum, NOW - 4_000, NOW - 2_000, NOW - 1_000)
    }

    #[test]
    fn test_request_layout() {
        let pkt = build_request(NOW);
        assert_eq!(pkt[0], 0b00_011_011);
        assert!(pkt[1..TRANSMIT_AT].iter().all(|&b| b == 0));
        assert_eq!(ntp_to_unix_us(read_ts(&pkt, TRANSMIT_AT)), Some(NOW));
    }

    #[test]
    fn test_timestamp_conversion() {
        assert_eq!(unix_us_to_ntp(0) >> 32, NTP_UNIX_OFFSET as u64);
        assert_eq!(unix_us_to_ntp(500_000) & 0xFFFF_FFFF, 1 << 31);
        for us in [0, 1, 999_999, 1_000_000, NOW] {
            assert_eq!(ntp_to_unix_us(unix_us_to_ntp(us)), Some(us));
        }
        // 1969-12-31T23:59:59Z
        assert_eq!(ntp_to_unix_us((NTP_UNIX_OFFSET as u64 - 1) << 32), None);
    }

    #[test]
    fn test_symmetric_exchange_has_zero_offset() {
        let (offset, delay) = offset_and_delay(1_000, 3_000, 4_000, 6_000);
        assert_eq!(offset, 0);
        assert_eq!(delay, (6_000 - 1_000) - (4_000 - 3_000));
    }

    #[test]
    fn test_valid_reply() {
        let m = process_reply(&good(2), NOW).unwrap();
        assert_eq!(m.stratum, 2);
        assert_eq!(m.delay_us, 3_000);
        assert_eq!(m.offset_us, ((2_000) + (-1_000)) / 2);
        // Version 3 replies are accepted too.
        let v3 = encode_reply(0, 3, 4, 1, NOW - 10, NOW - 5, NOW - 5);
        assert!(process_reply(&v3, NOW).is_ok());
    }

    #[test]
    fn test_validation_order() {
        let cases = [
            (encode_reply(3, 5, 3, 0, 0, 0, 0), NtpError::BadMode),
            (encode_reply(3, 5, 4, 0, 0, 0, 0), NtpError::BadVersion),
            (encode_reply(3, 4, 4, 0, 0, 0, 0), NtpError::BadLeapIndicator),
            (encode_reply(0, 4, 4, 0, 0, 0, 0), NtpError::KissOfDeath),
            (encode_reply(0, 4, 4, 16, 0, 0, 0), NtpError::BadStratum),
        ];
        for (pkt, want) in cases {
            assert_eq!(process_reply(&pkt, NOW), Err(want));
        }
    }

    #[test]
    fn test_bad_timestamps() {
        let mut pre_epoch = good(2);
        write_ts(&mut pre_epoch, RECEIVE_AT, 0);
        assert_eq!(process_reply(&pre_epoch, NOW), Err(NtpError::BadTimestamp));

        let backwards = encode_reply(0, 4, 4, 2, NOW - 4_000, NOW - 1_000, NOW - 2_000);
        assert_eq!(process_reply(&backwards, NOW), Err(NtpError::BadTimestamp));

        // Arrival before the request left gives a negative delay.
        assert_eq!(
            process_reply(&good(2), NOW - 10_000),
            Err(NtpError::BadTimestamp)
        );
    }
}
