// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Calendar, formatter and parser failures surface as [`TimeError`]; the NTP
//! stack reports [`NtpError`], whose variants carry a stable numeric
//! [`code`](NtpError::code) so that samples and the client facade can expose
//! a plain integer.

use thiserror::Error;

/// Failures of the pure calendar, formatting and parsing layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// A date or time component is out of range.
    #[error("invalid date-time")]
    InvalidDateTime,
    /// Offset hour/minute out of range, or total offset outside [-12h, +14h].
    #[error("invalid time zone offset")]
    InvalidTimeZone,
    #[error("unknown month name: {0:?}")]
    InvalidMonthName(String),
    /// Input does not match the expected textual structure.
    #[error("malformed input: {0:?}")]
    MalformedInput(String),
    /// The result does not fit in a signed 64-bit count.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("invalid ISO week date")]
    InvalidIsoWeekDate,
}

/// Result alias for calendar operations.
pub type TimeResult<T> = Result<T, TimeError>;

/// NTP protocol and transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NtpError {
    #[error("server reply is not in server mode")]
    BadMode,
    #[error("unsupported NTP version")]
    BadVersion,
    /// Leap indicator 3: the server clock is unsynchronized.
    #[error("server clock unsynchronized (LI=3)")]
    BadLeapIndicator,
    /// Stratum 0 reply.
    #[error("kiss-of-death reply")]
    KissOfDeath,
    #[error("stratum out of range")]
    BadStratum,
    /// A timestamp predates 1970, the server went backwards, or delay is negative.
    #[error("inconsistent timestamps in reply")]
    BadTimestamp,
    #[error("local wall clock unavailable")]
    ClockUnavailable,
    #[error("transport failure ({code}): {message}")]
    Transport { code: i32, message: String },
}

impl NtpError {
    pub const E_GENERIC: i32 = -1;
    pub const E_BAD_MODE: i32 = -2;
    pub const E_BAD_VERSION: i32 = -3;
    pub const E_BAD_LI: i32 = -4;
    pub const E_KOD: i32 = -5;
    pub const E_BAD_STRATUM: i32 = -6;
    pub const E_BAD_TS: i32 = -7;

    /// Numeric code for this error. Transport errors pass the OS code through.
    pub fn code(&self) -> i32 {
        match self {
            NtpError::BadMode => Self::E_BAD_MODE,
            NtpError::BadVersion => Self::E_BAD_VERSION,
            NtpError::BadLeapIndicator => Self::E_BAD_LI,
            NtpError::KissOfDeath => Self::E_KOD,
            NtpError::BadStratum => Self::E_BAD_STRATUM,
            NtpError::BadTimestamp => Self::E_BAD_TS,
            NtpError::ClockUnavailable => Self::E_GENERIC,
            NtpError::Transport { code, .. } if *code != 0 => *code,
            NtpError::Transport { .. } => Self::E_GENERIC,
        }
    }

    /// Wrap an I/O error, keeping its raw OS code when there is one.
    pub fn from_io(err: &std::io::Error) -> Self {
        NtpError::Transport {
            code: err.raw_os_error().unwrap_or(Self::E_GENERIC),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_codes_are_distinct_and_negative() {
        let codes = [
            NtpError::BadMode.code(),
            NtpError::BadVersion.code(),
            NtpError::BadLeapIndicator.code(),
            NtpError::KissOfDeath.code(),
            NtpError::BadStratum.code(),
            NtpError::BadTimestamp.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(*a < -1);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_transport_code_passes_through() {
        let err = NtpError::Transport {
            code: 110,
            message: "timed out".into(),
        };
        assert_eq!(err.code(), 110);
        let zero = NtpError::Transport {
            code: 0,
            message: String::new(),
        };
        assert_eq!(zero.code(), NtpError::E_GENERIC);
    }

    #[test]
    fn test_display_mentions_input() {
        let err = TimeError::MalformedInput("2024-13".into());
        assert!(err.to_string().contains("2024-13"));
    }
}
