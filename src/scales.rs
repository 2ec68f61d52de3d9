// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day-count scale markers.
//!
//! Each zero-sized type fixes the epoch of a [`Time`](super::instant::Time)
//! value relative to the Julian Date axis. All scales here are civil UTC
//! day counts without leap seconds, so every conversion is a constant
//! offset.
//!
//! | Marker | Description | Epoch (JD) |
//! |--------|-------------|------------|
//! | [`JD`] | Julian Date | 0.0 |
//! | [`MJD`] | Modified Julian Date | 2 400 000.5 |
//! | [`UnixTime`] | Days since 1970-01-01 | 2 440 587.5 |
//! | [`OADate`] | OLE Automation date, days since 1899-12-30 | 2 415 018.5 |

use super::instant::TimeScale;
use crate::constants::UNIX_EPOCH_JD;
use qtty::Days;

macro_rules! day_count_scale {
    ($(#[$doc:meta])* $name:ident, $label:literal, $epoch:expr) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
        pub struct $name;

        impl TimeScale for $name {
            const LABEL: &'static str = $label;
            const EPOCH_JD: Days = $epoch;
        }
    };
}

/// `JD = MJD + MJD_EPOCH`.
pub(crate) const MJD_EPOCH: Days = Days::new(2_400_000.5);

/// JD of 1899-12-30T00:00:00Z.
const OADATE_EPOCH: Days = Days::new(2_415_018.5);

day_count_scale!(
    /// Julian Date, the identity scale.
    JD, "JD", Days::new(0.0)
);

day_count_scale!(
    /// Modified Julian Date, JD minus 2 400 000.5.
    MJD, "MJD", MJD_EPOCH
);

day_count_scale!(
    /// Unix time stored as **days** since 1970-01-01T00:00:00Z.
    ///
    /// Like POSIX time it ignores leap seconds.
    UnixTime, "Unix", Days::new(UNIX_EPOCH_JD)
);

day_count_scale!(
    /// OLE Automation date: days since 1899-12-30T00:00:00.
    ///
    /// Same axis as [`ts_to_oadate`](crate::ts_to_oadate); the fractional
    /// part is the time of day.
    OADate, "OADate", OADATE_EPOCH
);

// ── Pairwise From impls ──────────────────────────────────────────────────

macro_rules! impl_time_conversions {
    ($single:ty) => {};

    ($first:ty, $($rest:ty),+ $(,)?) => {
        $(
            impl From<super::instant::Time<$first>> for super::instant::Time<$rest> {
                #[inline]
                fn from(t: super::instant::Time<$first>) -> Self {
                    t.to::<$rest>()
                }
            }

            impl From<super::instant::Time<$rest>> for super::instant::Time<$first> {
                #[inline]
                fn from(t: super::instant::Time<$rest>) -> Self {
                    t.to::<$first>()
                }
            }
        )+

        impl_time_conversions!($($rest),+);
    };
}

impl_time_conversions!(JD, MJD, UnixTime, OADate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OLE_EPOCH;
    use crate::instant::Time;

    #[test]
    fn test_epochs_line_up() {
        let unix_epoch = Time::<UnixTime>::new(0.0);
        assert_eq!(unix_epoch.to::<JD>().value(), UNIX_EPOCH_JD);
        assert_eq!(unix_epoch.to::<MJD>().value(), 40_587.0);
        assert_eq!(unix_epoch.to::<OADate>().value(), OLE_EPOCH as f64);
    }

    #[test]
    fn test_oadate_matches_codec() {
        let ts = 1_709_210_096;
        let via_scale = Time::<UnixTime>::from_unix_seconds(ts as f64).to::<OADate>();
        assert!((via_scale.value() - crate::codec::ts_to_oadate(ts)).abs() < 1e-9);
    }

    #[test]
    fn test_from_into() {
        let jd = Time::<JD>::new(2_451_545.0);
        let mjd: Time<MJD> = jd.into();
        assert!((mjd.quantity() - Days::new(51_544.5)).abs() < Days::new(1e-10));
        let unix: Time<UnixTime> = Time::from(mjd);
        assert!((unix.value() - 10_957.5).abs() < 1e-9);
    }

    #[test]
    fn test_mjd_round_trip() {
        let mjd = Time::<MJD>::new(60_000.25);
        let back = mjd.to::<JD>().to::<MJD>();
        assert!((back - mjd).abs() < Days::new(1e-9));
    }
}
