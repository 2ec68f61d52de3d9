// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geocentric Moon phase.
//!
//! Port of John Walker's *moontool* model: the Sun's position from a
//! Kepler solve on the 1980.0 elements, the Moon's longitude with the
//! evection, annual-equation and variation terms, and the Meeus lunation
//! series for the instants of the principal phases.
//!
//! All inputs are fractional Unix UTC seconds. No observer correction is
//! applied.
//!
//! | Item | Meaning |
//! |------|---------|
//! | [`MoonPhase::compute`] | Phase, illumination, age, distances, angular sizes |
//! | [`MoonPhase::quarter_times`] | Previous and next new / first quarter / full / last quarter |
//! | [`MoonPhase::is_in_window`] | Proximity test against a [`Quarter`] |

use qtty::Days;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::civil::{month_of_ts, year_of_ts};
use crate::constants::SEC_PER_DAY;
use crate::instant::Time;
use crate::julian::{fts_to_jd, jd_to_fts};
use crate::scales::JD;

// ── Orbital elements at 1980 January 0.0 ─────────────────────────────────

const EPOCH_JD: f64 = 2_444_238.5;

const SUN_ELONG_EPOCH: f64 = 278.833540;
const SUN_ELONG_PERIGEE: f64 = 282.596403;
const SUN_ECCENTRICITY: f64 = 0.016718;
const SUN_SEMI_MAJOR_KM: f64 = 1.495985e8;
const SUN_ANGULAR_SIZE_DEG: f64 = 0.533128;

const MOON_MEAN_LONG: f64 = 64.975464;
const MOON_MEAN_LONG_PERIGEE: f64 = 349.383063;
const MOON_ECCENTRICITY: f64 = 0.054900;
const MOON_ANGULAR_SIZE_DEG: f64 = 0.5181;
const MOON_SEMI_MAJOR_KM: f64 = 384_401.0;

/// Mean interval between successive new moons, in days.
pub const SYNODIC_MONTH: f64 = 29.53058868;

/// Default half-width of the phase windows: 12 hours.
pub const DEFAULT_QUARTER_WINDOW_S: f64 = 43_200.0;

const KEPLER_EPSILON: f64 = 1e-6;
const KEPLER_MAX_ITER: usize = 50;

// The search starts 45 days back, so a handful of lunations always suffices.
const MAX_LUNATION_STEPS: usize = 8;

// ── Results ───────────────────────────────────────────────────────────────

/// Output of [`MoonPhase::compute`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoonPhaseResult {
    /// Fraction of the lunation in `[0, 1)`; 0 is new, 0.5 is full.
    pub phase: f64,
    /// Illuminated fraction in `[0, 1]`.
    pub illumination: f64,
    /// Days since new moon.
    pub age_days: f64,
    pub distance_km: f64,
    pub diameter_deg: f64,
    /// Moon minus Sun longitude in `[0, 360)`.
    pub age_deg: f64,
    /// `age_deg` in radians, `[0, 2π)`.
    pub phase_angle_rad: f64,
    pub phase_sin: f64,
    pub phase_cos: f64,
    pub sun_distance_km: f64,
    pub sun_diameter_deg: f64,
}

/// Phase angle as a wrap-free (sin, cos) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoonPhaseSinCos {
    pub phase_sin: f64,
    pub phase_cos: f64,
    pub phase_angle_rad: f64,
}

/// Principal phase instants bracketing a query, as Unix UTC seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoonQuarterInstants {
    pub previous_new_unix_s: f64,
    pub previous_first_quarter_unix_s: f64,
    pub previous_full_unix_s: f64,
    pub previous_last_quarter_unix_s: f64,
    pub next_new_unix_s: f64,
    pub next_first_quarter_unix_s: f64,
    pub next_full_unix_s: f64,
    pub next_last_quarter_unix_s: f64,
}

impl MoonQuarterInstants {
    /// `(previous, next)` instants of `quarter`.
    pub const fn pair(&self, quarter: Quarter) -> (f64, f64) {
        match quarter {
            Quarter::New => (self.previous_new_unix_s, self.next_new_unix_s),
            Quarter::FirstQuarter => (
                self.previous_first_quarter_unix_s,
                self.next_first_quarter_unix_s,
            ),
            Quarter::Full => (self.previous_full_unix_s, self.next_full_unix_s),
            Quarter::LastQuarter => (
                self.previous_last_quarter_unix_s,
                self.next_last_quarter_unix_s,
            ),
        }
    }
}

impl From<[f64; 8]> for MoonQuarterInstants {
    fn from(q: [f64; 8]) -> Self {
        Self {
            previous_new_unix_s: q[0],
            previous_first_quarter_unix_s: q[1],
            previous_full_unix_s: q[2],
            previous_last_quarter_unix_s: q[3],
            next_new_unix_s: q[4],
            next_first_quarter_unix_s: q[5],
            next_full_unix_s: q[6],
            next_last_quarter_unix_s: q[7],
        }
    }
}

/// One of the four principal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quarter {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [
        Quarter::New,
        Quarter::FirstQuarter,
        Quarter::Full,
        Quarter::LastQuarter,
    ];

    /// Lunation fraction of the phase: 0, 0.25, 0.5 or 0.75.
    #[inline]
    pub const fn fraction(self) -> f64 {
        match self {
            Quarter::New => 0.0,
            Quarter::FirstQuarter => 0.25,
            Quarter::Full => 0.5,
            Quarter::LastQuarter => 0.75,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Calculator
// ═══════════════════════════════════════════════════════════════════════════

/// Stateless Moon phase calculator.
///
/// ```
/// use tempcal::MoonPhase;
///
/// let moon = MoonPhase;
/// let res = moon.compute(1_704_067_200.0); // 2024-01-01T00:00:00Z
/// assert!(res.phase > 0.6 && res.phase < 0.7); // waning gibbous
/// let q = moon.quarter_instants(1_704_067_200.0);
/// assert!(q.previous_new_unix_s <= 1_704_067_200.0);
/// assert!(1_704_067_200.0 < q.next_new_unix_s);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoonPhase;

impl MoonPhase {
    pub fn compute(&self, unix_utc_s: f64) -> MoonPhaseResult {
        let day = fts_to_jd(unix_utc_s) - EPOCH_JD;

        // Sun
        let n = fix_angle((360.0 / 365.2422) * day);
        let m = fix_angle(n + SUN_ELONG_EPOCH - SUN_ELONG_PERIGEE);
        let e = kepler(m, SUN_ECCENTRICITY);
        let ec = 2.0
            * (((1.0 + SUN_ECCENTRICITY) / (1.0 - SUN_ECCENTRICITY)).sqrt() * (e / 2.0).tan())
                .atan()
                .to_degrees();
        let lambda_sun = fix_angle(ec + SUN_ELONG_PERIGEE);
        let f = (1.0 + SUN_ECCENTRICITY * ec.to_radians().cos())
            / (1.0 - SUN_ECCENTRICITY * SUN_ECCENTRICITY);
        let sun_distance_km = SUN_SEMI_MAJOR_KM / f;
        let sun_diameter_deg = f * SUN_ANGULAR_SIZE_DEG;

        // Moon
        let ml = fix_angle(13.1763966 * day + MOON_MEAN_LONG);
        let mm = fix_angle(ml - 0.1114041 * day - MOON_MEAN_LONG_PERIGEE);
        let evection = 1.2739 * (2.0 * (ml - lambda_sun) - mm).to_radians().sin();
        let annual_eq = 0.1858 * m.to_radians().sin();
        let a3 = 0.37 * m.to_radians().sin();
        let mm_corr = mm + evection - annual_eq - a3;
        let centre = 6.2886 * mm_corr.to_radians().sin();
        let a4 = 0.214 * (2.0 * mm_corr).to_radians().sin();
        let l_corr = ml + evection + centre - annual_eq + a4;
        let variation = 0.6583 * (2.0 * (l_corr - lambda_sun)).to_radians().sin();
        let l_true = l_corr + variation;

        // Phase
        let age_deg = fix_angle(l_true - lambda_sun);
        let phase_angle_rad = age_deg.to_radians();
        let (phase_sin, phase_cos) = phase_angle_rad.sin_cos();
        let phase = age_deg / 360.0;

        let distance_km = MOON_SEMI_MAJOR_KM * (1.0 - MOON_ECCENTRICITY * MOON_ECCENTRICITY)
            / (1.0 + MOON_ECCENTRICITY * (mm_corr + centre).to_radians().cos());
        let diameter_deg = MOON_ANGULAR_SIZE_DEG / (distance_km / MOON_SEMI_MAJOR_KM);

        MoonPhaseResult {
            phase,
            illumination: (1.0 - phase_cos) / 2.0,
            age_days: SYNODIC_MONTH * phase,
            distance_km,
            diameter_deg,
            age_deg,
            phase_angle_rad,
            phase_sin,
            phase_cos,
            sun_distance_km,
            sun_diameter_deg,
        }
    }

    #[inline]
    pub fn compute_phase(&self, unix_utc_s: f64) -> f64 {
        self.compute(unix_utc_s).phase
    }

    /// Previous and next instants of each principal phase, ordered
    /// `[new, first quarter, full, last quarter]` for the lunation holding
    /// `unix_utc_s` followed by the same four for the next one.
    pub fn quarter_times(&self, unix_utc_s: f64) -> [f64; 8] {
        let sdate = fts_to_jd(unix_utc_s);
        let ats = (unix_utc_s - 45.0 * SEC_PER_DAY as f64) as i64;
        let yy = year_of_ts(ats) as f64;
        let mm = month_of_ts(ats) as f64;

        let mut k1 = ((yy + (mm - 1.0) / 12.0 - 1900.0) * 12.3685).floor();
        let mut k2 = k1 + 1.0;
        let mut nt1 = mean_phase_jd(sdate - 45.0, k1);
        let mut adate = nt1;

        for _ in 0..MAX_LUNATION_STEPS {
            adate += SYNODIC_MONTH;
            k2 = k1 + 1.0;
            let mut nt2 = mean_phase_jd(adate, k2);
            if (nt2 - sdate).abs() < 0.75 {
                nt2 = true_phase_jd(k2, Quarter::New);
            }
            if nt1 <= sdate && sdate < nt2 {
                break;
            }
            nt1 = nt2;
            k1 = k2;
        }

        let mut out = [0.0; 8];
        for (i, (k, quarter)) in [k1, k2]
            .into_iter()
            .flat_map(|k| Quarter::ALL.map(|q| (k, q)))
            .enumerate()
        {
            out[i] = jd_to_fts(true_phase_jd(k, quarter));
        }
        out
    }

    #[inline]
    pub fn quarter_instants(&self, unix_utc_s: f64) -> MoonQuarterInstants {
        self.quarter_times(unix_utc_s).into()
    }

    /// `true` when `unix_utc_s` lies within `window_s` seconds of the
    /// previous or next occurrence of `quarter`.
    pub fn is_in_window(&self, unix_utc_s: f64, quarter: Quarter, window_s: f64) -> bool {
        let (prev, next) = self.quarter_instants(unix_utc_s).pair(quarter);
        (unix_utc_s - prev).abs() <= window_s || (unix_utc_s - next).abs() <= window_s
    }

    #[inline]
    pub fn is_new_moon_window(&self, unix_utc_s: f64, window_s: f64) -> bool {
        self.is_in_window(unix_utc_s, Quarter::New, window_s)
    }

    #[inline]
    pub fn is_first_quarter_window(&self, unix_utc_s: f64, window_s: f64) -> bool {
        self.is_in_window(unix_utc_s, Quarter::FirstQuarter, window_s)
    }

    #[inline]
    pub fn is_full_moon_window(&self, unix_utc_s: f64, window_s: f64) -> bool {
        self.is_in_window(unix_utc_s, Quarter::Full, window_s)
    }

    #[inline]
    pub fn is_last_quarter_window(&self, unix_utc_s: f64, window_s: f64) -> bool {
        self.is_in_window(unix_utc_s, Quarter::LastQuarter, window_s)
    }
}

// ── Internals ─────────────────────────────────────────────────────────────

/// Reduce to `[0, 360)`. `rem_euclid` may round a tiny negative up to 360.
#[inline]
fn fix_angle(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Eccentric anomaly (radians) for mean anomaly `m_deg` by Newton iteration.
fn kepler(m_deg: f64, ecc: f64) -> f64 {
    let m = m_deg.to_radians();
    let mut e = m;
    for _ in 0..KEPLER_MAX_ITER {
        let delta = e - ecc * e.sin() - m;
        e -= delta / (1.0 - ecc * e.cos());
        if delta.abs() <= KEPLER_EPSILON {
            break;
        }
    }
    e
}

/// Mean new moon of lunation `k`, with `jd` only supplying the century term.
fn mean_phase_jd(jd: f64, k: f64) -> f64 {
    let t = Time::<JD>::new(jd).julian_centuries_since_j1900().value();
    let t2 = t * t;
    Time::<JD>::J1900.value() + 0.75933 + SYNODIC_MONTH * k + 0.0001178 * t2
        - 0.000000155 * t2 * t
        + 0.00033 * (166.56 + 132.87 * t - 0.009173 * t2).to_radians().sin()
}

/// Corrected instant (JD) of `quarter` in lunation `k`.
fn true_phase_jd(k: f64, quarter: Quarter) -> f64 {
    let k = k + quarter.fraction();
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;

    let mut pt = (Time::<JD>::J1900 + Days::new(0.75933 + SYNODIC_MONTH * k)).value()
        + 0.0001178 * t2
        - 0.000000155 * t3
        + 0.00033 * (166.56 + 132.87 * t - 0.009173 * t2).to_radians().sin();

    let m = 359.2242 + 29.10535608 * k - 0.0000333 * t2 - 0.00000347 * t3;
    let mp = 306.0253 + 385.81691806 * k + 0.0107306 * t2 + 0.00001236 * t3;
    let f = 21.2964 + 390.67050646 * k - 0.0016528 * t2 - 0.00000239 * t3;
    let s = |deg: f64| deg.to_radians().sin();
    let c = |deg: f64| deg.to_radians().cos();

    match quarter {
        Quarter::New | Quarter::Full => {
            pt += (0.1734 - 0.000393 * t) * s(m) + 0.0021 * s(2.0 * m) - 0.4068 * s(mp)
                + 0.0161 * s(2.0 * mp)
                - 0.0004 * s(3.0 * mp)
                + 0.0104 * s(2.0 * f)
                - 0.0051 * s(m + mp)
                - 0.0074 * s(m - mp)
                + 0.0004 * s(2.0 * f + m)
                - 0.0004 * s(2.0 * f - m)
                - 0.0006 * s(2.0 * f + mp)
                + 0.0010 * s(2.0 * f - mp)
                + 0.0005 * s(m + 2.0 * mp);
        }
        Quarter::FirstQuarter | Quarter::LastQuarter => {
            pt += (0.1721 - 0.0004 * t) * s(m) + 0.0021 * s(2.0 * m) - 0.6280 * s(mp)
                + 0.0089 * s(2.0 * mp)
                - 0.0004 * s(3.0 * mp)
                + 0.0079 * s(2.0 * f)
                - 0.0119 * s(m + mp)
                - 0.0047 * s(m - mp)
                + 0.0003 * s(2.0 * f + m)
                - 0.0004 * s(2.0 * f - m)
                - 0.0006 * s(2.0 * f + mp)
                + 0.0021 * s(2.0 * f - mp)
                + 0.0003 * s(m + 2.0 * mp)
                + 0.0004 * s(m - 2.0 * mp)
                - 0.0003 * s(2.0 * m + mp);
            let adjust = 0.0028 - 0.0004 * c(m) + 0.0003 * c(mp);
            pt += if quarter == Quarter::FirstQuarter {
                adjust
            } else {
                -adjust
            };
        }
    }
    pt
}

// ═══════════════════════════════════════════════════════════════════════════
// Free functions
// ═══════════════════════════════════════════════════════════════════════════

/// Phase fraction in `[0, 1)`.
#[inline]
pub fn moon_phase(fts: f64) -> f64 {
    MoonPhase.compute(fts).phase
}

#[inline]
pub fn moon_illumination(fts: f64) -> f64 {
    MoonPhase.compute(fts).illumination
}

#[inline]
pub fn moon_age_days(fts: f64) -> f64 {
    MoonPhase.compute(fts).age_days
}

pub fn moon_phase_sincos(fts: f64) -> MoonPhaseSinCos {
    let res = MoonPhase.compute(fts);
    MoonPhaseSinCos {
        phase_sin: res.phase_sin,
        phase_cos: res.phase_cos,
        phase_angle_rad: res.phase_angle_rad,
    }
}

#[inline]
pub fn moon_quarters(fts: f64) -> MoonQuarterInstants {
    MoonPhase.quarter_instants(fts)
}

/// Linear lunation fraction from the mean synodic month.
///
/// Accurate to about a day; prefer [`moon_phase`].
pub fn moon_phase_jd_approx(fts: f64) -> f64 {
    const REF_NEW_MOON_JD: f64 = 2_451_550.1;
    const MEAN_SYNODIC_MONTH: f64 = 29.530588853;
    let cycles = (fts_to_jd(fts) - REF_NEW_MOON_JD) / MEAN_SYNODIC_MONTH;
    let frac = cycles - cycles.floor();
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

#[inline]
pub fn moon_age_days_jd_approx(fts: f64) -> f64 {
    moon_phase_jd_approx(fts) * 29.530588853
}

#[inline]
pub fn is_new_moon_window(fts: f64, window_s: f64) -> bool {
    MoonPhase.is_new_moon_window(fts, window_s)
}

#[inline]
pub fn is_first_quarter_window(fts: f64, window_s: f64) -> bool {
    MoonPhase.is_first_quarter_window(fts, window_s)
}

#[inline]
pub fn is_full_moon_window(fts: f64, window_s: f64) -> bool {
    MoonPhase.is_full_moon_window(fts, window_s)
}

#[inline]
pub fn is_last_quarter_window(fts: f64, window_s: f64) -> bool {
    MoonPhase.is_last_quarter_window(fts, window_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const JAN_2024: f64 = 1_704_067_200.0;
    const MID_JAN_2024: f64 = 1_705_500_000.0;

    #[test]
    fn test_compute_ranges() {
        let res = MoonPhase.compute(JAN_2024);
        assert!(res.phase >= 0.0 && res.phase < 1.0);
        assert!(res.illumination >= 0.0 && res.illumination <= 1.0);
        assert!(res.distance_km > 300_000.0 && res.distance_km < 410_000.0);
        assert!(res.diameter_deg > 0.48 && res.diameter_deg < 0.57);
        assert!(res.sun_distance_km > 1.4e8 && res.sun_distance_km < 1.6e8);
        assert!(res.sun_diameter_deg > 0.5 && res.sun_diameter_deg < 0.55);
        assert!((res.age_days - SYNODIC_MONTH * res.phase).abs() < 1e-12);
        assert!((res.age_deg - res.phase * 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_over_two_centuries() {
        // 1900-01-01 .. 2100-01-01
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..5_000 {
            let ts = rng.gen_range(-2_208_988_800.0..4_102_444_800.0);
            let res = MoonPhase.compute(ts);
            assert!(res.phase >= 0.0 && res.phase < 1.0, "phase {} at {ts}", res.phase);
            assert!(res.illumination >= 0.0 && res.illumination <= 1.0);
            assert!(res.phase_angle_rad >= 0.0 && res.phase_angle_rad < std::f64::consts::TAU);
            let norm = res.phase_sin * res.phase_sin + res.phase_cos * res.phase_cos;
            assert!((norm - 1.0).abs() <= 1e-9);
        }
    }

    #[test]
    fn test_full_and_new_illumination() {
        // Full moon 2024-01-25 17:54 UTC, new moon 2024-01-11 11:57 UTC.
        let full = MoonPhase.compute(1_706_205_240.0);
        assert!(full.illumination > 0.999);
        assert!((full.phase - 0.5).abs() < 0.01);
        let new = MoonPhase.compute(1_704_974_220.0);
        assert!(new.illumination < 0.001);
    }

    #[test]
    fn test_quarter_times_match_published_instants() {
        let q = MoonPhase.quarter_instants(MID_JAN_2024);
        let expected = [
            (q.previous_new_unix_s, 1_704_974_220.0),
            (q.previous_first_quarter_unix_s, 1_705_549_920.0),
            (q.previous_full_unix_s, 1_706_205_240.0),
            (q.previous_last_quarter_unix_s, 1_706_915_880.0),
            (q.next_new_unix_s, 1_707_519_540.0),
        ];
        for (got, want) in expected {
            assert!((got - want).abs() < 3_600.0, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_quarter_times_are_ordered_and_bracket() {
        let q = MoonPhase.quarter_times(JAN_2024);
        for pair in q.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(q[0] <= JAN_2024 && JAN_2024 < q[4]);
        let cycle = q[4] - q[0];
        assert!(cycle > 2_300_000.0 && cycle < 2_700_000.0);
        for gap in q.windows(2).take(3).map(|p| p[1] - p[0]) {
            assert!(gap > 450_000.0 && gap < 750_000.0);
        }
        let s = moon_quarters(JAN_2024);
        assert_eq!(s.previous_new_unix_s, q[0]);
        assert_eq!(s.next_last_quarter_unix_s, q[7]);
    }

    #[test]
    fn test_windows() {
        let q = moon_quarters(JAN_2024);
        let before = q.previous_new_unix_s - 900.0;
        let after = q.previous_new_unix_s + 900.0;
        assert!(is_new_moon_window(before, DEFAULT_QUARTER_WINDOW_S));
        assert!(is_new_moon_window(after, DEFAULT_QUARTER_WINDOW_S));
        assert!(!is_full_moon_window(before, 1_800.0));
        assert!(!is_last_quarter_window(before, 1_800.0));
        assert!(is_first_quarter_window(
            q.previous_first_quarter_unix_s + 60.0,
            120.0
        ));
        assert!(!is_new_moon_window(
            q.previous_first_quarter_unix_s + 172_800.0,
            3_600.0
        ));

        let a = moon_phase_sincos(before);
        let b = moon_phase_sincos(after);
        assert!(a.phase_cos * b.phase_cos + a.phase_sin * b.phase_sin > 0.95);
    }

    #[test]
    fn test_free_functions_agree_with_calculator() {
        let res = MoonPhase.compute(JAN_2024);
        let sc = moon_phase_sincos(JAN_2024);
        assert_eq!(sc.phase_sin, res.phase_sin);
        assert_eq!(sc.phase_cos, res.phase_cos);
        assert_eq!(moon_phase(JAN_2024), res.phase);
        assert_eq!(moon_illumination(JAN_2024), res.illumination);
        assert_eq!(moon_age_days(JAN_2024), res.age_days);
        assert_eq!(MoonPhase.compute_phase(JAN_2024), res.phase);
    }

    #[test]
    fn test_jd_approximation() {
        let approx = moon_phase_jd_approx(JAN_2024);
        assert!((0.0..1.0).contains(&approx));
        assert!((approx - moon_phase(JAN_2024)).abs() < 0.1);
        let age = moon_age_days_jd_approx(JAN_2024);
        assert!((age - moon_age_days(JAN_2024)).abs() < 2.0);
    }

    #[test]
    fn test_non_finite_input_terminates() {
        let q = MoonPhase.quarter_times(f64::NAN);
        assert!(q.iter().all(|v| v.is_nan() || v.is_finite()));
        assert!(!is_new_moon_window(f64::NAN, DEFAULT_QUARTER_WINDOW_S));
    }

    #[test]
    fn test_fix_angle() {
        assert_eq!(fix_angle(-1e-300), 0.0);
        assert_eq!(fix_angle(720.5), 0.5);
        assert_eq!(fix_angle(-90.0), 270.0);
    }
}
