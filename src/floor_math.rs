// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Floor division and the 64×64→128 high word.
//!
//! Every boundary computation in the crate goes through [`floor_div`] /
//! [`floor_mod`] instead of `/` and `%`, so that instants before 1970 bucket
//! the same way as instants after it.

/// `⌊a / b⌋` for `b > 0`.
#[inline(always)]
pub const fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// The unique `r ∈ [0, b)` with `a = b·⌊a/b⌋ + r`, for `b > 0`.
#[inline(always)]
pub const fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

/// Floor division paired with its non-negative remainder.
#[inline(always)]
pub const fn floor_div_mod(a: i64, b: i64) -> (i64, i64) {
    (floor_div(a, b), floor_mod(a, b))
}

/// `⌊(a·b) / 2⁶⁴⌋`.
#[inline(always)]
pub const fn mul_hi_u64(a: u64, b: u64) -> u64 {
    ((a as u128 * b as u128) >> 64) as u64
}

/// Schoolbook 32-bit decomposition of [`mul_hi_u64`], kept for targets where
/// 128-bit multiplication is slow and as a cross-check.
#[inline]
pub const fn mul_hi_u64_portable(a: u64, b: u64) -> u64 {
    const MASK: u64 = 0xFFFF_FFFF;
    let a_lo = a & MASK;
    let a_hi = a >> 32;
    let b_lo = b & MASK;
    let b_hi = b >> 32;

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let cross = (lo_lo >> 32) + (hi_lo & MASK) + lo_hi;
    hi_hi + (hi_lo >> 32) + (cross >> 32)
}
