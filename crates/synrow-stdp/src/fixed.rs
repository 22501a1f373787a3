// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! S16.15 fixed-point conversion for parameter blocks

/// Fractional bits of the target's `accum` type
pub const S1615_FRACTIONAL_BITS: u32 = 15;

/// 1.0 in S16.15
pub const S1615_ONE: i32 = 1 << S1615_FRACTIONAL_BITS;

/// Convert to S16.15, rounding to nearest and saturating at the type bounds
#[inline]
pub fn to_s1615(value: f64) -> i32 {
    (value * f64::from(S1615_ONE)).round() as i32
}

/// Convert S16.15 back to floating point
#[inline]
pub fn from_s1615(value: i32) -> f64 {
    f64::from(value) / f64::from(S1615_ONE)
}
