// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dendritic/axonal delay split
//!
//! A connection's delay is shared between the sending (axonal) and receiving
//! (dendritic) side. Each component is stored in a 4-bit field, so a stored
//! value of 0 stands for 16 timesteps.

use crate::connection::MAX_DELAY;
use crate::error::{Result, StdpError};

/// Width of each delay field in a fixed-plastic entry
pub const DELAY_FIELD_BITS: u32 = 4;

/// Mask applied to each delay component before packing
pub const DELAY_FIELD_MASK: u16 = 0xF;

/// Lowest accepted dendritic delay fraction
pub const MIN_DENDRITIC_DELAY_FRACTION: f64 = 0.5;

/// Highest accepted dendritic delay fraction
pub const MAX_DENDRITIC_DELAY_FRACTION: f64 = 1.0;

/// Delay components as stored in the fixed-plastic entry (already masked to 4 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySplit {
    pub dendritic: u8,
    pub axonal: u8,
}

/// Split a delay into its dendritic and axonal components
///
/// # Example
/// ```
/// use synrow_stdp::delay::split_delay;
///
/// let split = split_delay(8, 0.75);
/// assert_eq!((split.dendritic, split.axonal), (6, 2));
///
/// // 16 wraps to 0 in the 4-bit field
/// assert_eq!(split_delay(16, 1.0).dendritic, 0);
/// ```
#[inline]
pub fn split_delay(delay: u32, dendritic_delay_fraction: f64) -> DelaySplit {
    let delay = f64::from(delay);
    let dendritic = (delay * dendritic_delay_fraction).round() as u16 & DELAY_FIELD_MASK;
    let axonal = (delay * (1.0 - dendritic_delay_fraction)).round() as u16 & DELAY_FIELD_MASK;
    DelaySplit {
        dendritic: dendritic as u8,
        axonal: axonal as u8,
    }
}

/// Convert a stored 4-bit delay field back into timesteps (0 means 16)
#[inline]
pub fn stored_delay_to_steps(field: u8) -> u32 {
    match u32::from(field) & u32::from(DELAY_FIELD_MASK) {
        0 => MAX_DELAY,
        steps => steps,
    }
}

/// Check a dendritic delay fraction against `[0.5, 1.0]`
pub fn validate_dendritic_delay_fraction(fraction: f64) -> Result<f64> {
    if (MIN_DENDRITIC_DELAY_FRACTION..=MAX_DENDRITIC_DELAY_FRACTION).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(StdpError::InvalidDendriticDelayFraction(fraction))
    }
}
