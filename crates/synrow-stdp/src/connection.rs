// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connection records and post-synaptic vertex slice addressing

use serde::{Deserialize, Serialize};

use crate::error::{Result, StdpError};

/// Shortest delay a row entry can represent, in timesteps
pub const MIN_DELAY: u32 = 1;

/// Longest delay a row entry can represent, in timesteps (stored as 0)
pub const MAX_DELAY: u32 = 16;

/// One directed synapse instance
///
/// `source` is the pre-synaptic index, which is the row a connection lands
/// in; it is not stored inside the row. `target` is the global post-synaptic
/// neuron id. `weight` keeps its sign here; rows store the magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: u32,
    pub target: u32,
    pub weight: f64,
    pub delay: u32,
    pub synapse_type: u8,
}

impl Connection {
    pub fn new(source: u32, target: u32, weight: f64, delay: u32, synapse_type: u8) -> Self {
        Self {
            source,
            target,
            weight,
            delay,
            synapse_type,
        }
    }

    /// True if the delay is in the encodable range `1..=16`
    #[inline]
    pub fn has_valid_delay(&self) -> bool {
        (MIN_DELAY..=MAX_DELAY).contains(&self.delay)
    }
}

/// Contiguous range of post-synaptic neuron ids owned by one target partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexSlice {
    lo_atom: u32,
    n_atoms: u32,
}

impl VertexSlice {
    /// Create a slice of `n_atoms` neurons starting at `lo_atom`
    ///
    /// # Errors
    /// - [`StdpError::EmptyVertexSlice`] if `n_atoms` is zero
    /// - [`StdpError::VertexSliceOverflow`] if the last atom is past `u32::MAX`
    pub fn new(lo_atom: u32, n_atoms: u32) -> Result<Self> {
        if n_atoms == 0 {
            return Err(StdpError::EmptyVertexSlice);
        }
        if lo_atom.checked_add(n_atoms - 1).is_none() {
            return Err(StdpError::VertexSliceOverflow { lo_atom, n_atoms });
        }
        Ok(Self { lo_atom, n_atoms })
    }

    /// Create a slice from inclusive atom bounds
    pub fn from_bounds(lo_atom: u32, hi_atom: u32) -> Result<Self> {
        if hi_atom < lo_atom {
            return Err(StdpError::EmptyVertexSlice);
        }
        let n_atoms = (hi_atom - lo_atom)
            .checked_add(1)
            .ok_or(StdpError::VertexSliceOverflow {
                lo_atom,
                n_atoms: u32::MAX,
            })?;
        Self::new(lo_atom, n_atoms)
    }

    #[inline]
    pub fn lo_atom(&self) -> u32 {
        self.lo_atom
    }

    #[inline]
    pub fn n_atoms(&self) -> u32 {
        self.n_atoms
    }

    /// Last atom of the slice (inclusive)
    #[inline]
    pub fn hi_atom(&self) -> u32 {
        self.lo_atom + (self.n_atoms - 1)
    }

    #[inline]
    pub fn contains(&self, neuron_id: u32) -> bool {
        neuron_id >= self.lo_atom && neuron_id - self.lo_atom < self.n_atoms
    }
}
