// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-plastic half-word bit layout
//!
//! ```text
//!  15          12 11           8 7                              0
//! +--------------+--------------+---------------+---------------+
//! | axonal delay | dendr. delay | synapse type  | target id     |
//! |   4 bits     |   4 bits     | type_bits     | id_bits       |
//! +--------------+--------------+---------------+---------------+
//! ```
//!
//! `type_bits = ceil(log2(n_synapse_types))` and
//! `id_bits = ceil(log2(slice.n_atoms))` are recomputed per call, so the
//! layout shown is the widest case (`type_bits + id_bits == 8`). Narrower
//! layouts leave the top bits zero. When `type_bits + id_bits > 8` the
//! axonal field is cut off at bit 15: only its low `16 - axonal_shift`
//! bits are stored, and none at all once the dendritic field reaches the
//! top nibble. The dendritic field always fits. Encoder and decoder must
//! build the layout from the same synapse type count and slice.

use crate::connection::VertexSlice;
use crate::delay::{DelaySplit, DELAY_FIELD_BITS, DELAY_FIELD_MASK};
use crate::error::{Result, StdpError};

/// Bits in one fixed-plastic entry
pub const HALF_WORD_BITS: u32 = 16;

/// Bytes in one fixed-plastic entry
pub const FIXED_PLASTIC_ENTRY_BYTES: usize = 2;

/// `ceil(log2(n))` for `n >= 1`; 0 and 1 need no bits
#[inline]
pub fn bits_needed(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

#[inline]
fn field_mask(bits: u32) -> u16 {
    ((1u32 << bits) - 1) as u16
}

/// Field widths and offsets of a fixed-plastic entry for one synapse type count and slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPlasticLayout {
    n_synapse_types: usize,
    n_synapse_type_bits: u32,
    n_neuron_id_bits: u32,
}

impl FixedPlasticLayout {
    /// Derive the layout from the runtime context
    ///
    /// # Errors
    /// - [`StdpError::InvalidSynapseTypeCount`] if `n_synapse_types` is zero
    /// - [`StdpError::LayoutOverflow`] if the type and id fields need more
    ///   than the 12 bits left beside the dendritic delay field
    pub fn new(n_synapse_types: usize, post_vertex_slice: &VertexSlice) -> Result<Self> {
        if n_synapse_types == 0 {
            return Err(StdpError::InvalidSynapseTypeCount(n_synapse_types));
        }
        let n_synapse_type_bits = bits_needed(n_synapse_types);
        let n_neuron_id_bits = bits_needed(post_vertex_slice.n_atoms() as usize);
        if DELAY_FIELD_BITS + n_synapse_type_bits + n_neuron_id_bits > HALF_WORD_BITS {
            return Err(StdpError::LayoutOverflow {
                n_synapse_type_bits,
                n_neuron_id_bits,
            });
        }
        Ok(Self {
            n_synapse_types,
            n_synapse_type_bits,
            n_neuron_id_bits,
        })
    }

    #[inline]
    pub fn n_synapse_types(&self) -> usize {
        self.n_synapse_types
    }

    #[inline]
    pub fn n_synapse_type_bits(&self) -> u32 {
        self.n_synapse_type_bits
    }

    #[inline]
    pub fn n_neuron_id_bits(&self) -> u32 {
        self.n_neuron_id_bits
    }

    #[inline]
    pub fn neuron_id_mask(&self) -> u16 {
        field_mask(self.n_neuron_id_bits)
    }

    #[inline]
    pub fn synapse_type_mask(&self) -> u16 {
        field_mask(self.n_synapse_type_bits)
    }

    #[inline]
    pub fn synapse_type_shift(&self) -> u32 {
        self.n_neuron_id_bits
    }

    #[inline]
    pub fn dendritic_delay_shift(&self) -> u32 {
        self.n_neuron_id_bits + self.n_synapse_type_bits
    }

    /// Offset of the axonal field; may be 16 or more, in which case nothing of it is stored
    #[inline]
    pub fn axonal_delay_shift(&self) -> u32 {
        self.dendritic_delay_shift() + DELAY_FIELD_BITS
    }

    /// Number of axonal delay bits that fit below bit 16 (0 to 4)
    #[inline]
    pub fn axonal_delay_bits(&self) -> u32 {
        HALF_WORD_BITS
            .saturating_sub(self.axonal_delay_shift())
            .min(DELAY_FIELD_BITS)
    }

    /// Pack one entry; every field is masked to its width
    ///
    /// Axonal delay bits that fall past bit 15 are dropped.
    #[inline]
    pub fn pack(&self, target_local_id: u32, synapse_type: u8, delays: DelaySplit) -> u16 {
        let axonal = ((u32::from(delays.axonal) & u32::from(DELAY_FIELD_MASK))
            << self.axonal_delay_shift()) as u16;
        let dendritic =
            (u16::from(delays.dendritic) & DELAY_FIELD_MASK) << self.dendritic_delay_shift();
        let synapse_type =
            (u16::from(synapse_type) & self.synapse_type_mask()) << self.synapse_type_shift();
        let target = (target_local_id as u16) & self.neuron_id_mask();
        axonal | dendritic | synapse_type | target
    }

    #[inline]
    pub fn target_local_id(&self, entry: u16) -> u16 {
        entry & self.neuron_id_mask()
    }

    #[inline]
    pub fn synapse_type(&self, entry: u16) -> u8 {
        ((entry >> self.synapse_type_shift()) & self.synapse_type_mask()) as u8
    }

    /// Raw dendritic delay field (0 means 16 timesteps)
    #[inline]
    pub fn dendritic_delay(&self, entry: u16) -> u8 {
        ((entry >> self.dendritic_delay_shift()) & DELAY_FIELD_MASK) as u8
    }

    /// Stored part of the axonal delay field (its low [`Self::axonal_delay_bits`] bits)
    #[inline]
    pub fn axonal_delay(&self, entry: u16) -> u8 {
        ((u32::from(entry) >> self.axonal_delay_shift()) & u32::from(DELAY_FIELD_MASK)) as u8
    }
}
