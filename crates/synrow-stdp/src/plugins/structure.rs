// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-connection plastic state layouts

use byteorder::{ByteOrder, LittleEndian};

use crate::connection::Connection;
use crate::error::{Result, StdpError};

/// Layout of the per-connection plastic state following the row header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynapseStructure {
    /// `u16` weight
    WeightOnly,
    /// `u16` weight followed by an `i16` accumulator starting at 0
    WeightAccumulator,
}

impl SynapseStructure {
    #[inline]
    pub fn bytes_per_connection(&self) -> usize {
        match self {
            SynapseStructure::WeightOnly => 2,
            SynapseStructure::WeightAccumulator => 4,
        }
    }

    /// Stored weight: magnitude rounded half to even, saturated to `u16`
    #[inline]
    pub fn stored_weight(weight: f64) -> u16 {
        weight.abs().round_ties_even() as u16
    }

    /// Append the plastic state of one connection to `out`
    pub fn encode_into(&self, connection: &Connection, out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + self.bytes_per_connection(), 0);
        LittleEndian::write_u16(
            &mut out[start..start + 2],
            Self::stored_weight(connection.weight),
        );
        // The accumulator half of WeightAccumulator stays zero
    }

    /// Plastic state for `connections`, concatenated in order
    pub fn encode(&self, connections: &[Connection]) -> Vec<u8> {
        let mut out = Vec::with_capacity(connections.len() * self.bytes_per_connection());
        for connection in connections {
            self.encode_into(connection, &mut out);
        }
        out
    }

    /// Recover the weights of the live entries of each row
    ///
    /// `pp_without_headers[row]` is the plastic-plastic section of a row with
    /// its header removed; only its first `fp_size[row]` entries are read, so
    /// padding is ignored. Weights come back in row order.
    pub fn decode(&self, fp_size: &[usize], pp_without_headers: &[&[u8]]) -> Result<Vec<f64>> {
        if fp_size.len() != pp_without_headers.len() {
            return Err(StdpError::LengthMismatch {
                what: "plastic-plastic rows",
                expected: fp_size.len(),
                actual: pp_without_headers.len(),
            });
        }
        let stride = self.bytes_per_connection();
        for (row, (&n, data)) in fp_size.iter().zip(pp_without_headers).enumerate() {
            if data.len() < n * stride {
                return Err(StdpError::RowShapeMismatch {
                    row,
                    what: "plastic state",
                    expected: n * stride,
                    actual: data.len(),
                });
            }
        }

        let mut weights = Vec::with_capacity(fp_size.iter().sum());
        for (&n, data) in fp_size.iter().zip(pp_without_headers) {
            weights.extend(
                data.chunks_exact(stride)
                    .take(n)
                    .map(|entry| f64::from(LittleEndian::read_u16(entry))),
            );
        }
        Ok(weights)
    }
}
