// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plastic row decoder
//!
//! Only the dendritic delay field is read back. The axonal component is
//! consumed on the sending side and is not reconstructed, so decoded delays
//! equal the input delays only when the dendritic delay fraction is 1.0.

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace};

use crate::connection::{Connection, VertexSlice};
use crate::delay::stored_delay_to_steps;
use crate::error::{Result, StdpError};
use crate::layout::{FixedPlasticLayout, FIXED_PLASTIC_ENTRY_BYTES};
use crate::plugins::SynapseStructure;
use crate::rows::PlasticRows;
use crate::sizing::BYTES_PER_WORD;

/// Recovers connections from encoded plastic rows
#[derive(Debug, Clone, Copy)]
pub struct PlasticRowDecoder {
    layout: FixedPlasticLayout,
    header_bytes: usize,
    structure: SynapseStructure,
    post_vertex_slice: VertexSlice,
}

impl PlasticRowDecoder {
    pub fn new(
        layout: FixedPlasticLayout,
        header_bytes: usize,
        structure: SynapseStructure,
        post_vertex_slice: VertexSlice,
    ) -> Self {
        Self {
            layout,
            header_bytes,
            structure,
            post_vertex_slice,
        }
    }

    /// Decode all live connections, row by row in entry order
    ///
    /// `source` is the row index. The per-row size metadata must match the
    /// buffers exactly as the encoder produced them.
    pub fn decode(&self, rows: &PlasticRows) -> Result<Vec<Connection>> {
        self.validate(rows)?;

        let pp_without_headers: Vec<&[u8]> = rows
            .pp_data
            .iter()
            .map(|pp| &pp[self.header_bytes..])
            .collect();
        let weights = self.structure.decode(&rows.fp_size, &pp_without_headers)?;

        let lo_atom = self.post_vertex_slice.lo_atom();
        let mut weights = weights.into_iter();
        let mut connections = Vec::with_capacity(rows.n_connections());
        for (row, (fp, &n)) in rows.fp_data.iter().zip(&rows.fp_size).enumerate() {
            trace!("[STDP-DECODE] row {}: {} live entries", row, n);
            for entry in fp.chunks_exact(FIXED_PLASTIC_ENTRY_BYTES).take(n) {
                let half_word = LittleEndian::read_u16(entry);
                let weight = weights.next().ok_or(StdpError::RowShapeMismatch {
                    row,
                    what: "decoded weights",
                    expected: n,
                    actual: 0,
                })?;
                connections.push(Connection {
                    source: row as u32,
                    target: u32::from(self.layout.target_local_id(half_word)) + lo_atom,
                    weight,
                    delay: stored_delay_to_steps(self.layout.dendritic_delay(half_word)),
                    synapse_type: self.layout.synapse_type(half_word),
                });
            }
        }

        debug!(
            "[STDP-DECODE] Decoded {} connections from {} rows",
            connections.len(),
            rows.n_rows()
        );
        Ok(connections)
    }

    fn validate(&self, rows: &PlasticRows) -> Result<()> {
        let n_rows = rows.fp_size.len();
        for (what, actual) in [
            ("fixed-plastic rows", rows.fp_data.len()),
            ("plastic-plastic rows", rows.pp_data.len()),
            ("plastic-plastic sizes", rows.pp_size.len()),
        ] {
            if actual != n_rows {
                return Err(StdpError::LengthMismatch {
                    what,
                    expected: n_rows,
                    actual,
                });
            }
        }

        let bytes_per_connection = self.structure.bytes_per_connection();
        for row in 0..n_rows {
            let n = rows.fp_size[row];
            let fp_needed = n * FIXED_PLASTIC_ENTRY_BYTES;
            if rows.fp_data[row].len() < fp_needed {
                return Err(StdpError::RowShapeMismatch {
                    row,
                    what: "fixed-plastic bytes",
                    expected: fp_needed,
                    actual: rows.fp_data[row].len(),
                });
            }
            let pp_bytes = rows.pp_size[row] * BYTES_PER_WORD;
            if rows.pp_data[row].len() != pp_bytes {
                return Err(StdpError::RowShapeMismatch {
                    row,
                    what: "plastic-plastic bytes",
                    expected: pp_bytes,
                    actual: rows.pp_data[row].len(),
                });
            }
            let pp_needed = self.header_bytes + n * bytes_per_connection;
            if pp_bytes < pp_needed {
                return Err(StdpError::RowShapeMismatch {
                    row,
                    what: "plastic-plastic capacity",
                    expected: pp_needed,
                    actual: pp_bytes,
                });
            }
        }
        Ok(())
    }
}
