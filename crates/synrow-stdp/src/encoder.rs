// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plastic row encoder
//!
//! Connections are checked in full before any buffer is built, so a call
//! either returns every row or an error naming the first bad connection.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::connection::{Connection, VertexSlice};
use crate::delay::split_delay;
use crate::error::{Result, StdpError};
use crate::layout::FixedPlasticLayout;
use crate::plugins::SynapseStructure;
use crate::rows::PlasticRows;
use crate::sizing::{RowGeometry, BYTES_PER_WORD};

/// Encodes connections into fixed-plastic and plastic-plastic rows
#[derive(Debug, Clone, Copy)]
pub struct PlasticRowEncoder {
    layout: FixedPlasticLayout,
    geometry: RowGeometry,
    structure: SynapseStructure,
    post_vertex_slice: VertexSlice,
    dendritic_delay_fraction: f64,
}

struct EncodedRow {
    fp: Vec<u8>,
    pp: Vec<u8>,
    fp_size: usize,
    pp_size: usize,
}

impl PlasticRowEncoder {
    pub fn new(
        layout: FixedPlasticLayout,
        geometry: RowGeometry,
        structure: SynapseStructure,
        post_vertex_slice: VertexSlice,
        dendritic_delay_fraction: f64,
    ) -> Self {
        Self {
            layout,
            geometry,
            structure,
            post_vertex_slice,
            dendritic_delay_fraction,
        }
    }

    /// Encode `connections` into `n_rows` rows
    ///
    /// `connection_row_indices[i]` is the row of `connections[i]`. Within a
    /// row, connections keep their input order. Rows with no connections
    /// still carry a zeroed header (and padding, if configured).
    pub fn encode(
        &self,
        connections: &[Connection],
        connection_row_indices: &[usize],
        n_rows: usize,
    ) -> Result<PlasticRows> {
        self.validate(connections, connection_row_indices, n_rows)?;

        let mut grouped: Vec<Vec<&Connection>> = vec![Vec::new(); n_rows];
        for (connection, &row) in connections.iter().zip(connection_row_indices) {
            grouped[row].push(connection);
        }

        #[cfg(feature = "parallel")]
        let encoded: Vec<EncodedRow> = grouped
            .into_par_iter()
            .map(|row| self.encode_row(&row))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let encoded: Vec<EncodedRow> = grouped.iter().map(|row| self.encode_row(row)).collect();

        let mut rows = PlasticRows {
            fp_data: Vec::with_capacity(n_rows),
            pp_data: Vec::with_capacity(n_rows),
            fp_size: Vec::with_capacity(n_rows),
            pp_size: Vec::with_capacity(n_rows),
        };
        for (index, row) in encoded.into_iter().enumerate() {
            trace!(
                "[STDP-ENCODE] row {}: {} connections, {} fp bytes, {} pp words",
                index,
                row.fp_size,
                row.fp.len(),
                row.pp_size
            );
            rows.fp_data.push(row.fp);
            rows.pp_data.push(row.pp);
            rows.fp_size.push(row.fp_size);
            rows.pp_size.push(row.pp_size);
        }

        debug!(
            "[STDP-ENCODE] Encoded {} connections into {} rows (slice {}..={}, {} synapse types)",
            connections.len(),
            n_rows,
            self.post_vertex_slice.lo_atom(),
            self.post_vertex_slice.hi_atom(),
            self.layout.n_synapse_types()
        );
        Ok(rows)
    }

    fn validate(
        &self,
        connections: &[Connection],
        connection_row_indices: &[usize],
        n_rows: usize,
    ) -> Result<()> {
        if connection_row_indices.len() != connections.len() {
            return Err(StdpError::LengthMismatch {
                what: "connection row indices",
                expected: connections.len(),
                actual: connection_row_indices.len(),
            });
        }
        let n_synapse_types = self.layout.n_synapse_types();
        for (index, (connection, &row)) in connections.iter().zip(connection_row_indices).enumerate() {
            if !connection.has_valid_delay() {
                return Err(StdpError::InvalidDelay {
                    index,
                    delay: connection.delay,
                });
            }
            if usize::from(connection.synapse_type) >= n_synapse_types {
                return Err(StdpError::InvalidSynapseType {
                    index,
                    synapse_type: connection.synapse_type,
                    n_synapse_types,
                });
            }
            if !self.post_vertex_slice.contains(connection.target) {
                return Err(StdpError::TargetOutsideSlice {
                    index,
                    target: connection.target,
                    lo_atom: self.post_vertex_slice.lo_atom(),
                    n_atoms: self.post_vertex_slice.n_atoms(),
                });
            }
            if row >= n_rows {
                return Err(StdpError::RowIndexOutOfRange { index, row, n_rows });
            }
        }
        Ok(())
    }

    fn encode_row(&self, row: &[&Connection]) -> EncodedRow {
        let lo_atom = self.post_vertex_slice.lo_atom();

        let fp_len = self.geometry.fixed_plastic_words(row.len()) * BYTES_PER_WORD;
        let mut fp = Vec::with_capacity(fp_len);
        for connection in row {
            let delays = split_delay(connection.delay, self.dendritic_delay_fraction);
            let entry = self
                .layout
                .pack(connection.target - lo_atom, connection.synapse_type, delays);
            fp.extend_from_slice(&entry.to_le_bytes());
        }
        fp.resize(fp_len, 0);

        let pp_size = self.geometry.plastic_plastic_words(row.len());
        let mut pp = Vec::with_capacity(pp_size * BYTES_PER_WORD);
        pp.resize(self.geometry.header_bytes, 0);
        for connection in row {
            self.structure.encode_into(connection, &mut pp);
        }
        pp.resize(pp_size * BYTES_PER_WORD, 0);

        EncodedRow {
            fp,
            pp,
            fp_size: row.len(),
            pp_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::n_header_bytes;

    fn encoder(n_types: usize, pad: Option<usize>) -> PlasticRowEncoder {
        let slice = VertexSlice::new(0, 4).unwrap();
        PlasticRowEncoder::new(
            FixedPlasticLayout::new(n_types, &slice).unwrap(),
            RowGeometry {
                header_bytes: n_header_bytes(2),
                bytes_per_connection: 2,
                pad_to_length: pad,
            },
            SynapseStructure::WeightOnly,
            slice,
            1.0,
        )
    }

    #[test]
    fn test_connections_grouped_in_input_order() {
        let connections = [
            Connection::new(0, 1, 1.0, 1, 0),
            Connection::new(0, 2, 2.0, 1, 0),
            Connection::new(0, 3, 3.0, 1, 0),
        ];
        let rows = encoder(1, None).encode(&connections, &[1, 0, 1], 2).unwrap();
        assert_eq!(rows.fp_size, vec![1, 2]);
        // fraction 1.0, one synapse type: entry = (1 << 2) | target
        assert_eq!(&rows.fp_data[1][..4], &[0x05, 0x00, 0x07, 0x00]);
        assert_eq!(&rows.pp_data[1][8..12], &[1, 0, 3, 0]);
    }

    #[test]
    fn test_buffers_are_word_aligned() {
        let connections = [Connection::new(0, 0, 9.0, 2, 1)];
        let rows = encoder(2, None).encode(&connections, &[0], 1).unwrap();
        assert_eq!(rows.fp_data[0].len(), 4);
        assert_eq!(rows.pp_data[0].len(), 12);
        assert_eq!(rows.pp_size, vec![3]);
        assert!(rows.pp_data[0][..8].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_padding_appends_zeroes() {
        let connections = [Connection::new(0, 2, 5.0, 3, 0)];
        let rows = encoder(1, Some(4)).encode(&connections, &[0], 2).unwrap();
        assert_eq!(rows.fp_size, vec![1, 0]);
        assert_eq!(rows.fp_data[0].len(), 8);
        assert_eq!(rows.fp_data[1], vec![0; 8]);
        assert_eq!(rows.pp_size, vec![4, 4]);
        assert_eq!(rows.pp_data[0][8..10], [5, 0]);
        assert!(rows.pp_data[0][10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rejects_bad_connections_before_encoding() {
        let enc = encoder(2, None);
        let good = Connection::new(0, 1, 1.0, 1, 0);

        let err = enc
            .encode(&[good, Connection::new(0, 1, 1.0, 17, 0)], &[0, 0], 1)
            .unwrap_err();
        assert_eq!(err, StdpError::InvalidDelay { index: 1, delay: 17 });

        let err = enc.encode(&[Connection::new(0, 1, 1.0, 1, 2)], &[0], 1).unwrap_err();
        assert!(matches!(err, StdpError::InvalidSynapseType { synapse_type: 2, .. }));

        let err = enc.encode(&[Connection::new(0, 4, 1.0, 1, 0)], &[0], 1).unwrap_err();
        assert!(matches!(err, StdpError::TargetOutsideSlice { target: 4, .. }));

        let err = enc.encode(&[good], &[1], 1).unwrap_err();
        assert_eq!(err, StdpError::RowIndexOutOfRange { index: 0, row: 1, n_rows: 1 });

        let err = enc.encode(&[good], &[], 1).unwrap_err();
        assert!(matches!(err, StdpError::LengthMismatch { .. }));
    }
}
