// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Encoded row buffers

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::sizing::BYTES_PER_WORD;

/// Little-endian words of `bytes`; a trailing partial word is zero-filled
pub fn bytes_to_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(BYTES_PER_WORD)
        .map(|chunk| {
            let mut word = [0u8; BYTES_PER_WORD];
            word[..chunk.len()].copy_from_slice(chunk);
            LittleEndian::read_u32(&word)
        })
        .collect()
}

/// Encoded plastic rows, one entry per row in every field
///
/// Byte vectors are padded to whole words. `fp_size` is the number of live
/// fixed-plastic entries in each row (padding excluded); `pp_size` is the
/// plastic-plastic section length in words (padding included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlasticRows {
    pub fp_data: Vec<Vec<u8>>,
    pub pp_data: Vec<Vec<u8>>,
    pub fp_size: Vec<usize>,
    pub pp_size: Vec<usize>,
}

impl PlasticRows {
    pub fn n_rows(&self) -> usize {
        self.fp_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fp_size.is_empty()
    }

    /// Total live connections across all rows
    pub fn n_connections(&self) -> usize {
        self.fp_size.iter().sum()
    }

    /// Fixed-plastic section of `row` as words, two entries per word
    pub fn fp_words(&self, row: usize) -> Option<Vec<u32>> {
        self.fp_data.get(row).map(|bytes| bytes_to_words(bytes))
    }

    /// Plastic-plastic section of `row` as words, header first
    pub fn pp_words(&self, row: usize) -> Option<Vec<u32>> {
        self.pp_data.get(row).map(|bytes| bytes_to_words(bytes))
    }
}
