// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Row size calculation
//!
//! Sizes here must agree bit for bit with what the encoder emits: the
//! encoder builds its buffers from the same [`RowGeometry`].

use tracing::trace;

use crate::layout::FIXED_PLASTIC_ENTRY_BYTES;

/// Bytes of the per-row timestamp at the start of the plastic-plastic header
pub const TIME_STAMP_BYTES: usize = 4;

pub const BYTES_PER_WORD: usize = 4;

#[inline]
pub(crate) fn round_up_to_word(n_bytes: usize) -> usize {
    n_bytes.div_ceil(BYTES_PER_WORD) * BYTES_PER_WORD
}

#[inline]
pub(crate) fn words_for_bytes(n_bytes: usize) -> usize {
    n_bytes.div_ceil(BYTES_PER_WORD)
}

/// Plastic-plastic header size for a timing rule with `pre_trace_n_bytes` of trace
///
/// ```
/// use synrow_stdp::sizing::n_header_bytes;
///
/// assert_eq!(n_header_bytes(0), 4);
/// assert_eq!(n_header_bytes(2), 8);
/// assert_eq!(n_header_bytes(4), 8);
/// ```
#[inline]
pub fn n_header_bytes(pre_trace_n_bytes: usize) -> usize {
    round_up_to_word(TIME_STAMP_BYTES + pre_trace_n_bytes)
}

/// Per-row byte costs shared by sizing and encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGeometry {
    pub header_bytes: usize,
    pub bytes_per_connection: usize,
    pub pad_to_length: Option<usize>,
}

impl RowGeometry {
    /// Entries a row with `n_connections` real connections is sized for
    #[inline]
    pub fn capacity(&self, n_connections: usize) -> usize {
        match self.pad_to_length {
            Some(pad) => n_connections.max(pad),
            None => n_connections,
        }
    }

    /// Fixed-plastic words for a row of `n_connections`; two entries per word
    #[inline]
    pub fn fixed_plastic_words(&self, n_connections: usize) -> usize {
        words_for_bytes(
            self.capacity(n_connections)
                .saturating_mul(FIXED_PLASTIC_ENTRY_BYTES),
        )
    }

    /// Plastic-plastic words for a row of `n_connections`, header included
    #[inline]
    pub fn plastic_plastic_words(&self, n_connections: usize) -> usize {
        words_for_bytes(
            self.capacity(n_connections)
                .saturating_mul(self.bytes_per_connection)
                .saturating_add(self.header_bytes),
        )
    }

    /// Total words for a row of `n_connections`
    #[inline]
    pub fn words_for_row(&self, n_connections: usize) -> usize {
        self.fixed_plastic_words(n_connections)
            .saturating_add(self.plastic_plastic_words(n_connections))
    }

    /// Largest connection count whose row fits in `n_words`
    ///
    /// Starts from the bound obtained by ignoring word alignment, then steps
    /// down until the row fits. Returns 0 if not even an empty row fits.
    pub fn max_connections(&self, n_words: usize) -> usize {
        let per_connection = self.bytes_per_connection + FIXED_PLASTIC_ENTRY_BYTES;
        let mut n = n_words
            .saturating_mul(BYTES_PER_WORD)
            .saturating_sub(self.header_bytes) / per_connection;
        while n > 0 && self.words_for_row(n) > n_words {
            n -= 1;
        }
        trace!(
            "[STDP-SIZE] budget of {} words holds {} connections",
            n_words,
            n
        );
        n
    }
}
