// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Memory sink for parameter blocks
//!
//! The row codec itself only returns byte buffers. Parameter blocks for the
//! timing and weight rules are written through a [`MemorySink`], which owns
//! region placement.

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, StdpError};

/// Scoped write target: select a region, then append words to it
pub trait MemorySink {
    /// Annotate the output; sinks without a comment channel ignore it
    fn comment(&mut self, _text: &str) {}

    /// Direct subsequent writes to `region`
    fn switch_write_focus(&mut self, region: u32);

    /// Append raw words to the focused region
    fn write_words(&mut self, words: &[u32]) -> Result<()>;

    /// Append one signed word to the focused region
    fn write_value(&mut self, value: i32) -> Result<()> {
        self.write_words(&[value as u32])
    }
}

/// In-memory sink holding one little-endian byte image per region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionImage {
    regions: BTreeMap<u32, Vec<u8>>,
    focus: Option<u32>,
    comments: Vec<String>,
}

impl RegionImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written to `region`, if it was ever focused
    pub fn region_bytes(&self, region: u32) -> Option<&[u8]> {
        self.regions.get(&region).map(Vec::as_slice)
    }

    /// Words written to `region` (empty if never focused)
    pub fn region_words(&self, region: u32) -> Vec<u32> {
        self.region_bytes(region)
            .map(crate::rows::bytes_to_words)
            .unwrap_or_default()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn focus(&self) -> Option<u32> {
        self.focus
    }
}

impl MemorySink for RegionImage {
    fn comment(&mut self, text: &str) {
        self.comments.push(text.to_string());
    }

    fn switch_write_focus(&mut self, region: u32) {
        self.regions.entry(region).or_default();
        self.focus = Some(region);
    }

    fn write_words(&mut self, words: &[u32]) -> Result<()> {
        let region = self.focus.ok_or(StdpError::NoWriteFocus)?;
        let bytes = self.regions.entry(region).or_default();
        let start = bytes.len();
        bytes.resize(start + words.len() * 4, 0);
        LittleEndian::write_u32_into(words, &mut bytes[start..]);
        Ok(())
    }
}
