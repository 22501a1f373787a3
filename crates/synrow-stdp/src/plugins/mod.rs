// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # STDP Rule Plug-ins
//!
//! The row codec depends on three capability providers:
//! - **Timing dependence**: pre-trace size, weight term count, and the
//!   synaptic structure used for the plastic-plastic section
//! - **Weight dependence**: weight bounds and the weight parameter block
//! - **Synaptic structure**: per-connection byte cost plus encode/decode of
//!   the per-connection plastic state
//!
//! Each is a closed enum; every variant implements the same method set.
//!
//! ## Adding a New Rule
//!
//! 1. Add a variant to the relevant enum
//! 2. Fill in each `match` (the compiler lists them)
//! 3. Add the matching variant to `synrow_config` and its `From` impl
//! 4. Add tests

pub mod structure;
pub mod timing;
pub mod weight;

pub use structure::SynapseStructure;
pub use timing::TimingDependence;
pub use weight::WeightDependence;

/// A requested voltage dependence rule
///
/// None are implemented for the STDP row format; passing one to
/// [`crate::SynapseDynamicsStdp::new`] is a configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoltageDependence {
    name: String,
}

impl VoltageDependence {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
