// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for STDP row codec operations

use synrow_config::ConfigError;
use thiserror::Error;

/// Errors raised while configuring the dynamics object or encoding/decoding rows
///
/// Configuration errors come from [`crate::SynapseDynamicsStdp`] construction.
/// Everything else is a caller contract violation detected before any output
/// is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StdpError {
    #[error("dendritic_delay_fraction must be in the interval [0.5, 1.0], got {0}")]
    InvalidDendriticDelayFraction(f64),

    #[error("a timing dependence must be specified")]
    MissingTimingDependence,

    #[error("a weight dependence must be specified")]
    MissingWeightDependence,

    #[error("voltage dependence '{0}' has not been implemented")]
    UnsupportedVoltageDependence(String),

    #[error("weight dependence '{weight_rule}' cannot consume {n_weight_terms} weight term(s)")]
    IncompatibleWeightTerms {
        weight_rule: &'static str,
        n_weight_terms: usize,
    },

    #[error("number of synapse types must be at least 1, got {0}")]
    InvalidSynapseTypeCount(usize),

    #[error("vertex slice must contain at least one atom")]
    EmptyVertexSlice,

    #[error("vertex slice of {n_atoms} atoms starting at {lo_atom} ends past u32::MAX")]
    VertexSliceOverflow { lo_atom: u32, n_atoms: u32 },

    #[error(
        "{n_synapse_type_bits} synapse type bit(s) and {n_neuron_id_bits} neuron id bit(s) do not fit beside the dendritic delay field of a 16-bit entry"
    )]
    LayoutOverflow {
        n_synapse_type_bits: u32,
        n_neuron_id_bits: u32,
    },

    #[error("connection {index}: delay {delay} is outside 1..=16 timesteps")]
    InvalidDelay { index: usize, delay: u32 },

    #[error("connection {index}: synapse type {synapse_type} is not below {n_synapse_types}")]
    InvalidSynapseType {
        index: usize,
        synapse_type: u8,
        n_synapse_types: usize,
    },

    #[error("connection {index}: target {target} is outside slice [{lo_atom}, {lo_atom} + {n_atoms})")]
    TargetOutsideSlice {
        index: usize,
        target: u32,
        lo_atom: u32,
        n_atoms: u32,
    },

    #[error("connection {index}: row {row} is not below n_rows = {n_rows}")]
    RowIndexOutOfRange {
        index: usize,
        row: usize,
        n_rows: usize,
    },

    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: {what} expected {expected} bytes, got {actual}")]
    RowShapeMismatch {
        row: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown STDP parameter '{0}'")]
    UnknownParameter(String),

    #[error("parameter '{0}' is not owned by the configured rules")]
    ParameterNotOwned(&'static str),

    #[error("machine time step must be positive")]
    InvalidMachineTimeStep,

    #[error("no write focus: switch_write_focus must be called before writing")]
    NoWriteFocus,

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for StdpError {
    fn from(err: ConfigError) -> Self {
        StdpError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StdpError>;
