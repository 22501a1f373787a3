// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `synrow.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynrowConfig {
    pub dynamics: DynamicsConfig,
    pub logging: LoggingConfig,
}

/// STDP synapse dynamics configuration
///
/// `timing` and `weight` are `None` when a `[dynamics]` table omits them, so
/// that a missing rule is reported by validation instead of as a TOML parse
/// error. The programmatic default carries a complete rule pair.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DynamicsConfig {
    pub dendritic_delay_fraction: f64,
    pub pad_to_length: Option<usize>,
    #[serde(default)]
    pub timing: Option<TimingRuleConfig>,
    #[serde(default)]
    pub weight: Option<WeightRuleConfig>,
    /// Name of a voltage dependence rule. None are supported; any value is rejected.
    pub voltage_dependence: Option<String>,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            dendritic_delay_fraction: 1.0,
            pad_to_length: None,
            timing: Some(TimingRuleConfig::default()),
            weight: Some(WeightRuleConfig::default()),
            voltage_dependence: None,
        }
    }
}

/// Timing dependence rule selection (`rule = "..."` in TOML)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TimingRuleConfig {
    SpikePair {
        tau_plus: f64,
        tau_minus: f64,
    },
    SpikeNearestPair {
        tau_plus: f64,
        tau_minus: f64,
    },
    PfisterSpikeTriplet {
        tau_plus: f64,
        tau_minus: f64,
        tau_x: f64,
        tau_y: f64,
    },
    Recurrent {
        accumulator_depression: i32,
        accumulator_potentiation: i32,
        mean_pre_window: f64,
        mean_post_window: f64,
    },
}

impl Default for TimingRuleConfig {
    fn default() -> Self {
        Self::SpikePair {
            tau_plus: 20.0,
            tau_minus: 20.0,
        }
    }
}

/// Weight dependence rule selection (`rule = "..."` in TOML)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum WeightRuleConfig {
    Additive {
        w_min: f64,
        w_max: f64,
        a_plus: f64,
        a_minus: f64,
    },
    Multiplicative {
        w_min: f64,
        w_max: f64,
        a_plus: f64,
        a_minus: f64,
    },
    AdditiveTriplet {
        w_min: f64,
        w_max: f64,
        a_plus: f64,
        a_minus: f64,
        a3_plus: f64,
        a3_minus: f64,
    },
}

impl Default for WeightRuleConfig {
    fn default() -> Self {
        Self::Additive {
            w_min: 0.0,
            w_max: 1.0,
            a_plus: 0.01,
            a_minus: 0.01,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Crates that log at debug level regardless of `level`
    pub debug_crates: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            debug_crates: Vec::new(),
        }
    }
}
