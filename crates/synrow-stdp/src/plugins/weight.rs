// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight dependence rules

use synrow_config::WeightRuleConfig;

use crate::error::{Result, StdpError};
use crate::parameters::StdpParameter;
use crate::sink::MemorySink;

#[derive(Debug, Clone, PartialEq)]
pub enum WeightDependence {
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
    /// Additive rule with second-order terms for triplet timing rules
    AdditiveTriplet {
        w_min: f64,
        w_max: f64,
        a_plus: f64,
        a_minus: f64,
        a3_plus: f64,
        a3_minus: f64,
    },
}

impl WeightDependence {
    /// Number of weight terms this rule consumes per update
    pub fn n_weight_terms(&self) -> usize {
        match self {
            WeightDependence::AdditiveTriplet { .. } => 2,
            _ => 1,
        }
    }

    /// Whether this rule can consume `n_weight_terms` from a timing rule
    pub fn accepts_weight_terms(&self, n_weight_terms: usize) -> bool {
        self.n_weight_terms() == n_weight_terms
    }

    pub fn weight_maximum(&self) -> f64 {
        match self {
            WeightDependence::Additive { w_max, .. }
            | WeightDependence::Multiplicative { w_max, .. }
            | WeightDependence::AdditiveTriplet { w_max, .. } => *w_max,
        }
    }

    pub fn vertex_executable_suffix(&self) -> &'static str {
        match self {
            WeightDependence::Additive { .. } => "additive",
            WeightDependence::Multiplicative { .. } => "multiplicative",
            WeightDependence::AdditiveTriplet { .. } => "additive_triplet",
        }
    }

    /// Rule name as reported in configuration errors
    pub fn name(&self) -> &'static str {
        self.vertex_executable_suffix()
    }

    /// Parameters owned by this rule, in parameter block order
    pub fn parameters(&self) -> &'static [StdpParameter] {
        use StdpParameter::*;
        match self {
            WeightDependence::Additive { .. } | WeightDependence::Multiplicative { .. } => {
                &[WMin, WMax, APlus, AMinus]
            }
            WeightDependence::AdditiveTriplet { .. } => {
                &[WMin, WMax, APlus, AMinus, A3Plus, A3Minus]
            }
        }
    }

    pub fn parameter_names(&self) -> Vec<&'static str> {
        self.parameters().iter().map(StdpParameter::name).collect()
    }

    /// One word per parameter per synapse type
    pub fn parameters_sdram_usage_in_bytes(&self, n_synapse_types: usize) -> usize {
        n_synapse_types * self.parameters().len() * 4
    }

    pub fn get(&self, parameter: StdpParameter) -> Option<f64> {
        use StdpParameter::*;
        let (w_min, w_max, a_plus, a_minus, a3) = self.fields();
        match parameter {
            WMin => Some(w_min),
            WMax => Some(w_max),
            APlus => Some(a_plus),
            AMinus => Some(a_minus),
            A3Plus => a3.map(|(plus, _)| plus),
            A3Minus => a3.map(|(_, minus)| minus),
            _ => None,
        }
    }

    /// Set a parameter; returns `false` if this rule does not own it
    pub fn set(&mut self, parameter: StdpParameter, value: f64) -> bool {
        use StdpParameter::*;
        let slot = match (self, parameter) {
            (
                WeightDependence::Additive { w_min, .. }
                | WeightDependence::Multiplicative { w_min, .. }
                | WeightDependence::AdditiveTriplet { w_min, .. },
                WMin,
            ) => w_min,
            (
                WeightDependence::Additive { w_max, .. }
                | WeightDependence::Multiplicative { w_max, .. }
                | WeightDependence::AdditiveTriplet { w_max, .. },
                WMax,
            ) => w_max,
            (
                WeightDependence::Additive { a_plus, .. }
                | WeightDependence::Multiplicative { a_plus, .. }
                | WeightDependence::AdditiveTriplet { a_plus, .. },
                APlus,
            ) => a_plus,
            (
                WeightDependence::Additive { a_minus, .. }
                | WeightDependence::Multiplicative { a_minus, .. }
                | WeightDependence::AdditiveTriplet { a_minus, .. },
                AMinus,
            ) => a_minus,
            (WeightDependence::AdditiveTriplet { a3_plus, .. }, A3Plus) => a3_plus,
            (WeightDependence::AdditiveTriplet { a3_minus, .. }, A3Minus) => a3_minus,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Write one parameter block per synapse type
    ///
    /// Each parameter is multiplied by the synapse type's weight scale and
    /// rounded to a signed word.
    pub fn write_parameters(&self, sink: &mut dyn MemorySink, weight_scales: &[f64]) -> Result<()> {
        if weight_scales.is_empty() {
            return Err(StdpError::InvalidSynapseTypeCount(0));
        }
        for &scale in weight_scales {
            for &parameter in self.parameters() {
                let value = self.get(parameter).unwrap_or_default();
                sink.write_value((value * scale).round() as i32)?;
            }
        }
        Ok(())
    }

    fn fields(&self) -> (f64, f64, f64, f64, Option<(f64, f64)>) {
        match *self {
            WeightDependence::Additive {
                w_min,
                w_max,
                a_plus,
                a_minus,
            }
            | WeightDependence::Multiplicative {
                w_min,
                w_max,
                a_plus,
                a_minus,
            } => (w_min, w_max, a_plus, a_minus, None),
            WeightDependence::AdditiveTriplet {
                w_min,
                w_max,
                a_plus,
                a_minus,
                a3_plus,
                a3_minus,
            } => (w_min, w_max, a_plus, a_minus, Some((a3_plus, a3_minus))),
        }
    }
}

impl From<&WeightRuleConfig> for WeightDependence {
    fn from(config: &WeightRuleConfig) -> Self {
        match *config {
            WeightRuleConfig::Additive {
                w_min,
                w_max,
                a_plus,
                a_minus,
            } => WeightDependence::Additive {
                w_min,
                w_max,
                a_plus,
                a_minus,
            },
            WeightRuleConfig::Multiplicative {
                w_min,
                w_max,
                a_plus,
                a_minus,
            } => WeightDependence::Multiplicative {
                w_min,
                w_max,
                a_plus,
                a_minus,
            },
            WeightRuleConfig::AdditiveTriplet {
                w_min,
                w_max,
                a_plus,
                a_minus,
                a3_plus,
                a3_minus,
            } => WeightDependence::AdditiveTriplet {
                w_min,
                w_max,
                a_plus,
                a_minus,
                a3_plus,
                a3_minus,
            },
        }
    }
}
