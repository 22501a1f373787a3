// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Timing dependence rules
//!
//! Only the structural contract of each rule lives here: how many bytes of
//! pre-synaptic trace the row header carries, how many weight terms the rule
//! feeds to the weight dependence, and which per-connection structure it
//! uses. The update mathematics runs on the target.

use synrow_config::TimingRuleConfig;

use super::SynapseStructure;
use crate::error::{Result, StdpError};
use crate::fixed::to_s1615;
use crate::parameters::StdpParameter;
use crate::sink::MemorySink;

/// Microseconds per millisecond, for converting time constants to timesteps
const MICROSECONDS_PER_MILLISECOND: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum TimingDependence {
    /// All-to-all pair rule with exponential windows (ms)
    SpikePair { tau_plus: f64, tau_minus: f64 },
    /// Nearest-neighbour pair rule; keeps no pre-synaptic trace in the row
    SpikeNearestPair { tau_plus: f64, tau_minus: f64 },
    /// Pfister & Gerstner triplet rule (ms); feeds two weight terms
    PfisterSpikeTriplet {
        tau_plus: f64,
        tau_minus: f64,
        tau_x: f64,
        tau_y: f64,
    },
    /// Recurrent stochastic rule with per-synapse accumulators
    Recurrent {
        accumulator_depression: i32,
        accumulator_potentiation: i32,
        mean_pre_window: f64,
        mean_post_window: f64,
    },
}

impl TimingDependence {
    /// Bytes of pre-synaptic trace stored in each row header
    pub fn pre_trace_n_bytes(&self) -> usize {
        match self {
            TimingDependence::SpikePair { .. } => 2,
            TimingDependence::SpikeNearestPair { .. } => 0,
            TimingDependence::PfisterSpikeTriplet { .. } => 4,
            TimingDependence::Recurrent { .. } => 2,
        }
    }

    /// Number of weight terms handed to the weight dependence
    pub fn n_weight_terms(&self) -> usize {
        match self {
            TimingDependence::PfisterSpikeTriplet { .. } => 2,
            _ => 1,
        }
    }

    pub fn synaptic_structure(&self) -> SynapseStructure {
        match self {
            TimingDependence::Recurrent { .. } => SynapseStructure::WeightAccumulator,
            _ => SynapseStructure::WeightOnly,
        }
    }

    pub fn vertex_executable_suffix(&self) -> &'static str {
        match self {
            TimingDependence::SpikePair { .. } => "pair",
            TimingDependence::SpikeNearestPair { .. } => "nearest_pair",
            TimingDependence::PfisterSpikeTriplet { .. } => "pfister_triplet",
            TimingDependence::Recurrent { .. } => "recurrent",
        }
    }

    /// Parameters owned by this rule, in parameter block order
    pub fn parameters(&self) -> &'static [StdpParameter] {
        use StdpParameter::*;
        match self {
            TimingDependence::SpikePair { .. } | TimingDependence::SpikeNearestPair { .. } => {
                &[TauPlus, TauMinus]
            }
            TimingDependence::PfisterSpikeTriplet { .. } => &[TauPlus, TauMinus, TauX, TauY],
            TimingDependence::Recurrent { .. } => &[
                AccumulatorDepression,
                AccumulatorPotentiation,
                MeanPreWindow,
                MeanPostWindow,
            ],
        }
    }

    pub fn parameter_names(&self) -> Vec<&'static str> {
        self.parameters().iter().map(StdpParameter::name).collect()
    }

    /// One word per parameter
    pub fn parameters_sdram_usage_in_bytes(&self) -> usize {
        self.parameters().len() * 4
    }

    pub fn get(&self, parameter: StdpParameter) -> Option<f64> {
        use StdpParameter::*;
        match (self, parameter) {
            (
                TimingDependence::SpikePair { tau_plus, .. }
                | TimingDependence::SpikeNearestPair { tau_plus, .. }
                | TimingDependence::PfisterSpikeTriplet { tau_plus, .. },
                TauPlus,
            ) => Some(*tau_plus),
            (
                TimingDependence::SpikePair { tau_minus, .. }
                | TimingDependence::SpikeNearestPair { tau_minus, .. }
                | TimingDependence::PfisterSpikeTriplet { tau_minus, .. },
                TauMinus,
            ) => Some(*tau_minus),
            (TimingDependence::PfisterSpikeTriplet { tau_x, .. }, TauX) => Some(*tau_x),
            (TimingDependence::PfisterSpikeTriplet { tau_y, .. }, TauY) => Some(*tau_y),
            (
                TimingDependence::Recurrent {
                    accumulator_depression,
                    ..
                },
                AccumulatorDepression,
            ) => Some(f64::from(*accumulator_depression)),
            (
                TimingDependence::Recurrent {
                    accumulator_potentiation,
                    ..
                },
                AccumulatorPotentiation,
            ) => Some(f64::from(*accumulator_potentiation)),
            (TimingDependence::Recurrent { mean_pre_window, .. }, MeanPreWindow) => {
                Some(*mean_pre_window)
            }
            (TimingDependence::Recurrent { mean_post_window, .. }, MeanPostWindow) => {
                Some(*mean_post_window)
            }
            _ => None,
        }
    }

    /// Set a parameter; returns `false` if this rule does not own it
    ///
    /// Accumulator thresholds are integers and are rounded.
    pub fn set(&mut self, parameter: StdpParameter, value: f64) -> bool {
        use StdpParameter::*;
        let slot: &mut f64 = match (self, parameter) {
            (
                TimingDependence::SpikePair { tau_plus, .. }
                | TimingDependence::SpikeNearestPair { tau_plus, .. }
                | TimingDependence::PfisterSpikeTriplet { tau_plus, .. },
                TauPlus,
            ) => tau_plus,
            (
                TimingDependence::SpikePair { tau_minus, .. }
                | TimingDependence::SpikeNearestPair { tau_minus, .. }
                | TimingDependence::PfisterSpikeTriplet { tau_minus, .. },
                TauMinus,
            ) => tau_minus,
            (TimingDependence::PfisterSpikeTriplet { tau_x, .. }, TauX) => tau_x,
            (TimingDependence::PfisterSpikeTriplet { tau_y, .. }, TauY) => tau_y,
            (TimingDependence::Recurrent { mean_pre_window, .. }, MeanPreWindow) => {
                mean_pre_window
            }
            (TimingDependence::Recurrent { mean_post_window, .. }, MeanPostWindow) => {
                mean_post_window
            }
            (
                TimingDependence::Recurrent {
                    accumulator_depression,
                    ..
                },
                AccumulatorDepression,
            ) => {
                *accumulator_depression = value.round() as i32;
                return true;
            }
            (
                TimingDependence::Recurrent {
                    accumulator_potentiation,
                    ..
                },
                AccumulatorPotentiation,
            ) => {
                *accumulator_potentiation = value.round() as i32;
                return true;
            }
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Write the rule's parameter block to the focused region
    ///
    /// Time constants are converted from milliseconds to timesteps and
    /// written as S16.15; accumulator thresholds are written as plain
    /// integers.
    pub fn write_parameters(
        &self,
        sink: &mut dyn MemorySink,
        machine_time_step_us: u32,
    ) -> Result<()> {
        if machine_time_step_us == 0 {
            return Err(StdpError::InvalidMachineTimeStep);
        }
        let timesteps_per_ms = MICROSECONDS_PER_MILLISECOND / f64::from(machine_time_step_us);
        for &parameter in self.parameters() {
            let value = self.get(parameter).unwrap_or_default();
            let word = match parameter {
                StdpParameter::AccumulatorDepression | StdpParameter::AccumulatorPotentiation => {
                    value as i32
                }
                _ => to_s1615(value * timesteps_per_ms),
            };
            sink.write_value(word)?;
        }
        Ok(())
    }
}

impl From<&TimingRuleConfig> for TimingDependence {
    fn from(config: &TimingRuleConfig) -> Self {
        match *config {
            TimingRuleConfig::SpikePair { tau_plus, tau_minus } => {
                TimingDependence::SpikePair { tau_plus, tau_minus }
            }
            TimingRuleConfig::SpikeNearestPair { tau_plus, tau_minus } => {
                TimingDependence::SpikeNearestPair { tau_plus, tau_minus }
            }
            TimingRuleConfig::PfisterSpikeTriplet {
                tau_plus,
                tau_minus,
                tau_x,
                tau_y,
            } => TimingDependence::PfisterSpikeTriplet {
                tau_plus,
                tau_minus,
                tau_x,
                tau_y,
            },
            TimingRuleConfig::Recurrent {
                accumulator_depression,
                accumulator_potentiation,
                mean_pre_window,
                mean_post_window,
            } => TimingDependence::Recurrent {
                accumulator_depression,
                accumulator_potentiation,
                mean_pre_window,
                mean_post_window,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::S1615_ONE;
    use crate::sink::RegionImage;

    fn pair() -> TimingDependence {
        TimingDependence::SpikePair {
            tau_plus: 20.0,
            tau_minus: 10.0,
        }
    }

    fn recurrent() -> TimingDependence {
        TimingDependence::Recurrent {
            accumulator_depression: -6,
            accumulator_potentiation: 6,
            mean_pre_window: 35.0,
            mean_post_window: 35.0,
        }
    }

    #[test]
    fn test_structural_contract() {
        assert_eq!(pair().pre_trace_n_bytes(), 2);
        assert_eq!(pair().n_weight_terms(), 1);
        assert_eq!(pair().synaptic_structure(), SynapseStructure::WeightOnly);

        let nearest = TimingDependence::SpikeNearestPair {
            tau_plus: 20.0,
            tau_minus: 20.0,
        };
        assert_eq!(nearest.pre_trace_n_bytes(), 0);

        let triplet = TimingDependence::PfisterSpikeTriplet {
            tau_plus: 16.8,
            tau_minus: 33.7,
            tau_x: 101.0,
            tau_y: 125.0,
        };
        assert_eq!(triplet.pre_trace_n_bytes(), 4);
        assert_eq!(triplet.n_weight_terms(), 2);

        assert_eq!(
            recurrent().synaptic_structure(),
            SynapseStructure::WeightAccumulator
        );
    }

    #[test]
    fn test_get_and_set() {
        let mut rule = pair();
        assert_eq!(rule.get(StdpParameter::TauPlus), Some(20.0));
        assert_eq!(rule.get(StdpParameter::TauX), None);
        assert!(rule.set(StdpParameter::TauMinus, 12.5));
        assert_eq!(rule.get(StdpParameter::TauMinus), Some(12.5));
        assert!(!rule.set(StdpParameter::WMax, 1.0));

        let mut rule = recurrent();
        assert!(rule.set(StdpParameter::AccumulatorPotentiation, 3.6));
        assert_eq!(rule.get(StdpParameter::AccumulatorPotentiation), Some(4.0));
    }

    #[test]
    fn test_parameter_block() {
        let mut image = RegionImage::new();
        image.switch_write_focus(1);
        // 1 ms timestep: time constants pass through unchanged
        pair().write_parameters(&mut image, 1000).unwrap();
        assert_eq!(
            image.region_words(1),
            vec![(20 * S1615_ONE) as u32, (10 * S1615_ONE) as u32]
        );

        let mut image = RegionImage::new();
        image.switch_write_focus(1);
        // 0.1 ms timestep: ten steps per millisecond
        recurrent().write_parameters(&mut image, 100).unwrap();
        let words = image.region_words(1);
        assert_eq!(words.len() * 4, recurrent().parameters_sdram_usage_in_bytes());
        assert_eq!(words[0] as i32, -6);
        assert_eq!(words[1] as i32, 6);
        assert_eq!(words[2] as i32, 350 * S1615_ONE);
    }

    #[test]
    fn test_from_config() {
        let rule = TimingDependence::from(&TimingRuleConfig::default());
        assert_eq!(
            rule,
            TimingDependence::SpikePair {
                tau_plus: 20.0,
                tau_minus: 20.0
            }
        );
    }
}
