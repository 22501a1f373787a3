// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! STDP synapse dynamics
//!
//! [`SynapseDynamicsStdp`] owns the validated configuration (timing rule,
//! weight rule, dendritic delay fraction, pad length) and hands out the
//! sizing, encoding and decoding operations that depend on it. Rows are
//! never stored here.

use std::path::Path;

use synrow_config::DynamicsConfig;
use tracing::{debug, info};

use crate::connection::{Connection, VertexSlice};
use crate::decoder::PlasticRowDecoder;
use crate::delay::validate_dendritic_delay_fraction;
use crate::encoder::PlasticRowEncoder;
use crate::error::{Result, StdpError};
use crate::layout::FixedPlasticLayout;
use crate::parameters::StdpParameter;
use crate::plugins::{SynapseStructure, TimingDependence, VoltageDependence, WeightDependence};
use crate::rows::PlasticRows;
use crate::sizing::{n_header_bytes, words_for_bytes, RowGeometry};
use crate::sink::MemorySink;

/// Per-connection parameters that are not owned by either rule
const CONNECTION_PARAMETER_NAMES: [&str; 2] = ["weight", "delay"];

#[derive(Debug, Clone, PartialEq)]
pub struct SynapseDynamicsStdp {
    timing: TimingDependence,
    weight: WeightDependence,
    dendritic_delay_fraction: f64,
    pad_to_length: Option<usize>,
    change_requires_mapping: bool,
}

impl SynapseDynamicsStdp {
    /// Create the dynamics from its rules
    ///
    /// # Errors
    /// - [`StdpError::InvalidDendriticDelayFraction`] outside `[0.5, 1.0]`
    /// - [`StdpError::MissingTimingDependence`] / [`StdpError::MissingWeightDependence`]
    /// - [`StdpError::UnsupportedVoltageDependence`] for any voltage rule
    /// - [`StdpError::IncompatibleWeightTerms`] if the weight rule cannot
    ///   consume the timing rule's weight terms
    pub fn new(
        timing: Option<TimingDependence>,
        weight: Option<WeightDependence>,
        voltage: Option<VoltageDependence>,
        dendritic_delay_fraction: f64,
        pad_to_length: Option<usize>,
    ) -> Result<Self> {
        let dendritic_delay_fraction = validate_dendritic_delay_fraction(dendritic_delay_fraction)?;
        let timing = timing.ok_or(StdpError::MissingTimingDependence)?;
        let weight = weight.ok_or(StdpError::MissingWeightDependence)?;
        if let Some(voltage) = voltage {
            return Err(StdpError::UnsupportedVoltageDependence(voltage.name().to_string()));
        }
        let n_weight_terms = timing.n_weight_terms();
        if !weight.accepts_weight_terms(n_weight_terms) {
            return Err(StdpError::IncompatibleWeightTerms {
                weight_rule: weight.name(),
                n_weight_terms,
            });
        }

        let dynamics = Self {
            timing,
            weight,
            dendritic_delay_fraction,
            pad_to_length,
            change_requires_mapping: true,
        };
        debug!(
            "[STDP-DYNAMICS] Created {} (fraction {}, pad {:?})",
            dynamics.vertex_executable_suffix(),
            dendritic_delay_fraction,
            pad_to_length
        );
        Ok(dynamics)
    }

    /// Build from a `[dynamics]` configuration section
    pub fn from_config(config: &DynamicsConfig) -> Result<Self> {
        Self::new(
            config.timing.as_ref().map(TimingDependence::from),
            config.weight.as_ref().map(WeightDependence::from),
            config.voltage_dependence.as_deref().map(VoltageDependence::new),
            config.dendritic_delay_fraction,
            config.pad_to_length,
        )
    }

    /// Load `synrow.toml` (or the file at `path`) and build from its `[dynamics]` section
    pub fn from_config_file(path: Option<&Path>) -> Result<Self> {
        let config = synrow_config::load_config(path, None)?;
        let dynamics = Self::from_config(&config.dynamics)?;
        info!(
            "[STDP-DYNAMICS] Loaded {} from configuration",
            dynamics.vertex_executable_suffix()
        );
        Ok(dynamics)
    }

    pub fn timing_dependence(&self) -> &TimingDependence {
        &self.timing
    }

    pub fn weight_dependence(&self) -> &WeightDependence {
        &self.weight
    }

    pub fn dendritic_delay_fraction(&self) -> f64 {
        self.dendritic_delay_fraction
    }

    /// Change the dendritic delay fraction; the range check still applies
    pub fn set_dendritic_delay_fraction(&mut self, fraction: f64) -> Result<()> {
        self.dendritic_delay_fraction = validate_dendritic_delay_fraction(fraction)?;
        self.change_requires_mapping = true;
        Ok(())
    }

    pub fn pad_to_length(&self) -> Option<usize> {
        self.pad_to_length
    }

    /// True on creation and after any parameter change until [`Self::mark_no_changes`]
    pub fn requires_mapping(&self) -> bool {
        self.change_requires_mapping
    }

    pub fn mark_no_changes(&mut self) {
        self.change_requires_mapping = false;
    }

    /// Same rules and delay fraction; pad length is not compared
    pub fn is_same_as(&self, other: &SynapseDynamicsStdp) -> bool {
        self.timing == other.timing
            && self.weight == other.weight
            && self.dendritic_delay_fraction == other.dendritic_delay_fraction
    }

    pub fn are_weights_signed(&self) -> bool {
        false
    }

    pub fn vertex_executable_suffix(&self) -> String {
        format!(
            "_stdp_mad_{}_{}",
            self.timing.vertex_executable_suffix(),
            self.weight.vertex_executable_suffix()
        )
    }

    pub fn synapse_structure(&self) -> SynapseStructure {
        self.timing.synaptic_structure()
    }

    // ======================================================================
    // Parameter blocks
    // ======================================================================

    pub fn parameters_sdram_usage_in_bytes(&self, n_synapse_types: usize) -> usize {
        self.timing.parameters_sdram_usage_in_bytes()
            + self.weight.parameters_sdram_usage_in_bytes(n_synapse_types)
    }

    /// Write the timing block then one weight block per entry of `weight_scales`
    pub fn write_parameters(
        &self,
        sink: &mut dyn MemorySink,
        region: u32,
        machine_time_step_us: u32,
        weight_scales: &[f64],
    ) -> Result<()> {
        if machine_time_step_us == 0 {
            return Err(StdpError::InvalidMachineTimeStep);
        }
        if weight_scales.is_empty() {
            return Err(StdpError::InvalidSynapseTypeCount(0));
        }
        sink.comment("Writing Plastic Parameters");
        sink.switch_write_focus(region);
        self.timing.write_parameters(sink, machine_time_step_us)?;
        self.weight.write_parameters(sink, weight_scales)?;
        debug!(
            "[STDP-DYNAMICS] Wrote {} parameter bytes to region {}",
            self.parameters_sdram_usage_in_bytes(weight_scales.len()),
            region
        );
        Ok(())
    }

    // ======================================================================
    // Row sizing
    // ======================================================================

    /// Word-aligned header: timestamp plus the timing rule's pre-trace
    pub fn n_header_bytes(&self) -> usize {
        n_header_bytes(self.timing.pre_trace_n_bytes())
    }

    pub fn row_geometry(&self) -> RowGeometry {
        RowGeometry {
            header_bytes: self.n_header_bytes(),
            bytes_per_connection: self.synapse_structure().bytes_per_connection(),
            pad_to_length: self.pad_to_length,
        }
    }

    pub fn n_words_for_plastic_connections(&self, n_connections: usize) -> usize {
        self.row_geometry().words_for_row(n_connections)
    }

    /// Largest connection count whose row fits in `n_words`
    pub fn max_synapses(&self, n_words: usize) -> usize {
        self.row_geometry().max_connections(n_words)
    }

    /// `fp_size` counts half-words
    pub fn n_fixed_plastic_words_per_row(&self, fp_size: usize) -> usize {
        words_for_bytes(fp_size * 2)
    }

    /// `pp_size` is already in words
    pub fn n_plastic_plastic_words_per_row(&self, pp_size: usize) -> usize {
        pp_size
    }

    pub fn n_synapses_in_rows(&self, _pp_size: usize, fp_size: usize) -> usize {
        fp_size
    }

    // ======================================================================
    // Row codec
    // ======================================================================

    pub fn row_encoder(
        &self,
        post_vertex_slice: &VertexSlice,
        n_synapse_types: usize,
    ) -> Result<PlasticRowEncoder> {
        Ok(PlasticRowEncoder::new(
            FixedPlasticLayout::new(n_synapse_types, post_vertex_slice)?,
            self.row_geometry(),
            self.synapse_structure(),
            *post_vertex_slice,
            self.dendritic_delay_fraction,
        ))
    }

    pub fn row_decoder(
        &self,
        post_vertex_slice: &VertexSlice,
        n_synapse_types: usize,
    ) -> Result<PlasticRowDecoder> {
        Ok(PlasticRowDecoder::new(
            FixedPlasticLayout::new(n_synapse_types, post_vertex_slice)?,
            self.n_header_bytes(),
            self.synapse_structure(),
            *post_vertex_slice,
        ))
    }

    /// Encode `connections` into `n_rows` plastic rows
    pub fn get_plastic_synaptic_data(
        &self,
        connections: &[Connection],
        connection_row_indices: &[usize],
        n_rows: usize,
        post_vertex_slice: &VertexSlice,
        n_synapse_types: usize,
    ) -> Result<PlasticRows> {
        self.row_encoder(post_vertex_slice, n_synapse_types)?
            .encode(connections, connection_row_indices, n_rows)
    }

    /// Decode connections from plastic rows encoded for the same slice and type count
    pub fn read_plastic_synaptic_data(
        &self,
        post_vertex_slice: &VertexSlice,
        n_synapse_types: usize,
        rows: &PlasticRows,
    ) -> Result<Vec<Connection>> {
        self.row_decoder(post_vertex_slice, n_synapse_types)?.decode(rows)
    }

    // ======================================================================
    // Weight statistics
    // ======================================================================

    /// Weights may all grow to the maximum, so the mean used for scaling is the maximum
    pub fn weight_mean(&self) -> f64 {
        self.weight.weight_maximum()
    }

    pub fn weight_variance(&self) -> f64 {
        0.0
    }

    pub fn weight_maximum(&self) -> f64 {
        self.weight.weight_maximum()
    }

    // ======================================================================
    // Parameter access
    // ======================================================================

    pub fn parameter_names(&self) -> Vec<&'static str> {
        let mut names = CONNECTION_PARAMETER_NAMES.to_vec();
        names.extend(self.timing.parameter_names());
        names.extend(self.weight.parameter_names());
        names
    }

    /// Look a parameter up in the timing rule, then the weight rule, then here
    pub fn get_value(&self, parameter: StdpParameter) -> Result<f64> {
        self.timing
            .get(parameter)
            .or_else(|| self.weight.get(parameter))
            .or(match parameter {
                StdpParameter::DendriticDelayFraction => Some(self.dendritic_delay_fraction),
                _ => None,
            })
            .ok_or(StdpError::ParameterNotOwned(parameter.name()))
    }

    /// Set a parameter on whichever of timing rule, weight rule or self owns it
    pub fn set_value(&mut self, parameter: StdpParameter, value: f64) -> Result<()> {
        if self.timing.set(parameter, value) || self.weight.set(parameter, value) {
            self.change_requires_mapping = true;
            return Ok(());
        }
        match parameter {
            StdpParameter::DendriticDelayFraction => self.set_dendritic_delay_fraction(value),
            _ => Err(StdpError::ParameterNotOwned(parameter.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TimingDependence {
        TimingDependence::SpikePair {
            tau_plus: 20.0,
            tau_minus: 20.0,
        }
    }

    fn additive() -> WeightDependence {
        WeightDependence::Additive {
            w_min: 0.0,
            w_max: 2.5,
            a_plus: 0.1,
            a_minus: 0.1,
        }
    }

    fn dynamics() -> SynapseDynamicsStdp {
        SynapseDynamicsStdp::new(Some(pair()), Some(additive()), None, 1.0, None).unwrap()
    }

    #[test]
    fn test_construction_checks() {
        for fraction in [0.49, 1.01, f64::NAN] {
            let err = SynapseDynamicsStdp::new(Some(pair()), Some(additive()), None, fraction, None)
                .unwrap_err();
            assert!(matches!(err, StdpError::InvalidDendriticDelayFraction(_)));
        }
        assert_eq!(
            SynapseDynamicsStdp::new(None, Some(additive()), None, 1.0, None).unwrap_err(),
            StdpError::MissingTimingDependence
        );
        assert_eq!(
            SynapseDynamicsStdp::new(Some(pair()), None, None, 1.0, None).unwrap_err(),
            StdpError::MissingWeightDependence
        );
        assert_eq!(
            SynapseDynamicsStdp::new(
                Some(pair()),
                Some(additive()),
                Some(VoltageDependence::new("clopath")),
                1.0,
                None
            )
            .unwrap_err(),
            StdpError::UnsupportedVoltageDependence("clopath".to_string())
        );

        let triplet = TimingDependence::PfisterSpikeTriplet {
            tau_plus: 16.8,
            tau_minus: 33.7,
            tau_x: 101.0,
            tau_y: 125.0,
        };
        assert_eq!(
            SynapseDynamicsStdp::new(Some(triplet), Some(additive()), None, 1.0, None).unwrap_err(),
            StdpError::IncompatibleWeightTerms {
                weight_rule: "additive",
                n_weight_terms: 2
            }
        );
    }

    #[test]
    fn test_rule_metadata() {
        let d = dynamics();
        assert_eq!(d.vertex_executable_suffix(), "_stdp_mad_pair_additive");
        assert!(!d.are_weights_signed());
        assert_eq!(d.n_header_bytes(), 8);
        assert_eq!(d.weight_mean(), 2.5);
        assert_eq!(d.weight_maximum(), 2.5);
        assert_eq!(d.weight_variance(), 0.0);
        assert_eq!(d.parameters_sdram_usage_in_bytes(2), 8 + 32);
        assert_eq!(
            d.parameter_names(),
            vec!["weight", "delay", "tau_plus", "tau_minus", "w_min", "w_max", "A_plus", "A_minus"]
        );
    }

    #[test]
    fn test_row_helpers() {
        let d = dynamics();
        assert_eq!(d.n_fixed_plastic_words_per_row(0), 0);
        assert_eq!(d.n_fixed_plastic_words_per_row(3), 2);
        assert_eq!(d.n_plastic_plastic_words_per_row(7), 7);
        assert_eq!(d.n_synapses_in_rows(7, 3), 3);
    }

    #[test]
    fn test_requires_mapping_tracks_changes() {
        let mut d = dynamics();
        assert!(d.requires_mapping());
        d.mark_no_changes();
        assert!(!d.requires_mapping());

        d.set_value(StdpParameter::TauPlus, 15.0).unwrap();
        assert!(d.requires_mapping());
        assert_eq!(d.get_value(StdpParameter::TauPlus).unwrap(), 15.0);

        d.mark_no_changes();
        d.set_value(StdpParameter::WMax, 5.0).unwrap();
        assert!(d.requires_mapping());
        assert_eq!(d.weight_maximum(), 5.0);
    }

    #[test]
    fn test_parameter_lookup_order_and_ownership() {
        let mut d = dynamics();
        assert_eq!(d.get_value(StdpParameter::DendriticDelayFraction).unwrap(), 1.0);
        d.set_value(StdpParameter::DendriticDelayFraction, 0.75).unwrap();
        assert_eq!(d.dendritic_delay_fraction(), 0.75);

        assert_eq!(
            d.set_value(StdpParameter::DendriticDelayFraction, 0.2),
            Err(StdpError::InvalidDendriticDelayFraction(0.2))
        );
        assert_eq!(d.dendritic_delay_fraction(), 0.75);

        assert_eq!(
            d.get_value(StdpParameter::TauX),
            Err(StdpError::ParameterNotOwned("tau_x"))
        );
        assert_eq!(
            d.set_value(StdpParameter::A3Plus, 1.0),
            Err(StdpError::ParameterNotOwned("A3_plus"))
        );
    }

    #[test]
    fn test_is_same_as_ignores_padding() {
        let a = dynamics();
        let b = SynapseDynamicsStdp::new(Some(pair()), Some(additive()), None, 1.0, Some(32)).unwrap();
        assert!(a.is_same_as(&b));

        let c = SynapseDynamicsStdp::new(Some(pair()), Some(additive()), None, 0.5, None).unwrap();
        assert!(!a.is_same_as(&c));
    }

    #[test]
    fn test_from_config_default() {
        let d = SynapseDynamicsStdp::from_config(&DynamicsConfig::default()).unwrap();
        assert_eq!(d.vertex_executable_suffix(), "_stdp_mad_pair_additive");
        assert_eq!(d.dendritic_delay_fraction(), 1.0);

        let config = DynamicsConfig {
            voltage_dependence: Some("clopath".to_string()),
            ..DynamicsConfig::default()
        };
        assert!(matches!(
            SynapseDynamicsStdp::from_config(&config),
            Err(StdpError::UnsupportedVoltageDependence(_))
        ));
    }

    #[test]
    fn test_write_parameters_rejects_zero_timestep() {
        let mut image = crate::sink::RegionImage::new();
        assert_eq!(
            dynamics().write_parameters(&mut image, 0, 0, &[1.0]),
            Err(StdpError::InvalidMachineTimeStep)
        );
        assert!(image.comments().is_empty());
    }
}
