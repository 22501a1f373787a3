// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and describe a buildable STDP rule pair.

use crate::{ConfigError, ConfigResult, DynamicsConfig, SynrowConfig, TimingRuleConfig, WeightRuleConfig};

/// Log levels accepted by `logging.level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
    Unsupported { field: String, value: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::Unsupported { field, value } => {
                write!(f, "Unsupported {} '{}'", field, value)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SynrowConfig) -> ConfigResult<()> {
    let mut errors = collect_dynamics_errors(&config.dynamics);

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    into_result(errors)
}

/// Validate only the `[dynamics]` section
pub fn validate_dynamics(dynamics: &DynamicsConfig) -> ConfigResult<()> {
    into_result(collect_dynamics_errors(dynamics))
}

fn into_result(errors: Vec<ConfigValidationError>) -> ConfigResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn collect_dynamics_errors(dynamics: &DynamicsConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if !(0.5..=1.0).contains(&dynamics.dendritic_delay_fraction) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "dynamics.dendritic_delay_fraction".to_string(),
            reason: "must be in the interval [0.5, 1.0]".to_string(),
        });
    }

    if let Some(voltage) = &dynamics.voltage_dependence {
        errors.push(ConfigValidationError::Unsupported {
            field: "dynamics.voltage_dependence".to_string(),
            value: voltage.clone(),
        });
    }

    match &dynamics.timing {
        Some(timing) => validate_timing(timing, &mut errors),
        None => errors.push(ConfigValidationError::MissingRequired {
            field: "dynamics.timing".to_string(),
        }),
    }

    match &dynamics.weight {
        Some(weight) => validate_weight(weight, &mut errors),
        None => errors.push(ConfigValidationError::MissingRequired {
            field: "dynamics.weight".to_string(),
        }),
    }

    if let (Some(timing), Some(weight)) = (&dynamics.timing, &dynamics.weight) {
        let terms = timing_weight_terms(timing);
        if terms != weight_terms_accepted(weight) {
            errors.push(ConfigValidationError::InvalidValue {
                field: "dynamics.weight.rule".to_string(),
                reason: format!(
                    "timing rule produces {} weight term(s) which this weight rule cannot consume",
                    terms
                ),
            });
        }
    }

    errors
}

fn timing_weight_terms(timing: &TimingRuleConfig) -> usize {
    match timing {
        TimingRuleConfig::PfisterSpikeTriplet { .. } => 2,
        _ => 1,
    }
}

fn weight_terms_accepted(weight: &WeightRuleConfig) -> usize {
    match weight {
        WeightRuleConfig::AdditiveTriplet { .. } => 2,
        _ => 1,
    }
}

fn require_positive(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !(value > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_timing(timing: &TimingRuleConfig, errors: &mut Vec<ConfigValidationError>) {
    match timing {
        TimingRuleConfig::SpikePair { tau_plus, tau_minus }
        | TimingRuleConfig::SpikeNearestPair { tau_plus, tau_minus } => {
            require_positive("dynamics.timing.tau_plus", *tau_plus, errors);
            require_positive("dynamics.timing.tau_minus", *tau_minus, errors);
        }
        TimingRuleConfig::PfisterSpikeTriplet {
            tau_plus,
            tau_minus,
            tau_x,
            tau_y,
        } => {
            require_positive("dynamics.timing.tau_plus", *tau_plus, errors);
            require_positive("dynamics.timing.tau_minus", *tau_minus, errors);
            require_positive("dynamics.timing.tau_x", *tau_x, errors);
            require_positive("dynamics.timing.tau_y", *tau_y, errors);
        }
        TimingRuleConfig::Recurrent {
            mean_pre_window,
            mean_post_window,
            ..
        } => {
            require_positive("dynamics.timing.mean_pre_window", *mean_pre_window, errors);
            require_positive("dynamics.timing.mean_post_window", *mean_post_window, errors);
        }
    }
}

fn validate_weight(weight: &WeightRuleConfig, errors: &mut Vec<ConfigValidationError>) {
    let (w_min, w_max) = match weight {
        WeightRuleConfig::Additive { w_min, w_max, .. }
        | WeightRuleConfig::Multiplicative { w_min, w_max, .. }
        | WeightRuleConfig::AdditiveTriplet { w_min, w_max, .. } => (*w_min, *w_max),
    };
    if w_min < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "dynamics.weight.w_min".to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    if w_max < w_min {
        errors.push(ConfigValidationError::InvalidValue {
            field: "dynamics.weight.w_max".to_string(),
            reason: "must not be below w_min".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(config: &SynrowConfig) -> String {
        match validate_config(config) {
            Err(ConfigError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SynrowConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_fraction_out_of_range() {
        let mut config = SynrowConfig::default();
        config.dynamics.dendritic_delay_fraction = 0.4;
        let msg = validation_message(&config);
        assert!(msg.contains("dendritic_delay_fraction"));
        assert!(msg.contains("[0.5, 1.0]"));

        config.dynamics.dendritic_delay_fraction = 1.01;
        assert!(validate_config(&config).is_err());

        config.dynamics.dendritic_delay_fraction = 0.5;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_voltage_dependence_rejected() {
        let mut config = SynrowConfig::default();
        config.dynamics.voltage_dependence = Some("clopath".to_string());
        let msg = validation_message(&config);
        assert!(msg.contains("voltage_dependence"));
        assert!(msg.contains("clopath"));
    }

    #[test]
    fn test_triplet_timing_needs_triplet_weight() {
        let mut config = SynrowConfig::default();
        config.dynamics.timing = Some(TimingRuleConfig::PfisterSpikeTriplet {
            tau_plus: 16.8,
            tau_minus: 33.7,
            tau_x: 101.0,
            tau_y: 125.0,
        });
        let msg = validation_message(&config);
        assert!(msg.contains("2 weight term(s)"));

        config.dynamics.weight = Some(WeightRuleConfig::AdditiveTriplet {
            w_min: 0.0,
            w_max: 1.0,
            a_plus: 0.1,
            a_minus: 0.1,
            a3_plus: 0.05,
            a3_minus: 0.05,
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_every_problem_is_reported() {
        let mut config = SynrowConfig::default();
        config.dynamics.dendritic_delay_fraction = 2.0;
        config.dynamics.timing = Some(TimingRuleConfig::SpikePair {
            tau_plus: 0.0,
            tau_minus: -1.0,
        });
        config.logging.level = "loud".to_string();
        let msg = validation_message(&config);
        assert!(msg.contains("dendritic_delay_fraction"));
        assert!(msg.contains("tau_plus"));
        assert!(msg.contains("tau_minus"));
        assert!(msg.contains("logging.level"));
    }

    #[test]
    fn test_weight_bounds() {
        let mut dynamics = DynamicsConfig::default();
        dynamics.weight = Some(WeightRuleConfig::Multiplicative {
            w_min: 2.0,
            w_max: 1.0,
            a_plus: 0.1,
            a_minus: 0.1,
        });
        assert!(validate_dynamics(&dynamics).is_err());
    }
}
