// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed STDP parameter identifiers
//!
//! Names are parsed once into [`StdpParameter`]; access then goes through
//! the rule that owns the parameter, so a misspelt name fails at parse time
//! instead of silently missing.

use std::fmt;
use std::str::FromStr;

use crate::error::StdpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdpParameter {
    TauPlus,
    TauMinus,
    TauX,
    TauY,
    AccumulatorDepression,
    AccumulatorPotentiation,
    MeanPreWindow,
    MeanPostWindow,
    WMin,
    WMax,
    APlus,
    AMinus,
    A3Plus,
    A3Minus,
    DendriticDelayFraction,
}

impl StdpParameter {
    pub const ALL: [StdpParameter; 15] = [
        StdpParameter::TauPlus,
        StdpParameter::TauMinus,
        StdpParameter::TauX,
        StdpParameter::TauY,
        StdpParameter::AccumulatorDepression,
        StdpParameter::AccumulatorPotentiation,
        StdpParameter::MeanPreWindow,
        StdpParameter::MeanPostWindow,
        StdpParameter::WMin,
        StdpParameter::WMax,
        StdpParameter::APlus,
        StdpParameter::AMinus,
        StdpParameter::A3Plus,
        StdpParameter::A3Minus,
        StdpParameter::DendriticDelayFraction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StdpParameter::TauPlus => "tau_plus",
            StdpParameter::TauMinus => "tau_minus",
            StdpParameter::TauX => "tau_x",
            StdpParameter::TauY => "tau_y",
            StdpParameter::AccumulatorDepression => "accumulator_depression",
            StdpParameter::AccumulatorPotentiation => "accumulator_potentiation",
            StdpParameter::MeanPreWindow => "mean_pre_window",
            StdpParameter::MeanPostWindow => "mean_post_window",
            StdpParameter::WMin => "w_min",
            StdpParameter::WMax => "w_max",
            StdpParameter::APlus => "A_plus",
            StdpParameter::AMinus => "A_minus",
            StdpParameter::A3Plus => "A3_plus",
            StdpParameter::A3Minus => "A3_minus",
            StdpParameter::DendriticDelayFraction => "dendritic_delay_fraction",
        }
    }
}

impl FromStr for StdpParameter {
    type Err = StdpError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        StdpParameter::ALL
            .iter()
            .copied()
            .find(|parameter| parameter.name() == name)
            .ok_or_else(|| StdpError::UnknownParameter(name.to_string()))
    }
}

impl fmt::Display for StdpParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
