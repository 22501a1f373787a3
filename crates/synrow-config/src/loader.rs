// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SynrowConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "synrow.toml";

/// Find the synrow configuration file
///
/// Search order:
/// 1. `SYNROW_CONFIG_PATH` environment variable
/// 2. Current working directory: `./synrow.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SYNROW_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SYNROW_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "synrow configuration file '{}' not found in any of these locations:\n{}\n\nSet SYNROW_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SynrowConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    debug!("[CONFIG] Loading {}", config_file.display());

    let content = fs::read_to_string(&config_file)?;
    let mut config: SynrowConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    crate::validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SYNROW_DENDRITIC_DELAY_FRACTION` -> `dynamics.dendritic_delay_fraction`
/// - `SYNROW_PAD_TO_LENGTH` -> `dynamics.pad_to_length` (`none` clears it)
/// - `SYNROW_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SynrowConfig) {
    if let Ok(value) = env::var("SYNROW_DENDRITIC_DELAY_FRACTION") {
        set_fraction(config, "SYNROW_DENDRITIC_DELAY_FRACTION", &value);
    }
    if let Ok(value) = env::var("SYNROW_PAD_TO_LENGTH") {
        set_pad_to_length(config, "SYNROW_PAD_TO_LENGTH", &value);
    }
    if let Ok(value) = env::var("SYNROW_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Keys use the dotted TOML path, e.g.
/// `{"dynamics.pad_to_length": "32", "logging.level": "debug"}`.
pub fn apply_cli_overrides(config: &mut SynrowConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("dynamics.dendritic_delay_fraction") {
        set_fraction(config, "dynamics.dendritic_delay_fraction", value);
    }
    if let Some(value) = cli_args.get("dynamics.pad_to_length") {
        set_pad_to_length(config, "dynamics.pad_to_length", value);
    }
    if let Some(value) = cli_args.get("logging.level") {
        config.logging.level = value.clone();
    }
}

fn set_fraction(config: &mut SynrowConfig, source: &str, value: &str) {
    match value.parse::<f64>() {
        Ok(fraction) => config.dynamics.dendritic_delay_fraction = fraction,
        Err(_) => warn!("[CONFIG] Ignoring {}: '{}' is not a number", source, value),
    }
}

fn set_pad_to_length(config: &mut SynrowConfig, source: &str, value: &str) {
    if value.eq_ignore_ascii_case("none") {
        config.dynamics.pad_to_length = None;
        return;
    }
    match value.parse::<usize>() {
        Ok(length) => config.dynamics.pad_to_length = Some(length),
        Err(_) => warn!(
            "[CONFIG] Ignoring {}: '{}' is not a connection count",
            source, value
        ),
    }
}
