// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for synrow tools
//!
//! Console output is always installed; the `file-logging` feature adds a
//! JSON log file under a timestamped run folder.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Logging initialization result
///
/// Keep it alive for the lifetime of the program; dropping it flushes and
/// closes any log files.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder holding log files, if file logging is active
    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.log_dir.as_deref()
    }
}

/// Build the `EnvFilter` for a default level and per-crate debug flags
///
/// `RUST_LOG` takes precedence when set.
pub fn build_filter(default_level: &str, debug_flags: &CrateDebugFlags) -> Result<EnvFilter> {
    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        return EnvFilter::try_new(&rust_log)
            .with_context(|| format!("Invalid RUST_LOG filter: {}", rust_log));
    }
    let filter = debug_flags.to_filter_string(default_level);
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Initialize console logging
///
/// # Arguments
/// * `default_level` - Level for crates without a debug flag (e.g. `"info"`)
/// * `debug_flags` - Per-crate debug flags
/// * `log_dir` - Base directory for log files; only used with `file-logging`
pub fn init_logging(
    default_level: &str,
    debug_flags: &CrateDebugFlags,
    log_dir: Option<PathBuf>,
) -> Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(build_filter(default_level, debug_flags)?)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let mut guard = LoggingGuard {
        _file_guard: None,
        log_dir: None,
    };
    #[cfg(feature = "file-logging")]
    if let Some(base) = log_dir {
        let (layer, file_guard, run_folder) = file_layer(base, default_level, debug_flags)?;
        layers.push(layer);
        guard._file_guard = Some(file_guard);
        guard.log_dir = Some(run_folder);
    }

    #[cfg(not(feature = "file-logging"))]
    let guard = {
        if log_dir.is_some() {
            eprintln!("Warning: log_dir ignored, built without the file-logging feature");
        }
        LoggingGuard { log_dir: None }
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base_log_dir: PathBuf,
    default_level: &str,
    debug_flags: &CrateDebugFlags,
) -> Result<(
    Box<dyn Layer<Registry> + Send + Sync>,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    let appender = tracing_appender::rolling::daily(&run_folder, "synrow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(build_filter(default_level, debug_flags)?)
        .boxed();
    Ok((layer, guard, run_folder))
}

/// Initialize console logging at `info` with the given debug flags
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging("info", debug_flags, None)
}
