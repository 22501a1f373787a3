// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Row Budget Tool

Loads a synrow configuration and prints the plastic row sizes it implies.

Usage:
  cargo run --bin row_budget -- [--config <synrow.toml>] [--connections <n>] [--words <n>] [--debug-all]

Example:
  cargo run --bin row_budget -- --config demos/synrow.toml --connections 32 --words 256
*/

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use synrow::config::load_config;
use synrow::observability::{debug_flags_help, init_logging, parse_debug_flags};
use synrow::stdp::SynapseDynamicsStdp;
use tracing::info;

struct Args {
    config: Option<PathBuf>,
    connections: Vec<usize>,
    words: Vec<usize>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: row_budget [--config <path>] [--connections <n>]... [--words <n>]...\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_count(value: Option<String>, flag: &str) -> Result<usize> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag}: '{value}' is not a count"))
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        connections: Vec::new(),
        words: Vec::new(),
    };
    let mut argv = env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                let path = argv.next().unwrap_or_else(|| usage_and_exit());
                args.config = Some(PathBuf::from(path));
            }
            "--connections" => args.connections.push(parse_count(argv.next(), "--connections")?),
            "--words" => args.words.push(parse_count(argv.next(), "--words")?),
            "-h" | "--help" => usage_and_exit(),
            // Handled by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    if args.connections.is_empty() {
        args.connections = vec![0, 1, 16, 64];
    }
    if args.words.is_empty() {
        args.words = vec![16, 64, 256];
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = load_config(args.config.as_deref(), None).context("Failed to load configuration")?;

    let mut debug_flags = parse_debug_flags();
    for crate_name in &config.logging.debug_crates {
        debug_flags.enable(crate_name);
    }
    let _guard = init_logging(&config.logging.level, &debug_flags, None)?;

    let dynamics = SynapseDynamicsStdp::from_config(&config.dynamics)
        .context("Invalid [dynamics] configuration")?;
    info!(
        "Dynamics {} (delay fraction {}, pad {:?})",
        dynamics.vertex_executable_suffix(),
        dynamics.dendritic_delay_fraction(),
        dynamics.pad_to_length()
    );

    println!("header bytes: {}", dynamics.n_header_bytes());
    println!(
        "bytes per connection: {} plastic + 2 fixed",
        dynamics.synapse_structure().bytes_per_connection()
    );
    for &n in &args.connections {
        println!(
            "{:>6} connections -> {:>6} words",
            n,
            dynamics.n_words_for_plastic_connections(n)
        );
    }
    for &n_words in &args.words {
        println!(
            "{:>6} words       -> {:>6} connections max",
            n_words,
            dynamics.max_synapses(n_words)
        );
    }
    Ok(())
}
