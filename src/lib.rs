// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synrow - Synaptic Row Codec for STDP
//!
//! Packs plastic (STDP) connections into the fixed-width synaptic rows read
//! by a fixed-point neuromorphic target, sizes the memory those rows need,
//! and decodes rows read back from the device.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! synrow = "0.1"  # Default: codec + config + logging helpers
//! ```
//!
//! ## Feature Flags
//!
//! - **`observability`** (default): logging initialisation with per-crate debug flags
//! - **`file-logging`**: rolling log files in a timestamped run folder
//! - **`parallel`**: build rows on the rayon thread pool
//!
//! ## Usage
//!
//! ```rust
//! use synrow::prelude::*;
//!
//! let dynamics = SynapseDynamicsStdp::from_config(&DynamicsConfig::default())?;
//! let slice = VertexSlice::new(0, 16)?;
//!
//! // Size a row region, then fill it
//! let words = dynamics.n_words_for_plastic_connections(2);
//! let connections = [
//!     Connection::new(0, 3, 1.0, 4, 0),
//!     Connection::new(0, 9, 1.0, 16, 0),
//! ];
//! let rows = dynamics.get_plastic_synaptic_data(&connections, &[0, 0], 1, &slice, 1)?;
//! assert_eq!(rows.fp_data[0].len() / 4 + rows.pp_size[0], words);
//!
//! // Read them back
//! let decoded = dynamics.read_plastic_synaptic_data(&slice, 1, &rows)?;
//! assert_eq!(decoded, connections);
//! # Ok::<(), synrow::stdp::StdpError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export the codec
pub use synrow_stdp as stdp;

// Re-export configuration
pub use synrow_config as config;

// Re-export infrastructure
#[cfg(feature = "observability")]
pub use synrow_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::stdp::{
        Connection, MemorySink, PlasticRows, RegionImage, StdpError, StdpParameter,
        SynapseDynamicsStdp, SynapseStructure, TimingDependence, VertexSlice, VoltageDependence,
        WeightDependence,
    };

    pub use crate::config::{load_config, DynamicsConfig, SynrowConfig};

    #[cfg(feature = "observability")]
    pub use crate::observability::{init_logging, parse_debug_flags, CrateDebugFlags};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let slice = VertexSlice::new(8, 8).unwrap();
        assert_eq!(slice.hi_atom(), 15);
        assert!(SynapseDynamicsStdp::from_config(&DynamicsConfig::default()).is_ok());
    }
}
