// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# synrow STDP Row Codec

Packs plastic connections into the synaptic row format read directly by a
fixed-point neuromorphic target, sizes those rows, and reads them back.

Each row has two sections:

- **fixed-plastic**: one `u16` per connection holding delays, synapse type
  and slice-local target id (see [`layout`])
- **plastic-plastic**: a zeroed header (timestamp + pre-synaptic trace)
  followed by per-connection plastic state (see [`plugins::SynapseStructure`])

## Architecture

```text
                 SynapseDynamicsStdp (validated configuration)
                 │
   ┌─────────────┼──────────────────┬──────────────────┐
   ▼             ▼                  ▼                  ▼
 sizing       encoder            decoder        write_parameters
 (words,      (Connection →      (PlasticRows →   (MemorySink)
 max fit)     PlasticRows)       Connection)
   └─────────────┴────── layout + delay ───────┘
```

## Example

```rust
use synrow_stdp::{
    Connection, SynapseDynamicsStdp, TimingDependence, VertexSlice, WeightDependence,
};

let dynamics = SynapseDynamicsStdp::new(
    Some(TimingDependence::SpikePair { tau_plus: 20.0, tau_minus: 20.0 }),
    Some(WeightDependence::Additive { w_min: 0.0, w_max: 10.0, a_plus: 0.1, a_minus: 0.1 }),
    None,
    1.0,
    None,
)?;

let slice = VertexSlice::new(0, 4)?;
let connections = [Connection::new(0, 3, 7.0, 5, 1)];
let rows = dynamics.get_plastic_synaptic_data(&connections, &[0], 1, &slice, 2)?;
let decoded = dynamics.read_plastic_synaptic_data(&slice, 2, &rows)?;
assert_eq!(decoded, connections);
# Ok::<(), synrow_stdp::StdpError>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connection;
pub mod decoder;
pub mod delay;
pub mod dynamics;
pub mod encoder;
pub mod error;
pub mod fixed;
pub mod layout;
pub mod parameters;
pub mod plugins;
pub mod rows;
pub mod sink;
pub mod sizing;

pub use connection::{Connection, VertexSlice, MAX_DELAY, MIN_DELAY};
pub use decoder::PlasticRowDecoder;
pub use delay::{split_delay, stored_delay_to_steps, DelaySplit};
pub use dynamics::SynapseDynamicsStdp;
pub use encoder::PlasticRowEncoder;
pub use error::{Result, StdpError};
pub use layout::FixedPlasticLayout;
pub use parameters::StdpParameter;
pub use plugins::{SynapseStructure, TimingDependence, VoltageDependence, WeightDependence};
pub use rows::PlasticRows;
pub use sink::{MemorySink, RegionImage};
pub use sizing::{n_header_bytes, RowGeometry, TIME_STAMP_BYTES};
