// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the plastic row codec through `SynapseDynamicsStdp`

use synrow_stdp::{
    Connection, RegionImage, StdpError, StdpParameter, SynapseDynamicsStdp, TimingDependence,
    VertexSlice, WeightDependence,
};

fn pair() -> TimingDependence {
    TimingDependence::SpikePair {
        tau_plus: 20.0,
        tau_minus: 20.0,
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

fn additive(w_max: f64) -> WeightDependence {
    WeightDependence::Additive {
        w_min: 0.0,
        w_max,
        a_plus: 2.0,
        a_minus: 1.0,
    }
}

fn dynamics(timing: TimingDependence, pad_to_length: Option<usize>) -> SynapseDynamicsStdp {
    SynapseDynamicsStdp::new(Some(timing), Some(additive(10.0)), None, 1.0, pad_to_length).unwrap()
}

/// Deterministic connection set spread over `n_rows` rows
fn connections_for(
    slice: &VertexSlice,
    n_synapse_types: usize,
    n_connections: usize,
    n_rows: usize,
) -> (Vec<Connection>, Vec<usize>) {
    let mut connections = Vec::with_capacity(n_connections);
    let mut rows = Vec::with_capacity(n_connections);
    for i in 0..n_connections {
        let row = (i * 5) % n_rows;
        connections.push(Connection::new(
            row as u32,
            slice.lo_atom() + ((i * 7) as u32 % slice.n_atoms()),
            ((i * 13) % 200) as f64,
            1 + (i as u32 % 16),
            (i % n_synapse_types) as u8,
        ));
        rows.push(row);
    }
    (connections, rows)
}

/// Connections in decode order: by row, then input order within a row
fn in_row_order(connections: &[Connection], rows: &[usize], n_rows: usize) -> Vec<Connection> {
    (0..n_rows)
        .flat_map(|row| {
            connections
                .iter()
                .zip(rows)
                .filter(move |&(_, &r)| r == row)
                .map(|(c, _)| *c)
        })
        .collect()
}

#[test]
fn test_round_trip_across_synapse_types_and_slice_sizes() {
    for timing in [pair(), recurrent()] {
        let d = dynamics(timing, None);
        for n_synapse_types in [1usize, 2, 4, 8] {
            for n_atoms in [1u32, 16, 256] {
                let slice = VertexSlice::new(1000, n_atoms).unwrap();
                let (connections, rows) = connections_for(&slice, n_synapse_types, 50, 4);
                let encoded = d
                    .get_plastic_synaptic_data(&connections, &rows, 4, &slice, n_synapse_types)
                    .unwrap_or_else(|e| panic!("{n_synapse_types} types x {n_atoms} atoms: {e}"));
                let decoded = d
                    .read_plastic_synaptic_data(&slice, n_synapse_types, &encoded)
                    .unwrap();
                assert_eq!(
                    decoded,
                    in_row_order(&connections, &rows, 4),
                    "{n_synapse_types} types x {n_atoms} atoms"
                );
            }
        }
    }
}

#[test]
fn test_widest_fields_round_trip() {
    // Largest target and type with the longest delay, for every grid point
    let d = dynamics(pair(), None);
    for n_synapse_types in [1usize, 2, 4, 8] {
        for n_atoms in [1u32, 16, 256] {
            let slice = VertexSlice::new(0, n_atoms).unwrap();
            let c = Connection::new(0, n_atoms - 1, 65535.0, 16, (n_synapse_types - 1) as u8);
            let rows = d
                .get_plastic_synaptic_data(&[c], &[0], 1, &slice, n_synapse_types)
                .unwrap();
            assert_eq!(
                d.read_plastic_synaptic_data(&slice, n_synapse_types, &rows).unwrap(),
                vec![c],
                "{n_synapse_types} types x {n_atoms} atoms"
            );
        }
    }

    // Beyond the widest grid point the dendritic field itself no longer fits
    let slice = VertexSlice::new(0, 1024).unwrap();
    assert!(matches!(
        d.get_plastic_synaptic_data(&[], &[], 1, &slice, 8),
        Err(StdpError::LayoutOverflow { .. })
    ));
}

#[test]
fn test_concrete_two_connection_row() {
    let d = dynamics(pair(), None);
    let slice = VertexSlice::new(0, 4).unwrap();
    let a = Connection::new(0, 3, 7.0, 5, 1);
    let b = Connection::new(0, 0, 3.0, 16, 0);

    let rows = d.get_plastic_synaptic_data(&[a, b], &[0, 0], 1, &slice, 2).unwrap();
    assert_eq!(rows.fp_size, vec![2]);
    // A: dendritic 5 << 3 | type 1 << 2 | target 3; B: delay 16 stored as 0
    assert_eq!(rows.fp_data[0], vec![0x2F, 0x00, 0x00, 0x00]);

    let header = d.n_header_bytes();
    assert_eq!(header, 8);
    assert_eq!(rows.pp_size, vec![(header + 2 * 2).div_ceil(4)]);
    assert_eq!(rows.pp_data[0][header..], [7, 0, 3, 0]);

    let decoded = d.read_plastic_synaptic_data(&slice, 2, &rows).unwrap();
    assert_eq!(decoded, vec![a, b]);
}

#[test]
fn test_empty_row_still_has_header() {
    let d = dynamics(pair(), None);
    let slice = VertexSlice::new(0, 16).unwrap();
    let c = Connection::new(1, 2, 1.0, 3, 0);

    let rows = d.get_plastic_synaptic_data(&[c], &[1], 2, &slice, 1).unwrap();
    assert_eq!(rows.fp_size, vec![0, 1]);
    assert!(rows.fp_data[0].is_empty());
    assert_eq!(rows.pp_data[0], vec![0; d.n_header_bytes()]);
    assert_eq!(rows.pp_size[0], d.n_header_bytes() / 4);

    let decoded = d.read_plastic_synaptic_data(&slice, 1, &rows).unwrap();
    assert_eq!(decoded, vec![c]);
}

#[test]
fn test_padding_is_not_decoded() {
    let d = dynamics(recurrent(), Some(8));
    let slice = VertexSlice::new(0, 16).unwrap();
    let (connections, rows) = connections_for(&slice, 2, 3, 1);

    let encoded = d.get_plastic_synaptic_data(&connections, &rows, 1, &slice, 2).unwrap();
    assert_eq!(encoded.fp_size, vec![3]);
    assert_eq!(encoded.fp_data[0].len(), 16);
    // 8 header bytes + 8 * 4 bytes of weight/accumulator
    assert_eq!(encoded.pp_size, vec![10]);
    assert!(encoded.pp_data[0][8 + 3 * 4..].iter().all(|&b| b == 0));

    let decoded = d.read_plastic_synaptic_data(&slice, 2, &encoded).unwrap();
    assert_eq!(decoded, connections);
}

#[test]
fn test_encoded_size_matches_sizing() {
    for timing in [pair(), recurrent()] {
        for pad in [None, Some(6)] {
            let d = dynamics(timing.clone(), pad);
            let slice = VertexSlice::new(0, 16).unwrap();
            for n in 0..40 {
                let (connections, rows) = connections_for(&slice, 1, n, 1);
                let encoded = d.get_plastic_synaptic_data(&connections, &rows, 1, &slice, 1).unwrap();
                let fp_words = encoded.fp_data[0].len() / 4;
                assert_eq!(
                    fp_words + d.n_plastic_plastic_words_per_row(encoded.pp_size[0]),
                    d.n_words_for_plastic_connections(n),
                    "n = {n}, pad = {pad:?}"
                );
                assert_eq!(
                    d.n_fixed_plastic_words_per_row(encoded.fp_size[0]),
                    d.n_fixed_plastic_words_per_row(n)
                );
            }
        }
    }
}

#[test]
fn test_max_synapses_is_maximal() {
    for timing in [pair(), recurrent()] {
        let d = dynamics(timing, None);
        let mut previous = 0;
        for budget in 0..500 {
            let n = d.max_synapses(budget);
            assert!(n >= previous, "max_synapses must not shrink as the budget grows");
            previous = n;
            if n > 0 {
                assert!(d.n_words_for_plastic_connections(n) <= budget);
            }
            assert!(d.n_words_for_plastic_connections(n + 1) > budget);
        }
    }
}

#[test]
fn test_words_monotonic_in_connections() {
    let d = dynamics(recurrent(), Some(10));
    let mut previous = d.n_words_for_plastic_connections(0);
    for n in 1..300 {
        let words = d.n_words_for_plastic_connections(n);
        assert!(words >= previous);
        previous = words;
    }
}

#[test]
fn test_decode_requires_matching_context() {
    let d = dynamics(pair(), None);
    let slice = VertexSlice::new(0, 16).unwrap();
    let (connections, rows) = connections_for(&slice, 2, 10, 2);
    let encoded = d.get_plastic_synaptic_data(&connections, &rows, 2, &slice, 2).unwrap();

    assert_eq!(
        d.read_plastic_synaptic_data(&slice, 0, &encoded),
        Err(StdpError::InvalidSynapseTypeCount(0))
    );

    let mut truncated = encoded.clone();
    truncated.pp_data[1].truncate(4);
    assert!(matches!(
        d.read_plastic_synaptic_data(&slice, 2, &truncated),
        Err(StdpError::RowShapeMismatch { row: 1, .. })
    ));
}

#[test]
fn test_write_parameters_layout() {
    let d = dynamics(pair(), None);
    let mut image = RegionImage::new();
    d.write_parameters(&mut image, 4, 1000, &[1.0, 2.0]).unwrap();

    assert_eq!(image.comments(), ["Writing Plastic Parameters".to_string()]);
    assert_eq!(image.focus(), Some(4));

    let words: Vec<i32> = image.region_words(4).into_iter().map(|w| w as i32).collect();
    let tau = 20 << 15;
    assert_eq!(words, vec![tau, tau, 0, 10, 2, 1, 0, 20, 4, 2]);
    assert_eq!(words.len() * 4, d.parameters_sdram_usage_in_bytes(2));
}

#[test]
fn test_parameter_change_affects_encoding() {
    let mut d = dynamics(pair(), None);
    let slice = VertexSlice::new(0, 16).unwrap();
    let c = Connection::new(0, 5, 4.0, 8, 0);

    d.mark_no_changes();
    let fraction: StdpParameter = "dendritic_delay_fraction".parse().unwrap();
    d.set_value(fraction, 0.5).unwrap();
    assert!(d.requires_mapping());

    let encoded = d.get_plastic_synaptic_data(&[c], &[0], 1, &slice, 1).unwrap();
    let decoded = d.read_plastic_synaptic_data(&slice, 1, &encoded).unwrap();
    // Only the dendritic half of the delay is read back
    assert_eq!(decoded[0].delay, 4);

    assert!(matches!(
        "tau_z".parse::<StdpParameter>(),
        Err(StdpError::UnknownParameter(_))
    ));
}

#[test]
fn test_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synrow.toml");
    std::fs::write(
        &path,
        r#"
[dynamics]
dendritic_delay_fraction = 0.75
pad_to_length = 4

[dynamics.timing]
rule = "pfister_spike_triplet"
tau_plus = 16.8
tau_minus = 33.7
tau_x = 101.0
tau_y = 125.0

[dynamics.weight]
rule = "additive_triplet"
w_min = 0.0
w_max = 1.0
a_plus = 0.0065
a_minus = 0.0071
a3_plus = 0.0053
a3_minus = 0.0
"#,
    )
    .unwrap();

    let d = SynapseDynamicsStdp::from_config_file(Some(&path)).unwrap();
    assert_eq!(
        d.vertex_executable_suffix(),
        "_stdp_mad_pfister_triplet_additive_triplet"
    );
    assert_eq!(d.dendritic_delay_fraction(), 0.75);
    assert_eq!(d.pad_to_length(), Some(4));
    // 4 timestamp + 4 trace bytes
    assert_eq!(d.n_header_bytes(), 8);
    assert_eq!(d.n_words_for_plastic_connections(0), 2 + 4);
}
