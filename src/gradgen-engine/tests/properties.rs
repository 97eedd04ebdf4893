// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for the solver and the outline extraction.
//!
//! These check that:
//! 1. solved flow rates conserve volume and solute at every junction
//! 2. longer mixing times never shorten the searched meander
//! 3. the extracted outline does not depend on the order of mesh cells
//! 4. the outline is made of exactly the edges no two cells share

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use proptest::test_runner::TestRunner;

use gradgen_engine::mesh::{EdgeKey, Mesh, Quad};
use gradgen_engine::path::{boundary_edges, extract_loops};
use gradgen_engine::{
    ChannelIndex, Device, DeviceBuilder, Network, OutletParams, Parameters, SolverConfig, solve,
};

fn params(q_in: f64, n: usize, min_mixing_time: f64) -> Parameters {
    let outlets = (0..n)
        .map(|o| {
            let interior = o != 0 && o != n - 1;
            OutletParams {
                concentration: 1.0 - o as f64 / (n - 1) as f64,
                flow_rate: interior.then(|| q_in / n as f64),
                extra_resistance: 0.0,
            }
        })
        .collect();
    let json = format!(
        r#"{{
            "width": 300e-6,
            "height": 100e-6,
            "radius": 300e-6,
            "max_meander_width": 6000e-6,
            "viscosity": 1e-3,
            "min_mixing_time": {min_mixing_time},
            "inlets": [
                {{"concentration": 1.0, "flow_rate": {q}, "length": 1000e-6}},
                {{"concentration": 0.0, "flow_rate": {q}, "length": 1000e-6}}
            ],
            "outlets": []
        }}"#,
        q = q_in / 2.0,
    );
    let mut params = Parameters::from_json(&json).unwrap();
    params.outlets = outlets;
    params
}

fn device(params: &Parameters) -> Device {
    let solution = solve(params, &SolverConfig::default()).unwrap();
    DeviceBuilder::new(params, &solution.network)
        .build(&solution.meanders)
        .unwrap()
}

fn sorted_loop_sets(mesh: &Mesh) -> Vec<BTreeSet<EdgeKey>> {
    let mut sets: Vec<_> = extract_loops(mesh)
        .unwrap()
        .iter()
        .map(|l| l.edge_set())
        .collect();
    sets.sort();
    sets
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn flows_conserve_volume_and_solute(q_in in 5e-11f64..2e-10, n in 3usize..=5) {
        let mut network = Network::new(&params(q_in, n, 10.0));
        network.assign_concentrations();
        network.solve_flow_rates().unwrap();

        for imbalance in network.node_imbalances() {
            prop_assert!(imbalance.abs() <= q_in * 1e-9, "node imbalance {imbalance:e}");
        }
        for imbalance in network.mixing_imbalances() {
            prop_assert!(imbalance.abs() <= q_in * 1e-9, "mixing imbalance {imbalance:e}");
        }
        for channel in network.channels() {
            prop_assert!(channel.flow_rate > 0.0);
        }
    }

    #[test]
    fn longer_mixing_never_shortens_the_free_meander(a in 5.0f64..40.0, b in 5.0f64..40.0) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let config = SolverConfig::default();

        let free = ChannelIndex::free_meander(0);
        let r = |t: f64| {
            let solution = solve(&params(2e-10, 3, t), &config).unwrap();
            (solution.network.meanders[0][free].resistance, solution.network.unit_resistance())
        };
        let (r_short, unit) = r(short);
        let (r_long, _) = r(long);

        let tolerance = 2.0 * unit * config.length_resolution;
        prop_assert!(r_short <= r_long + tolerance, "{r_short:e} > {r_long:e}");
    }
}

#[test]
fn outline_ignores_cell_order() {
    let device = device(&params(2e-10, 4, 10.0));
    let expected = sorted_loop_sets(&device.mesh);
    let vertices = device.mesh.vertices().to_vec();
    let quads: Vec<Quad> = device.mesh.quads().to_vec();

    let mut runner = TestRunner::new(ProptestConfig::with_cases(32));
    runner
        .run(&Just((0..quads.len()).collect::<Vec<_>>()).prop_shuffle(), |order| {
            let shuffled = order.iter().map(|&i| quads[i]).collect();
            let mesh = Mesh::from_parts(vertices.clone(), shuffled).unwrap();
            prop_assert_eq!(sorted_loop_sets(&mesh), expected.clone());
            Ok(())
        })
        .unwrap();
}

#[test]
fn boundary_is_exactly_the_unshared_edges() {
    for n in 3..=5 {
        let device = device(&params(2e-10, n, 10.0));
        let mut counts = HashMap::new();
        for edge in device.mesh.edges() {
            *counts.entry(edge.key()).or_insert(0usize) += 1;
        }
        assert!(counts.values().all(|&c| c == 1 || c == 2), "n = {n}");
        assert!(counts.values().any(|&c| c == 2));

        let unshared: BTreeSet<EdgeKey> = counts
            .iter()
            .filter(|&(_, &c)| c == 1)
            .map(|(&key, _)| key)
            .collect();
        let boundary = boundary_edges(&device.mesh);
        let keys: BTreeSet<EdgeKey> = boundary.iter().map(|e| e.key()).collect();
        assert_eq!(keys.len(), boundary.len(), "n = {n}");
        assert_eq!(keys, unshared, "n = {n}");

        // and the loops use every boundary edge once
        let looped: BTreeSet<EdgeKey> = sorted_loop_sets(&device.mesh)
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(looped, unshared, "n = {n}");
    }
}
