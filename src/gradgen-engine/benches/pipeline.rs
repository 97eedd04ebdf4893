// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use gradgen_engine::{
    DeviceBuilder, OutletParams, Parameters, SolverConfig, generate, render_svg, solve,
};

const BASELINE: &str = r#"{
    "width": 300e-6,
    "height": 100e-6,
    "radius": 300e-6,
    "max_meander_width": 6000e-6,
    "viscosity": 1e-3,
    "min_mixing_time": 10,
    "inlets": [
        {"concentration": 1.0, "flow_rate": 1e-10, "length": 1000e-6},
        {"concentration": 0.0, "flow_rate": 1e-10, "length": 1000e-6}
    ],
    "outlets": []
}"#;

fn linear(n: usize) -> Parameters {
    let mut params = Parameters::from_json(BASELINE).unwrap();
    params.outlets = (0..n)
        .map(|o| {
            let interior = o != 0 && o != n - 1;
            OutletParams {
                concentration: 1.0 - o as f64 / (n - 1) as f64,
                flow_rate: interior.then(|| 2e-10 / n as f64),
                extra_resistance: 0.0,
            }
        })
        .collect();
    params
}

const SIZES: [usize; 3] = [3, 4, 5];

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let config = SolverConfig::default();
    for n in SIZES {
        let params = linear(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &params, |b, params| {
            b.iter(|| solve(params, &config).unwrap())
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in SIZES {
        let params = linear(n);
        let solution = solve(&params, &SolverConfig::default()).unwrap();
        let builder = DeviceBuilder::new(&params, &solution.network);
        group.bench_with_input(BenchmarkId::from_parameter(n), &solution, |b, solution| {
            b.iter(|| builder.build(&solution.meanders).unwrap())
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for n in SIZES {
        let params = linear(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &params, |b, params| {
            b.iter(|| render_svg(&generate(params).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solve, bench_build, bench_generate);
criterion_main!(benches);
