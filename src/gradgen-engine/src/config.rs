// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Numeric knobs of the solver pipeline.
///
/// Lengths are in metres, like the rest of the engine.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// The bisection bracket for a layer's free meander spans
    /// `[lower, upper_bound_factor * lower]`.
    pub upper_bound_factor: f64,
    /// Bisection stops once the bracket is narrower than this much channel
    /// length (converted to resistance).
    pub length_resolution: f64,
    /// Allowed mismatch between the first/last outlet concentration and the
    /// matching inlet's concentration.
    pub concentration_tolerance: f64,
    /// Hard cap on bisection steps per layer.
    pub max_bisection_iterations: usize,
    /// Tallest meander band a layer may need. Checked against the lowest
    /// and the chosen free resistance, outside the bisection.
    pub max_layer_height: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            upper_bound_factor: 100.0,
            length_resolution: 1e-6,
            concentration_tolerance: 1e-9,
            max_bisection_iterations: 200,
            max_layer_height: 0.1,
        }
    }
}
