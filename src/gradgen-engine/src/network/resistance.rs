// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Per-layer meander resistances.
//!
//! Each pair of neighbouring meanders in a layer closes a pressure loop with
//! the connections above and below it, so a layer with `m` meanders has
//! `m - 1` loop equations
//!
//! `q_i·r_i − q_{i+1}·r_{i+1} = −(Δp_above + Δp_below)`
//!
//! and one free resistance. The free meander's resistance is bisected for
//! the smallest value whose whole layer is feasible.

use std::f64::consts::PI;

use log::debug;
use ordered_float::OrderedFloat;

use super::linalg::DenseSystem;
use super::{Channel, ChannelIndex, Network};
use crate::common::Result;
use crate::config::SolverConfig;
use crate::meander::length::minimal_height;
use crate::network_err;

impl Network {
    /// Bisects every layer's meander resistances and back-derives their
    /// lengths. Flow rates must already be solved.
    pub fn solve_resistances(&mut self, config: &SolverConfig) -> Result<()> {
        for layer in 0..self.n_layers() {
            self.solve_layer(layer, config)?;
        }
        Ok(())
    }

    fn pressure_drop(channel: &Channel) -> f64 {
        channel.flow_rate * channel.resistance
    }

    /// The loop equations of `layer`, with the free meander pinned in the
    /// last row. The pinned value goes into the last right-hand side.
    fn layer_system(&self, layer: usize) -> DenseSystem {
        let meanders = &self.meanders[layer];
        let conns = &self.connections[layer];
        let m = meanders.len();
        let is_last = layer + 1 == self.n_layers();
        let mut sys = DenseSystem::new(m);

        for i in 0..m - 1 {
            sys.set(i, i, meanders[i].flow_rate);
            sys.set(i, i + 1, -meanders[i + 1].flow_rate);

            let above =
                Self::pressure_drop(&conns[2 * i]) - Self::pressure_drop(&conns[2 * i + 1]);
            let below = if is_last {
                Self::pressure_drop(&self.outlets[i]) - Self::pressure_drop(&self.outlets[i + 1])
            } else {
                let next = &self.connections[layer + 1];
                Self::pressure_drop(&next[2 * i + 1]) - Self::pressure_drop(&next[2 * i + 2])
            };
            sys.set_rhs(i, -(above + below));
        }
        sys.set(m - 1, ChannelIndex::free_meander(layer), 1.0);

        sys
    }

    fn solve_layer(&mut self, layer: usize, config: &SolverConfig) -> Result<()> {
        let unit = self.unit_resistance();
        let g = self.geometry;
        let free = ChannelIndex::free_meander(layer);
        let m = self.meanders[layer].len();

        let r_min_time =
            g.min_mixing_time * self.meanders[layer][free].flow_rate * unit / (g.width * g.height);
        let r_min_turn = (4.0 * g.width + 2.0 * PI * g.radius) * unit;

        let mut left = r_min_time.max(r_min_turn);
        let mut right = config.upper_bound_factor * left;
        let delta = unit * config.length_resolution;

        let mut sys = self.layer_system(layer);

        // the band only grows with the free resistance, so a layer too tall
        // at the lower bound is too tall everywhere
        sys.set_rhs(m - 1, left);
        let Some(x) = sys.solve() else {
            return network_err!(
                SingularSystem,
                layer,
                "loop equations have no unique solution".to_string()
            );
        };
        let h_lower = self.band_height(&x);
        if h_lower > config.max_layer_height {
            return network_err!(
                NoFeasibleResistance,
                layer,
                format!(
                    "the lower bound already needs a {h_lower:e} m band, above the {:e} m limit",
                    config.max_layer_height
                )
            );
        }

        let mut best: Option<Vec<f64>> = None;
        let mut iterations = 0;
        while right - left > delta && iterations < config.max_bisection_iterations {
            iterations += 1;
            let middle = 0.5 * (left + right);
            sys.set_rhs(m - 1, middle);

            let Some(x) = sys.solve() else {
                return network_err!(
                    SingularSystem,
                    layer,
                    "loop equations have no unique solution".to_string()
                );
            };

            if self.is_feasible(layer, &x) {
                right = middle;
                best = Some(x);
            } else {
                left = middle;
            }
        }

        debug!(
            "layer {layer}: bisection stopped after {iterations} steps at [{left:e}, {right:e}], feasible: {}",
            best.is_some()
        );

        let Some(resistances) = best else {
            return network_err!(
                NoFeasibleResistance,
                layer,
                format!(
                    "no meander resistance in [{:e}, {:e}] meets the mixing time and footprint",
                    r_min_time.max(r_min_turn),
                    config.upper_bound_factor * r_min_time.max(r_min_turn)
                )
            );
        };

        let h = self.band_height(&resistances);
        if h > config.max_layer_height {
            return network_err!(
                NoFeasibleResistance,
                layer,
                format!(
                    "the layer needs a {h:e} m band, above the {:e} m limit",
                    config.max_layer_height
                )
            );
        }

        for (channel, r) in self.meanders[layer].iter_mut().zip(resistances) {
            channel.resistance = r;
            channel.length = r / unit;
        }

        Ok(())
    }

    /// Lowest band that fits the longest meander of `resistances`.
    fn band_height(&self, resistances: &[f64]) -> f64 {
        let g = self.geometry;
        let r_max = resistances
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |r| r.0);
        minimal_height(r_max / self.unit_resistance(), g.radius, g.width, g.max_meander_width)
    }

    /// Whether one candidate resistance vector for `layer` can be built:
    /// every mixing meander keeps the fluid at least `min_mixing_time`, and
    /// the shortest meander still fits the band the longest one needs.
    pub(crate) fn is_feasible(&self, layer: usize, resistances: &[f64]) -> bool {
        let unit = self.unit_resistance();
        let g = self.geometry;
        let n = resistances.len();

        for (i, &r) in resistances.iter().enumerate() {
            if i == 0 || i == n - 1 {
                continue;
            }
            let q = self.meanders[layer][i].flow_rate;
            if g.min_mixing_time > g.width * g.height * r / (q * unit) {
                return false;
            }
        }

        let (Some(r_max), Some(r_min)) = (
            resistances.iter().copied().map(OrderedFloat).max(),
            resistances.iter().copied().map(OrderedFloat).min(),
        ) else {
            return false;
        };

        let h_min = minimal_height(r_max.0 / unit, g.radius, g.width, g.max_meander_width);
        r_min.0 > unit * (h_min + 2.0 * g.radius * (PI - 2.0) + 2.0 * g.width)
    }
}

#[cfg(test)]
mod tests {
    use crate::common::{ErrorCode, ErrorKind};
    use crate::config::SolverConfig;
    use crate::network::{ChannelIndex, Network};
    use crate::params::tests::baseline;
    use crate::params::Parameters;
    use float_cmp::approx_eq;

    fn solved(params: &Parameters) -> Network {
        let mut network = Network::new(params);
        network.solve(&SolverConfig::default()).unwrap();
        network
    }

    #[test]
    fn test_free_meander_meets_mixing_time() {
        let params = baseline();
        let network = solved(&params);

        let free = ChannelIndex::free_meander(0);
        let meander = &network.meanders[0][free];
        let required = params.min_mixing_time * meander.flow_rate / (params.width * params.height);
        let excess = meander.length - required;
        assert!(excess >= 0.0, "too short by {excess:e}");
        assert!(excess < 2e-6, "not minimal: {excess:e}");
    }

    #[test]
    fn test_loop_equations_hold() {
        let network = solved(&baseline());
        let r = network.layer_resistances(0);
        let q: Vec<f64> = network.meanders[0].iter().map(|m| m.flow_rate).collect();
        let conns = &network.connections[0];
        let drop = |i: usize| conns[i].flow_rate * conns[i].resistance;

        let residual0 = q[0] * r[0] - q[1] * r[1] + (drop(0) - drop(1));
        let residual1 = q[1] * r[1] - q[2] * r[2] + (drop(2) - drop(3));
        let scale = q[1] * r[1];
        assert!(residual0.abs() < scale * 1e-9);
        assert!(residual1.abs() < scale * 1e-9);

        // the device is symmetric, so are the outer meanders
        assert!(approx_eq!(f64, r[0], r[2], epsilon = r[0] * 1e-9));
        assert!(r[0] < r[1]);
    }

    #[test]
    fn test_lengths_follow_resistances() {
        let network = solved(&baseline());
        let unit = network.unit_resistance();
        for (l, r) in network
            .meander_lengths(0)
            .iter()
            .zip(network.layer_resistances(0).iter())
        {
            assert!(approx_eq!(f64, l * unit, *r, epsilon = r * 1e-12));
        }
    }

    #[test]
    fn test_longer_mixing_time_needs_more_resistance() {
        let mut last = 0.0;
        for t_min in [5.0, 10.0, 20.0, 40.0] {
            let mut params = baseline();
            params.min_mixing_time = t_min;
            let network = solved(&params);
            let r = network.layer_resistances(0)[ChannelIndex::free_meander(0)];
            assert!(r > last, "t_min = {t_min}");
            last = r;
        }
    }

    #[test]
    fn test_unbuildable_band() {
        let mut params = baseline();
        params.max_meander_width = 5.0 * params.width + 8.0 * params.radius + 1e-9;
        params.min_mixing_time = 10000.0;
        assert!(params.validate().is_ok());

        let mut network = Network::new(&params);
        let err = network.solve(&SolverConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.code, ErrorCode::NoFeasibleResistance);
        assert_eq!(err.layer(), Some(0));
    }

    #[test]
    fn test_band_limit_leaves_baseline_alone() {
        let params = baseline();
        let capped = solved(&params);

        let mut network = Network::new(&params);
        let config = SolverConfig {
            max_layer_height: f64::INFINITY,
            ..SolverConfig::default()
        };
        network.solve(&config).unwrap();

        assert_eq!(capped.layer_resistances(0), network.layer_resistances(0));
        let band = capped.band_height(&capped.layer_resistances(0));
        assert!(band <= SolverConfig::default().max_layer_height, "band {band:e}");
    }

    #[test]
    fn test_band_limit_rejects_layer() {
        // even a single turn needs 2w + 4r
        let config = SolverConfig {
            max_layer_height: 1e-3,
            ..SolverConfig::default()
        };
        let mut network = Network::new(&baseline());
        let err = network.solve(&config).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoFeasibleResistance);
        assert_eq!(err.layer(), Some(0));
    }

    #[test]
    fn test_infeasible_candidate_rejected() {
        let mut network = Network::new(&baseline());
        network.assign_concentrations();
        network.solve_flow_rates().unwrap();
        let unit = network.unit_resistance();

        // far too short for the mixing time
        assert!(!network.is_feasible(0, &[unit * 0.01, unit * 0.01, unit * 0.01]));
        // long enough, but the outer meanders cannot share the band
        assert!(!network.is_feasible(0, &[unit * 0.005, unit * 0.05, unit * 0.005]));
        assert!(network.is_feasible(0, &[unit * 0.03, unit * 0.03, unit * 0.03]));
        // very long meanders are still buildable, just tall
        assert!(network.is_feasible(0, &[unit * 5.0, unit * 5.0, unit * 5.0]));
    }
}
