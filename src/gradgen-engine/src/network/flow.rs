// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::Network;
use super::linalg::DenseSystem;
use crate::common::Result;
use crate::{network_err, param_err};

impl Network {
    /// Flat index of source `s` of `layer`: an inlet for the first layer,
    /// a meander of the previous layer otherwise.
    fn source_index(&self, layer: usize, s: usize) -> usize {
        if layer == 0 {
            self.index.inlet(s)
        } else {
            self.index.meander(layer - 1, s)
        }
    }

    fn source_concentration(&self, layer: usize, s: usize) -> f64 {
        if layer == 0 {
            self.inlets[s].concentration
        } else {
            self.meanders[layer - 1][s].concentration
        }
    }

    /// Propagates the outlet concentrations back through the layers, then
    /// gives every connection the concentration of its source.
    pub fn assign_concentrations(&mut self) {
        let n_layers = self.n_layers();

        for k in (0..n_layers).rev() {
            let n = self.meanders[k].len();
            for m in 0..n {
                let c = if k == n_layers - 1 {
                    self.outlets[m].concentration
                } else {
                    let next = &self.meanders[k + 1];
                    if m == 0 {
                        next[0].concentration
                    } else if m == n - 1 {
                        next[m + 1].concentration
                    } else {
                        0.5 * (next[m].concentration + next[m + 1].concentration)
                    }
                };
                self.meanders[k][m].concentration = c;
            }
        }

        for k in 0..n_layers {
            for s in 0..k + 2 {
                let c = self.source_concentration(k, s);
                self.connections[k][2 * s].concentration = c;
                self.connections[k][2 * s + 1].concentration = c;
            }
        }
    }

    /// Solves every channel's flow rate from junction continuity, the mixing
    /// balance of every interior meander and the fixed inlet and interior
    /// outlet flow rates. Concentrations must already be assigned.
    pub fn solve_flow_rates(&mut self) -> Result<()> {
        let idx = self.index;
        let n_layers = self.n_layers();
        let n_outlets = idx.n_outlets();
        if n_layers == 0 {
            return param_err!(WrongCount, "outlets", "at least 3 outlets are required");
        }
        let mut sys = DenseSystem::new(idx.len());
        let mut row = 0;

        for k in 0..n_layers {
            let last = k + 2;

            sys.set(row, idx.connection(k, 0), 1.0);
            sys.set(row, idx.meander(k, 0), -1.0);
            row += 1;

            for s in 0..k + 2 {
                sys.set(row, self.source_index(k, s), 1.0);
                sys.set(row, idx.connection(k, 2 * s), -1.0);
                sys.set(row, idx.connection(k, 2 * s + 1), -1.0);
                row += 1;
            }

            for m in 1..last {
                sys.set(row, idx.connection(k, 2 * m - 1), 1.0);
                sys.set(row, idx.connection(k, 2 * m), 1.0);
                sys.set(row, idx.meander(k, m), -1.0);
                row += 1;
            }

            sys.set(row, idx.connection(k, 2 * last - 1), 1.0);
            sys.set(row, idx.meander(k, last), -1.0);
            row += 1;
        }

        for o in 0..n_outlets {
            sys.set(row, idx.meander(n_layers - 1, o), 1.0);
            sys.set(row, idx.outlet(o), -1.0);
            row += 1;
        }

        for k in 0..n_layers {
            let conns = &self.connections[k];
            for m in 1..k + 2 {
                sys.set(row, idx.connection(k, 2 * m - 1), conns[2 * m - 1].concentration);
                sys.set(row, idx.connection(k, 2 * m), conns[2 * m].concentration);
                sys.set(row, idx.meander(k, m), -self.meanders[k][m].concentration);
                row += 1;
            }
        }

        for (i, inlet) in self.inlets.iter().enumerate() {
            sys.set(row, idx.inlet(i), 1.0);
            sys.set_rhs(row, inlet.flow_rate);
            row += 1;
        }
        for o in 1..n_outlets - 1 {
            sys.set(row, idx.outlet(o), 1.0);
            sys.set_rhs(row, self.outlets[o].flow_rate);
            row += 1;
        }
        debug_assert_eq!(row, idx.len());

        let Some(q) = sys.solve() else {
            return network_err!(
                SingularSystem,
                0,
                "flow-rate system has no unique solution".to_string()
            );
        };

        for (flat, &value) in q.iter().enumerate() {
            if let Some(channel) = self.channel_mut(flat) {
                channel.flow_rate = value;
            }
        }

        self.check_flow_directions()
    }

    /// Every channel must carry flow downstream; the first one that does not
    /// is reported against the layer it belongs to.
    fn check_flow_directions(&self) -> Result<()> {
        let last_layer = self.n_layers().saturating_sub(1);

        if let Some(i) = self.inlets.iter().position(|c| !(c.flow_rate > 0.0)) {
            return network_err!(
                NonPositiveFlow,
                0,
                format!("inlet {i} carries no forward flow")
            );
        }
        for k in 0..self.n_layers() {
            if let Some(j) = self.connections[k].iter().position(|c| !(c.flow_rate > 0.0)) {
                return network_err!(
                    NonPositiveFlow,
                    k,
                    format!("connection {j} carries no forward flow")
                );
            }
            if let Some(m) = self.meanders[k].iter().position(|c| !(c.flow_rate > 0.0)) {
                return network_err!(
                    NonPositiveFlow,
                    k,
                    format!("meander {m} carries no forward flow")
                );
            }
        }
        if let Some(o) = self.outlets.iter().position(|c| !(c.flow_rate > 0.0)) {
            return network_err!(
                NonPositiveFlow,
                last_layer,
                format!("outlet {o} carries no forward flow")
            );
        }

        Ok(())
    }

    /// Inflow minus outflow at every junction of the network.
    pub fn node_imbalances(&self) -> Vec<f64> {
        let n_layers = self.n_layers();
        let mut imbalances = Vec::new();

        for k in 0..n_layers {
            let conns = &self.connections[k];
            let meanders = &self.meanders[k];
            let last = k + 2;

            for s in 0..k + 2 {
                let source = if k == 0 {
                    self.inlets[s].flow_rate
                } else {
                    self.meanders[k - 1][s].flow_rate
                };
                imbalances.push(source - conns[2 * s].flow_rate - conns[2 * s + 1].flow_rate);
            }

            imbalances.push(conns[0].flow_rate - meanders[0].flow_rate);
            for m in 1..last {
                imbalances.push(
                    conns[2 * m - 1].flow_rate + conns[2 * m].flow_rate - meanders[m].flow_rate,
                );
            }
            imbalances.push(conns[2 * last - 1].flow_rate - meanders[last].flow_rate);
        }

        if let Some(meanders) = self.meanders.last() {
            for (meander, outlet) in meanders.iter().zip(self.outlets.iter()) {
                imbalances.push(meander.flow_rate - outlet.flow_rate);
            }
        }

        imbalances
    }

    /// `Σ q_in·c_in − q_out·c_out` at every interior merge.
    pub fn mixing_imbalances(&self) -> Vec<f64> {
        let mut imbalances = Vec::new();
        for (conns, meanders) in self.connections.iter().zip(self.meanders.iter()) {
            for m in 1..meanders.len() - 1 {
                let left = &conns[2 * m - 1];
                let right = &conns[2 * m];
                imbalances.push(
                    left.flow_rate * left.concentration + right.flow_rate * right.concentration
                        - meanders[m].flow_rate * meanders[m].concentration,
                );
            }
        }
        imbalances
    }
}
