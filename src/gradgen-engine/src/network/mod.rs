// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The lumped hydraulic model of the device.
//!
//! Two inlets feed `L = n_outlets - 2` layers. Layer `k` takes `k + 2`
//! sources (the inlets for `k = 0`, the meanders of layer `k - 1`
//! otherwise) and splits each source `s` into connections `2s` and
//! `2s + 1`.  Those `2k + 4` connections merge pairwise into `k + 3`
//! meanders: meander `0` receives connection `0`, the last meander receives
//! connection `2k + 3` and every interior meander `m` receives connections
//! `2m - 1` and `2m`.  The meanders of the last layer drain into the
//! outlets one to one.

mod flow;
mod linalg;
mod resistance;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::Serialize;

use crate::common::Result;
use crate::config::SolverConfig;
use crate::params::Parameters;
use crate::resistance::ResistanceModel;

/// One channel of the network: inlet, connection, meander or outlet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Channel {
    pub length: f64,
    pub resistance: f64,
    pub flow_rate: f64,
    pub concentration: f64,
}

/// Position of every channel in the flat vector of flow-rate unknowns:
/// inlets, then connections layer by layer, then meanders layer by layer,
/// then outlets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelIndex {
    n_outlets: usize,
}

impl ChannelIndex {
    pub const N_INLETS: usize = 2;

    pub fn new(n_outlets: usize) -> Self {
        ChannelIndex { n_outlets }
    }

    pub fn n_layers(&self) -> usize {
        self.n_outlets.saturating_sub(2)
    }

    pub fn n_outlets(&self) -> usize {
        self.n_outlets
    }

    pub fn n_connections(&self) -> usize {
        let l = self.n_layers();
        l * l + 3 * l
    }

    pub fn n_meanders(&self) -> usize {
        let l = self.n_layers();
        l * (l + 5) / 2
    }

    pub fn len(&self) -> usize {
        Self::N_INLETS + self.n_connections() + self.n_meanders() + self.n_outlets
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inlet(&self, i: usize) -> usize {
        i
    }

    pub fn connection(&self, layer: usize, j: usize) -> usize {
        Self::N_INLETS + layer * layer + 3 * layer + j
    }

    pub fn meander(&self, layer: usize, m: usize) -> usize {
        Self::N_INLETS + self.n_connections() + layer * (layer + 5) / 2 + m
    }

    pub fn outlet(&self, o: usize) -> usize {
        Self::N_INLETS + self.n_connections() + self.n_meanders() + o
    }

    /// The meander whose resistance is searched for; the rest of the layer
    /// follows from it.
    pub fn free_meander(layer: usize) -> usize {
        let m = layer + 3;
        if m % 2 == 0 { m / 2 - 1 } else { m / 2 }
    }
}

/// Every channel of one device, plus the constants the solver needs.
#[derive(Clone, Debug, Serialize)]
pub struct Network {
    pub inlets: Vec<Channel>,
    /// `connections[k][j]`: connection `j` of layer `k`.
    pub connections: Vec<Vec<Channel>>,
    /// `meanders[k][m]`: meander `m` of layer `k`.
    pub meanders: Vec<Vec<Channel>>,
    pub outlets: Vec<Channel>,
    #[serde(skip)]
    index: ChannelIndex,
    #[serde(skip)]
    geometry: ChannelGeometry,
}

/// The cross-section and footprint constants shared by every channel.
#[derive(Copy, Clone, Debug)]
struct ChannelGeometry {
    width: f64,
    height: f64,
    radius: f64,
    max_meander_width: f64,
    min_mixing_time: f64,
    model: ResistanceModel,
}

impl Network {
    /// Lays out the channels for `params` and fills in everything known up
    /// front: lengths and resistances of inlets, connections and outlets,
    /// the inlet concentrations and flow rates, and the outlet targets.
    /// `params` is expected to be validated.
    pub fn new(params: &Parameters) -> Network {
        let index = ChannelIndex::new(params.n_outlets());
        let model = ResistanceModel::new(params.viscosity);
        let (w, h) = (params.width, params.height);
        let unit = model.unit_resistance(w, h);
        let l_conn = params.connection_length();

        let inlets = params
            .inlets
            .iter()
            .map(|inlet| Channel {
                length: inlet.length,
                resistance: model.resistance(w, h, inlet.length),
                flow_rate: inlet.flow_rate,
                concentration: inlet.concentration,
            })
            .collect();

        let connections = (0..index.n_layers())
            .map(|k| {
                let conn = Channel {
                    length: l_conn,
                    resistance: model.resistance(w, h, l_conn),
                    ..Channel::default()
                };
                vec![conn; 2 * k + 4]
            })
            .collect();

        let meanders = (0..index.n_layers())
            .map(|k| vec![Channel::default(); k + 3])
            .collect();

        let outlets = params
            .outlets
            .iter()
            .map(|outlet| Channel {
                length: outlet.extra_resistance / unit,
                resistance: outlet.extra_resistance,
                flow_rate: outlet.flow_rate.unwrap_or(0.0),
                concentration: outlet.concentration,
            })
            .collect();

        Network {
            inlets,
            connections,
            meanders,
            outlets,
            index,
            geometry: ChannelGeometry {
                width: w,
                height: h,
                radius: params.radius,
                max_meander_width: params.max_meander_width,
                min_mixing_time: params.min_mixing_time,
                model,
            },
        }
    }

    pub fn index(&self) -> ChannelIndex {
        self.index
    }

    pub fn n_layers(&self) -> usize {
        self.index.n_layers()
    }

    /// Resistance of one metre of channel.
    pub fn unit_resistance(&self) -> f64 {
        self.geometry
            .model
            .unit_resistance(self.geometry.width, self.geometry.height)
    }

    /// Runs concentrations, flow rates and meander resistances in order.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<()> {
        self.assign_concentrations();
        self.solve_flow_rates()?;
        self.solve_resistances(config)
    }

    /// Solved resistances of the meanders of `layer`.
    pub fn layer_resistances(&self, layer: usize) -> Vec<f64> {
        self.meanders[layer].iter().map(|m| m.resistance).collect()
    }

    /// Centerline lengths the meanders of `layer` must realize.
    pub fn meander_lengths(&self, layer: usize) -> Vec<f64> {
        self.meanders[layer].iter().map(|m| m.length).collect()
    }

    /// Every channel in flat index order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.inlets
            .iter()
            .chain(self.connections.iter().flatten())
            .chain(self.meanders.iter().flatten())
            .chain(self.outlets.iter())
    }

    fn channel_mut(&mut self, flat: usize) -> Option<&mut Channel> {
        let index = self.index;
        if flat < index.connection(0, 0) {
            return self.inlets.get_mut(flat);
        }
        if flat < index.meander(0, 0) {
            let mut rest = flat - index.connection(0, 0);
            for layer in self.connections.iter_mut() {
                if rest < layer.len() {
                    return layer.get_mut(rest);
                }
                rest -= layer.len();
            }
            return None;
        }
        if flat < index.outlet(0) {
            let mut rest = flat - index.meander(0, 0);
            for layer in self.meanders.iter_mut() {
                if rest < layer.len() {
                    return layer.get_mut(rest);
                }
                rest -= layer.len();
            }
            return None;
        }
        self.outlets.get_mut(flat - index.outlet(0))
    }
}
