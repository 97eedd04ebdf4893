// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Places every component of a solved device in one mesh.
//!
//! The device grows downwards from the origin: the inlets end on
//! `y = -l_max`, each layer's junction row sits below the previous one and
//! its meanders hang from the row by their shared height, and the outlets
//! start where the last meanders end. Components are built independently,
//! then their seams are merged so that each seam edge is shared.

mod inlet;
mod layer;
mod meander;
mod outlet;

use log::debug;

pub use self::layer::LayerCells;
pub use self::meander::MeanderCells;
pub use self::outlet::{OutletCells, angular_outlet_depth};

use self::inlet::build_inlets;
use self::layer::build_layer;
use self::meander::build_meander;
use self::outlet::{build_angular_outlet, build_straight_outlet};
use crate::common::Result;
use crate::meander::MeanderDimensions;
use crate::mesh::{Mesh, QuadId};
use crate::network::Network;
use crate::param_err;
use crate::params::{OutletStyle, Parameters};

/// Offset of item `i` of `n` from the middle of a centered row, in pitches.
pub(crate) fn index_factor(i: usize, n: usize) -> f64 {
    i as f64 - (n as f64 - 1.0) / 2.0
}

/// A fully merged device mesh and the cells of each component.
#[derive(Clone, Debug)]
pub struct Device {
    pub mesh: Mesh,
    pub inlets: Vec<QuadId>,
    pub layers: Vec<LayerCells>,
    /// `meanders[k][m]`: meander `m` of layer `k`.
    pub meanders: Vec<Vec<MeanderCells>>,
    pub outlets: Vec<OutletCells>,
}

impl Device {
    /// Every cell, component by component.
    pub fn quads(&self) -> Vec<QuadId> {
        let mut quads = self.inlets.clone();
        for (layer, meanders) in self.layers.iter().zip(self.meanders.iter()) {
            quads.extend(layer.quads());
            for meander in meanders {
                quads.extend(meander.quads());
            }
        }
        for outlet in self.outlets.iter() {
            quads.extend(outlet.quads());
        }
        quads
    }
}

#[derive(Clone, Debug)]
pub struct DeviceBuilder {
    width: f64,
    connection_length: f64,
    inlet_lengths: Vec<f64>,
    outlet_lengths: Vec<f64>,
    outlet_style: OutletStyle,
}

impl DeviceBuilder {
    /// Takes channel sizes from `params` and outlet lengths from the solved
    /// `network`.
    pub fn new(params: &Parameters, network: &Network) -> Self {
        DeviceBuilder {
            width: params.width,
            connection_length: params.connection_length(),
            inlet_lengths: params.inlets.iter().map(|inlet| inlet.length).collect(),
            outlet_lengths: network.outlets.iter().map(|outlet| outlet.length).collect(),
            outlet_style: params.outlet_style,
        }
    }

    /// Builds the device around `dimensions`, one entry per layer and one
    /// sized meander per meander of that layer.
    pub fn build(&self, dimensions: &[Vec<MeanderDimensions>]) -> Result<Device> {
        let n_outlets = self.outlet_lengths.len();
        let n_layers = n_outlets.saturating_sub(2);
        if n_layers == 0 || dimensions.len() != n_layers {
            return param_err!(
                WrongCount,
                "outlets",
                format!(
                    "{} outlets need {} meander layers, got {}",
                    n_outlets,
                    n_layers,
                    dimensions.len()
                )
            );
        }
        for (k, layer) in dimensions.iter().enumerate() {
            if layer.len() != k + 3 {
                return param_err!(
                    WrongCount,
                    "meanders",
                    format!("layer {k} needs {} meanders, got {}", k + 3, layer.len())
                );
            }
        }

        let w = self.width;
        let l_conn = self.connection_length;
        let pitch = 2.0 * l_conn;
        let mut mesh = Mesh::new();

        let inlets = build_inlets(&mut mesh, &self.inlet_lengths, w, l_conn);
        let l_max = self.inlet_lengths.iter().copied().fold(0.0, f64::max);

        let mut y = -(l_max + 0.5 * w);
        let mut layers = Vec::with_capacity(n_layers);
        let mut meanders = Vec::with_capacity(n_layers);
        for (k, dims) in dimensions.iter().enumerate() {
            layers.push(build_layer(&mut mesh, k, y, w, l_conn));

            // meanders in one layer share their height
            let height = dims[0].height;
            let cells: Vec<MeanderCells> = dims
                .iter()
                .enumerate()
                .map(|(m, d)| {
                    let x = index_factor(m, dims.len()) * pitch;
                    build_meander(&mut mesh, d, x, y - 0.5 * height)
                })
                .collect();
            meanders.push(cells);
            debug!("layer {k}: junction row at y = {y:e}, band height {height:e}");
            y -= height;
        }

        let outlets: Vec<OutletCells> = self
            .outlet_lengths
            .iter()
            .enumerate()
            .map(|(o, &length)| match self.outlet_style {
                OutletStyle::Straight => {
                    let x = index_factor(o, n_outlets) * pitch;
                    build_straight_outlet(&mut mesh, x, y, w, length)
                }
                OutletStyle::Angular => build_angular_outlet(&mut mesh, o, n_outlets, y, w, l_conn),
            })
            .collect();

        let mut device = Device {
            mesh,
            inlets,
            layers,
            meanders,
            outlets,
        };
        device.merge_seams();
        Ok(device)
    }
}

impl Device {
    /// Re-points the seam corners of each downstream-facing component onto
    /// the vertices of the component it joins.
    fn merge_seams(&mut self) {
        let mesh = &mut self.mesh;

        for (k, layer) in self.layers.iter().enumerate() {
            for (s, &source) in layer.sources.iter().enumerate() {
                // bottom corners of whatever feeds the source square
                let feed = if k == 0 {
                    self.inlets[s]
                } else {
                    self.meanders[k - 1][s].exit[0]
                };
                mesh.merge_corner(feed, 1, source, 2);
                mesh.merge_corner(feed, 0, source, 3);
            }
            for (m, &sink) in layer.sinks.iter().enumerate() {
                let entry = self.meanders[k][m].entry[0];
                mesh.merge_corner(entry, 3, sink, 0);
                mesh.merge_corner(entry, 2, sink, 1);
            }
        }

        if let Some(last) = self.meanders.last() {
            for (meander, outlet) in last.iter().zip(self.outlets.iter()) {
                let exit = meander.exit[0];
                mesh.merge_corner(exit, 1, outlet.head, 2);
                mesh.merge_corner(exit, 0, outlet.head, 3);
            }
        }
    }
}
