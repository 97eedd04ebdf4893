// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::index_factor;
use crate::mesh::{Mesh, QuadId};

/// One row of junction squares and the connections between them.
///
/// Sources and sinks alternate along the row, starting and ending with a
/// sink; each connection joins a square to its right-hand neighbour.
#[derive(Clone, Debug)]
pub struct LayerCells {
    /// Squares fed from above: the inlets, or the previous layer's meanders.
    pub sources: Vec<QuadId>,
    /// Squares draining into this layer's meanders.
    pub sinks: Vec<QuadId>,
    pub connections: Vec<QuadId>,
}

impl LayerCells {
    pub fn quads(&self) -> impl Iterator<Item = QuadId> + '_ {
        self.sources
            .iter()
            .chain(self.sinks.iter())
            .chain(self.connections.iter())
            .copied()
    }
}

pub(crate) fn build_layer(
    mesh: &mut Mesh,
    layer: usize,
    y: f64,
    w: f64,
    connection_length: f64,
) -> LayerCells {
    let n_sources = layer + 2;
    let n_sinks = layer + 3;
    let pitch = 2.0 * connection_length;

    let sources: Vec<QuadId> = (0..n_sources)
        .map(|i| mesh.square(index_factor(i, n_sources) * pitch, y, w))
        .collect();
    let sinks: Vec<QuadId> = (0..n_sinks)
        .map(|j| mesh.square(index_factor(j, n_sinks) * pitch, y, w))
        .collect();

    let mut connections = Vec::with_capacity(2 * n_sources);
    let (mut source, mut sink) = (0, 0);
    for c in 0..2 * n_sources {
        let (left, right) = if c % 2 == 0 {
            sink += 1;
            (sinks[sink - 1], sources[source])
        } else {
            source += 1;
            (sources[source - 1], sinks[sink])
        };
        let corners = [
            mesh.corner(left, 1),
            mesh.corner(right, 0),
            mesh.corner(right, 3),
            mesh.corner(left, 2),
        ];
        connections.push(mesh.quad_from_corners(corners));
    }

    LayerCells {
        sources,
        sinks,
        connections,
    }
}
