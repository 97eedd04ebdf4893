// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeSet, HashMap};

use smallvec::SmallVec;

use crate::common::Result;
use crate::geometry_err;
use crate::mesh::{Edge, EdgeKey, Mesh, VertexId};

/// A closed chain of boundary edges, each oriented to start where the
/// previous one ends.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryLoop {
    pub edges: Vec<Edge>,
}

impl BoundaryLoop {
    pub fn start(&self) -> Option<VertexId> {
        self.edges.first().map(|e| e.start)
    }

    /// The loop's edges without order or direction.
    pub fn edge_set(&self) -> BTreeSet<EdgeKey> {
        self.edges.iter().map(Edge::key).collect()
    }
}

/// Edges that belong to exactly one quad, in mesh order.
pub fn boundary_edges(mesh: &Mesh) -> Vec<Edge> {
    let mut counts: HashMap<EdgeKey, usize> = HashMap::new();
    for edge in mesh.edges() {
        *counts.entry(edge.key()).or_insert(0) += 1;
    }
    mesh.edges()
        .filter(|e| counts.get(&e.key()) == Some(&1))
        .copied()
        .collect()
}

/// Chains the boundary edges of `mesh` into closed loops.
///
/// Each walk starts at the first unused boundary edge and follows unused
/// edges through their shared vertices until it is back at its start. A
/// walk that runs out of edges first is an `open_boundary` error.
pub fn extract_loops(mesh: &Mesh) -> Result<Vec<BoundaryLoop>> {
    let edges = boundary_edges(mesh);

    let mut incident: HashMap<VertexId, SmallVec<[usize; 4]>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        incident.entry(edge.start).or_default().push(i);
        incident.entry(edge.end).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let origin = edges[first].start;
        let mut current = edges[first].end;
        let mut chain = vec![edges[first]];

        while current != origin {
            let next = incident
                .get(&current)
                .and_then(|candidates| candidates.iter().copied().find(|&j| !used[j]));
            let Some(j) = next else {
                let p = mesh.point(current);
                return geometry_err!(
                    OpenBoundary,
                    format!(
                        "boundary walk from vertex {} stops at ({:e}, {:e}) after {} edges",
                        origin.index(),
                        p.x,
                        p.y,
                        chain.len()
                    )
                );
            };
            used[j] = true;
            let edge = if edges[j].start == current {
                edges[j]
            } else {
                edges[j].reversed()
            };
            current = edge.end;
            chain.push(edge);
        }

        loops.push(BoundaryLoop { edges: chain });
    }

    Ok(loops)
}
