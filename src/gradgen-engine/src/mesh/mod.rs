// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! An arena of shared vertices and the quads built on them.
//!
//! Neighbouring quads join by referring to the same vertices, so the edge
//! they share appears exactly twice. Rectangle corners run counter-clockwise
//! from the bottom left: `0` bottom left, `1` bottom right, `2` top right,
//! `3` top left.

pub mod geometry;
pub mod quad;

pub use self::geometry::{ArcGeometry, Point};
pub use self::quad::{Edge, EdgeKey, Quad, QuadId, VertexId};

use crate::common::Result;
use crate::geometry_err;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Point>,
    quads: Vec<Quad>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Reassembles a mesh from its parts, for instance after reordering
    /// the quads. Fails when a quad refers to a vertex past the end of
    /// `vertices`.
    pub fn from_parts(vertices: Vec<Point>, quads: Vec<Quad>) -> Result<Self> {
        for (q, quad) in quads.iter().enumerate() {
            let dangling = quad
                .edges
                .iter()
                .flat_map(|e| [Some(e.start), Some(e.end), e.via])
                .flatten()
                .find(|v| v.index() >= vertices.len());
            if let Some(v) = dangling {
                return geometry_err!(
                    DanglingVertex,
                    format!("quad {q} uses vertex {} of {}", v.index(), vertices.len())
                );
            }
        }
        Ok(Mesh { vertices, quads })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn quad(&self, id: QuadId) -> &Quad {
        &self.quads[id.index()]
    }

    pub fn point(&self, v: VertexId) -> Point {
        self.vertices[v.index()]
    }

    pub fn add_vertex(&mut self, p: Point) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(p);
        id
    }

    pub fn add_quad(&mut self, quad: Quad) -> QuadId {
        let id = QuadId(self.quads.len() as u32);
        self.quads.push(quad);
        id
    }

    /// Axis-aligned rectangle centered on `(cx, cy)`, `wx` wide and `wy`
    /// tall.
    pub fn rectangle(&mut self, cx: f64, cy: f64, wx: f64, wy: f64) -> QuadId {
        let (hx, hy) = (0.5 * wx, 0.5 * wy);
        self.polygon([
            Point::new(cx - hx, cy - hy),
            Point::new(cx + hx, cy - hy),
            Point::new(cx + hx, cy + hy),
            Point::new(cx - hx, cy + hy),
        ])
    }

    pub fn square(&mut self, cx: f64, cy: f64, a: f64) -> QuadId {
        self.rectangle(cx, cy, a, a)
    }

    /// Straight-sided quad through four new vertices.
    pub fn polygon(&mut self, corners: [Point; 4]) -> QuadId {
        let ids = corners.map(|p| self.add_vertex(p));
        self.add_quad(Quad::from_corners(ids))
    }

    /// Straight-sided quad over existing vertices.
    pub fn quad_from_corners(&mut self, corners: [VertexId; 4]) -> QuadId {
        self.add_quad(Quad::from_corners(corners))
    }

    /// Curved band over existing vertices; see [`Quad::arc`]. The two arc
    /// midpoints become new vertices.
    pub fn arc_quad(
        &mut self,
        p0: VertexId,
        p1: VertexId,
        via12: Point,
        p2: VertexId,
        p3: VertexId,
        via30: Point,
    ) -> QuadId {
        let via12 = self.add_vertex(via12);
        let via30 = self.add_vertex(via30);
        self.add_quad(Quad::arc(p0, p1, via12, p2, p3, via30))
    }

    pub fn corner(&self, q: QuadId, i: usize) -> VertexId {
        self.quad(q).corner(i)
    }

    pub fn corner_point(&self, q: QuadId, i: usize) -> Point {
        self.point(self.corner(q, i))
    }

    pub fn replace_corner(&mut self, q: QuadId, i: usize, v: VertexId) {
        self.quads[q.index()].replace_corner(i, v);
    }

    /// Makes corner `i` of `q` the vertex already at corner `j` of `target`.
    pub fn merge_corner(&mut self, q: QuadId, i: usize, target: QuadId, j: usize) {
        let v = self.corner(target, j);
        self.replace_corner(q, i, v);
    }

    /// Circle of an arc edge, in the edge's direction. `None` for lines and
    /// for arcs whose three points are collinear.
    pub fn arc_geometry(&self, edge: &Edge) -> Option<ArcGeometry> {
        let via = edge.via?;
        ArcGeometry::through(self.point(edge.start), self.point(edge.end), self.point(via))
    }

    /// True length of an edge, following the arc for curved ones.
    pub fn edge_length(&self, edge: &Edge) -> f64 {
        match self.arc_geometry(edge) {
            Some(arc) => arc.length(),
            None => self.point(edge.start).distance(&self.point(edge.end)),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.quads.iter().flat_map(|q| q.edges.iter())
    }
}
