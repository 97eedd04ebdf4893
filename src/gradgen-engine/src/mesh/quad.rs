// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::hash::{Hash, Hasher};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuadId(pub(crate) u32);

impl QuadId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed side of a quad: a straight line, or a circular arc through
/// `via`.
///
/// Equality and hashing ignore direction, so the two copies of an edge
/// shared by neighbouring quads compare equal. A line never equals an arc.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    pub start: VertexId,
    pub end: VertexId,
    pub via: Option<VertexId>,
}

/// Direction-free identity of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: VertexId,
    hi: VertexId,
    via: Option<VertexId>,
}

impl Edge {
    pub fn line(start: VertexId, end: VertexId) -> Self {
        Edge {
            start,
            end,
            via: None,
        }
    }

    pub fn arc(start: VertexId, end: VertexId, via: VertexId) -> Self {
        Edge {
            start,
            end,
            via: Some(via),
        }
    }

    pub fn is_arc(&self) -> bool {
        self.via.is_some()
    }

    pub fn reversed(&self) -> Self {
        Edge {
            start: self.end,
            end: self.start,
            via: self.via,
        }
    }

    /// Whether `v` is one of the endpoints.
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.start == v || self.end == v
    }

    /// The endpoint across from `v`, if `v` is an endpoint.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            lo: self.start.min(self.end),
            hi: self.start.max(self.end),
            via: self.via,
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

/// Four edges forming a closed loop; edge `i` starts at corner `i`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    pub edges: [Edge; 4],
}

impl Quad {
    /// A quad with straight sides through `corners` in order.
    pub fn from_corners(corners: [VertexId; 4]) -> Self {
        Quad {
            edges: [
                Edge::line(corners[0], corners[1]),
                Edge::line(corners[1], corners[2]),
                Edge::line(corners[2], corners[3]),
                Edge::line(corners[3], corners[0]),
            ],
        }
    }

    /// A curved band: straight sides `p0 → p1` and `p2 → p3`, joined by
    /// the arcs `p1 → p2` through `via12` and `p3 → p0` through `via30`.
    pub fn arc(
        p0: VertexId,
        p1: VertexId,
        via12: VertexId,
        p2: VertexId,
        p3: VertexId,
        via30: VertexId,
    ) -> Self {
        Quad {
            edges: [
                Edge::line(p0, p1),
                Edge::arc(p1, p2, via12),
                Edge::line(p2, p3),
                Edge::arc(p3, p0, via30),
            ],
        }
    }

    pub fn corner(&self, i: usize) -> VertexId {
        self.edges[i % 4].start
    }

    pub fn corners(&self) -> [VertexId; 4] {
        [
            self.edges[0].start,
            self.edges[1].start,
            self.edges[2].start,
            self.edges[3].start,
        ]
    }

    /// Moves corner `i` onto `v`, keeping both incident edges attached.
    pub fn replace_corner(&mut self, i: usize, v: VertexId) {
        let i = i % 4;
        self.edges[i].start = v;
        self.edges[(i + 3) % 4].end = v;
    }

    /// Every edge ends where the next one starts.
    pub fn is_closed(&self) -> bool {
        (0..4).all(|i| self.edges[i].end == self.edges[(i + 1) % 4].start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(i: u32) -> VertexId {
        VertexId(i)
    }

    #[test]
    fn test_edge_equality_ignores_direction() {
        let a = Edge::line(v(0), v(1));
        assert_eq!(a, a.reversed());
        assert_ne!(a, Edge::line(v(0), v(2)));
        // same endpoints, different kind
        assert_ne!(a, Edge::arc(v(0), v(1), v(5)));
        assert_ne!(Edge::arc(v(0), v(1), v(5)), Edge::arc(v(0), v(1), v(6)));

        let set: HashSet<Edge> = [a, a.reversed(), Edge::arc(v(1), v(0), v(5))]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_edge_endpoints() {
        let e = Edge::arc(v(3), v(7), v(9));
        assert!(e.has_vertex(v(3)));
        assert!(!e.has_vertex(v(9)));
        assert_eq!(e.other(v(7)), Some(v(3)));
        assert_eq!(e.other(v(9)), None);
    }

    #[test]
    fn test_replace_corner_keeps_loop_closed() {
        let mut q = Quad::from_corners([v(0), v(1), v(2), v(3)]);
        assert!(q.is_closed());

        q.replace_corner(0, v(10));
        q.replace_corner(2, v(12));
        assert!(q.is_closed());
        assert_eq!(q.corners(), [v(10), v(1), v(12), v(3)]);
        assert_eq!(q.edges[3].end, v(10));
        assert_eq!(q.edges[1].end, v(12));
    }

    #[test]
    fn test_arc_quad() {
        let q = Quad::arc(v(0), v(1), v(8), v(2), v(3), v(9));
        assert!(q.is_closed());
        assert!(!q.edges[0].is_arc());
        assert_eq!(q.edges[1].via, Some(v(8)));
        assert_eq!(q.edges[3].via, Some(v(9)));
    }
}
