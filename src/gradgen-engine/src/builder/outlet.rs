// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::index_factor;
use crate::mesh::{Mesh, Point, QuadId};

/// The cells of one outlet. `head` is the cell the last meander drains
/// into; its corners 2 and 3 sit on the hand-over line.
#[derive(Clone, Debug)]
pub struct OutletCells {
    pub head: QuadId,
    pub tail: Vec<QuadId>,
}

impl OutletCells {
    pub fn quads(&self) -> impl Iterator<Item = QuadId> + '_ {
        std::iter::once(self.head).chain(self.tail.iter().copied())
    }
}

/// A straight run down from `(x, y)`, never shorter than `w`.
pub(crate) fn build_straight_outlet(mesh: &mut Mesh, x: f64, y: f64, w: f64, length: f64) -> OutletCells {
    let l = length.max(w);
    OutletCells {
        head: mesh.rectangle(x, y - 0.5 * l, w, l),
        tail: Vec::new(),
    }
}

/// Depth below the hand-over line where every angular outlet ends.
pub fn angular_outlet_depth(w: f64, n_outlets: usize) -> f64 {
    if n_outlets % 2 == 0 {
        (n_outlets + 1) as f64 * w
    } else {
        n_outlets as f64 * w
    }
}

/// An outlet that steps in towards the device axis, so that all outlets
/// finish on one line at a pitch of `2w`: down, across and down again,
/// with a square at each corner. The middle outlet of an odd count stays
/// straight.
pub(crate) fn build_angular_outlet(
    mesh: &mut Mesh,
    index: usize,
    n_outlets: usize,
    y: f64,
    w: f64,
    connection_length: f64,
) -> OutletCells {
    let factor = index_factor(index, n_outlets);
    let x = factor * 2.0 * connection_length;
    let depth = angular_outlet_depth(w, n_outlets);
    let f = factor.abs();
    if f == 0.0 {
        return build_straight_outlet(mesh, x, y, w, depth);
    }

    let l0 = if n_outlets % 2 == 0 {
        2.0 * f * w
    } else {
        (2.0 * f - 1.0) * w
    };
    let l1 = 2.0 * f * (connection_length - w) - w;
    // towards the axis
    let dir = if factor < 0.0 { 1.0 } else { -1.0 };

    let yc = y - (l0 + 0.5 * w);
    let upper = mesh.square(x, yc, w);
    let xe = x + dir * (l1 + w);
    let lower = mesh.square(xe, yc, w);

    let across = if dir > 0.0 {
        [
            mesh.corner(upper, 1),
            mesh.corner(lower, 0),
            mesh.corner(lower, 3),
            mesh.corner(upper, 2),
        ]
    } else {
        [
            mesh.corner(lower, 1),
            mesh.corner(upper, 0),
            mesh.corner(upper, 3),
            mesh.corner(lower, 2),
        ]
    };
    let across = mesh.quad_from_corners(across);

    let top_right = mesh.add_vertex(Point::new(x + 0.5 * w, y));
    let top_left = mesh.add_vertex(Point::new(x - 0.5 * w, y));
    let (upper3, upper2) = (mesh.corner(upper, 3), mesh.corner(upper, 2));
    let head = mesh.quad_from_corners([upper3, upper2, top_right, top_left]);

    let bottom_left = mesh.add_vertex(Point::new(xe - 0.5 * w, y - depth));
    let bottom_right = mesh.add_vertex(Point::new(xe + 0.5 * w, y - depth));
    let (lower1, lower0) = (mesh.corner(lower, 1), mesh.corner(lower, 0));
    let down = mesh.quad_from_corners([bottom_left, bottom_right, lower1, lower0]);

    OutletCells {
        head,
        tail: vec![upper, across, lower, down],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    const W: f64 = 300e-6;
    const L_CONN: f64 = 3150e-6;

    fn ends(n: usize) -> Vec<Point> {
        let mut mesh = Mesh::new();
        (0..n)
            .map(|o| {
                let cells = build_angular_outlet(&mut mesh, o, n, 0.0, W, L_CONN);
                let last = cells.quads().last().unwrap();
                let a = mesh.corner_point(last, 0);
                let b = mesh.corner_point(last, 1);
                Point::new(0.5 * (a.x + b.x), a.y)
            })
            .collect()
    }

    #[test]
    fn test_angular_outlets_end_on_one_line() {
        for n in [3, 4, 5, 6] {
            let ends = ends(n);
            let depth = angular_outlet_depth(W, n);
            for (o, end) in ends.iter().enumerate() {
                assert!(approx_eq!(f64, end.y, -depth, epsilon = 1e-12), "n = {n}, o = {o}");
                let pitch = index_factor(o, n) * 2.0 * W;
                assert!(approx_eq!(f64, end.x, pitch, epsilon = 1e-12), "n = {n}, o = {o}");
            }
        }
    }

    #[test]
    fn test_angular_outlet_cells_are_joined() {
        let mut mesh = Mesh::new();
        let cells = build_angular_outlet(&mut mesh, 0, 3, 0.0, W, L_CONN);
        assert_eq!(cells.tail.len(), 4);

        let head = mesh.quad(cells.head);
        let upper = mesh.quad(cells.tail[0]);
        let across = mesh.quad(cells.tail[1]);
        let lower = mesh.quad(cells.tail[2]);
        let down = mesh.quad(cells.tail[3]);
        assert_eq!(head.edges[0], upper.edges[2]);
        assert_eq!(across.edges[3], upper.edges[1]);
        assert_eq!(across.edges[1], lower.edges[3]);
        assert_eq!(down.edges[2], lower.edges[0]);

        // the hand-over corners sit on the line
        assert_eq!(mesh.corner_point(cells.head, 2), Point::new(-L_CONN * 2.0 + 0.5 * W, 0.0));
    }

    #[test]
    fn test_straight_outlet_minimum_length() {
        let mut mesh = Mesh::new();
        let cells = build_straight_outlet(&mut mesh, 0.0, 0.0, W, 0.0);
        assert!(cells.tail.is_empty());
        assert!(approx_eq!(f64, mesh.corner_point(cells.head, 0).y, -W, epsilon = 1e-15));
    }
}
