// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::FRAC_1_SQRT_2 as S;

use crate::meander::MeanderDimensions;
use crate::mesh::{Mesh, Point, QuadId};

/// The cells of one serpentine. The entry and exit are each a vertical run,
/// a quarter arc and a horizontal run, in that order from the outside in.
#[derive(Clone, Debug)]
pub struct MeanderCells {
    pub entry: [QuadId; 3],
    pub exit: [QuadId; 3],
    /// Full-width horizontal runs between consecutive turns.
    pub straights: Vec<QuadId>,
    /// Two quarter-arc cells per 180° turn.
    pub turns: Vec<QuadId>,
}

impl MeanderCells {
    pub fn quads(&self) -> impl Iterator<Item = QuadId> + '_ {
        self.entry
            .iter()
            .chain(self.exit.iter())
            .chain(self.straights.iter())
            .chain(self.turns.iter())
            .copied()
    }
}

/// Lays out the serpentine `dims` centered on `(x, y)`. The entry run
/// starts at the top edge of the bounding box and the exit run ends at the
/// bottom edge, both on `x`.
pub(crate) fn build_meander(mesh: &mut Mesh, dims: &MeanderDimensions, x: f64, y: f64) -> MeanderCells {
    let w = dims.channel_width;
    let r = dims.radius;
    let n = dims.turns;
    let l0 = dims.straight_run();
    let l1 = dims.inner_run();
    let l2 = dims.lateral_run();
    let r_min = r - 0.5 * w;
    let r_max = r + 0.5 * w;
    let top = y + 0.5 * dims.height;
    let bottom = y - 0.5 * dims.height;

    let inlet0 = mesh.rectangle(x, top - 0.5 * l0, w, l0);
    let inlet2 = mesh.rectangle(x - r - 0.5 * l2, top - l0 - r, l2, w);
    let (xc, yc) = (x - r, top - l0);
    let (p0, p1) = (mesh.corner(inlet0, 1), mesh.corner(inlet0, 0));
    let (p2, p3) = (mesh.corner(inlet2, 2), mesh.corner(inlet2, 1));
    let inlet1 = mesh.arc_quad(
        p0,
        p1,
        Point::new(xc + r_min * S, yc - r_min * S),
        p2,
        p3,
        Point::new(xc + r_max * S, yc - r_max * S),
    );

    // an even number of turns ends on the right
    let from_right = n % 2 == 0;
    let side = if from_right { 1.0 } else { -1.0 };
    let outlet0 = mesh.rectangle(x, bottom + 0.5 * l0, w, l0);
    let outlet2 = mesh.rectangle(x + side * (r + 0.5 * l2), bottom + l0 + r, l2, w);
    let (xc, yc) = (x + side * r, bottom + l0);
    let (p0, p1) = (mesh.corner(outlet0, 3), mesh.corner(outlet0, 2));
    let (p2, p3, via12, via30) = if from_right {
        (
            mesh.corner(outlet2, 0),
            mesh.corner(outlet2, 3),
            Point::new(xc - r_min * S, yc + r_min * S),
            Point::new(xc - r_max * S, yc + r_max * S),
        )
    } else {
        (
            mesh.corner(outlet2, 2),
            mesh.corner(outlet2, 1),
            Point::new(xc + r_max * S, yc + r_max * S),
            Point::new(xc + r_min * S, yc + r_min * S),
        )
    };
    let outlet1 = mesh.arc_quad(p0, p1, via12, p2, p3, via30);

    let straights: Vec<QuadId> = (1..n)
        .map(|i| mesh.rectangle(x, top - l0 - r * (2 * i + 1) as f64, l1, w))
        .collect();

    let mut runs = Vec::with_capacity(n + 1);
    runs.push(inlet2);
    runs.extend(straights.iter().copied());
    runs.push(outlet2);

    let mut turns = Vec::with_capacity(2 * n);
    for (i, pair) in runs.windows(2).enumerate() {
        let cells = if i % 2 == 0 {
            left_turn(mesh, pair[0], pair[1], r_min, r_max)
        } else {
            right_turn(mesh, pair[0], pair[1], r_min, r_max)
        };
        turns.extend(cells);
    }

    MeanderCells {
        entry: [inlet0, inlet1, inlet2],
        exit: [outlet0, outlet1, outlet2],
        straights,
        turns,
    }
}

/// 180° turn joining the left ends of two stacked horizontal runs.
fn left_turn(mesh: &mut Mesh, top: QuadId, bottom: QuadId, r_min: f64, r_max: f64) -> [QuadId; 2] {
    let (top0, top3) = (mesh.corner(top, 0), mesh.corner(top, 3));
    let (bottom0, bottom3) = (mesh.corner(bottom, 0), mesh.corner(bottom, 3));

    let xc = mesh.point(top0).x;
    let yc = 0.5 * (mesh.point(top0).y + mesh.point(bottom3).y);
    let outer = mesh.add_vertex(Point::new(xc - r_max, yc));
    let inner = mesh.add_vertex(Point::new(xc - r_min, yc));

    let upper = mesh.arc_quad(
        outer,
        inner,
        Point::new(xc - r_min * S, yc + r_min * S),
        top0,
        top3,
        Point::new(xc - r_max * S, yc + r_max * S),
    );
    let lower = mesh.arc_quad(
        inner,
        outer,
        Point::new(xc - r_max * S, yc - r_max * S),
        bottom0,
        bottom3,
        Point::new(xc - r_min * S, yc - r_min * S),
    );
    [upper, lower]
}

/// 180° turn joining the right ends of two stacked horizontal runs.
fn right_turn(mesh: &mut Mesh, top: QuadId, bottom: QuadId, r_min: f64, r_max: f64) -> [QuadId; 2] {
    let (top1, top2) = (mesh.corner(top, 1), mesh.corner(top, 2));
    let (bottom1, bottom2) = (mesh.corner(bottom, 1), mesh.corner(bottom, 2));

    let xc = mesh.point(top2).x;
    let yc = 0.5 * (mesh.point(top1).y + mesh.point(bottom2).y);
    let inner = mesh.add_vertex(Point::new(xc + r_min, yc));
    let outer = mesh.add_vertex(Point::new(xc + r_max, yc));

    let upper = mesh.arc_quad(
        inner,
        outer,
        Point::new(xc + r_max * S, yc + r_max * S),
        top2,
        top1,
        Point::new(xc + r_min * S, yc + r_min * S),
    );
    let lower = mesh.arc_quad(
        outer,
        inner,
        Point::new(xc + r_min * S, yc - r_min * S),
        bottom2,
        bottom1,
        Point::new(xc + r_max * S, yc - r_max * S),
    );
    [upper, lower]
}
