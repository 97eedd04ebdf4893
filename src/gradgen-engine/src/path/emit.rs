// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use log::warn;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::boundary::BoundaryLoop;
use crate::mesh::{Mesh, Point};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Line {
        to: Point,
    },
    /// Circular arc through `via`, with the flags of an SVG arc command.
    Arc {
        to: Point,
        via: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool,
    },
}

impl Segment {
    pub fn end(&self) -> Point {
        match self {
            Segment::Line { to } => *to,
            Segment::Arc { to, .. } => *to,
        }
    }
}

/// One closed outline: a start point and the segments that lead back to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubPath {
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl SubPath {
    /// Every point the outline is drawn through, arc midpoints included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().flat_map(|s| {
            let via = match s {
                Segment::Arc { via, .. } => Some(*via),
                Segment::Line { .. } => None,
            };
            via.into_iter().chain(std::iter::once(s.end()))
        }))
    }

    /// Whether the last segment ends on the start point.
    pub fn is_closed(&self) -> bool {
        self.segments.last().is_some_and(|s| s.end() == self.start)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest box around every point of `paths`, or `None` for no paths.
    pub fn of_paths(paths: &[SubPath]) -> Option<Bounds> {
        let mut points = paths.iter().flat_map(|p| p.points());
        let first = points.next()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Turns each loop into a sub-path of line and arc segments.
///
/// Arc flags are taken for the direction the loop walks the edge. An arc
/// whose three points are collinear is drawn as a line.
pub fn emit_paths(mesh: &Mesh, loops: &[BoundaryLoop]) -> Vec<SubPath> {
    loops
        .iter()
        .filter_map(|boundary| {
            let start = mesh.point(boundary.start()?);
            let segments = boundary
                .edges
                .iter()
                .map(|edge| {
                    let to = mesh.point(edge.end);
                    let Some(via) = edge.via else {
                        return Segment::Line { to };
                    };
                    match mesh.arc_geometry(edge) {
                        Some(arc) => Segment::Arc {
                            to,
                            via: mesh.point(via),
                            radius: arc.radius,
                            large_arc: arc.large_arc,
                            sweep: arc.sweep,
                        },
                        None => {
                            warn!("degenerate arc ending at ({:e}, {:e}) drawn as a line", to.x, to.y);
                            Segment::Line { to }
                        }
                    }
                })
                .collect();
            Some(SubPath { start, segments })
        })
        .collect()
}
