// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::PI;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether `other` lies within `radius` of this point.
    pub fn is_close(&self, other: &Point, radius: f64) -> bool {
        self.distance(other) <= radius
    }
}

/// z-component of `(b - a) × (c - a)`.
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// The circle through an arc's start, end and an interior point, plus the
/// two flags an SVG arc command needs to pick the right one of the four
/// candidate arcs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
    pub center: Point,
    pub radius: f64,
    /// The arc spans more than 180°.
    pub large_arc: bool,
    /// The arc runs in the positive-angle direction from start to end.
    pub sweep: bool,
    /// Signed angle swept from start to end, positive counter-clockwise.
    pub angle: f64,
}

impl ArcGeometry {
    /// Fits the circle through `start`, `via` and `end`, for an arc drawn
    /// from `start` to `end`. `None` when the three points are collinear.
    pub fn through(start: Point, end: Point, via: Point) -> Option<ArcGeometry> {
        let (x1, y1) = (start.x, start.y);
        let (x2, y2) = (end.x, end.y);
        let (x3, y3) = (via.x, via.y);

        let a1 = 2.0 * (x2 - x1);
        let a2 = 2.0 * (x3 - x1);
        let b1 = 2.0 * (y2 - y1);
        let b2 = 2.0 * (y3 - y1);
        let c1 = x2 * x2 - x1 * x1 + y2 * y2 - y1 * y1;
        let c2 = x3 * x3 - x1 * x1 + y3 * y3 - y1 * y1;

        let det = a1 * b2 - b1 * a2;
        if det == 0.0 {
            return None;
        }
        let center = Point::new((c1 * b2 - b1 * c2) / det, (c1 * a2 - a1 * c2) / -det);
        if !center.x.is_finite() || !center.y.is_finite() {
            return None;
        }
        let radius = start.distance(&center);

        let sweep = cross(start, end, via) <= 0.0;
        let center_side = cross(start, end, center) <= 0.0;
        let large_arc = center_side == sweep;

        let a_start = (start.y - center.y).atan2(start.x - center.x);
        let a_end = (end.y - center.y).atan2(end.x - center.x);
        let ccw = (a_end - a_start).rem_euclid(2.0 * PI);
        let angle = if sweep { ccw } else { ccw - 2.0 * PI };

        Some(ArcGeometry {
            center,
            radius,
            large_arc,
            sweep,
            angle,
        })
    }

    pub fn length(&self) -> f64 {
        self.radius * self.angle.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_point_closeness() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert!(a.is_close(&b, 5.0));
        assert!(!a.is_close(&b, 4.99));
    }

    #[test]
    fn test_quarter_arc() {
        let s = 1.0 / 2.0f64.sqrt();
        let arc = ArcGeometry::through(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(s, s),
        )
        .unwrap();

        assert!(approx_eq!(f64, arc.center.x, 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, arc.center.y, 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, arc.radius, 1.0, epsilon = 1e-12));
        assert!(arc.sweep);
        assert!(!arc.large_arc);
        assert!(approx_eq!(f64, arc.length(), PI / 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_reversed_arc_flips_sweep() {
        let s = 1.0 / 2.0f64.sqrt();
        let arc = ArcGeometry::through(
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(s, s),
        )
        .unwrap();

        assert!(!arc.sweep);
        assert!(!arc.large_arc);
        assert!(approx_eq!(f64, arc.angle, -PI / 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_large_arc() {
        // three quarters of the unit circle, from +x round through -x to -y
        let arc = ArcGeometry::through(
            Point::new(1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(-1.0, 0.0),
        )
        .unwrap();

        assert!(arc.sweep);
        assert!(arc.large_arc);
        assert!(approx_eq!(f64, arc.length(), 1.5 * PI, epsilon = 1e-12));
    }

    #[test]
    fn test_collinear_points() {
        let arc = ArcGeometry::through(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 0.0),
        );
        assert!(arc.is_none());
    }
}
