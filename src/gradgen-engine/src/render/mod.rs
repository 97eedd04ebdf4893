// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! SVG output for a generated design.
//!
//! The mesh is built y-up in metres. Path data is written in millimetres
//! and flipped with `scale(1 -1)`, so the viewBox spans `-max_y..-min_y`.

#[cfg(feature = "png_render")]
pub mod png;

use crate::Design;
use crate::mesh::Point;
use crate::path::{Bounds, Segment, SubPath};

/// Metres as millimetres, rounded to the nanometre. Whole values print
/// without a fraction.
fn mm(v: f64) -> String {
    let v = (v * 1e9).round() / 1e6;
    // no "-0" in the output
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}")
}

fn coord(p: Point) -> String {
    format!("{} {}", mm(p.x), mm(p.y))
}

fn segment_command(segment: &Segment) -> String {
    match segment {
        Segment::Line { to } => format!("L{}", coord(*to)),
        Segment::Arc {
            to,
            radius,
            large_arc,
            sweep,
            ..
        } => {
            let r = mm(*radius);
            format!(
                "A{r} {r} 0 {} {} {}",
                u8::from(*large_arc),
                u8::from(*sweep),
                coord(*to)
            )
        }
    }
}

/// The `d` attribute for `paths`: one `M … Z` run per sub-path.
pub fn svg_path_data(paths: &[SubPath]) -> String {
    paths
        .iter()
        .map(|path| {
            let mut commands = vec![format!("M{}", coord(path.start))];
            commands.extend(path.segments.iter().map(segment_command));
            commands.push("Z".to_string());
            commands.join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn view_box(bounds: &Bounds) -> String {
    format!(
        "{} {} {} {}",
        mm(bounds.min_x),
        mm(-bounds.max_y),
        mm(bounds.width()),
        mm(bounds.height())
    )
}

/// A standalone SVG document for `design`, sized in millimetres.
pub fn render_svg(design: &Design) -> String {
    let bounds = &design.bounds;
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}mm\" height=\"{}mm\" viewBox=\"{}\">\n",
        mm(bounds.width()),
        mm(bounds.height()),
        view_box(bounds)
    ));
    svg.push_str(&format!(
        "<path fill=\"black\" fill-rule=\"evenodd\" transform=\"scale(1 -1)\" d=\"{}\"/>\n",
        svg_path_data(&design.paths)
    ));
    svg.push_str("</svg>\n");
    svg
}
