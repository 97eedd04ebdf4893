// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Rasterizes a device outline with tiny-skia.
//!
//! Paths are drawn from the design's own coordinates, not through the SVG
//! text: metres become millimetres, y is flipped so the inlets end up at
//! the top, and the outline sits inside a white margin.

use std::f64::consts::FRAC_PI_2;

use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::Design;
use crate::mesh::{ArcGeometry, Point};
use crate::path::{Bounds, Segment, SubPath};

/// Options controlling PNG rendering output.
#[derive(Clone, Debug)]
pub struct PngRenderOpts {
    /// Resolution of the image.
    pub pixels_per_mm: f32,
    /// Target width in pixels, margins included. Overrides
    /// `pixels_per_mm`.
    pub width: Option<u32>,
    /// White border around the device, in millimetres.
    pub margin_mm: f32,
    /// Fill the channels black.
    pub fill: bool,
    /// Trace the outline with a line this many millimetres wide.
    pub stroke_mm: Option<f32>,
}

impl Default for PngRenderOpts {
    fn default() -> Self {
        PngRenderOpts {
            pixels_per_mm: 20.0,
            width: None,
            margin_mm: 1.0,
            fill: true,
            stroke_mm: None,
        }
    }
}

fn to_mm(p: Point) -> (f32, f32) {
    ((p.x * 1e3) as f32, (p.y * 1e3) as f32)
}

/// Appends `arc` as cubic Béziers of at most a quarter turn each.
fn push_arc(pb: &mut PathBuilder, arc: &ArcGeometry, from: Point) {
    let pieces = (arc.angle.abs() / FRAC_PI_2).ceil().max(1.0);
    let step = arc.angle / pieces;
    let kappa = 4.0 / 3.0 * (step / 4.0).tan();
    let (c, r) = (arc.center, arc.radius);
    let on_circle = |a: f64| Point::new(c.x + r * a.cos(), c.y + r * a.sin());

    let mut a = (from.y - c.y).atan2(from.x - c.x);
    for _ in 0..pieces as usize {
        let b = a + step;
        let (p0, p3) = (on_circle(a), on_circle(b));
        let p1 = Point::new(p0.x - kappa * r * a.sin(), p0.y + kappa * r * a.cos());
        let p2 = Point::new(p3.x + kappa * r * b.sin(), p3.y - kappa * r * b.cos());
        let ((x1, y1), (x2, y2), (x, y)) = (to_mm(p1), to_mm(p2), to_mm(p3));
        pb.cubic_to(x1, y1, x2, y2, x, y);
        a = b;
    }
}

/// One tiny-skia path holding every sub-path, in millimetres.
fn outline_path(paths: &[SubPath]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for path in paths {
        let (x, y) = to_mm(path.start);
        pb.move_to(x, y);
        let mut at = path.start;
        for segment in path.segments.iter() {
            let to = segment.end();
            let arc = match segment {
                Segment::Arc { via, .. } => ArcGeometry::through(at, to, *via),
                Segment::Line { .. } => None,
            };
            match arc {
                Some(arc) => push_arc(&mut pb, &arc, at),
                None => {
                    let (x, y) = to_mm(to);
                    pb.line_to(x, y);
                }
            }
            at = to;
        }
        pb.close();
    }
    pb.finish()
}

/// Draws `paths` onto a white pixmap covering `bounds` plus the margin.
pub fn rasterize(
    paths: &[SubPath],
    bounds: &Bounds,
    opts: &PngRenderOpts,
) -> Result<Pixmap, String> {
    let outline = outline_path(paths).ok_or_else(|| "nothing to draw".to_string())?;

    let margin = opts.margin_mm;
    let w_mm = (bounds.width() * 1e3) as f32 + 2.0 * margin;
    let h_mm = (bounds.height() * 1e3) as f32 + 2.0 * margin;
    let scale = match opts.width {
        Some(px) => px as f32 / w_mm,
        None => opts.pixels_per_mm,
    };
    let px_w = opts.width.unwrap_or((w_mm * scale).ceil() as u32);
    let px_h = (h_mm * scale).ceil() as u32;
    if px_w == 0 || px_h == 0 {
        return Err("computed image dimensions are zero".to_string());
    }

    let mut pixmap =
        Pixmap::new(px_w, px_h).ok_or_else(|| "failed to allocate pixmap".to_string())?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);

    // y up in the device, y down in the image
    let (min_x, max_y) = ((bounds.min_x * 1e3) as f32, (bounds.max_y * 1e3) as f32);
    let transform = Transform::from_row(
        scale,
        0.0,
        0.0,
        -scale,
        scale * (margin - min_x),
        scale * (max_y + margin),
    );

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    if opts.fill {
        pixmap.fill_path(&outline, &paint, FillRule::EvenOdd, transform, None);
    }
    if let Some(width) = opts.stroke_mm {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&outline, &paint, &stroke, transform, None);
    }

    Ok(pixmap)
}

/// PNG bytes of the device outline.
pub fn render_png(design: &Design, opts: &PngRenderOpts) -> Result<Vec<u8>, String> {
    rasterize(&design.paths, &design.bounds, opts)?
        .encode_png()
        .map_err(|e| format!("failed to encode PNG: {e}"))
}
