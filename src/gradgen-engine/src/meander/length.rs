// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Closed-form relations between a serpentine's centerline length, its outer
//! bounding width `wm`, bounding height `hm` and number of 180° turns `n`,
//! for channel width `w` and turn radius `r`.
//!
//! The serpentine is an entry run and quarter arc, `n` full turns joined by
//! straight runs, and an exit quarter arc and run:
//!
//! `l = r·(n+1)·(π−4) + hm + (wm − w)·n`
//!
//! Turn counts are returned as `i64` because the inverse relations go
//! negative when the requested length is too short for the footprint.

use std::f64::consts::PI;

pub fn length(w: f64, r: f64, wm: f64, hm: f64, n: i64) -> f64 {
    let n = n as f64;
    r * (n + 1.0) * (PI - 4.0) + hm + (wm - w) * n
}

/// Smallest turn count that reaches `l` at the given bounding box.
pub fn turn_count(l: f64, r: f64, w: f64, wm: f64, hm: f64) -> i64 {
    ((l + r * (4.0 - PI) - hm) / (r * (PI - 4.0) + wm - w)).ceil() as i64
}

/// Largest turn count for which `l` still fits a bounding box of width `wm`
/// while the box stays tall enough for the turns (`hm ≥ 2w + 2r(n+1)`).
pub fn max_turn_count(l: f64, r: f64, w: f64, wm: f64) -> i64 {
    ((l + r * (2.0 - PI) - 2.0 * w) / (r * (PI - 2.0) + wm - w)).floor() as i64
}

/// Bounding width realizing `l` with height `hm` and `n` turns.
pub fn width_for(l: f64, r: f64, w: f64, hm: f64, n: i64) -> f64 {
    let n = n as f64;
    (l + r * (n + 1.0) * (4.0 - PI) - hm) / n + w
}

/// Bounding height realizing `l` with width `wm` and `n` turns.
pub fn height_for(l: f64, r: f64, w: f64, wm: f64, n: i64) -> f64 {
    let n = n as f64;
    l + r * (n + 1.0) * (4.0 - PI) - n * (wm - w)
}

/// Lowest bounding height that realizes `l` at most `wm` wide.
///
/// Falls back to the single-turn box `2w + 4r` when `l` is too short to use
/// the full width even once; the width then shrinks to fit.
pub fn minimal_height(l: f64, r: f64, w: f64, wm: f64) -> f64 {
    let n = max_turn_count(l, r, w, wm);
    if n < 1 {
        2.0 * w + 4.0 * r
    } else {
        height_for(l, r, w, wm, n)
    }
}
