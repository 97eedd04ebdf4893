// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hydraulic resistance of a rectangular micro-channel.
//!
//! Uses the truncated-series approximation for a rectangular duct:
//! `R = l · A(w,h) · mu / (w · h³)` with
//! `A(w,h) = 12 / (1 − 192·h·tanh(π·w / 2h) / (π⁵·w))`.

use std::f64::consts::PI;

/// Geometry factor `A(w, h)`. Requires `w > 0` and `h > 0`.
pub fn shape_factor(w: f64, h: f64) -> f64 {
    12.0 / (1.0 - 192.0 * h * (PI * w / (2.0 * h)).tanh() / (PI.powi(5) * w))
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResistanceModel {
    pub viscosity: f64,
}

impl ResistanceModel {
    pub fn new(viscosity: f64) -> Self {
        ResistanceModel { viscosity }
    }

    pub fn resistance(&self, w: f64, h: f64, l: f64) -> f64 {
        l * shape_factor(w, h) * self.viscosity / (w * h.powi(3))
    }

    /// Resistance per unit length; multiplying by a length gives the real
    /// resistance, dividing a resistance by it gives the length.
    pub fn unit_resistance(&self, w: f64, h: f64) -> f64 {
        self.resistance(w, h, 1.0)
    }
}
