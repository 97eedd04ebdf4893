// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use log::debug;
use ordered_float::OrderedFloat;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{MeanderId, Result};
use crate::geometry_err;
use crate::meander::length::{height_for, max_turn_count, turn_count, width_for};

/// Relative slack on the fabrication minimums. The single-turn fallback
/// puts the straight run at exactly `w`, which rounding must not reject.
const RUN_TOLERANCE: f64 = 1e-9;

/// The sized footprint of one serpentine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct MeanderDimensions {
    /// Desired centerline length.
    pub length: f64,
    pub channel_width: f64,
    pub radius: f64,
    /// Outer width of the bounding box.
    pub width: f64,
    /// Outer height of the bounding box, shared by the layer.
    pub height: f64,
    pub turns: usize,
}

impl MeanderDimensions {
    /// Vertical run between the box edge and the first turn.
    pub fn straight_run(&self) -> f64 {
        0.5 * self.height - self.radius * (self.turns as f64 + 1.0)
    }

    /// Horizontal run of every full-width straight between two turns.
    pub fn inner_run(&self) -> f64 {
        self.width - 2.0 * self.radius - self.channel_width
    }

    /// Horizontal run from the box center out to the entry/exit arc.
    pub fn lateral_run(&self) -> f64 {
        0.5 * (self.width - self.channel_width) - 2.0 * self.radius
    }

    fn check(&self, id: MeanderId) -> Result<()> {
        let w = self.channel_width;
        if !(w > 0.0) {
            return geometry_err!(NonPositiveWidth, id, format!("channel width {w} <= 0"));
        }
        if !(self.radius > 0.0) {
            return geometry_err!(NonPositiveRadius, id, format!("radius {} <= 0", self.radius));
        }
        if self.radius < w {
            return geometry_err!(
                RadiusBelowWidth,
                id,
                format!("radius {} < w {}", self.radius, w)
            );
        }
        if self.turns < 1 {
            return geometry_err!(TooFewTurns, id, "turn count < 1".to_string());
        }
        if !(self.width > 0.0) {
            return geometry_err!(
                NonPositiveWidth,
                id,
                format!("meander width {} <= 0", self.width)
            );
        }

        let min_run = w * (1.0 - RUN_TOLERANCE);
        let l0 = self.straight_run();
        if l0 < min_run {
            return geometry_err!(
                StraightRunTooShort,
                id,
                format!("straight run {l0} < w {w}")
            );
        }
        let l2 = self.lateral_run();
        if l2 < min_run {
            return geometry_err!(
                LateralRunTooShort,
                id,
                format!("lateral run {l2} < w {w}")
            );
        }

        Ok(())
    }
}

/// Sizes the serpentines of one layer into a common bounding height.
#[derive(Copy, Clone, Debug)]
pub struct MeanderGroup {
    pub channel_width: f64,
    pub radius: f64,
    pub max_width: f64,
}

impl MeanderGroup {
    pub fn new(channel_width: f64, radius: f64, max_width: f64) -> Self {
        MeanderGroup {
            channel_width,
            radius,
            max_width,
        }
    }

    /// Sizes one meander per entry of `lengths`. The longest meander fixes
    /// the shared height; every other meander back-solves its width.
    /// Errors name the first failing meander of `layer`.
    pub fn solve(&self, layer: usize, lengths: &[f64]) -> Result<Vec<MeanderDimensions>> {
        let w = self.channel_width;
        let r = self.radius;

        let mut dims: Vec<MeanderDimensions> = lengths
            .iter()
            .map(|&length| MeanderDimensions {
                length,
                channel_width: w,
                radius: r,
                width: 0.0,
                height: 0.0,
                turns: 0,
            })
            .collect();

        // first of equally long meanders wins
        let Some(longest) = dims
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, d)| OrderedFloat(d.length))
            .map(|(i, _)| i)
        else {
            return Ok(dims);
        };

        let l = dims[longest].length;
        let n = max_turn_count(l, r, w, self.max_width);
        let (longest_turns, height, longest_width) = if n < 1 {
            let height = 2.0 * w + 4.0 * r;
            (1, height, width_for(l, r, w, height, 1))
        } else {
            (n, height_for(l, r, w, self.max_width, n), self.max_width)
        };
        dims[longest].turns = longest_turns as usize;
        dims[longest].height = height;
        dims[longest].width = longest_width;

        for (i, dim) in dims.iter_mut().enumerate() {
            if i == longest {
                continue;
            }
            dim.height = height;
            let n = turn_count(dim.length, r, w, self.max_width, height);
            if n < 1 {
                dim.turns = 0;
                continue;
            }
            let n = n.min(longest_turns);
            dim.turns = n as usize;
            dim.width = width_for(dim.length, r, w, height, n);
        }

        debug!(
            "layer {layer}: shared meander height {height:e}, turns {:?}",
            dims.iter().map(|d| d.turns).collect::<Vec<_>>()
        );

        for (i, dim) in dims.iter().enumerate() {
            dim.check(MeanderId::new(layer, i))?;
        }

        Ok(dims)
    }
}
