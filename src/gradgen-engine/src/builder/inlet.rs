// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::index_factor;
use crate::mesh::{Mesh, QuadId};

/// One vertical rectangle per inlet, bottoms aligned on `y = -l_max` so the
/// first layer's squares can hang directly below them.
pub(crate) fn build_inlets(
    mesh: &mut Mesh,
    lengths: &[f64],
    w: f64,
    connection_length: f64,
) -> Vec<QuadId> {
    let l_max = lengths.iter().copied().fold(0.0, f64::max);
    lengths
        .iter()
        .enumerate()
        .map(|(i, &l)| {
            let x = index_factor(i, lengths.len()) * 2.0 * connection_length;
            mesh.rectangle(x, -l_max + 0.5 * l, w, l)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_inlets_align_at_bottom() {
        let mut mesh = Mesh::new();
        let inlets = build_inlets(&mut mesh, &[1000e-6, 2500e-6], 300e-6, 3150e-6);

        let a = mesh.corner_point(inlets[0], 0);
        let b = mesh.corner_point(inlets[1], 0);
        assert!(approx_eq!(f64, a.y, -2500e-6, epsilon = 1e-15));
        assert!(approx_eq!(f64, b.y, -2500e-6, epsilon = 1e-15));
        assert!(a.x < 0.0 && b.x > 0.0);
        // the shorter inlet ends below the origin
        assert!(mesh.corner_point(inlets[0], 3).y < 0.0);
        assert_eq!(mesh.corner_point(inlets[1], 3).y, 0.0);
    }
}
