// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use nalgebra::{DMatrix, DVector};

/// A square system `A·x = b` assembled row by row.
#[derive(Clone, Debug)]
pub(crate) struct DenseSystem {
    n: usize,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl DenseSystem {
    pub(crate) fn new(n: usize) -> Self {
        DenseSystem {
            n,
            a: vec![0.0; n * n],
            b: vec![0.0; n],
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.n + col] = value;
    }

    pub(crate) fn set_rhs(&mut self, row: usize, value: f64) {
        self.b[row] = value;
    }

    /// Solves with a dense LU decomposition. `None` when the matrix is
    /// singular or the solution is not finite.
    pub(crate) fn solve(&self) -> Option<Vec<f64>> {
        let a = DMatrix::from_row_slice(self.n, self.n, &self.a);
        let b = DVector::from_column_slice(&self.b);
        let x = a.lu().solve(&b)?;
        if x.iter().all(|v| v.is_finite()) {
            Some(x.iter().copied().collect())
        } else {
            None
        }
    }
}
