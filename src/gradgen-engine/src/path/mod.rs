// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The outer silhouette of a mesh as closed vector paths.

pub mod boundary;
pub mod emit;

pub use self::boundary::{BoundaryLoop, boundary_edges, extract_loops};
pub use self::emit::{Bounds, Segment, SubPath, emit_paths};
