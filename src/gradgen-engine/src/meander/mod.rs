// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Sizing of the serpentine mixing channels.

pub mod group;
pub mod length;

pub use self::group::{MeanderDimensions, MeanderGroup};
