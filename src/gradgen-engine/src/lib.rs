// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Layout engine for two-inlet microfluidic gradient generators.
//!
//! [`generate`] runs the whole pipeline: parameter validation, the flow and
//! meander-resistance solve, meander sizing, mesh assembly and boundary
//! extraction. Every stage returns a structured [`Error`] on failure.

#![forbid(unsafe_code)]

pub mod common;

pub mod builder;
pub mod config;
pub mod meander;
pub mod mesh;
pub mod network;
pub mod params;
pub mod path;
pub mod render;
pub mod resistance;

use log::info;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::Serialize;

pub use self::builder::{Device, DeviceBuilder};
pub use self::common::{Error, ErrorCode, ErrorKind, MeanderId, Origin, Result};
pub use self::config::SolverConfig;
pub use self::meander::{MeanderDimensions, MeanderGroup};
pub use self::network::{Channel, ChannelIndex, Network};
pub use self::params::{InletParams, OutletParams, OutletStyle, Parameters};
pub use self::path::{Bounds, Segment, SubPath};
pub use self::render::{render_svg, svg_path_data};

/// Solved channels and the sized meanders of every layer.
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    pub network: Network,
    /// `meanders[k][m]`: sizing of meander `m` of layer `k`.
    pub meanders: Vec<Vec<MeanderDimensions>>,
}

/// A finished layout: the device outline plus everything solved on the
/// way to it.
#[derive(Clone, Debug, Serialize)]
pub struct Design {
    /// Closed outlines of the device, in metres, y pointing up.
    pub paths: Vec<SubPath>,
    pub bounds: Bounds,
    pub network: Network,
    pub meanders: Vec<Vec<MeanderDimensions>>,
}

impl Design {
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn to_svg(&self) -> String {
        render_svg(self)
    }
}

/// Summary of the layout for tools that want a schema of the output.
#[derive(Clone, Debug, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Outline {
    pub paths: Vec<SubPath>,
    pub bounds: Bounds,
}

impl From<&Design> for Outline {
    fn from(design: &Design) -> Self {
        Outline {
            paths: design.paths.clone(),
            bounds: design.bounds,
        }
    }
}

/// Validates `params`, solves the network and sizes every meander.
pub fn solve(params: &Parameters, config: &SolverConfig) -> Result<Solution> {
    params.validate_with_config(config)?;

    let mut network = Network::new(params);
    network.solve(config)?;

    let group = MeanderGroup::new(params.width, params.radius, params.max_meander_width);
    let meanders = (0..network.n_layers())
        .map(|layer| group.solve(layer, &network.meander_lengths(layer)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Solution { network, meanders })
}

pub fn generate(params: &Parameters) -> Result<Design> {
    generate_with_config(params, &SolverConfig::default())
}

pub fn generate_with_config(params: &Parameters, config: &SolverConfig) -> Result<Design> {
    let Solution { network, meanders } = solve(params, config)?;

    let device = DeviceBuilder::new(params, &network).build(&meanders)?;
    let loops = path::extract_loops(&device.mesh)?;
    let paths = path::emit_paths(&device.mesh, &loops);
    let Some(bounds) = Bounds::of_paths(&paths) else {
        return crate::geometry_err!(OpenBoundary, "mesh has no boundary edges".to_string());
    };

    info!(
        "generated {} outlets in {} layers: {} closed outline(s), {:e} x {:e} m",
        params.n_outlets(),
        network.n_layers(),
        paths.len(),
        bounds.width(),
        bounds.height()
    );

    Ok(Design {
        paths,
        bounds,
        network,
        meanders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::baseline;

    #[test]
    fn test_generate_baseline() {
        let design = generate(&baseline()).unwrap();

        assert_eq!(design.paths.len(), 1);
        assert!(design.paths[0].is_closed());
        assert_eq!(design.meanders.len(), 1);
        assert_eq!(design.meanders[0].len(), 3);
        // three meanders side by side, each at most max_meander_width wide
        assert!(design.width() > 3.0 * 5000e-6);
        assert!(design.width() < 3.0 * 6300e-6);
        assert!(design.height() > 0.0);
    }

    #[test]
    fn test_parameter_error_stops_early() {
        let mut params = baseline();
        params.height = 400e-6;
        let err = generate(&params).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parameter);
        assert_eq!(err.field(), Some("height"));
    }

    #[test]
    fn test_outline_from_design() {
        let design = generate(&baseline()).unwrap();
        let outline = Outline::from(&design);
        assert_eq!(outline.paths, design.paths);
        assert_eq!(outline.bounds, design.bounds);
    }
}
