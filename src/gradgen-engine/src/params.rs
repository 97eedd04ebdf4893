// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The validated parameter object consumed by the pipeline.
//!
//! All lengths are in metres, flow rates in m³/s, the viscosity in Pa·s and
//! the mixing time in seconds.  Concentrations are fractions in `[0, 1]`.
//!
//! # Example
//! ```no_run
//! use gradgen_engine::Parameters;
//!
//! let json_str = r#"{"width": 300e-6, "height": 100e-6, ...}"#;
//! let params = Parameters::from_json(json_str)?;
//! params.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::config::SolverConfig;
use crate::param_err;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct InletParams {
    pub concentration: f64,
    pub flow_rate: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OutletParams {
    pub concentration: f64,
    /// Required for interior outlets; the first and last outlet's flow
    /// follows from the rest of the network.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flow_rate: Option<f64>,
    #[serde(default)]
    pub extra_resistance: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum OutletStyle {
    /// One rectangle per outlet, directly below its meander.
    #[default]
    Straight,
    /// L-shaped outlets that bring all outlets together at a pitch of `2w`.
    Angular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Parameters {
    /// Channel width `w`.
    pub width: f64,
    /// Channel height `h`, at most `w`.
    pub height: f64,
    /// Centerline radius of every turn.
    pub radius: f64,
    /// Upper bound on a meander's outer width.
    pub max_meander_width: f64,
    pub viscosity: f64,
    /// Minimum residence time in every mixing meander.
    pub min_mixing_time: f64,
    pub inlets: Vec<InletParams>,
    pub outlets: Vec<OutletParams>,
    #[serde(default)]
    pub outlet_style: OutletStyle,
}

impl Parameters {
    pub fn from_json(json: &str) -> serde_json::Result<Parameters> {
        serde_json::from_str(json)
    }

    pub fn n_outlets(&self) -> usize {
        self.outlets.len()
    }

    /// Number of distribution layers between the inlets and the outlets.
    pub fn n_layers(&self) -> usize {
        self.outlets.len().saturating_sub(2)
    }

    /// Length of every connecting channel inside a layer.
    pub fn connection_length(&self) -> f64 {
        (self.max_meander_width + self.width) / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_with_config(&SolverConfig::default())
    }

    /// Checks every field and cross-field relation, in declaration order,
    /// stopping at the first violation.
    pub fn validate_with_config(&self, config: &SolverConfig) -> Result<()> {
        let w = self.width;
        let r = self.radius;

        if !(0.0 < w) {
            return param_err!(MustBePositive, "width", "0 < w must hold");
        }
        if !(0.0 < self.height && self.height <= w) {
            return param_err!(OutOfRange, "height", "0 < h <= w must hold");
        }
        if !(w <= r) {
            return param_err!(OutOfRange, "radius", "w <= radius must hold");
        }
        if !(5.0 * w + 8.0 * r < self.max_meander_width) {
            return param_err!(
                OutOfRange,
                "max_meander_width",
                "5*w + 8*radius < max_meander_width must hold"
            );
        }
        if !(0.0 < self.viscosity) {
            return param_err!(MustBePositive, "viscosity", "0 < mu must hold");
        }
        if !(0.0 < self.min_mixing_time) {
            return param_err!(MustBePositive, "min_mixing_time", "0 < tMin must hold");
        }

        if self.inlets.len() != 2 {
            return param_err!(WrongCount, "inlets", "exactly 2 inlets are required");
        }
        let mut inlet_flow_sum = 0.0;
        for (i, inlet) in self.inlets.iter().enumerate() {
            if !(0.0 <= inlet.concentration && inlet.concentration <= 1.0) {
                return param_err!(
                    OutOfRange,
                    format!("inlets[{i}].concentration"),
                    "0 <= c <= 1 must hold"
                );
            }
            if !(0.0 < inlet.flow_rate) {
                return param_err!(
                    MustBePositive,
                    format!("inlets[{i}].flow_rate"),
                    "0 < q must hold"
                );
            }
            inlet_flow_sum += inlet.flow_rate;
            if !(w <= inlet.length) {
                return param_err!(
                    OutOfRange,
                    format!("inlets[{i}].length"),
                    "w <= l must hold"
                );
            }
        }
        if !(self.inlets[0].concentration > self.inlets[1].concentration) {
            return param_err!(
                NotStrictlyDecreasing,
                "inlets[1].concentration",
                "inlet concentrations must strictly decrease"
            );
        }

        let n = self.outlets.len();
        if n < 3 {
            return param_err!(WrongCount, "outlets", "at least 3 outlets are required");
        }
        let mut outlet_flow_sum = 0.0;
        for (i, outlet) in self.outlets.iter().enumerate() {
            let boundary_inlet = if i == 0 {
                Some(&self.inlets[0])
            } else if i == n - 1 {
                Some(&self.inlets[1])
            } else {
                None
            };

            match boundary_inlet {
                Some(inlet) => {
                    let delta = (outlet.concentration - inlet.concentration).abs();
                    if !(delta <= config.concentration_tolerance) {
                        return param_err!(
                            InletMismatch,
                            format!("outlets[{i}].concentration"),
                            "the first and last outlet carry the matching inlet's concentration"
                        );
                    }
                }
                None => {
                    if !(0.0 <= outlet.concentration && outlet.concentration <= 1.0) {
                        return param_err!(
                            OutOfRange,
                            format!("outlets[{i}].concentration"),
                            "0 <= c <= 1 must hold"
                        );
                    }
                    let Some(q) = outlet.flow_rate else {
                        return param_err!(
                            MissingValue,
                            format!("outlets[{i}].flow_rate"),
                            "interior outlets need a flow rate"
                        );
                    };
                    if !(0.0 < q) {
                        return param_err!(
                            MustBePositive,
                            format!("outlets[{i}].flow_rate"),
                            "0 < q must hold"
                        );
                    }
                    outlet_flow_sum += q;
                }
            }

            if !(0.0 <= outlet.extra_resistance) {
                return param_err!(
                    MustBeNonNegative,
                    format!("outlets[{i}].extra_resistance"),
                    "0 <= r must hold"
                );
            }
        }
        for i in 1..n {
            if !(self.outlets[i - 1].concentration > self.outlets[i].concentration) {
                return param_err!(
                    NotStrictlyDecreasing,
                    format!("outlets[{i}].concentration"),
                    "outlet concentrations must strictly decrease"
                );
            }
        }

        if !(outlet_flow_sum < inlet_flow_sum) {
            return param_err!(
                FlowExceedsSupply,
                "outlets",
                "sum of interior outlet flow rates must be below the inlet supply"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::{ErrorCode, ErrorKind};

    /// The default device: 3 outlets blending 100% and 0% into a 50% stream.
    pub(crate) fn baseline() -> Parameters {
        Parameters {
            width: 300e-6,
            height: 100e-6,
            radius: 300e-6,
            max_meander_width: 6000e-6,
            viscosity: 1e-3,
            min_mixing_time: 10.0,
            inlets: vec![
                InletParams {
                    concentration: 1.0,
                    flow_rate: 1e-10,
                    length: 1000e-6,
                },
                InletParams {
                    concentration: 0.0,
                    flow_rate: 1e-10,
                    length: 1000e-6,
                },
            ],
            outlets: vec![
                OutletParams {
                    concentration: 1.0,
                    flow_rate: None,
                    extra_resistance: 0.0,
                },
                OutletParams {
                    concentration: 0.5,
                    flow_rate: Some(6.67e-11),
                    extra_resistance: 0.0,
                },
                OutletParams {
                    concentration: 0.0,
                    flow_rate: None,
                    extra_resistance: 0.0,
                },
            ],
            outlet_style: OutletStyle::Straight,
        }
    }

    fn field_of(params: &Parameters) -> String {
        let err = params.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parameter);
        err.field().unwrap().to_string()
    }

    #[test]
    fn test_baseline_is_valid() {
        assert!(baseline().validate().is_ok());
    }

    #[test]
    fn test_height_above_width() {
        let mut params = baseline();
        params.height = 400e-6;
        let err = params.validate().unwrap_err();
        assert_eq!(err.field(), Some("height"));
        assert_eq!(err.code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_scalar_fields() {
        let mut params = baseline();
        params.width = 0.0;
        assert_eq!(field_of(&params), "width");

        let mut params = baseline();
        params.radius = 200e-6;
        assert_eq!(field_of(&params), "radius");

        let mut params = baseline();
        params.max_meander_width = 5.0 * params.width + 8.0 * params.radius;
        assert_eq!(field_of(&params), "max_meander_width");

        let mut params = baseline();
        params.viscosity = f64::NAN;
        assert_eq!(field_of(&params), "viscosity");

        let mut params = baseline();
        params.min_mixing_time = -1.0;
        assert_eq!(field_of(&params), "min_mixing_time");
    }

    #[test]
    fn test_inlet_fields() {
        let mut params = baseline();
        params.inlets.pop();
        assert_eq!(field_of(&params), "inlets");

        let mut params = baseline();
        params.inlets[1].flow_rate = 0.0;
        assert_eq!(field_of(&params), "inlets[1].flow_rate");

        let mut params = baseline();
        params.inlets[0].length = 100e-6;
        assert_eq!(field_of(&params), "inlets[0].length");

        let mut params = baseline();
        params.inlets[0].concentration = 0.0;
        params.outlets[0].concentration = 0.0;
        assert_eq!(field_of(&params), "inlets[1].concentration");
    }

    #[test]
    fn test_outlet_fields() {
        let mut params = baseline();
        params.outlets.remove(1);
        assert_eq!(field_of(&params), "outlets");

        let mut params = baseline();
        params.outlets[1].flow_rate = None;
        assert_eq!(field_of(&params), "outlets[1].flow_rate");

        let mut params = baseline();
        params.outlets[2].concentration = 0.1;
        assert_eq!(field_of(&params), "outlets[2].concentration");

        let mut params = baseline();
        params.outlets[1].concentration = 1.0;
        assert_eq!(field_of(&params), "outlets[1].concentration");

        let mut params = baseline();
        params.outlets[0].extra_resistance = -1.0;
        assert_eq!(field_of(&params), "outlets[0].extra_resistance");

        let mut params = baseline();
        params.outlets[1].flow_rate = Some(2e-10);
        let err = params.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::FlowExceedsSupply);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "width": 300e-6, "height": 100e-6, "radius": 300e-6,
            "max_meander_width": 6000e-6, "viscosity": 1e-3, "min_mixing_time": 10,
            "inlets": [
                {"concentration": 1.0, "flow_rate": 1e-10, "length": 1000e-6},
                {"concentration": 0.0, "flow_rate": 1e-10, "length": 1000e-6}
            ],
            "outlets": [
                {"concentration": 1.0},
                {"concentration": 0.5, "flow_rate": 6.67e-11},
                {"concentration": 0.0}
            ]
        }"#;
        let params = Parameters::from_json(json).unwrap();
        assert_eq!(params, baseline());
        assert_eq!(params.n_layers(), 1);
    }
}
