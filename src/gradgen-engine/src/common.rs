// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

/// Identifies one meander: its layer and its position inside that layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeanderId {
    pub layer: usize,
    pub index: usize,
}

impl MeanderId {
    pub fn new(layer: usize, index: usize) -> Self {
        MeanderId { layer, index }
    }
}

impl fmt::Display for MeanderId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "meander[{}][{}]", self.layer, self.index)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // parameter errors
    MustBePositive,
    MustBeNonNegative,
    OutOfRange,
    WrongCount,
    MissingValue,
    NotStrictlyDecreasing,
    InletMismatch,
    FlowExceedsSupply,
    // network errors
    SingularSystem,
    NonPositiveFlow,
    NoFeasibleResistance,
    // geometry errors
    NonPositiveWidth,
    NonPositiveRadius,
    RadiusBelowWidth,
    TooFewTurns,
    StraightRunTooShort,
    LateralRunTooShort,
    OpenBoundary,
    DanglingVertex,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            MustBePositive => "must_be_positive",
            MustBeNonNegative => "must_be_non_negative",
            OutOfRange => "out_of_range",
            WrongCount => "wrong_count",
            MissingValue => "missing_value",
            NotStrictlyDecreasing => "not_strictly_decreasing",
            InletMismatch => "inlet_mismatch",
            FlowExceedsSupply => "flow_exceeds_supply",
            SingularSystem => "singular_system",
            NonPositiveFlow => "non_positive_flow",
            NoFeasibleResistance => "no_feasible_resistance",
            NonPositiveWidth => "non_positive_width",
            NonPositiveRadius => "non_positive_radius",
            RadiusBelowWidth => "radius_below_width",
            TooFewTurns => "too_few_turns",
            StraightRunTooShort => "straight_run_too_short",
            LateralRunTooShort => "lateral_run_too_short",
            OpenBoundary => "open_boundary",
            DanglingVertex => "dangling_vertex",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single input field or a cross-field relation is invalid.
    Parameter,
    /// No meander resistances satisfy the mixing and footprint constraints.
    Network,
    /// A sized meander or the assembled mesh cannot be fabricated.
    Geometry,
}

/// What an error is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Field(String),
    Layer(usize),
    Meander(MeanderId),
    Mesh,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Origin::Field(field) => write!(f, "{field}"),
            Origin::Layer(layer) => write!(f, "layer[{layer}]"),
            Origin::Meander(id) => write!(f, "{id}"),
            Origin::Mesh => write!(f, "mesh"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub origin: Origin,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, origin: Origin, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            origin,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }

    /// The offending parameter, for parameter errors.
    pub fn field(&self) -> Option<&str> {
        match self.origin {
            Origin::Field(ref field) => Some(field.as_str()),
            _ => None,
        }
    }

    /// The failing layer, for network errors.
    pub fn layer(&self) -> Option<usize> {
        match self.origin {
            Origin::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    /// The failing meander, for geometry errors raised while sizing.
    pub fn meander(&self) -> Option<MeanderId> {
        match self.origin {
            Origin::Meander(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Parameter => "ParameterError",
            ErrorKind::Network => "NetworkInfeasible",
            ErrorKind::Geometry => "GeometryInfeasible",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}@{}: {}}}", kind, self.code, self.origin, details),
            None => write!(f, "{}{{{}@{}}}", kind, self.code, self.origin),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! param_err {
    ($code:tt, $field:expr, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind, Origin};
        Err(Error::new(
            ErrorKind::Parameter,
            ErrorCode::$code,
            Origin::Field($field.to_string()),
            Some($str.to_string()),
        ))
    }};
}

#[macro_export]
macro_rules! network_err {
    ($code:tt, $layer:expr, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind, Origin};
        Err(Error::new(
            ErrorKind::Network,
            ErrorCode::$code,
            Origin::Layer($layer),
            Some($str),
        ))
    }};
}

#[macro_export]
macro_rules! geometry_err {
    ($code:tt, $meander:expr, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind, Origin};
        Err(Error::new(
            ErrorKind::Geometry,
            ErrorCode::$code,
            Origin::Meander($meander),
            Some($str),
        ))
    }};
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind, Origin};
        Err(Error::new(
            ErrorKind::Geometry,
            ErrorCode::$code,
            Origin::Mesh,
            Some($str),
        ))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::new(
            ErrorKind::Parameter,
            ErrorCode::OutOfRange,
            Origin::Field("height".to_string()),
            Some("0 < h <= w must hold".to_string()),
        );
        assert_eq!(
            format!("{err}"),
            "ParameterError{out_of_range@height: 0 < h <= w must hold}"
        );
        assert_eq!(err.field(), Some("height"));
        assert_eq!(err.layer(), None);

        let err = Error::new(
            ErrorKind::Network,
            ErrorCode::NoFeasibleResistance,
            Origin::Layer(2),
            None,
        );
        assert_eq!(
            format!("{err}"),
            "NetworkInfeasible{no_feasible_resistance@layer[2]}"
        );
        assert_eq!(err.layer(), Some(2));
    }

    #[test]
    fn test_error_macros() {
        let err: Result<()> = crate::param_err!(MustBePositive, "width", "0 < w must hold");
        let err = err.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parameter);
        assert_eq!(err.field(), Some("width"));

        let err: Result<()> = crate::geometry_err!(
            TooFewTurns,
            MeanderId::new(1, 3),
            "turn count must be at least 1".to_string()
        );
        let err = err.unwrap_err();
        assert_eq!(err.meander(), Some(MeanderId::new(1, 3)));
        assert!(format!("{err}").contains("meander[1][3]"));

        let err: Result<()> = crate::geometry_err!(OpenBoundary, "dangling edge".to_string());
        assert_eq!(err.unwrap_err().origin, Origin::Mesh);
    }
}
