//! Pure builders turning validated parameters into engine-facing descriptors.
//!
//! Builders never re-check bounds; callers validate first.

pub mod drift;
pub mod magnet;
pub mod multipole;
pub mod rf_cavity;

pub use drift::{DriftDescriptor, build_drift};
pub use magnet::{MagnetDescriptor, MagnetParameters, build_magnet};
pub use multipole::{MultipoleDescriptor, MultipoleParameters, build_multipole};
pub use rf_cavity::{
    PolynomialCoefficients, RfCavityDescriptor, RfCavityParameters, build_rf_cavity,
};

use crate::common::SessionConfig;
use crate::domain::{ElementKind, ErrorKind, ParameterValue, RingError, RingResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Ring-level values a builder needs but the user does not type in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingContext {
    pub radius: f64,
    /// `1.0` or `-1.0`.
    pub bend_direction: f64,
    /// Tangent of the magnet spiral angle.
    pub tan_delta: f64,
    pub azimuthal_extent: f64,
}

impl RingContext {
    pub fn from_config(radius: f64, config: &SessionConfig) -> Self {
        Self {
            radius,
            bend_direction: config.bend_direction,
            tan_delta: config.spiral_angle.tan(),
            azimuthal_extent: config
                .azimuthal_extent
                .unwrap_or_else(|| TAU * radius / f64::from(config.cell_count.max(1))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementDescriptor {
    ScalingFfaMagnet(MagnetDescriptor),
    Drift(DriftDescriptor),
    Multipole(MultipoleDescriptor),
    RfCavity(RfCavityDescriptor),
}

impl ElementDescriptor {
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::ScalingFfaMagnet(_) => ElementKind::ScalingFfaMagnet,
            Self::Drift(_) => ElementKind::Drift,
            Self::Multipole(_) => ElementKind::Multipole,
            Self::RfCavity(_) => ElementKind::RfCavity,
        }
    }

    /// Element type name the engine reports back for this descriptor.
    pub const fn engine_type_name(&self) -> &'static str {
        match self {
            Self::ScalingFfaMagnet(_) => "ScalingFFAMagnet",
            Self::Drift(_) => "LOCAL_CARTESIAN_OFFSET",
            Self::Multipole(_) => "MULTIPOLET",
            Self::RfCavity(_) => "VARIABLE_RF_CAVITY",
        }
    }

    /// Flat `name → value` view in engine attribute order.
    pub fn parameters(&self) -> Vec<(&'static str, ParameterValue)> {
        match self {
            Self::ScalingFfaMagnet(magnet) => magnet.parameters(),
            Self::Drift(drift) => drift.parameters(),
            Self::Multipole(multipole) => multipole.parameters(),
            Self::RfCavity(cavity) => cavity.parameters(),
        }
    }
}

/// Human-readable fields of one element, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSummary {
    pub kind: ElementKind,
    pub fields: Vec<(&'static str, ParameterValue)>,
}

impl ElementSummary {
    pub fn new(kind: ElementKind, fields: Vec<(&'static str, ParameterValue)>) -> Self {
        Self { kind, fields }
    }

    pub fn log_line(&self) -> String {
        let mut line = self.kind.log_name().to_string();
        for (name, value) in &self.fields {
            line.push_str(&format!(", {name}: {value}"));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltElement {
    pub descriptor: ElementDescriptor,
    pub length_consumed: f64,
    pub summary: ElementSummary,
}

pub(crate) fn expect_arity(values: &[f64], arity: usize) -> RingResult<()> {
    if values.len() == arity {
        Ok(())
    } else {
        Err(RingError::input_count(arity, values.len()))
    }
}

/// Builds any element from its full, already validated parameter list.
pub fn build_element(
    kind: ElementKind,
    values: &[f64],
    context: &RingContext,
) -> RingResult<BuiltElement> {
    match kind {
        ElementKind::ScalingFfaMagnet => {
            let parameters = MagnetParameters::from_values(values)?;
            Ok(build_magnet(&parameters, context))
        }
        ElementKind::Drift => {
            let angle = drift::drift_angle_from_values(values)?;
            Ok(build_drift(angle, context))
        }
        ElementKind::Multipole => {
            let parameters = MultipoleParameters::from_values(values)?;
            Ok(build_multipole(&parameters, context))
        }
        ElementKind::RfCavity => {
            let parameters = RfCavityParameters::from_values(values)?;
            Ok(build_rf_cavity(&parameters))
        }
        ElementKind::Cell => Err(RingError::new(
            ErrorKind::InvalidState,
            "STATE.CELL_NOT_BUILDABLE",
            "a cell is replayed from its recording, not built from parameters",
        )),
    }
}
