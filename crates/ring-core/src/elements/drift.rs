use super::{BuiltElement, ElementDescriptor, ElementSummary, RingContext, expect_arity};
use crate::domain::{ElementKind, ParameterValue, RingResult};
use serde::{Deserialize, Serialize};

/// A drift is placed as a local cartesian offset: the next element starts at
/// the end position, facing the end normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftDescriptor {
    pub end_position_x: f64,
    pub end_position_y: f64,
    pub end_normal_x: f64,
    pub end_normal_y: f64,
}

impl DriftDescriptor {
    pub(super) fn parameters(&self) -> Vec<(&'static str, ParameterValue)> {
        vec![
            ("end_position_x", self.end_position_x.into()),
            ("end_position_y", self.end_position_y.into()),
            ("end_normal_x", self.end_normal_x.into()),
            ("end_normal_y", self.end_normal_y.into()),
        ]
    }
}

pub fn drift_angle_from_values(values: &[f64]) -> RingResult<f64> {
    expect_arity(values, 1)?;
    Ok(values[0])
}

/// `angle` is the angle the drift subtends at the ring centre, in radians.
pub fn build_drift(angle: f64, context: &RingContext) -> BuiltElement {
    let radius = context.radius;
    let bend = context.bend_direction;
    let (sin, cos) = angle.sin_cos();

    let descriptor = DriftDescriptor {
        end_position_x: bend * radius * (cos - 1.0),
        end_position_y: radius * sin,
        end_normal_x: -bend * sin,
        end_normal_y: cos,
    };

    BuiltElement {
        descriptor: ElementDescriptor::Drift(descriptor),
        length_consumed: radius * angle,
        summary: ElementSummary::new(ElementKind::Drift, vec![("angle", angle.into())]),
    }
}
