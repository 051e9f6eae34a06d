use super::{BuiltElement, ElementDescriptor, ElementSummary, RingContext};
use crate::common::constants::{
    MULTIPOLE_BOUNDING_BOX_LENGTH, MULTIPOLE_FRINGE_WIDTH, MULTIPOLE_MAX_EXPANSION_ORDER,
};
use crate::domain::{ElementKind, ParameterValue, RingError, RingResult};
use crate::numerics::chord_to_arc_angle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct MultipoleParameters {
    pub length: f64,
    pub horizontal_aperture: f64,
    pub vertical_aperture: f64,
    /// Field strength per order, lowest order first.
    pub field_strengths: Vec<f64>,
}

impl MultipoleParameters {
    pub const PRIMARY_ARITY: usize = 4;

    /// Order count as chosen on the first input screen, truncated toward zero.
    pub fn order_count(primary: &[f64]) -> usize {
        primary.get(3).map_or(0, |count| *count as usize)
    }

    /// `values` is `[length, h_aperture, v_aperture, order_count, strengths...]`.
    pub fn from_values(values: &[f64]) -> RingResult<Self> {
        if values.len() < Self::PRIMARY_ARITY {
            return Err(RingError::input_count(Self::PRIMARY_ARITY, values.len()));
        }
        let order_count = Self::order_count(values);
        let strengths = &values[Self::PRIMARY_ARITY..];
        if strengths.len() != order_count {
            return Err(RingError::input_count(
                Self::PRIMARY_ARITY + order_count,
                values.len(),
            ));
        }

        Ok(Self {
            length: values[0],
            horizontal_aperture: values[1],
            vertical_aperture: values[2],
            field_strengths: strengths.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipoleDescriptor {
    pub t_p: Vec<f64>,
    pub angle: f64,
    pub length: f64,
    pub maximum_f_order: u32,
    pub horizontal_aperture: f64,
    pub vertical_aperture: f64,
    pub left_fringe: f64,
    pub right_fringe: f64,
    pub entrance_angle: f64,
    pub maximum_x_order: u32,
    pub bounding_box_length: f64,
}

impl MultipoleDescriptor {
    pub(super) fn parameters(&self) -> Vec<(&'static str, ParameterValue)> {
        vec![
            ("t_p", self.t_p.clone().into()),
            ("angle", self.angle.into()),
            ("length", self.length.into()),
            ("maximum_f_order", f64::from(self.maximum_f_order).into()),
            ("horizontal_aperture", self.horizontal_aperture.into()),
            ("vertical_aperture", self.vertical_aperture.into()),
            ("left_fringe", self.left_fringe.into()),
            ("right_fringe", self.right_fringe.into()),
            ("entrance_angle", self.entrance_angle.into()),
            ("maximum_x_order", f64::from(self.maximum_x_order).into()),
            ("bounding_box_length", self.bounding_box_length.into()),
        ]
    }
}

/// The multipole bends like a circular arc whose chord is `length` on the
/// ring radius.
pub fn build_multipole(parameters: &MultipoleParameters, context: &RingContext) -> BuiltElement {
    let angle = chord_to_arc_angle(parameters.length, context.radius);

    let descriptor = MultipoleDescriptor {
        t_p: parameters.field_strengths.clone(),
        angle,
        length: parameters.length,
        maximum_f_order: MULTIPOLE_MAX_EXPANSION_ORDER,
        horizontal_aperture: parameters.horizontal_aperture,
        vertical_aperture: parameters.vertical_aperture,
        left_fringe: MULTIPOLE_FRINGE_WIDTH,
        right_fringe: MULTIPOLE_FRINGE_WIDTH,
        entrance_angle: 0.0,
        maximum_x_order: MULTIPOLE_MAX_EXPANSION_ORDER,
        bounding_box_length: MULTIPOLE_BOUNDING_BOX_LENGTH,
    };

    let summary = ElementSummary::new(
        ElementKind::Multipole,
        vec![
            ("fields", parameters.field_strengths.clone().into()),
            ("length", parameters.length.into()),
        ],
    );

    BuiltElement {
        descriptor: ElementDescriptor::Multipole(descriptor),
        length_consumed: parameters.length,
        summary,
    }
}
