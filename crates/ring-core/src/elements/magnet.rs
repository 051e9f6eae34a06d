use super::{BuiltElement, ElementDescriptor, ElementSummary, RingContext, expect_arity};
use crate::domain::{ElementKind, ParameterValue, RingResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetParameters {
    pub b0: f64,
    pub field_index: f64,
    pub start_length: f64,
    pub end_length: f64,
    pub centre_length: f64,
    pub radial_neg_extent: f64,
    pub radial_pos_extent: f64,
}

impl MagnetParameters {
    pub const ARITY: usize = 7;

    pub fn from_values(values: &[f64]) -> RingResult<Self> {
        expect_arity(values, Self::ARITY)?;
        Ok(Self {
            b0: values[0],
            field_index: values[1],
            start_length: values[2],
            end_length: values[3],
            centre_length: values[4],
            radial_neg_extent: values[5],
            radial_pos_extent: values[6],
        })
    }

    /// Azimuthal length the magnet occupies; the end length counts four times.
    pub fn magnet_end(&self) -> f64 {
        self.start_length + self.centre_length + self.end_length * 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetDescriptor {
    pub b0: f64,
    pub r0: f64,
    pub field_index: f64,
    pub tan_delta: f64,
    pub radial_neg_extent: f64,
    pub radial_pos_extent: f64,
    pub azimuthal_extent: f64,
    pub magnet_start: f64,
    pub end_length: f64,
    pub centre_length: f64,
    pub magnet_end: f64,
}

impl MagnetDescriptor {
    pub(super) fn parameters(&self) -> Vec<(&'static str, ParameterValue)> {
        vec![
            ("b0", self.b0.into()),
            ("r0", self.r0.into()),
            ("field_index", self.field_index.into()),
            ("tan_delta", self.tan_delta.into()),
            ("radial_neg_extent", self.radial_neg_extent.into()),
            ("radial_pos_extent", self.radial_pos_extent.into()),
            ("azimuthal_extent", self.azimuthal_extent.into()),
            ("magnet_start", self.magnet_start.into()),
            ("end_length", self.end_length.into()),
            ("centre_length", self.centre_length.into()),
            ("magnet_end", self.magnet_end.into()),
        ]
    }
}

pub fn build_magnet(parameters: &MagnetParameters, context: &RingContext) -> BuiltElement {
    let magnet_end = parameters.magnet_end();
    let descriptor = MagnetDescriptor {
        b0: parameters.b0,
        r0: context.radius,
        field_index: parameters.field_index,
        tan_delta: context.tan_delta,
        radial_neg_extent: parameters.radial_neg_extent,
        radial_pos_extent: parameters.radial_pos_extent,
        azimuthal_extent: context.azimuthal_extent,
        magnet_start: parameters.start_length,
        end_length: parameters.end_length,
        centre_length: parameters.centre_length,
        magnet_end,
    };

    let summary = ElementSummary::new(
        ElementKind::ScalingFfaMagnet,
        vec![
            ("b0", parameters.b0.into()),
            ("k", parameters.field_index.into()),
            ("start", parameters.start_length.into()),
            ("centre_length", parameters.centre_length.into()),
            ("end length", parameters.end_length.into()),
        ],
    );

    BuiltElement {
        descriptor: ElementDescriptor::ScalingFfaMagnet(descriptor),
        length_consumed: magnet_end,
        summary,
    }
}
