//! Ring diagram geometry: engine-placed elements → coloured quadrilaterals.
//!
//! Positions are projected onto a fixed 600×600 logical canvas with the ring
//! centred at (300, 300) and canvas y pointing down. Angles are measured
//! counter-clockwise (as seen on screen) from the +x axis through the ring
//! centre, in `[0, 2π]`.

use crate::common::constants::{CANVAS_CENTRE, CANVAS_MARGIN};
use crate::domain::{PlacedElement, RingError, RingResult};
use crate::numerics::{chord_length, distance2, law_of_cosines_angle};
use globset::GlobSet;
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Colour {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColourKey {
    pub engine_name: &'static str,
    pub colour: Colour,
    pub label: &'static str,
}

pub const COLOUR_KEYS: [ColourKey; 5] = [
    ColourKey {
        engine_name: "ScalingFFAMagnet",
        colour: Colour::Red,
        label: "Scaling FFA magnet",
    },
    ColourKey {
        engine_name: "DefaultDrift",
        colour: Colour::Blue,
        label: "Default drift",
    },
    ColourKey {
        engine_name: "LOCAL_CARTESIAN_OFFSET",
        colour: Colour::Blue,
        label: "drift",
    },
    ColourKey {
        engine_name: "MULTIPOLET",
        colour: Colour::Green,
        label: "multipole",
    },
    ColourKey {
        engine_name: "VARIABLE_RF_CAVITY",
        colour: Colour::Yellow,
        label: "RF cavity",
    },
];

pub fn colour_key(engine_name: &str) -> RingResult<&'static ColourKey> {
    COLOUR_KEYS
        .iter()
        .find(|key| key.engine_name == engine_name)
        .ok_or_else(|| RingError::unknown_element_type(engine_name))
}

/// `"---key---"` followed by one `"<label>: <colour>"` line per table entry.
pub fn legend_lines() -> Vec<String> {
    std::iter::once("---key---".to_string())
        .chain(
            COLOUR_KEYS
                .iter()
                .map(|key| format!("{}: {}", key.label, key.colour)),
        )
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRegion {
    pub name: String,
    pub colour: Colour,
    pub label: &'static str,
    pub start_angle: f64,
    /// Never below `start_angle`; may exceed `2π` when the element wraps.
    pub end_angle: f64,
    /// Inner start, outer near start, outer near end, inner end.
    pub vertices: [CanvasPoint; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingLayout {
    pub centre: CanvasPoint,
    pub circle_radius: f64,
    pub regions: Vec<LayoutRegion>,
    pub legend: Vec<String>,
}

/// Maps metres onto the canvas for a ring of `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanvasProjection {
    radius: f64,
    scale: f64,
}

impl CanvasProjection {
    fn new(radius: f64) -> Self {
        Self {
            radius,
            scale: CANVAS_CENTRE / (CANVAS_MARGIN * radius),
        }
    }

    fn circle_radius(self) -> f64 {
        self.radius * self.scale
    }

    fn project(self, position: [f64; 3]) -> CanvasPoint {
        CanvasPoint::new(
            position[0] * self.scale + CANVAS_CENTRE,
            -position[1] * self.scale + CANVAS_CENTRE,
        )
    }

    /// Angle of `point` around the canvas centre.
    ///
    /// Solved as the triangle (centre, reference, point) with the reference
    /// `radius` to the right of the centre; points below the centre take the
    /// reflex angle.
    fn angle_of(self, point: CanvasPoint) -> f64 {
        let centre = [CANVAS_CENTRE, CANVAS_CENTRE];
        let reference = [CANVAS_CENTRE + self.radius, CANVAS_CENTRE];
        let to_reference = distance2(point.as_array(), reference);
        let to_centre = distance2(point.as_array(), centre);

        let angle = law_of_cosines_angle(self.radius, to_centre, to_reference);
        if point.y - CANVAS_CENTRE > 0.0 {
            TAU - angle
        } else {
            angle
        }
    }
}

fn region_for(
    element: &PlacedElement,
    key: &ColourKey,
    projection: CanvasProjection,
) -> LayoutRegion {
    let start = projection.project(element.start_position);
    let end = projection.project(element.end_position);

    let start_angle = projection.angle_of(start);
    let mut end_angle = projection.angle_of(end);
    if end_angle < start_angle {
        end_angle += TAU;
    }
    let span = end_angle - start_angle;

    let circle_radius = projection.circle_radius();
    let width = chord_length(circle_radius, span);
    let length_to_corner = (width * width + circle_radius * circle_radius
        - 2.0 * width * circle_radius * (PI - span / 2.0).cos())
    .max(0.0)
    .sqrt();

    let corner_angle = start_angle + span / 4.0;
    let near_start = CanvasPoint::new(
        length_to_corner * corner_angle.cos() + CANVAS_CENTRE,
        -(length_to_corner * corner_angle.sin()) + CANVAS_CENTRE,
    );
    let near_end = CanvasPoint::new(
        end.x + near_start.x - start.x,
        end.y + near_start.y - start.y,
    );

    LayoutRegion {
        name: element.name.clone(),
        colour: key.colour,
        label: key.label,
        start_angle,
        end_angle,
        vertices: [start, near_start, near_end, end],
    }
}

/// Lays out every element; a name missing from [`COLOUR_KEYS`] is an error.
pub fn layout(elements: &[PlacedElement], radius: f64) -> RingResult<RingLayout> {
    layout_filtered(elements, radius, &GlobSet::empty())
}

/// Like [`layout`], but silently skips elements whose name matches `auxiliary`.
pub fn layout_filtered(
    elements: &[PlacedElement],
    radius: f64,
    auxiliary: &GlobSet,
) -> RingResult<RingLayout> {
    let projection = CanvasProjection::new(radius);
    let mut regions = Vec::with_capacity(elements.len());

    for element in elements {
        if auxiliary.is_match(&element.name) {
            tracing::trace!(name = %element.name, "skipping auxiliary element");
            continue;
        }
        let key = colour_key(&element.name)?;
        regions.push(region_for(element, key, projection));
    }

    Ok(RingLayout {
        centre: CanvasPoint::new(CANVAS_CENTRE, CANVAS_CENTRE),
        circle_radius: projection.circle_radius(),
        regions,
        legend: legend_lines(),
    })
}
