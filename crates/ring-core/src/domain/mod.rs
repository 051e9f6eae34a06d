pub mod errors;

pub use errors::{ErrorCategory, ErrorKind, RingError, RingResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The closed set of things a user can append to a ring or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    ScalingFfaMagnet,
    Drift,
    Multipole,
    RfCavity,
    Cell,
}

impl ElementKind {
    /// Kinds that go through a builder; `Cell` is replayed, never built.
    pub const BUILDABLE: [ElementKind; 4] = [
        Self::ScalingFfaMagnet,
        Self::Drift,
        Self::Multipole,
        Self::RfCavity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScalingFfaMagnet => "Scaling FFA magnet",
            Self::Drift => "Drift",
            Self::Multipole => "Multipole",
            Self::RfCavity => "RF Cavity",
            Self::Cell => "Cell",
        }
    }

    /// Leading word of the element's display-log line.
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::RfCavity => "RF",
            other => other.as_str(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "scaling ffa magnet" | "magnet" | "ffa" => Some(Self::ScalingFfaMagnet),
            "drift" => Some(Self::Drift),
            "multipole" => Some(Self::Multipole),
            "rf cavity" | "rf" => Some(Self::RfCavity),
            "cell" => Some(Self::Cell),
            _ => None,
        }
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for ElementKind {
    type Err = RingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value).ok_or_else(|| {
            RingError::new(
                ErrorKind::UnknownElementType,
                "INPUT.ELEMENT_KIND",
                format!("unknown element '{}'", value.trim()),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticleSpecies {
    #[default]
    Proton,
    Electron,
    Muon,
}

impl ParticleSpecies {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proton => "PROTON",
            Self::Electron => "ELECTRON",
            Self::Muon => "MUON",
        }
    }
}

impl Display for ParticleSpecies {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for ParticleSpecies {
    type Err = RingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PROTON" => Ok(Self::Proton),
            "ELECTRON" => Ok(Self::Electron),
            "MUON" => Ok(Self::Muon),
            other => Err(RingError::new(
                ErrorKind::UnknownName,
                "INPUT.PARTICLE",
                format!("unknown particle '{other}', expected proton, electron or muon"),
            )),
        }
    }
}

/// Beam handed to the engine alongside the element list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub species: ParticleSpecies,
    pub gamma: f64,
    /// `x, px, y, py, z, pz` relative to the reference particle.
    pub start_coords: [f64; 6],
}

impl Beam {
    /// One-particle distribution text: a count line then the six coordinates.
    pub fn distribution_line(&self) -> String {
        let mut line = String::from("1 \n");
        for coordinate in self.start_coords {
            line.push_str(&format!("{coordinate:?} "));
        }
        line
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "----Beam----".to_string(),
            format!("particle type: {}", self.species),
            format!("Beam gamma: {:?}", self.gamma),
            format!("initial coordinates: {:?}", self.start_coords),
        ]
    }
}

/// Named numeric value of an element descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value:?}"),
            Self::Series(values) => write!(f, "{values:?}"),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Series(values)
    }
}

/// One element as placed by the engine, positions in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedElement {
    pub name: String,
    pub start_position: [f64; 3],
    pub end_position: [f64; 3],
}

impl PlacedElement {
    pub fn new(name: impl Into<String>, start_position: [f64; 3], end_position: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            start_position,
            end_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Beam, ElementKind, ErrorKind, ParameterValue, ParticleSpecies};

    #[test]
    fn element_kind_names_parse_case_insensitively() {
        assert_eq!(
            ElementKind::from_name("Scaling FFA magnet"),
            Some(ElementKind::ScalingFfaMagnet)
        );
        assert_eq!(ElementKind::from_name("rf_cavity"), Some(ElementKind::RfCavity));
        assert_eq!(ElementKind::from_name(" CELL "), Some(ElementKind::Cell));
        assert_eq!(ElementKind::from_name("quadrupole"), None);

        let error = "quadrupole"
            .parse::<ElementKind>()
            .expect_err("unknown kind should fail");
        assert_eq!(error.kind(), ErrorKind::UnknownElementType);
    }

    #[test]
    fn rf_cavity_logs_under_short_name() {
        assert_eq!(ElementKind::RfCavity.log_name(), "RF");
        assert_eq!(ElementKind::Drift.log_name(), "Drift");
    }

    #[test]
    fn particle_species_accepts_lowercase_names() {
        assert_eq!("muon".parse::<ParticleSpecies>(), Ok(ParticleSpecies::Muon));
        let error = "pion".parse::<ParticleSpecies>().expect_err("unknown species");
        assert_eq!(error.kind(), ErrorKind::UnknownName);
        assert_eq!(error.placeholder(), "INPUT.PARTICLE");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn beam_distribution_line_lists_six_coordinates() {
        let beam = Beam {
            species: ParticleSpecies::Proton,
            gamma: 1.5,
            start_coords: [0.0, 1.0, 0.0, 0.5, 0.0, 2.0],
        };

        assert_eq!(beam.distribution_line(), "1 \n0.0 1.0 0.0 0.5 0.0 2.0 ");
        assert_eq!(beam.summary_lines()[1], "particle type: PROTON");
    }

    #[test]
    fn parameter_values_render_with_decimal_points() {
        assert_eq!(ParameterValue::Scalar(1.0).to_string(), "1.0");
        assert_eq!(
            ParameterValue::Series(vec![0.5, -1.0]).to_string(),
            "[0.5, -1.0]"
        );
    }
}
