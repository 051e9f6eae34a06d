use super::{BuiltElement, ElementDescriptor, ElementSummary, expect_arity};
use crate::domain::{ElementKind, ParameterValue, RingResult};
use serde::{Deserialize, Serialize};

/// `p0 + p1·t + p2·t²` time dependence, instantiated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolynomialCoefficients {
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
}

impl PolynomialCoefficients {
    fn from_slice(values: &[f64]) -> Self {
        Self {
            p0: values[0],
            p1: values[1],
            p2: values[2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RfCavityParameters {
    pub phase: PolynomialCoefficients,
    pub amplitude: PolynomialCoefficients,
    pub frequency: PolynomialCoefficients,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl RfCavityParameters {
    pub const COEFFICIENT_ARITY: usize = 9;
    pub const ARITY: usize = 12;

    /// `values` is the nine coefficients followed by length, width and height.
    pub fn from_values(values: &[f64]) -> RingResult<Self> {
        expect_arity(values, Self::ARITY)?;
        Ok(Self {
            phase: PolynomialCoefficients::from_slice(&values[0..3]),
            amplitude: PolynomialCoefficients::from_slice(&values[3..6]),
            frequency: PolynomialCoefficients::from_slice(&values[6..9]),
            length: values[9],
            width: values[10],
            height: values[11],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RfCavityDescriptor {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub phase: PolynomialCoefficients,
    pub amplitude: PolynomialCoefficients,
    pub frequency: PolynomialCoefficients,
}

impl RfCavityDescriptor {
    pub(super) fn parameters(&self) -> Vec<(&'static str, ParameterValue)> {
        vec![
            ("length", self.length.into()),
            ("width", self.width.into()),
            ("height", self.height.into()),
            ("phase_p0", self.phase.p0.into()),
            ("phase_p1", self.phase.p1.into()),
            ("phase_p2", self.phase.p2.into()),
            ("amp_p0", self.amplitude.p0.into()),
            ("amp_p1", self.amplitude.p1.into()),
            ("amp_p2", self.amplitude.p2.into()),
            ("freq_p0", self.frequency.p0.into()),
            ("freq_p1", self.frequency.p1.into()),
            ("freq_p2", self.frequency.p2.into()),
        ]
    }
}

pub fn build_rf_cavity(parameters: &RfCavityParameters) -> BuiltElement {
    let descriptor = RfCavityDescriptor {
        length: parameters.length,
        width: parameters.width,
        height: parameters.height,
        phase: parameters.phase,
        amplitude: parameters.amplitude,
        frequency: parameters.frequency,
    };

    let summary = ElementSummary::new(
        ElementKind::RfCavity,
        vec![
            ("length", parameters.length.into()),
            ("width", parameters.width.into()),
            ("height", parameters.height.into()),
        ],
    );

    BuiltElement {
        descriptor: ElementDescriptor::RfCavity(descriptor),
        length_consumed: parameters.length,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::{RfCavityParameters, build_rf_cavity};
    use crate::elements::ElementDescriptor;

    #[test]
    fn coefficients_are_grouped_in_declaration_order() {
        let values = [
            0.0, 0.1, 0.2, 1.0, 1.1, 1.2, 2.0, 2.1, 2.2, 0.4, 0.3, 0.2,
        ];
        let parameters = RfCavityParameters::from_values(&values).expect("twelve values");
        let built = build_rf_cavity(&parameters);

        let ElementDescriptor::RfCavity(cavity) = built.descriptor else {
            panic!("expected rf descriptor");
        };
        assert_eq!(cavity.phase.p2, 0.2);
        assert_eq!(cavity.amplitude.p0, 1.0);
        assert_eq!(cavity.frequency.p1, 2.1);
        assert_eq!(cavity.width, 0.3);
        assert_eq!(built.length_consumed, 0.4);
        assert_eq!(
            built.summary.log_line(),
            "RF, length: 0.4, width: 0.3, height: 0.2"
        );
    }

    #[test]
    fn flattened_parameters_use_engine_names() {
        let parameters = RfCavityParameters::from_values(&[1.0; 12]).expect("twelve values");
        let built = build_rf_cavity(&parameters);
        let names: Vec<&str> = built
            .descriptor
            .parameters()
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert!(names.contains(&"amp_p1"));
        assert!(names.contains(&"freq_p2"));
        assert_eq!(names.len(), 12);
    }
}
