use ring_core::bounds::{BoundsKey, resolve_bounds};
use ring_core::domain::ErrorKind;
use ring_core::validation::validate_one;
use serde::Deserialize;
use std::f64::consts::TAU;
use std::fs;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("validation_cases.json")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidationFixtures {
    validate_one_cases: Vec<ValidateOneCase>,
    magnet_scaling_cases: Vec<MagnetScalingCase>,
}

#[derive(Debug, Deserialize)]
struct ValidateOneCase {
    id: String,
    raw: String,
    lower: f64,
    upper: f64,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Expected {
    Value(f64),
    Error(ExpectedError),
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum ExpectedError {
    NotNumeric,
    OutOfBounds,
}

impl ExpectedError {
    fn kind(self) -> ErrorKind {
        match self {
            Self::NotNumeric => ErrorKind::NotNumeric,
            Self::OutOfBounds => ErrorKind::OutOfBounds,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MagnetScalingCase {
    radius: f64,
}

fn load_fixtures() -> ValidationFixtures {
    let source = fs::read_to_string(fixture_path()).expect("fixture should be readable");
    serde_json::from_str(&source).expect("fixture should parse")
}

#[test]
fn validate_one_matches_fixture_cases() {
    let fixtures = load_fixtures();
    assert!(!fixtures.validate_one_cases.is_empty());

    for case in &fixtures.validate_one_cases {
        let result = validate_one(&case.raw, case.lower, case.upper);
        match (&case.expected, result) {
            (Expected::Value(expected), Ok(actual)) => {
                assert_eq!(actual, *expected, "case {}", case.id);
            }
            (Expected::Error(expected), Err(error)) => {
                assert_eq!(error.kind(), expected.kind(), "case {}", case.id);
            }
            (expected, actual) => {
                panic!("case {}: expected {:?}, got {:?}", case.id, expected, actual);
            }
        }
    }
}

#[test]
fn magnet_length_bounds_scale_linearly_with_radius() {
    let fixtures = load_fixtures();

    for case in &fixtures.magnet_scaling_cases {
        let table = resolve_bounds(case.radius, TAU * case.radius);
        let magnet = table.get(BoundsKey::ScalingFfaMagnet);
        assert_eq!(magnet.len(), 7);

        assert_eq!(magnet[2].upper, case.radius / 4.0);
        assert_eq!(magnet[3].upper, case.radius / 4.0);
        assert_eq!(magnet[4].upper, case.radius / 40.0);
        assert_eq!(magnet[5].upper, case.radius);
        assert_eq!(magnet[6].upper, case.radius);
        // Field and field index do not depend on the radius.
        assert_eq!(magnet[0].upper, 2.0);
        assert_eq!(magnet[1].upper, 10.0);
    }
}

#[test]
fn every_key_is_resolved_for_any_positive_radius() {
    for radius in [0.01, 1.0, 1e6] {
        let table = resolve_bounds(radius, TAU * radius);
        for key in BoundsKey::ALL {
            assert!(!table.get(key).is_empty(), "{key} missing at radius {radius}");
        }
    }
}
