//! Session-wide settings that are not typed in per element.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::bounds::BoundsPolicy;
use crate::domain::RingError;
use crate::validation::BatchPolicy;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CELL_COUNT: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub bend_direction: f64,
    /// Magnet spiral angle in radians.
    pub spiral_angle: f64,
    pub cell_count: u32,
    /// Overrides the `2π·radius / cell_count` magnet azimuthal extent.
    pub azimuthal_extent: Option<f64>,
    pub bounds: BoundsPolicy,
    pub batch_validation: BatchPolicy,
    /// Glob patterns for engine output names the ring diagram skips.
    pub auxiliary_element_names: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bend_direction: 1.0,
            spiral_angle: 0.0,
            cell_count: DEFAULT_CELL_COUNT,
            azimuthal_extent: None,
            bounds: BoundsPolicy::default(),
            batch_validation: BatchPolicy::default(),
            auxiliary_element_names: vec!["PROBE*".to_string()],
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bend_direction != 1.0 && self.bend_direction != -1.0 {
            return Err(ConfigError::Invalid(format!(
                "bend_direction must be 1 or -1, got {:?}",
                self.bend_direction
            )));
        }
        if self.cell_count == 0 {
            return Err(ConfigError::Invalid(
                "cell_count must be at least 1".to_string(),
            ));
        }
        if !self.spiral_angle.is_finite() {
            return Err(ConfigError::Invalid(
                "spiral_angle must be finite".to_string(),
            ));
        }
        if let Some(extent) = self.azimuthal_extent {
            if !(extent.is_finite() && extent > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "azimuthal_extent must be positive, got {extent:?}"
                )));
            }
        }
        self.auxiliary_matcher().map(|_| ())
    }

    pub fn auxiliary_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.auxiliary_element_names {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Pattern {
            pattern: self.auxiliary_element_names.join(","),
            source,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read session config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse session config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid auxiliary element pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("invalid session config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for RingError {
    fn from(error: ConfigError) -> Self {
        let placeholder = match &error {
            ConfigError::Read { .. } => "IO.CONFIG_READ",
            ConfigError::Parse { .. } => "IO.CONFIG_PARSE",
            ConfigError::Pattern { .. } => "IO.CONFIG_PATTERN",
            ConfigError::Invalid(_) => "IO.CONFIG_INVALID",
        };
        RingError::config(placeholder, error.to_string())
    }
}

pub fn load_session_config(config_path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let config: SessionConfig =
        serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SessionConfig, load_session_config};
    use crate::bounds::{BeamBoundsPolicy, BoundsVariant};
    use crate::domain::{ErrorKind, RingError};
    use crate::validation::BatchPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_object_yields_defaults() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("session.json");
        fs::write(&path, "{}").expect("config should be written");

        let config = load_session_config(&path).expect("empty config is valid");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn nested_policies_are_read_from_snake_case_names() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("session.json");
        fs::write(
            &path,
            r#"
            {
              "bend_direction": -1,
              "bounds": { "beam": "non_negative", "variant": "fixed" },
              "batch_validation": "legacy_partial",
              "auxiliary_element_names": ["PROBE*", "DETECTOR_?"]
            }
            "#,
        )
        .expect("config should be written");

        let config = load_session_config(&path).expect("config should parse");
        assert_eq!(config.bend_direction, -1.0);
        assert_eq!(config.bounds.beam, BeamBoundsPolicy::NonNegative);
        assert_eq!(config.bounds.variant, BoundsVariant::Fixed);
        assert_eq!(config.batch_validation, BatchPolicy::LegacyPartial);

        let matcher = config.auxiliary_matcher().expect("patterns compile");
        assert!(matcher.is_match("PROBE3"));
        assert!(matcher.is_match("DETECTOR_A"));
        assert!(!matcher.is_match("MULTIPOLET"));
    }

    #[test]
    fn invalid_bend_direction_is_rejected() {
        let config = SessionConfig {
            bend_direction: 0.5,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_maps_to_config_error_kind() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = load_session_config(temp.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(error, ConfigError::Read { .. }));

        let ring_error = RingError::from(error);
        assert_eq!(ring_error.kind(), ErrorKind::Config);
        assert_eq!(ring_error.placeholder(), "IO.CONFIG_READ");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("session.json");
        fs::write(&path, r#"{ "radius": 4 }"#).expect("config should be written");
        assert!(matches!(
            load_session_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
