//! Clustering thresholds.
//!
//! Loaded from TOML (every key optional) and optionally overridden from
//! the environment:
//!
//! ```toml
//! zoom_threshold = 0.05
//! distance_scale = 0.15
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable overriding [`ClusterConfig::zoom_threshold`].
pub const ZOOM_THRESHOLD_ENV: &str = "NABE_MAP_ZOOM_THRESHOLD";

/// Environment variable overriding [`ClusterConfig::distance_scale`].
pub const DISTANCE_SCALE_ENV: &str = "NABE_MAP_DISTANCE_SCALE";

/// Tunables for zoom gating and cluster distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Clustering runs only when the visible latitude span exceeds this.
    pub zoom_threshold: f64,
    /// Multiplied by the latitude span to get the centroid distance
    /// under which two regions fold together.
    pub distance_scale: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            zoom_threshold: 0.05,
            distance_scale: 0.15,
        }
    }
}

impl ClusterConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded cluster config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Applies [`ZOOM_THRESHOLD_ENV`] and [`DISTANCE_SCALE_ENV`] if set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = parse_override(&lookup, ZOOM_THRESHOLD_ENV) {
            self.zoom_threshold = value;
        }
        if let Some(value) = parse_override(&lookup, DISTANCE_SCALE_ENV) {
            self.distance_scale = value;
        }
        self
    }

    /// Whether the current zoom level warrants clustering.
    #[must_use]
    pub fn should_cluster(&self, latitude_span: f64) -> bool {
        latitude_span > self.zoom_threshold
    }

    /// Centroid distance threshold for the current zoom level.
    #[must_use]
    pub fn cluster_distance(&self, latitude_span: f64) -> f64 {
        latitude_span * self.distance_scale
    }
}

fn parse_override(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            log::warn!("Ignoring invalid {key}={raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = ClusterConfig::default();
        assert!((config.zoom_threshold - 0.05).abs() < f64::EPSILON);
        assert!((config.distance_scale - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClusterConfig::from_toml_str("zoom_threshold = 0.08").unwrap();
        assert!((config.zoom_threshold - 0.08).abs() < f64::EPSILON);
        assert!((config.distance_scale - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            ClusterConfig::from_toml_str("").unwrap(),
            ClusterConfig::default()
        );
    }

    #[test]
    fn malformed_toml_errors() {
        assert!(matches!(
            ClusterConfig::from_toml_str("zoom_threshold = \"wide\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "distance_scale = 0.2").unwrap();
        let config = ClusterConfig::load(file.path()).unwrap();
        assert!((config.distance_scale - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = ClusterConfig::load(Path::new("/nonexistent/cluster.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn overrides_apply_and_invalid_values_are_ignored() {
        let env: BTreeMap<&str, &str> = [
            (ZOOM_THRESHOLD_ENV, "0.08"),
            (DISTANCE_SCALE_ENV, "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = ClusterConfig::default()
            .with_overrides(|key| env.get(key).map(ToString::to_string));
        assert!((config.zoom_threshold - 0.08).abs() < f64::EPSILON);
        assert!((config.distance_scale - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn zoom_gate_is_strict() {
        let config = ClusterConfig::default();
        assert!(!config.should_cluster(0.05));
        assert!(!config.should_cluster(0.01));
        assert!(config.should_cluster(0.051));
    }

    #[test]
    fn distance_scales_with_span() {
        let config = ClusterConfig::default();
        assert!((config.cluster_distance(0.2) - 0.03).abs() < 1e-12);
    }
}
