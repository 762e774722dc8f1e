//! Narrow-phase tuning loaded from YAML.
//!
//! The numeric margins of the contact queries can be tuned per scene without
//! recompiling. A preset directory holds one file per named configuration:
//!
//! ```text
//! presets/
//! ├── default.yaml
//! └── precise.yaml
//! ```
//!
//! Missing keys fall back to the values in [`constants`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::constants;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("preset not found: {0}")]
    NotFound(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Tunable margins of the narrow phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrowPhaseConfig {
    /// Bias passed to the convex query; contact points are offset by it.
    pub contact_bias: f64,
    /// Swept spheres moving less than this per step use a static check.
    pub short_sweep_threshold: f64,
    /// Radius pad of that static check.
    pub short_sweep_padding: f64,
    /// Iteration cap of conservative advancement.
    pub max_advance_iterations: u32,
}

impl Default for NarrowPhaseConfig {
    fn default() -> Self {
        Self {
            contact_bias: constants::CONTACT_BIAS,
            short_sweep_threshold: constants::SHORT_SWEEP_THRESHOLD,
            short_sweep_padding: constants::SHORT_SWEEP_PADDING,
            max_advance_iterations: constants::MAX_ADVANCE_ITERATIONS,
        }
    }
}

impl NarrowPhaseConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        debug!(path = %path.display(), ?config, "loaded narrow-phase config");
        Ok(config)
    }

    /// Rejects margins that would break the queries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let margins = [
            ("contact_bias", self.contact_bias),
            ("short_sweep_threshold", self.short_sweep_threshold),
            ("short_sweep_padding", self.short_sweep_padding),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.max_advance_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_advance_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads named presets from a directory of `<name>.yaml` files.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a preset by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("presets");
    /// let precise = loader.load("precise")?;
    /// ```
    pub fn load(&self, name: &str) -> Result<NarrowPhaseConfig, ConfigError> {
        let path = self.base_path.join(format!("{name}.yaml"));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        NarrowPhaseConfig::load(path)
    }

    /// Names of all presets in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>, ConfigError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
