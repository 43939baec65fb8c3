#![warn(missing_docs)]
//! Configuration of a beamline setup.
//!
//! The configuration is read from a YAML file and handed to its consumers explicitly.
//!
//! ```yaml
//! storage_ring: APS-U
//! number_of_rays: 50000
//! random_seed: 3245345
//! sniff_policy: legacy
//! motor_resolution:
//!   hkb_translation:
//!     value: 0.01
//!     digits: 2
//! ```
use crate::{
    error::{BeamrecError, BrResult},
    field_value::SniffPolicy,
    motors::MotorResolution,
    undulator::{StorageRing, DEFAULT_UNDULATOR_LENGTH},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Settings shared by the source setup, the record loading and the optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeamlineConfig {
    /// storage ring delivering the electron beam
    pub storage_ring: StorageRing,
    /// number of rays of generated sources
    pub number_of_rays: i64,
    /// random seed of generated sources
    pub random_seed: i64,
    /// undulator length [m]
    pub undulator_length: f64,
    /// float heuristic used when loading records
    pub sniff_policy: SniffPolicy,
    /// motor resolutions (entries not given keep their defaults)
    pub motor_resolution: MotorResolution,
}
impl Default for BeamlineConfig {
    fn default() -> Self {
        Self {
            storage_ring: StorageRing::default(),
            number_of_rays: 500_000,
            random_seed: 5_676_561,
            undulator_length: DEFAULT_UNDULATOR_LENGTH,
            sniff_policy: SniffPolicy::default(),
            motor_resolution: MotorResolution::default(),
        }
    }
}
impl BeamlineConfig {
    /// Parse a [`BeamlineConfig`] from a YAML string. Missing entries keep their defaults.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string is not valid YAML, contains unknown
    /// entries or fails the validation.
    pub fn from_yaml_str(yaml: &str) -> BrResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| BeamrecError::Config(format!("parsing of configuration failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }
    /// Read a [`BeamlineConfig`] from a YAML file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> BrResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BeamrecError::Config(format!("cannot read file {} : {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!("using configuration from {}", path.display());
        Ok(config)
    }
    fn validate(&self) -> BrResult<()> {
        if self.number_of_rays < 1 {
            return Err(BeamrecError::Config(format!(
                "number of rays must be positive, got {}",
                self.number_of_rays
            )));
        }
        if !self.undulator_length.is_finite() || self.undulator_length <= 0.0 {
            return Err(BeamrecError::Config(format!(
                "undulator length must be positive, got {}",
                self.undulator_length
            )));
        }
        Ok(())
    }
}
