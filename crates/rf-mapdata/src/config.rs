//! Map data loading options

use std::path::Path;

use rf_units::{TimeDuration, Volume};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDataConfig {
    /// Source tag of the base game data
    pub core_source: String,
    pub season_length_days: i64,
    /// Storage volume of a square when a definition does not set one
    pub default_max_volume: Volume,
    /// Reject core terrain that restates an inherited `max_volume`
    pub strict_max_volume: bool,
}

impl Default for MapDataConfig {
    fn default() -> Self {
        Self {
            core_source: "core".to_string(),
            season_length_days: 91,
            default_max_volume: Volume::from_liter(1000),
            strict_max_volume: true,
        }
    }
}

impl MapDataConfig {
    /// Load from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::parse(&contents)
    }

    /// Parse JSON text; members not given keep their defaults
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        if config.season_length_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "season_length_days".to_string(),
                config.season_length_days.to_string(),
            ));
        }
        if config.core_source.is_empty() {
            return Err(ConfigError::InvalidValue(
                "core_source".to_string(),
                String::new(),
            ));
        }
        Ok(config)
    }

    pub fn season_length(&self) -> TimeDuration {
        TimeDuration::from_days(self.season_length_days)
    }
}
