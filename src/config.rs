//! Settings for point generation using Figment
//!
//! Settings are loaded from:
//! 1. A TOML file (base configuration)
//! 2. Environment variables (prefixed with `SCAN_POINTS_`, `__` separates sections)
//!
//! # Environment Variable Overrides
//!
//! ```text
//! SCAN_POINTS_LOGGING__LEVEL=debug
//! SCAN_POINTS_GENERATION__DEFAULT_UNITS=um
//! SCAN_POINTS_GENERATION__MAX_POINTS=1000000
//! ```
//!
//! # Example
//!
//! ```no_run
//! use scan_points::config::PointsConfig;
//! use scan_points::service::PointGeneratorService;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PointsConfig::load_from("config/scan_points.toml")?;
//!     let service = PointGeneratorService::with_settings(config.generation.clone());
//!     println!("Default units: {}", service.settings().default_units);
//!     Ok(())
//! }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GeneratorError, PointsResult};
use crate::limits::MAX_SCAN_POINTS;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Generator construction settings
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Settings applied by the generator service to every model it builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Units reported for axes whose model does not name any
    #[serde(default = "default_units")]
    pub default_units: String,
    /// Largest scan the service will build
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_units() -> String {
    "mm".to_string()
}

fn default_max_points() -> usize {
    MAX_SCAN_POINTS
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_units: default_units(),
            max_points: default_max_points(),
        }
    }
}

impl PointsConfig {
    /// Load settings from a TOML file, then apply `SCAN_POINTS_` environment overrides.
    ///
    /// Missing keys fall back to their defaults, and a missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or validation fails.
    pub fn load_from<P: AsRef<Path>>(path: P) -> PointsResult<Self> {
        let config: Self = Figment::from(Serialized::defaults(PointsConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SCAN_POINTS_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate settings after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Default units are not empty
    /// - The point limit is non-zero
    pub fn validate(&self) -> PointsResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(GeneratorError::Configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.generation.default_units.trim().is_empty() {
            return Err(GeneratorError::Configuration(
                "default_units cannot be empty".to_string(),
            ));
        }

        if self.generation.max_points == 0 {
            return Err(GeneratorError::Configuration(
                "max_points must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = PointsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.default_units, "mm");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = PointsConfig::default();
        config.logging.level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_zero_max_points_rejected() {
        let mut config = PointsConfig::default();
        config.generation.max_points = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[logging]
level = "debug"

[generation]
default_units = "um"
max_points = 5000
"#
        )
        .unwrap();

        let config = PointsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.generation.default_units, "um");
        assert_eq!(config.generation.max_points, 5000);
    }

    #[test]
    fn test_load_from_partial_file_uses_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[generation]\nmax_points = 10").unwrap();

        let config = PointsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.generation.max_points, 10);
        assert_eq!(config.generation.default_units, "mm");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[logging]\nlevel = \"loud\"").unwrap();

        assert!(PointsConfig::load_from(file.path()).is_err());
    }
}
