//! Tracing subscriber setup.
//!
//! The crate itself only emits `tracing` events. Hosts that do not install their own
//! subscriber can call [`init_logging`] with the settings loaded from
//! [`PointsConfig`](crate::config::PointsConfig). `RUST_LOG` takes precedence over the
//! configured level when set.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{GeneratorError, PointsResult};

/// Build the env filter for the given settings.
pub fn env_filter(config: &LoggingConfig) -> PointsResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| GeneratorError::Logging(format!("invalid level '{}': {e}", config.level))),
    }
}

/// Install a global fmt subscriber.
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> PointsResult<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| GeneratorError::Logging(e.to_string()))?;
    tracing::debug!(level = %config.level, json = config.json, "Logging initialised");
    Ok(())
}
