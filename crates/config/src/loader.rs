//! Configuration loading utilities

use crate::settings::ConfigValidationError;
use crate::Settings;
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;

/// Errors raised while building settings at startup
#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Source(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Invalid(#[from] ConfigValidationError),
}

/// Load configuration from `config/config` (any supported format) and
/// `TRINITY__`-prefixed environment variables
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	load_config_from("config/config")
}

/// Load configuration from the given file stem; a missing file yields defaults
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(Environment::with_prefix("TRINITY").separator("__"))
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}
