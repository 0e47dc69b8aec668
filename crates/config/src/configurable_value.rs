//! Configurable value types that can load from environment variables or plain values

use serde::{Deserialize, Serialize};
use std::fmt;
use trinity_types::SecretString;

/// A credential that is either read from an environment variable or given inline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	/// "env" for environment variable, "plain" for direct value
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Environment variable name or the value itself
	pub value: String,
}

/// Type of configurable value
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve into a secret; empty values count as unset
	pub fn resolve(&self) -> Result<SecretString, ConfigurableValueError> {
		let raw = match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			})?,
			ValueType::Plain => self.value.clone(),
		};
		let secret = SecretString::from(raw);
		if secret.is_empty() {
			return Err(ConfigurableValueError::Empty(self.description()));
		}
		Ok(secret)
	}

	/// Description for startup logs; never includes the value
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Empty value from {0}")]
	Empty(String),
}

impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_value() {
		let config = ConfigurableValue::from_plain("cg-demo-key");
		assert_eq!(config.resolve().unwrap().expose_secret(), "cg-demo-key");
		assert_eq!(config.to_string(), "plain:[REDACTED]");
	}

	#[test]
	fn test_env_value() {
		std::env::set_var("TRINITY_TEST_PRICE_KEY", "key-from-env");
		let config = ConfigurableValue::from_env("TRINITY_TEST_PRICE_KEY");
		assert_eq!(config.resolve().unwrap().expose_secret(), "key-from-env");
		std::env::remove_var("TRINITY_TEST_PRICE_KEY");
	}

	#[test]
	fn test_missing_and_blank_values() {
		let missing = ConfigurableValue::from_env("TRINITY_TEST_UNSET_KEY");
		assert_eq!(
			missing.resolve(),
			Err(ConfigurableValueError::EnvironmentVariableNotFound(
				"TRINITY_TEST_UNSET_KEY".to_string()
			))
		);

		let blank = ConfigurableValue::from_plain("  ");
		assert!(matches!(blank.resolve(), Err(ConfigurableValueError::Empty(_))));
	}

	#[test]
	fn test_prefix_conversion_and_serde() {
		let config = ConfigurableValue::from("env:COINGECKO_API_KEY");
		assert_eq!(config.value_type, ValueType::Env);
		assert_eq!(config.value, "COINGECKO_API_KEY");

		let parsed: ConfigurableValue =
			serde_json::from_str(r#"{"type":"env","value":"COINGECKO_API_KEY"}"#).unwrap();
		assert_eq!(parsed, config);
	}
}
