//! Trinity role models: primary/verifier assignment and verification policy

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;

/// Requested security level, 1 (lowest) to 5 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(try_from = "u8", into = "u8")]
pub struct SecurityLevel(u8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid security level {level}: must be an integer between {min} and {max}")]
pub struct SecurityLevelError {
	/// The rejected input as received
	pub level: String,
	pub min: u8,
	pub max: u8,
}

impl SecurityLevelError {
	fn rejected(level: impl fmt::Display) -> Self {
		Self {
			level: level.to_string(),
			min: SecurityLevel::MIN,
			max: SecurityLevel::MAX,
		}
	}
}

impl SecurityLevel {
	pub const MIN: u8 = 1;
	pub const MAX: u8 = 5;

	pub fn new(level: u8) -> Result<Self, SecurityLevelError> {
		if (Self::MIN..=Self::MAX).contains(&level) {
			Ok(Self(level))
		} else {
			Err(SecurityLevelError::rejected(level))
		}
	}

	/// Read a level from an untyped JSON field
	///
	/// Accepts integers and integer strings; `null` means the default level.
	pub fn from_json(value: &serde_json::Value) -> Result<Self, SecurityLevelError> {
		match value {
			serde_json::Value::Null => Ok(Self::default()),
			serde_json::Value::Number(number) => number
				.as_i64()
				.ok_or_else(|| SecurityLevelError::rejected(number))
				.and_then(Self::try_from),
			serde_json::Value::String(text) => text
				.trim()
				.parse::<i64>()
				.map_err(|_| SecurityLevelError::rejected(format!("'{}'", text)))
				.and_then(Self::try_from),
			other => Err(SecurityLevelError::rejected(other)),
		}
	}

	pub fn value(&self) -> u8 {
		self.0
	}

	/// Every valid level, lowest first
	pub fn all() -> impl Iterator<Item = SecurityLevel> {
		(Self::MIN..=Self::MAX).map(SecurityLevel)
	}
}

impl Default for SecurityLevel {
	fn default() -> Self {
		Self(3)
	}
}

impl TryFrom<u8> for SecurityLevel {
	type Error = SecurityLevelError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<i64> for SecurityLevel {
	type Error = SecurityLevelError;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		u8::try_from(value)
			.map_err(|_| SecurityLevelError::rejected(value))
			.and_then(Self::new)
	}
}

impl From<SecurityLevel> for u8 {
	fn from(level: SecurityLevel) -> Self {
		level.0
	}
}

impl fmt::Display for SecurityLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Role a chain plays in a vault deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TrinityRole {
	Primary,
	Verify1,
	Verify2,
}

/// Primary chain plus its two verifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TrinityRoles {
	pub primary: ChainId,
	pub verify1: ChainId,
	pub verify2: ChainId,
}

impl TrinityRoles {
	pub fn verifiers(&self) -> [ChainId; 2] {
		[self.verify1, self.verify2]
	}

	pub fn chains(&self) -> [ChainId; 3] {
		[self.primary, self.verify1, self.verify2]
	}

	pub fn role_of(&self, chain: ChainId) -> TrinityRole {
		if chain == self.primary {
			TrinityRole::Primary
		} else if chain == self.verify1 {
			TrinityRole::Verify1
		} else {
			TrinityRole::Verify2
		}
	}
}

/// Roles plus the human-readable responsibilities of each chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
	pub roles: TrinityRoles,
	pub responsibilities: BTreeMap<ChainId, String>,
	pub description: String,
}

/// Which chains must confirm an operation, keyed by chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(transparent)]
pub struct VerificationRequirements(pub BTreeMap<ChainId, bool>);

impl VerificationRequirements {
	pub fn is_required(&self, chain: ChainId) -> bool {
		self.0.get(&chain).copied().unwrap_or(false)
	}

	pub fn required_chains(&self) -> Vec<ChainId> {
		self.0
			.iter()
			.filter(|(_, required)| **required)
			.map(|(chain, _)| *chain)
			.collect()
	}

	pub fn required_count(&self) -> usize {
		self.0.values().filter(|required| **required).count()
	}
}

/// Savings of the primary chain's fee against the baseline chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeSavings {
	pub selected_chain: ChainId,
	pub selected_fee_usd: Decimal,
	pub baseline_chain: ChainId,
	pub baseline_fee_usd: Decimal,
	pub savings_usd: Decimal,
	pub percent_saved: Decimal,
}
