//! Request payloads for planning, validation and recommendation

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;
#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::chains::{ChainError, ChainId};
use crate::fees::OperationKind;
use crate::roles::{SecurityLevel, SecurityLevelError};

/// Validation errors for planning requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
	#[error(transparent)]
	Chain(#[from] ChainError),

	#[error(transparent)]
	SecurityLevel(#[from] SecurityLevelError),

	#[error("Invalid asset amount '{value}': {reason}")]
	InvalidAmount { value: String, reason: String },
}

fn default_security_level() -> serde_json::Value {
	serde_json::Value::from(SecurityLevel::default().value())
}

/// Vault fields echoed into the plan; not interpreted by the planner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VaultDescriptor {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vault_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_amount: Option<Decimal>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_type: Option<String>,
}

/// POST /plan body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
	/// Missing chains are rejected during validation
	#[serde(default)]
	pub primary_chain: String,
	#[serde(default)]
	pub vault_type: Option<String>,
	#[serde(default)]
	pub asset_amount: Option<String>,
	#[serde(default)]
	pub asset_type: Option<String>,
	/// Integer or integer string in 1..=5, range-checked in `validate`
	#[serde(default = "default_security_level")]
	#[cfg_attr(feature = "openapi", schema(value_type = u8))]
	pub security_level: serde_json::Value,
	#[serde(default)]
	pub operation_type: Option<String>,
}

/// Planning inputs after boundary validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanParameters {
	pub primary_chain: ChainId,
	pub operation: OperationKind,
	pub security_level: SecurityLevel,
	pub vault: VaultDescriptor,
}

impl PlanRequest {
	pub fn new(primary_chain: impl Into<String>, security_level: u8) -> Self {
		Self {
			primary_chain: primary_chain.into(),
			vault_type: None,
			asset_amount: None,
			asset_type: None,
			security_level: serde_json::Value::from(security_level),
			operation_type: None,
		}
	}

	/// Resolve free-form request fields into typed parameters
	pub fn validate(&self) -> Result<PlanParameters, PlanValidationError> {
		let primary_chain = ChainId::from_str(&self.primary_chain)?;
		let security_level = SecurityLevel::from_json(&self.security_level)?;

		let asset_amount = match self.asset_amount.as_deref() {
			None => None,
			Some(raw) => {
				let amount =
					Decimal::from_str(raw.trim()).map_err(|e| PlanValidationError::InvalidAmount {
						value: raw.to_string(),
						reason: e.to_string(),
					})?;
				if amount.is_sign_negative() {
					return Err(PlanValidationError::InvalidAmount {
						value: raw.to_string(),
						reason: "amount must not be negative".to_string(),
					});
				}
				Some(amount)
			},
		};

		Ok(PlanParameters {
			primary_chain,
			operation: OperationKind::from_param(self.operation_type.as_deref()),
			security_level,
			vault: VaultDescriptor {
				vault_type: self.vault_type.clone(),
				asset_amount,
				asset_type: self.asset_type.clone(),
			},
		})
	}
}

/// POST /validate body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
	#[serde(default)]
	pub primary_chain: String,
	/// Balance of the chain's native token
	#[serde(default)]
	pub user_balance: Option<Decimal>,
	#[serde(default)]
	pub operation_type: Option<String>,
}

/// GET /recommend query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema, IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct PreferenceQuery {
	#[serde(default, deserialize_with = "flag")]
	pub prefer_speed: bool,
	#[serde(default, deserialize_with = "flag")]
	pub prefer_cost: bool,
	#[serde(default, deserialize_with = "flag")]
	pub prefer_security: bool,
	#[serde(default)]
	pub operation_type: Option<String>,
}

/// Accepts bare query flags (`?preferSpeed`) as well as explicit booleans
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Flag {
		Bool(bool),
		Text(String),
	}

	Ok(match Option::<Flag>::deserialize(deserializer)? {
		None => false,
		Some(Flag::Bool(value)) => value,
		Some(Flag::Text(text)) => {
			matches!(text.trim().to_ascii_lowercase().as_str(), "" | "1" | "true" | "yes" | "on")
		},
	})
}
