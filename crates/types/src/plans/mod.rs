//! Vault deployment plan models

pub mod request;
pub mod response;

pub use request::{
	PlanParameters, PlanRequest, PlanValidationError, PreferenceQuery, SelectionRequest,
	VaultDescriptor,
};
pub use response::{ChainRecommendation, OperationRecommendation, SelectionValidation};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;
use crate::fees::{FeeEstimate, OperationKind};
use crate::roles::{FeeSavings, RoleAssignment, SecurityLevel, VerificationRequirements};

/// Verification policy attached to a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
	pub level: SecurityLevel,
	pub requires_verification: VerificationRequirements,
	/// Confirmations needed in total: the primary plus every required verifier
	pub required_confirmations: u8,
	pub cross_chain_enabled: bool,
}

impl SecurityConfig {
	/// Lowest level that enables cross-chain operation
	pub const CROSS_CHAIN_LEVEL: u8 = 4;

	pub fn new(level: SecurityLevel, requires_verification: VerificationRequirements) -> Self {
		let verifiers = requires_verification.required_count() as u8;
		Self {
			level,
			cross_chain_enabled: level.value() >= Self::CROSS_CHAIN_LEVEL,
			required_confirmations: 1 + verifiers,
			requires_verification,
		}
	}
}

/// Complete plan for deploying a vault across the three chains
///
/// Holds no identity or timestamp; identical inputs produce equal plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VaultCreationPlan {
	pub primary_chain: ChainId,
	pub operation_type: OperationKind,
	#[serde(flatten)]
	pub vault: VaultDescriptor,
	pub trinity: RoleAssignment,
	pub fee_estimates: BTreeMap<ChainId, FeeEstimate>,
	/// Fee of the primary chain
	pub selected_fee: FeeEstimate,
	pub recommended_chain: ChainId,
	pub cheapest_fee: FeeEstimate,
	/// Primary chain fee against the baseline chain
	pub savings: FeeSavings,
	pub deployment_priority: Vec<ChainId>,
	pub security_config: SecurityConfig,
}
