//! Advisory responses: selection validation and chain recommendations

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;
use crate::fees::FeeEstimate;
use crate::roles::FeeSavings;

/// Advisory check of a user's chain selection; never blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SelectionValidation {
	pub valid: bool,
	pub warnings: Vec<String>,
	pub recommendations: Vec<String>,
}

/// Chain picked from soft user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChainRecommendation {
	pub recommended: ChainId,
	pub reason: String,
	pub alternatives: Vec<ChainId>,
}

/// Cheapest chain for an operation with savings against the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OperationRecommendation {
	pub recommended: ChainId,
	pub reason: String,
	pub savings_vs_baseline: FeeSavings,
	pub all_options: Vec<FeeEstimate>,
}
