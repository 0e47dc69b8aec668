//! Persisted record shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;
use crate::fees::FeeEstimate;
use crate::plans::VaultCreationPlan;

/// One stored fee estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeHistoryRecord {
	pub id: String,
	pub estimate: FeeEstimate,
	/// True when the estimate came from static defaults rather than live inputs
	pub fallback: bool,
	pub recorded_at: DateTime<Utc>,
}

impl FeeHistoryRecord {
	pub fn chain(&self) -> ChainId {
		self.estimate.chain
	}
}

/// One stored vault creation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
	pub id: String,
	pub plan: VaultCreationPlan,
	pub created_at: DateTime<Utc>,
}

impl PlanRecord {
	pub fn primary_chain(&self) -> ChainId {
		self.plan.primary_chain
	}
}
