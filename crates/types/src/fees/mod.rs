//! Fee estimate models

pub mod comparison;
pub mod errors;

pub use comparison::{ChainComparison, ComparisonSavings};
pub use errors::EstimationFailure;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;

/// Operation a fee is being estimated for
///
/// Free-form but normalized (trimmed, lowercase). Unknown kinds are valid and
/// priced with each chain's default multiplier or gas limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(from = "String", into = "String")]
pub struct OperationKind(String);

impl OperationKind {
	pub const VAULT_CREATION: &'static str = "vault_creation";
	pub const WITHDRAWAL: &'static str = "withdrawal";
	pub const TRANSFER: &'static str = "transfer";
	pub const SWAP: &'static str = "swap";

	pub fn new(kind: impl AsRef<str>) -> Self {
		let normalized = kind.as_ref().trim().to_ascii_lowercase();
		if normalized.is_empty() {
			return Self::vault_creation();
		}
		Self(normalized)
	}

	pub fn vault_creation() -> Self {
		Self(Self::VAULT_CREATION.to_string())
	}

	pub fn withdrawal() -> Self {
		Self(Self::WITHDRAWAL.to_string())
	}

	pub fn transfer() -> Self {
		Self(Self::TRANSFER.to_string())
	}

	pub fn swap() -> Self {
		Self(Self::SWAP.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Resolve from an optional request parameter, defaulting to vault creation
	pub fn from_param(param: Option<&str>) -> Self {
		param.map(Self::new).unwrap_or_default()
	}
}

impl Default for OperationKind {
	fn default() -> Self {
		Self::vault_creation()
	}
}

impl fmt::Display for OperationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for OperationKind {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for OperationKind {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<OperationKind> for String {
	fn from(kind: OperationKind) -> Self {
		kind.0
	}
}

/// Coarse network load classification
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
	#[default]
	Low,
	Medium,
	High,
}

impl fmt::Display for CongestionLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CongestionLevel::Low => f.write_str("low"),
			CongestionLevel::Medium => f.write_str("medium"),
			CongestionLevel::High => f.write_str("high"),
		}
	}
}

/// Inputs of the fee formula that produced an estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FeeBreakdown {
	FeeMarket {
		#[serde(rename = "gasPriceGwei")]
		gas_price_gwei: Decimal,
		#[serde(rename = "gasLimit")]
		gas_limit: u64,
	},
	Flat {
		#[serde(rename = "baseFee")]
		base_fee: Decimal,
		multiplier: Decimal,
	},
}

/// Fee estimate for one operation on one chain
///
/// Amounts serialize as decimal strings. Estimates carry no timestamp so two
/// estimates computed from the same inputs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
	pub chain: ChainId,
	pub operation_type: OperationKind,
	/// Fee in the chain's native token
	pub estimated_fee: Decimal,
	pub estimated_fee_usd: Decimal,
	pub native_price_usd: Decimal,
	pub network_congestion: CongestionLevel,
	/// Expected confirmation time in seconds
	pub estimated_time: u64,
	pub breakdown: FeeBreakdown,
}

impl FeeEstimate {
	/// Native token ticker for display
	pub fn symbol(&self) -> &'static str {
		self.chain.native_symbol()
	}
}

/// Result of a single estimation, tagged with whether live inputs were used
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
	Live(FeeEstimate),
	Fallback {
		estimate: FeeEstimate,
		reason: EstimationFailure,
	},
}

impl EstimateOutcome {
	pub fn estimate(&self) -> &FeeEstimate {
		match self {
			EstimateOutcome::Live(estimate) => estimate,
			EstimateOutcome::Fallback { estimate, .. } => estimate,
		}
	}

	pub fn into_estimate(self) -> FeeEstimate {
		match self {
			EstimateOutcome::Live(estimate) => estimate,
			EstimateOutcome::Fallback { estimate, .. } => estimate,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, EstimateOutcome::Fallback { .. })
	}

	pub fn fallback_reason(&self) -> Option<&EstimationFailure> {
		match self {
			EstimateOutcome::Live(_) => None,
			EstimateOutcome::Fallback { reason, .. } => Some(reason),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn test_operation_kind_normalization() {
		assert_eq!(OperationKind::new(" Vault_Creation "), OperationKind::vault_creation());
		assert_eq!(OperationKind::new(""), OperationKind::vault_creation());
		assert_eq!(OperationKind::new("bridge").as_str(), "bridge");
		assert_eq!(OperationKind::from_param(None), OperationKind::vault_creation());
		assert_eq!(OperationKind::from_param(Some("SWAP")), OperationKind::swap());
	}

	#[test]
	fn test_congestion_ordering() {
		assert!(CongestionLevel::Low < CongestionLevel::Medium);
		assert!(CongestionLevel::Medium < CongestionLevel::High);
	}

	#[test]
	fn test_estimate_serializes_amounts_as_strings() {
		let estimate = FeeEstimate {
			chain: ChainId::Ton,
			operation_type: OperationKind::vault_creation(),
			estimated_fee: Decimal::from_str("0.03").unwrap(),
			estimated_fee_usd: Decimal::from_str("0.165").unwrap(),
			native_price_usd: Decimal::from_str("5.5").unwrap(),
			network_congestion: CongestionLevel::Low,
			estimated_time: 5,
			breakdown: FeeBreakdown::Flat {
				base_fee: Decimal::from_str("0.01").unwrap(),
				multiplier: Decimal::from(3),
			},
		};

		let json = serde_json::to_value(&estimate).unwrap();
		assert_eq!(json["chain"], "ton");
		assert_eq!(json["operationType"], "vault_creation");
		assert_eq!(json["estimatedFee"], "0.03");
		assert_eq!(json["estimatedFeeUsd"], "0.165");
		assert_eq!(json["networkCongestion"], "low");
		assert_eq!(json["breakdown"]["model"], "flat");
		assert_eq!(json["breakdown"]["baseFee"], "0.01");
	}

	#[test]
	fn test_outcome_unwraps_to_estimate() {
		let estimate = FeeEstimate {
			chain: ChainId::Solana,
			operation_type: OperationKind::transfer(),
			estimated_fee: Decimal::new(1, 4),
			estimated_fee_usd: Decimal::new(15, 3),
			native_price_usd: Decimal::from(150),
			network_congestion: CongestionLevel::Low,
			estimated_time: 1,
			breakdown: FeeBreakdown::Flat {
				base_fee: Decimal::new(25, 5),
				multiplier: Decimal::new(4, 1),
			},
		};

		let fallback = EstimateOutcome::Fallback {
			estimate: estimate.clone(),
			reason: EstimationFailure::PriceUnavailable {
				token: "solana".to_string(),
			},
		};
		assert!(fallback.is_fallback());
		assert!(fallback.fallback_reason().is_some());
		assert_eq!(fallback.into_estimate(), estimate);

		let live = EstimateOutcome::Live(estimate.clone());
		assert!(!live.is_fallback());
		assert_eq!(live.estimate(), &estimate);
	}
}
