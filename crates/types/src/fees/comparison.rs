//! Cross-chain fee comparison

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::{FeeEstimate, OperationKind};
use crate::chains::{ChainId, ChainOrder};

/// Savings of the cheapest chain against the most expensive one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSavings {
	/// USD difference, rounded to cents
	pub amount_usd: Decimal,
	/// Difference as a percentage of the most expensive fee, one decimal
	pub percent: Decimal,
	pub most_expensive_chain: ChainId,
}

/// Fee estimates for every chain reduced to a single recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChainComparison {
	pub operation_type: OperationKind,
	pub estimates: BTreeMap<ChainId, FeeEstimate>,
	/// Chains ordered cheapest first, ties resolved by the tie-break order
	pub ranking: Vec<ChainId>,
	pub recommended_chain: ChainId,
	pub savings: ComparisonSavings,
}

impl ChainComparison {
	/// Reduce a set of estimates into a comparison
	///
	/// The recommendation is the estimate with the lowest USD fee; equal fees
	/// resolve to the chain ranked first in `tie_break`, so the result never
	/// depends on the order estimates arrive in. Returns `None` when no
	/// estimates are given.
	pub fn from_estimates(
		operation_type: OperationKind,
		estimates: impl IntoIterator<Item = FeeEstimate>,
		tie_break: &ChainOrder,
	) -> Option<Self> {
		let estimates: BTreeMap<ChainId, FeeEstimate> = estimates
			.into_iter()
			.map(|estimate| (estimate.chain, estimate))
			.collect();

		let mut ranking: Vec<ChainId> = estimates.keys().copied().collect();
		ranking.sort_by(|a, b| {
			estimates[a]
				.estimated_fee_usd
				.cmp(&estimates[b].estimated_fee_usd)
				.then_with(|| tie_break.rank(*a).cmp(&tie_break.rank(*b)))
		});

		let recommended_chain = *ranking.first()?;
		let most_expensive_chain = *ranking.last()?;
		let cheapest_fee = estimates[&recommended_chain].estimated_fee_usd;
		let highest_fee = estimates[&most_expensive_chain].estimated_fee_usd;

		let difference = (highest_fee - cheapest_fee).max(Decimal::ZERO);
		let percent = if highest_fee > Decimal::ZERO {
			(difference / highest_fee * Decimal::ONE_HUNDRED)
				.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
				.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
		} else {
			Decimal::ZERO
		};

		Some(Self {
			operation_type,
			estimates,
			ranking,
			recommended_chain,
			savings: ComparisonSavings {
				amount_usd: difference
					.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
				percent,
				most_expensive_chain,
			},
		})
	}

	pub fn estimate(&self, chain: ChainId) -> Option<&FeeEstimate> {
		self.estimates.get(&chain)
	}

	/// Estimate of the recommended chain
	pub fn cheapest(&self) -> Option<&FeeEstimate> {
		self.estimates.get(&self.recommended_chain)
	}

	pub fn fee_usd_by_chain(&self) -> BTreeMap<ChainId, Decimal> {
		self.estimates
			.iter()
			.map(|(chain, estimate)| (*chain, estimate.estimated_fee_usd))
			.collect()
	}

	/// Estimates in ranking order
	pub fn ranked_estimates(&self) -> Vec<FeeEstimate> {
		self.ranking
			.iter()
			.filter_map(|chain| self.estimates.get(chain).cloned())
			.collect()
	}
}
