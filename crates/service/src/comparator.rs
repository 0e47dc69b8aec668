//! Concurrent fee comparison across the three chains

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};
use trinity_config::Settings;
use trinity_types::{
	ChainComparison, ChainId, ChainOrder, EstimateOutcome, EstimationFailure, OperationKind,
};

use crate::errors::PlannerError;
use crate::estimator::FeeEstimatorTrait;

/// A comparison plus the chains whose estimates fell back to defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
	pub comparison: ChainComparison,
	pub fallbacks: BTreeMap<ChainId, EstimationFailure>,
}

impl ComparisonReport {
	pub fn is_fallback(&self, chain: ChainId) -> bool {
		self.fallbacks.contains_key(&chain)
	}
}

#[derive(Clone)]
pub struct ChainComparator {
	estimator: Arc<dyn FeeEstimatorTrait>,
	tie_break: ChainOrder,
	timeout: Duration,
}

impl ChainComparator {
	pub fn new(estimator: Arc<dyn FeeEstimatorTrait>, settings: &Settings) -> Self {
		Self::with_config(
			estimator,
			settings.chains.tie_break_order,
			Duration::from_millis(settings.timeouts.planning_ms),
		)
	}

	pub fn with_config(
		estimator: Arc<dyn FeeEstimatorTrait>,
		tie_break: ChainOrder,
		timeout: Duration,
	) -> Self {
		Self {
			estimator,
			tie_break,
			timeout,
		}
	}

	/// Estimate every chain concurrently
	///
	/// Each chain gets until a shared deadline; chains that miss it, or whose
	/// task panics, get their default estimate.
	pub async fn estimate_all(&self, operation: &OperationKind) -> BTreeMap<ChainId, EstimateOutcome> {
		let deadline = Instant::now() + self.timeout;
		let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

		let tasks = ChainId::ALL.into_iter().map(|chain| {
			let estimator = Arc::clone(&self.estimator);
			let operation = operation.clone();

			async move {
				debug!("Starting {} estimate for {}", operation, chain);
				let task = {
					let estimator = Arc::clone(&estimator);
					let operation = operation.clone();
					tokio::spawn(async move { estimator.estimate(chain, &operation).await })
				};
				let abort = task.abort_handle();

				let outcome = match timeout_at(deadline, task).await {
					Ok(Ok(outcome)) => outcome,
					Ok(Err(e)) => {
						let reason = EstimationFailure::TaskFailed {
							chain,
							reason: e.to_string(),
						};
						warn!("{}", reason);
						EstimateOutcome::Fallback {
							estimate: estimator.default_estimate(chain, &operation),
							reason,
						}
					},
					Err(_) => {
						abort.abort();
						let reason = EstimationFailure::TimedOut { chain, timeout_ms };
						warn!("{}", reason);
						EstimateOutcome::Fallback {
							estimate: estimator.default_estimate(chain, &operation),
							reason,
						}
					},
				};
				(chain, outcome)
			}
		});

		join_all(tasks).await.into_iter().collect()
	}

	/// Compare all chains for one operation
	pub async fn compare_all(&self, operation: &OperationKind) -> Result<ComparisonReport, PlannerError> {
		let outcomes = self.estimate_all(operation).await;

		let mut fallbacks = BTreeMap::new();
		let mut estimates = Vec::with_capacity(outcomes.len());
		for (chain, outcome) in outcomes {
			if let EstimateOutcome::Fallback { estimate, reason } = outcome {
				fallbacks.insert(chain, reason);
				estimates.push(estimate);
			} else {
				estimates.push(outcome.into_estimate());
			}
		}

		let comparison = ChainComparison::from_estimates(operation.clone(), estimates, &self.tie_break)
			.ok_or(PlannerError::NoEstimates)?;

		info!(
			"Compared {} across chains: {} cheapest, saves ${} ({}%) vs {}",
			operation,
			comparison.recommended_chain,
			comparison.savings.amount_usd,
			comparison.savings.percent,
			comparison.savings.most_expensive_chain
		);

		Ok(ComparisonReport {
			comparison,
			fallbacks,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::ManualClock;
	use crate::estimator::{FeeEstimator, MockFeeEstimatorTrait};
	use crate::price::PriceService;
	use crate::test_support::{ScriptedGasSource, ScriptedPriceSource};
	use rust_decimal::Decimal;
	use trinity_types::{CongestionLevel, FeeBreakdown, FeeEstimate};

	fn flat_estimate(chain: ChainId, fee_usd: Decimal) -> FeeEstimate {
		FeeEstimate {
			chain,
			operation_type: OperationKind::vault_creation(),
			estimated_fee: fee_usd,
			estimated_fee_usd: fee_usd,
			native_price_usd: Decimal::ONE,
			network_congestion: CongestionLevel::Low,
			estimated_time: 1,
			breakdown: FeeBreakdown::Flat {
				base_fee: fee_usd,
				multiplier: Decimal::ONE,
			},
		}
	}

	fn reference_comparator(prices: ScriptedPriceSource) -> ChainComparator {
		let settings = Settings::default();
		let prices = PriceService::new(Arc::new(prices), Arc::new(ManualClock::new()), &settings);
		let estimator = FeeEstimator::new(
			Arc::new(prices),
			Arc::new(ScriptedGasSource::new(Decimal::from(20))),
			&settings,
		);
		ChainComparator::new(Arc::new(estimator), &settings)
	}

	#[tokio::test]
	async fn test_reference_comparison() {
		let comparator = reference_comparator(ScriptedPriceSource::with_chain_prices(
			trinity_config::reference_prices(),
		));
		let report = comparator
			.compare_all(&OperationKind::vault_creation())
			.await
			.unwrap();

		assert!(report.fallbacks.is_empty());
		let comparison = report.comparison;
		assert_eq!(comparison.recommended_chain, ChainId::Solana);
		assert_eq!(comparison.ranking, vec![ChainId::Solana, ChainId::Ton, ChainId::Ethereum]);
		assert_eq!(comparison.savings.amount_usd, Decimal::new(3606, 2));
		assert_eq!(comparison.savings.percent, Decimal::new(999, 1));
		assert_eq!(comparison.savings.most_expensive_chain, ChainId::Ethereum);
	}

	#[tokio::test]
	async fn test_erroring_price_source_still_compares() {
		let comparator = reference_comparator(ScriptedPriceSource::failing());
		let report = comparator
			.compare_all(&OperationKind::vault_creation())
			.await
			.unwrap();

		assert_eq!(report.fallbacks.len(), 3);
		assert!(report.is_fallback(ChainId::Ton));
		assert_eq!(report.comparison.recommended_chain, ChainId::Solana);
		assert_eq!(report.comparison.savings.amount_usd, Decimal::new(3606, 2));
	}

	#[tokio::test]
	async fn test_estimates_every_chain_once() {
		let mut estimator = MockFeeEstimatorTrait::new();
		estimator
			.expect_estimate()
			.times(3)
			.returning(|chain, _| EstimateOutcome::Live(flat_estimate(chain, Decimal::from(5))));
		estimator.expect_default_estimate().never();

		let comparator = ChainComparator::with_config(
			Arc::new(estimator),
			ChainOrder::low_fee_first(),
			Duration::from_secs(5),
		);
		let outcomes = comparator.estimate_all(&OperationKind::vault_creation()).await;
		assert_eq!(outcomes.len(), 3);
		assert!(outcomes.values().all(|outcome| !outcome.is_fallback()));
	}

	#[tokio::test]
	async fn test_timeout_uses_default_estimate() {
		let prices = ScriptedPriceSource::with_chain_prices(trinity_config::reference_prices());
		prices.delay(Duration::from_millis(400));
		let settings = Settings::default();
		let price_service = PriceService::with_config(
			Arc::new(prices),
			Arc::new(ManualClock::new()),
			Duration::from_secs(60),
			Duration::from_secs(5),
			trinity_config::reference_prices(),
		);
		let estimator = FeeEstimator::new(
			Arc::new(price_service),
			Arc::new(ScriptedGasSource::new(Decimal::from(20))),
			&settings,
		);
		let comparator = ChainComparator::with_config(
			Arc::new(estimator),
			ChainOrder::low_fee_first(),
			Duration::from_millis(50),
		);

		let report = comparator
			.compare_all(&OperationKind::vault_creation())
			.await
			.unwrap();
		assert_eq!(report.fallbacks.len(), 3);
		assert!(report
			.fallbacks
			.values()
			.all(|reason| matches!(reason, EstimationFailure::TimedOut { timeout_ms: 50, .. })));
		assert_eq!(report.comparison.recommended_chain, ChainId::Solana);
	}

	#[tokio::test]
	async fn test_ties_resolve_by_configured_order() {
		let mut estimator = MockFeeEstimatorTrait::new();
		estimator
			.expect_estimate()
			.returning(|chain, _| EstimateOutcome::Live(flat_estimate(chain, Decimal::ONE)));

		let comparator = ChainComparator::with_config(
			Arc::new(estimator),
			ChainOrder::low_fee_first(),
			Duration::from_secs(1),
		);
		let report = comparator
			.compare_all(&OperationKind::vault_creation())
			.await
			.unwrap();
		assert_eq!(report.comparison.recommended_chain, ChainId::Ton);
		assert_eq!(report.comparison.savings.amount_usd, Decimal::ZERO);
		assert_eq!(report.comparison.savings.percent, Decimal::ZERO);
	}
}
