//! Per-chain fee estimation
//!
//! Estimation never fails. Missing prices, unreachable gas feeds and
//! arithmetic overflow all produce a `Fallback` outcome carrying the chain's
//! static default estimate.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use trinity_config::{ChainFeeSettings, CostModelSettings, Settings};
use trinity_types::{
	ChainId, CongestionLevel, EstimateOutcome, EstimationFailure, FeeBreakdown, FeeEstimate,
	GasPriceSource, OperationKind, PriceOrigin,
};

use crate::price::PriceServiceTrait;

const GWEI_PER_NATIVE: u64 = 1_000_000_000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeeEstimatorTrait: Send + Sync {
	/// Estimate one operation on one chain from live inputs where possible
	async fn estimate(&self, chain: ChainId, operation: &OperationKind) -> EstimateOutcome;

	/// Static estimate from configured default prices and gas price
	fn default_estimate(&self, chain: ChainId, operation: &OperationKind) -> FeeEstimate;
}

pub struct FeeEstimator {
	prices: Arc<dyn PriceServiceTrait>,
	gas: Arc<dyn GasPriceSource>,
	fees: BTreeMap<ChainId, ChainFeeSettings>,
	gas_timeout: Duration,
}

impl FeeEstimator {
	pub fn new(
		prices: Arc<dyn PriceServiceTrait>,
		gas: Arc<dyn GasPriceSource>,
		settings: &Settings,
	) -> Self {
		Self {
			prices,
			gas,
			fees: ChainId::ALL
				.into_iter()
				.map(|chain| (chain, settings.fee_settings(chain)))
				.collect(),
			gas_timeout: Duration::from_millis(settings.timeouts.gas_fetch_ms),
		}
	}

	fn fee_settings(&self, chain: ChainId) -> ChainFeeSettings {
		self.fees
			.get(&chain)
			.cloned()
			.unwrap_or_else(|| ChainFeeSettings::reference(chain))
	}

	async fn gas_price(&self, chain: ChainId) -> Result<Decimal, EstimationFailure> {
		match timeout(self.gas_timeout, self.gas.fetch_gas_price_gwei(chain)).await {
			Ok(Ok(gwei)) => Ok(gwei),
			Ok(Err(e)) => Err(EstimationFailure::GasPriceUnavailable {
				chain,
				reason: e.to_string(),
			}),
			Err(_) => Err(EstimationFailure::GasPriceUnavailable {
				chain,
				reason: format!("no response within {}ms", self.gas_timeout.as_millis()),
			}),
		}
	}

	fn fallback(&self, chain: ChainId, operation: &OperationKind, reason: EstimationFailure) -> EstimateOutcome {
		warn!("Fee estimation for {} {} fell back to defaults: {}", chain, operation, reason);
		EstimateOutcome::Fallback {
			estimate: self.default_estimate(chain, operation),
			reason,
		}
	}
}

#[async_trait]
impl FeeEstimatorTrait for FeeEstimator {
	async fn estimate(&self, chain: ChainId, operation: &OperationKind) -> EstimateOutcome {
		let price = self.prices.resolve(chain).await;
		if price.origin == PriceOrigin::Default {
			return self.fallback(
				chain,
				operation,
				EstimationFailure::PriceUnavailable { token: price.token },
			);
		}

		let settings = self.fee_settings(chain);
		let (breakdown, congestion) = match &settings.cost_model {
			CostModelSettings::FeeMarket(model) => {
				let gwei = match self.gas_price(chain).await {
					Ok(gwei) => gwei,
					Err(reason) => return self.fallback(chain, operation, reason),
				};
				(
					FeeBreakdown::FeeMarket {
						gas_price_gwei: gwei,
						gas_limit: model.gas_limit(operation),
					},
					model.congestion.classify(gwei),
				)
			},
			CostModelSettings::Flat(model) => (
				FeeBreakdown::Flat {
					base_fee: model.base_fee,
					multiplier: model.multiplier(operation),
				},
				CongestionLevel::Low,
			),
		};

		match price_estimate(chain, operation, &settings, breakdown, congestion, price.usd) {
			Some(estimate) => {
				debug!(
					"Estimated {} on {}: {} native, ${} ({} price)",
					operation, chain, estimate.estimated_fee, estimate.estimated_fee_usd, price.origin
				);
				EstimateOutcome::Live(estimate)
			},
			None => self.fallback(chain, operation, EstimationFailure::Overflow { chain }),
		}
	}

	fn default_estimate(&self, chain: ChainId, operation: &OperationKind) -> FeeEstimate {
		let settings = self.fee_settings(chain);
		let usd_price = self.prices.default_price(chain);
		let (breakdown, congestion) = match &settings.cost_model {
			CostModelSettings::FeeMarket(model) => (
				FeeBreakdown::FeeMarket {
					gas_price_gwei: model.default_gas_price_gwei,
					gas_limit: model.gas_limit(operation),
				},
				model.congestion.classify(model.default_gas_price_gwei),
			),
			CostModelSettings::Flat(model) => (
				FeeBreakdown::Flat {
					base_fee: model.base_fee,
					multiplier: model.multiplier(operation),
				},
				CongestionLevel::Low,
			),
		};

		let estimated_fee = native_fee(&breakdown).unwrap_or(Decimal::MAX);
		FeeEstimate {
			chain,
			operation_type: operation.clone(),
			estimated_fee,
			estimated_fee_usd: estimated_fee
				.checked_mul(usd_price)
				.unwrap_or(Decimal::MAX)
				.normalize(),
			native_price_usd: usd_price,
			network_congestion: congestion,
			estimated_time: settings.confirmation_seconds.seconds(congestion),
			breakdown,
		}
	}
}

/// Fee in native units implied by a breakdown; `None` on overflow
pub fn native_fee(breakdown: &FeeBreakdown) -> Option<Decimal> {
	let fee = match breakdown {
		FeeBreakdown::FeeMarket {
			gas_price_gwei,
			gas_limit,
		} => gas_price_gwei
			.checked_mul(Decimal::from(*gas_limit))?
			.checked_div(Decimal::from(GWEI_PER_NATIVE))?,
		FeeBreakdown::Flat {
			base_fee,
			multiplier,
		} => base_fee.checked_mul(*multiplier)?,
	};
	Some(fee.normalize())
}

fn price_estimate(
	chain: ChainId,
	operation: &OperationKind,
	settings: &ChainFeeSettings,
	breakdown: FeeBreakdown,
	congestion: CongestionLevel,
	usd_price: Decimal,
) -> Option<FeeEstimate> {
	let estimated_fee = native_fee(&breakdown)?;
	let estimated_fee_usd = estimated_fee.checked_mul(usd_price)?.normalize();
	Some(FeeEstimate {
		chain,
		operation_type: operation.clone(),
		estimated_fee,
		estimated_fee_usd,
		native_price_usd: usd_price,
		network_congestion: congestion,
		estimated_time: settings.confirmation_seconds.seconds(congestion),
		breakdown,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::ManualClock;
	use crate::price::{MockPriceServiceTrait, PriceService};
	use crate::test_support::{ScriptedGasSource, ScriptedPriceSource};
	use trinity_types::ResolvedPrice;

	fn estimator(prices: ScriptedPriceSource, gas: ScriptedGasSource) -> FeeEstimator {
		let settings = Settings::default();
		let prices = PriceService::new(Arc::new(prices), Arc::new(ManualClock::new()), &settings);
		FeeEstimator::new(Arc::new(prices), Arc::new(gas), &settings)
	}

	fn reference_feeds() -> (ScriptedPriceSource, ScriptedGasSource) {
		(
			ScriptedPriceSource::with_chain_prices(trinity_config::reference_prices()),
			ScriptedGasSource::new(Decimal::from(20)),
		)
	}

	#[tokio::test]
	async fn test_reference_vault_creation_fees() {
		let (prices, gas) = reference_feeds();
		let estimator = estimator(prices, gas);
		let op = OperationKind::vault_creation();

		let ethereum = estimator.estimate(ChainId::Ethereum, &op).await;
		assert!(!ethereum.is_fallback());
		let ethereum = ethereum.into_estimate();
		assert_eq!(ethereum.estimated_fee, Decimal::new(1, 2));
		assert_eq!(ethereum.estimated_fee_usd, Decimal::new(361, 1));
		assert_eq!(ethereum.network_congestion, CongestionLevel::Low);
		assert_eq!(ethereum.estimated_time, 15);

		let solana = estimator.estimate(ChainId::Solana, &op).await.into_estimate();
		assert_eq!(solana.estimated_fee, Decimal::new(3, 4));
		assert_eq!(solana.estimated_fee_usd, Decimal::new(45, 3));
		assert_eq!(solana.estimated_time, 1);

		let ton = estimator.estimate(ChainId::Ton, &op).await.into_estimate();
		assert_eq!(ton.estimated_fee, Decimal::new(3, 2));
		assert_eq!(ton.estimated_fee_usd, Decimal::new(165, 3));
		assert_eq!(ton.estimated_time, 5);
	}

	#[tokio::test]
	async fn test_fee_market_congestion_bands() {
		let op = OperationKind::transfer();
		for (gwei, expected, seconds) in [
			(29, CongestionLevel::Low, 15),
			(30, CongestionLevel::Medium, 30),
			(120, CongestionLevel::High, 60),
		] {
			let estimator = estimator(
				ScriptedPriceSource::with_price(Decimal::from(3610)),
				ScriptedGasSource::new(Decimal::from(gwei)),
			);
			let estimate = estimator.estimate(ChainId::Ethereum, &op).await.into_estimate();
			assert_eq!(estimate.network_congestion, expected);
			assert_eq!(estimate.estimated_time, seconds);
			assert_eq!(
				estimate.breakdown,
				FeeBreakdown::FeeMarket {
					gas_price_gwei: Decimal::from(gwei),
					gas_limit: 21_000
				}
			);
		}
	}

	#[tokio::test]
	async fn test_unknown_operation_uses_default_multiplier() {
		let (prices, gas) = reference_feeds();
		let estimator = estimator(prices, gas);
		let op = OperationKind::new("bridge");

		let ton = estimator.estimate(ChainId::Ton, &op).await;
		assert!(!ton.is_fallback());
		assert_eq!(ton.estimate().estimated_fee, Decimal::new(15, 3));

		let ethereum = estimator.estimate(ChainId::Ethereum, &op).await.into_estimate();
		assert_eq!(ethereum.estimated_fee, Decimal::new(2, 3));
	}

	#[tokio::test]
	async fn test_failing_price_feed_degrades_to_default() {
		let estimator = estimator(
			ScriptedPriceSource::failing(),
			ScriptedGasSource::new(Decimal::from(20)),
		);
		let op = OperationKind::vault_creation();

		for chain in ChainId::ALL {
			let outcome = estimator.estimate(chain, &op).await;
			assert!(matches!(
				outcome.fallback_reason(),
				Some(EstimationFailure::PriceUnavailable { .. })
			));
			assert_eq!(outcome.estimate(), &estimator.default_estimate(chain, &op));
		}
		assert_eq!(
			estimator
				.default_estimate(ChainId::Ethereum, &op)
				.estimated_fee_usd,
			Decimal::new(361, 1)
		);
	}

	#[tokio::test]
	async fn test_failing_gas_feed_only_affects_fee_market_chain() {
		let gas = Arc::new(ScriptedGasSource::failing());
		let settings = Settings::default();
		let prices = PriceService::new(
			Arc::new(ScriptedPriceSource::with_chain_prices(trinity_config::reference_prices())),
			Arc::new(ManualClock::new()),
			&settings,
		);
		let estimator = FeeEstimator::new(Arc::new(prices), gas.clone(), &settings);
		let op = OperationKind::withdrawal();

		let ethereum = estimator.estimate(ChainId::Ethereum, &op).await;
		assert!(matches!(
			ethereum.fallback_reason(),
			Some(EstimationFailure::GasPriceUnavailable { chain: ChainId::Ethereum, .. })
		));
		assert_eq!(ethereum.estimate().estimated_fee, Decimal::new(3, 3));

		assert!(!estimator.estimate(ChainId::Solana, &op).await.is_fallback());
		assert_eq!(gas.calls(), 1);
	}

	#[tokio::test]
	async fn test_stale_price_is_still_live_estimate() {
		let mut prices = MockPriceServiceTrait::new();
		prices.expect_resolve().returning(|chain| ResolvedPrice {
			token: chain.price_token_id().to_string(),
			usd: Decimal::from(200),
			origin: PriceOrigin::Stale,
		});
		prices.expect_default_price().returning(|_| Decimal::from(150));

		let estimator = FeeEstimator::new(
			Arc::new(prices),
			Arc::new(ScriptedGasSource::new(Decimal::from(20))),
			&Settings::default(),
		);
		let outcome = estimator
			.estimate(ChainId::Solana, &OperationKind::vault_creation())
			.await;
		assert!(!outcome.is_fallback());
		assert_eq!(outcome.estimate().estimated_fee_usd, Decimal::new(6, 2));
	}

	#[test]
	fn test_native_fee_overflow() {
		let breakdown = FeeBreakdown::Flat {
			base_fee: Decimal::MAX,
			multiplier: Decimal::from(2),
		};
		assert_eq!(native_fee(&breakdown), None);
	}
}
