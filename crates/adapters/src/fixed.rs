//! Static feeds serving configured values without network access

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use trinity_types::{ChainId, GasPriceSource, PriceError, PriceResult, PriceSource};

/// Serves fixed USD prices keyed by price-feed token id
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
	prices: HashMap<String, Decimal>,
}

impl StaticPriceSource {
	pub fn new(prices: HashMap<String, Decimal>) -> Self {
		Self { prices }
	}

	/// Key chain prices by their native token ids
	pub fn from_chain_prices(prices: &BTreeMap<ChainId, Decimal>) -> Self {
		Self::new(
			prices
				.iter()
				.map(|(chain, price)| (chain.price_token_id().to_string(), *price))
				.collect(),
		)
	}
}

#[async_trait]
impl PriceSource for StaticPriceSource {
	fn source_id(&self) -> &str {
		"static"
	}

	async fn fetch_usd_price(&self, token: &str) -> PriceResult<Decimal> {
		self.prices
			.get(token)
			.copied()
			.ok_or_else(|| PriceError::MissingToken {
				token: token.to_string(),
			})
	}
}

/// Serves fixed gas prices for fee-market chains
#[derive(Debug, Clone, Default)]
pub struct StaticGasPriceSource {
	gas_prices_gwei: BTreeMap<ChainId, Decimal>,
}

impl StaticGasPriceSource {
	pub fn new(gas_prices_gwei: BTreeMap<ChainId, Decimal>) -> Self {
		Self { gas_prices_gwei }
	}
}

#[async_trait]
impl GasPriceSource for StaticGasPriceSource {
	fn source_id(&self) -> &str {
		"static"
	}

	async fn fetch_gas_price_gwei(&self, chain: ChainId) -> PriceResult<Decimal> {
		self.gas_prices_gwei
			.get(&chain)
			.copied()
			.ok_or(PriceError::UnsupportedChain { chain })
	}
}
