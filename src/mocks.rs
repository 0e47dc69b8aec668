//! Mock market data feeds for demos and testing
//!
//! These feeds never touch the network. They can be told to fail or stall so
//! fallback behavior is observable end to end.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use trinity_config::{reference_prices, GasSourceKind, PriceSourceKind, Settings};
use trinity_types::{ChainId, GasPriceSource, PriceError, PriceResult, PriceSource};

/// Price feed serving fixed prices, optionally failing or stalling
#[derive(Debug, Clone)]
pub struct MockPriceSource {
	prices: Arc<HashMap<String, Decimal>>,
	failing: Arc<AtomicBool>,
	delay: Option<Duration>,
	calls: Arc<AtomicUsize>,
}

impl MockPriceSource {
	/// Feed serving the reference prices of all three chains
	pub fn new() -> Self {
		Self::with_chain_prices(&reference_prices())
	}

	pub fn with_chain_prices(prices: &BTreeMap<ChainId, Decimal>) -> Self {
		Self {
			prices: Arc::new(
				prices
					.iter()
					.map(|(chain, price)| (chain.price_token_id().to_string(), *price))
					.collect(),
			),
			failing: Arc::new(AtomicBool::new(false)),
			delay: None,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Feed whose every request fails
	pub fn failing() -> Self {
		let source = Self::new();
		source.set_failing(true);
		source
	}

	/// Stall every request before answering
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	/// Number of requests received so far
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Default for MockPriceSource {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PriceSource for MockPriceSource {
	fn source_id(&self) -> &str {
		"mock"
	}

	async fn fetch_usd_price(&self, token: &str) -> PriceResult<Decimal> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		if self.failing.load(Ordering::SeqCst) {
			return Err(PriceError::HttpStatus { status_code: 503 });
		}
		self.prices
			.get(token)
			.copied()
			.ok_or_else(|| PriceError::MissingToken {
				token: token.to_string(),
			})
	}
}

/// Gas feed serving one gas price for Ethereum
#[derive(Debug, Clone)]
pub struct MockGasSource {
	gwei: Decimal,
	failing: Arc<AtomicBool>,
	calls: Arc<AtomicUsize>,
}

impl MockGasSource {
	pub fn new(gwei: Decimal) -> Self {
		Self {
			gwei,
			failing: Arc::new(AtomicBool::new(false)),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn failing() -> Self {
		let source = Self::new(Decimal::ZERO);
		source.failing.store(true, Ordering::SeqCst);
		source
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Default for MockGasSource {
	fn default() -> Self {
		Self::new(Decimal::from(20))
	}
}

#[async_trait]
impl GasPriceSource for MockGasSource {
	fn source_id(&self) -> &str {
		"mock"
	}

	async fn fetch_gas_price_gwei(&self, chain: ChainId) -> PriceResult<Decimal> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if chain != ChainId::Ethereum {
			return Err(PriceError::UnsupportedChain { chain });
		}
		if self.failing.load(Ordering::SeqCst) {
			return Err(PriceError::Timeout { timeout_ms: 0 });
		}
		Ok(self.gwei)
	}
}

/// Settings that serve reference prices and gas without network access
pub fn mock_settings() -> Settings {
	let mut settings = Settings::default();
	settings.pricing.source = PriceSourceKind::Static;
	settings.gas.source = GasSourceKind::Static;
	settings
}
