//! Scriptable upstream feeds for unit tests

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use trinity_types::{ChainId, GasPriceSource, PriceError, PriceResult, PriceSource};

/// Price feed returning fixed prices, optionally failing or slow
#[derive(Debug, Default)]
pub struct ScriptedPriceSource {
	prices: BTreeMap<String, Decimal>,
	any_token: Option<Decimal>,
	failing: AtomicBool,
	delay_ms: AtomicU64,
	calls: AtomicUsize,
}

impl ScriptedPriceSource {
	pub fn with_price(price: Decimal) -> Self {
		Self {
			any_token: Some(price),
			..Self::default()
		}
	}

	pub fn with_chain_prices(prices: BTreeMap<ChainId, Decimal>) -> Self {
		Self {
			prices: prices
				.into_iter()
				.map(|(chain, price)| (chain.price_token_id().to_string(), price))
				.collect(),
			..Self::default()
		}
	}

	pub fn failing() -> Self {
		let source = Self::default();
		source.fail();
		source
	}

	pub fn fail(&self) {
		self.failing.store(true, Ordering::SeqCst);
	}

	pub fn delay(&self, by: Duration) {
		self.delay_ms.store(by.as_millis() as u64, Ordering::SeqCst);
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
	fn source_id(&self) -> &str {
		"scripted"
	}

	async fn fetch_usd_price(&self, token: &str) -> PriceResult<Decimal> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let delay = self.delay_ms.load(Ordering::SeqCst);
		if delay > 0 {
			tokio::time::sleep(Duration::from_millis(delay)).await;
		}
		if self.failing.load(Ordering::SeqCst) {
			return Err(PriceError::HttpStatus { status_code: 503 });
		}
		self.prices
			.get(token)
			.copied()
			.or(self.any_token)
			.ok_or_else(|| PriceError::MissingToken {
				token: token.to_string(),
			})
	}
}

/// Gas feed returning a fixed price for ethereum, optionally failing
#[derive(Debug)]
pub struct ScriptedGasSource {
	gwei: Decimal,
	failing: AtomicBool,
	calls: AtomicUsize,
}

impl ScriptedGasSource {
	pub fn new(gwei: Decimal) -> Self {
		Self {
			gwei,
			failing: AtomicBool::new(false),
			calls: AtomicUsize::new(0),
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

#[async_trait]
impl GasPriceSource for ScriptedGasSource {
	fn source_id(&self) -> &str {
		"scripted"
	}

	async fn fetch_gas_price_gwei(&self, chain: ChainId) -> PriceResult<Decimal> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.failing.load(Ordering::SeqCst) {
			return Err(PriceError::Http("connection refused".to_string()));
		}
		if chain != ChainId::Ethereum {
			return Err(PriceError::UnsupportedChain { chain });
		}
		Ok(self.gwei)
	}
}
