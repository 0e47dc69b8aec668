//! Cached USD prices with graceful degradation
//!
//! Resolution order: a cache entry younger than the TTL, then the upstream
//! feed, then the expired cache entry, then the configured default. Upstream
//! failures are logged and never returned to callers.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};
use trinity_config::Settings;
use trinity_types::{ChainId, PriceError, PriceOrigin, PriceResult, PriceSource, ResolvedPrice};

use crate::clock::Clock;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
	/// USD price of the chain's native token; never fails
	async fn resolve(&self, chain: ChainId) -> ResolvedPrice;

	/// Fetch from upstream and overwrite the cache entry
	async fn refresh(&self, chain: ChainId) -> PriceResult<Decimal>;

	/// Configured conservative price for the chain's native token
	fn default_price(&self, chain: ChainId) -> Decimal;
}

#[derive(Debug, Clone, Copy)]
struct CachedPrice {
	usd: Decimal,
	fetched_at: Instant,
}

pub struct PriceService {
	source: Arc<dyn PriceSource>,
	clock: Arc<dyn Clock>,
	cache: DashMap<String, CachedPrice>,
	ttl: Duration,
	fetch_timeout: Duration,
	defaults: BTreeMap<ChainId, Decimal>,
}

impl PriceService {
	pub fn new(source: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, settings: &Settings) -> Self {
		let defaults = ChainId::ALL
			.into_iter()
			.map(|chain| (chain, settings.default_price(chain)))
			.collect();
		Self::with_config(
			source,
			clock,
			Duration::from_secs(settings.pricing.cache_ttl_secs),
			Duration::from_millis(settings.timeouts.price_fetch_ms),
			defaults,
		)
	}

	pub fn with_config(
		source: Arc<dyn PriceSource>,
		clock: Arc<dyn Clock>,
		ttl: Duration,
		fetch_timeout: Duration,
		defaults: BTreeMap<ChainId, Decimal>,
	) -> Self {
		Self {
			source,
			clock,
			cache: DashMap::new(),
			ttl,
			fetch_timeout,
			defaults,
		}
	}

	/// Number of cached tokens, fresh or stale
	pub fn cached_tokens(&self) -> usize {
		self.cache.len()
	}

	fn is_fresh(&self, entry: &CachedPrice) -> bool {
		self.clock.now().saturating_duration_since(entry.fetched_at) < self.ttl
	}

	async fn fetch_and_store(&self, token: &str) -> PriceResult<Decimal> {
		let timeout_ms = u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX);
		let usd = timeout(self.fetch_timeout, self.source.fetch_usd_price(token))
			.await
			.map_err(|_| PriceError::Timeout { timeout_ms })??;

		self.cache.insert(
			token.to_string(),
			CachedPrice {
				usd,
				fetched_at: self.clock.now(),
			},
		);
		Ok(usd)
	}
}

#[async_trait]
impl PriceServiceTrait for PriceService {
	async fn resolve(&self, chain: ChainId) -> ResolvedPrice {
		let token = chain.price_token_id();
		let cached = self.cache.get(token).map(|entry| *entry.value());

		if let Some(entry) = cached.filter(|entry| self.is_fresh(entry)) {
			debug!("Price cache hit for {}: ${}", token, entry.usd);
			return ResolvedPrice {
				token: token.to_string(),
				usd: entry.usd,
				origin: PriceOrigin::Cached,
			};
		}

		match self.fetch_and_store(token).await {
			Ok(usd) => ResolvedPrice {
				token: token.to_string(),
				usd,
				origin: PriceOrigin::Live,
			},
			Err(e) => match cached {
				Some(entry) => {
					warn!(
						"Price feed {} failed for {}: {}; serving stale ${}",
						self.source.source_id(),
						token,
						e,
						entry.usd
					);
					ResolvedPrice {
						token: token.to_string(),
						usd: entry.usd,
						origin: PriceOrigin::Stale,
					}
				},
				None => {
					let usd = self.default_price(chain);
					warn!(
						"Price feed {} failed for {}: {}; serving default ${}",
						self.source.source_id(),
						token,
						e,
						usd
					);
					ResolvedPrice {
						token: token.to_string(),
						usd,
						origin: PriceOrigin::Default,
					}
				},
			},
		}
	}

	async fn refresh(&self, chain: ChainId) -> PriceResult<Decimal> {
		self.fetch_and_store(chain.price_token_id()).await
	}

	fn default_price(&self, chain: ChainId) -> Decimal {
		self.defaults
			.get(&chain)
			.copied()
			.unwrap_or(Decimal::ONE)
	}
}
