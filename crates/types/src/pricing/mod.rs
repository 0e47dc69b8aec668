//! Price feed traits and models
//!
//! Upstream feeds are pluggable: the service crate consumes these traits and
//! the adapters crate provides HTTP-backed and static implementations.

pub mod errors;

pub use errors::PriceError;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::chains::ChainId;

pub type PriceResult<T> = Result<T, PriceError>;

/// Source of USD prices for native tokens
#[async_trait]
pub trait PriceSource: Send + Sync {
	/// Identifier used in logs
	fn source_id(&self) -> &str;

	/// Fetch the current USD price of `token` (a price-feed token id)
	async fn fetch_usd_price(&self, token: &str) -> PriceResult<Decimal>;
}

/// Source of current gas prices for fee-market chains
#[async_trait]
pub trait GasPriceSource: Send + Sync {
	/// Identifier used in logs
	fn source_id(&self) -> &str;

	/// Fetch the current gas price in gwei
	async fn fetch_gas_price_gwei(&self, chain: ChainId) -> PriceResult<Decimal>;
}

/// Where a resolved price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
	/// Fetched from the upstream feed for this request
	Live,
	/// Served from a cache entry younger than the TTL
	Cached,
	/// Upstream failed; an expired cache entry was served
	Stale,
	/// Upstream failed with nothing cached; the configured default was served
	Default,
}

impl fmt::Display for PriceOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			PriceOrigin::Live => "live",
			PriceOrigin::Cached => "cached",
			PriceOrigin::Stale => "stale",
			PriceOrigin::Default => "default",
		};
		f.write_str(label)
	}
}

/// A USD price together with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
	pub token: String,
	pub usd: Decimal,
	pub origin: PriceOrigin,
}

impl ResolvedPrice {
	/// True when the price reflects upstream data, fresh or stale
	pub fn is_market_data(&self) -> bool {
		!matches!(self.origin, PriceOrigin::Default)
	}
}
