//! Chain identifiers and the fixed three-chain universe

pub mod errors;
pub mod info;

pub use errors::ChainError;
pub use info::{ChainInfo, CostModelKind};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Number of chains participating in a trinity deployment
pub const TRINITY_SIZE: usize = 3;

/// Supported chain identifier
///
/// The universe is closed: every vault is spread across exactly these three
/// chains, one acting as primary and the other two as verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
	/// Account-based smart-contract chain with a gas fee market
	Ethereum,
	/// High-throughput chain with flat signature fees
	Solana,
	/// Low-fee mobile-oriented chain
	Ton,
}

impl ChainId {
	/// All supported chains in canonical order
	pub const ALL: [ChainId; TRINITY_SIZE] = [ChainId::Ethereum, ChainId::Solana, ChainId::Ton];

	/// Wire identifier used in URLs, payloads and config keys
	pub fn as_str(&self) -> &'static str {
		match self {
			ChainId::Ethereum => "ethereum",
			ChainId::Solana => "solana",
			ChainId::Ton => "ton",
		}
	}

	/// Ticker of the chain's native token
	pub fn native_symbol(&self) -> &'static str {
		match self {
			ChainId::Ethereum => "ETH",
			ChainId::Solana => "SOL",
			ChainId::Ton => "TON",
		}
	}

	/// Token identifier understood by price feeds (CoinGecko ids)
	pub fn price_token_id(&self) -> &'static str {
		match self {
			ChainId::Ethereum => "ethereum",
			ChainId::Solana => "solana",
			ChainId::Ton => "the-open-network",
		}
	}

	/// Human-readable chain name
	pub fn display_name(&self) -> &'static str {
		match self {
			ChainId::Ethereum => "Ethereum",
			ChainId::Solana => "Solana",
			ChainId::Ton => "TON",
		}
	}

	/// Comma separated list of valid identifiers, used in error messages
	pub fn valid_ids() -> String {
		Self::ALL
			.iter()
			.map(|c| c.as_str())
			.collect::<Vec<_>>()
			.join(", ")
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ChainId {
	type Err = ChainError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"ethereum" => Ok(ChainId::Ethereum),
			"solana" => Ok(ChainId::Solana),
			"ton" => Ok(ChainId::Ton),
			_ => Err(ChainError::InvalidChain {
				chain: s.to_string(),
				valid: Self::valid_ids(),
			}),
		}
	}
}

/// An ordering of the three supported chains
///
/// Used both as the canonical order (which decides verifier slots) and as the
/// tie-break priority of the fee comparison. Construction guarantees the
/// order is a permutation of [`ChainId::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChainId>", into = "Vec<ChainId>")]
pub struct ChainOrder {
	chains: [ChainId; TRINITY_SIZE],
}

impl ChainOrder {
	/// Build an order, rejecting duplicates and missing chains
	pub fn new(chains: [ChainId; TRINITY_SIZE]) -> Result<Self, ChainError> {
		for chain in ChainId::ALL {
			if !chains.contains(&chain) {
				return Err(ChainError::InvalidOrder {
					reason: format!("missing chain '{}'", chain),
				});
			}
		}
		Ok(Self { chains })
	}

	/// Canonical order: ethereum, solana, ton
	pub fn canonical() -> Self {
		Self {
			chains: ChainId::ALL,
		}
	}

	/// Cheapest-first tie-break priority: low-fee, high-throughput, fee-market
	pub fn low_fee_first() -> Self {
		Self {
			chains: [ChainId::Ton, ChainId::Solana, ChainId::Ethereum],
		}
	}

	pub fn chains(&self) -> [ChainId; TRINITY_SIZE] {
		self.chains
	}

	/// Position of a chain in this order
	pub fn rank(&self, chain: ChainId) -> usize {
		self.chains
			.iter()
			.position(|c| *c == chain)
			.unwrap_or(TRINITY_SIZE)
	}

	/// The two chains other than `chain`, in this order's relative order
	pub fn without(&self, chain: ChainId) -> [ChainId; 2] {
		let mut rest = [chain; 2];
		let mut slot = 0;
		for candidate in self.chains {
			if candidate != chain && slot < rest.len() {
				rest[slot] = candidate;
				slot += 1;
			}
		}
		rest
	}
}

impl Default for ChainOrder {
	fn default() -> Self {
		Self::canonical()
	}
}

impl TryFrom<Vec<ChainId>> for ChainOrder {
	type Error = ChainError;

	fn try_from(chains: Vec<ChainId>) -> Result<Self, Self::Error> {
		let chains: [ChainId; TRINITY_SIZE] =
			chains.try_into().map_err(|v: Vec<ChainId>| ChainError::InvalidOrder {
				reason: format!("expected {} chains, got {}", TRINITY_SIZE, v.len()),
			})?;
		Self::new(chains)
	}
}

impl From<ChainOrder> for Vec<ChainId> {
	fn from(order: ChainOrder) -> Self {
		order.chains.to_vec()
	}
}
