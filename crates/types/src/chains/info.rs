//! Static descriptive metadata for each supported chain

use serde::Serialize;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::ChainId;

/// Which fee formula a chain is priced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CostModelKind {
	/// Gas price times gas limit
	FeeMarket,
	/// Base fee times an operation multiplier
	Flat,
}

/// Descriptive chain metadata served by the info endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
	pub id: ChainId,
	pub name: &'static str,
	pub symbol: &'static str,
	pub average_block_time_ms: u64,
	pub cost_model: CostModelKind,
	pub consensus: &'static str,
	pub ecosystem: &'static str,
	pub trinity_strengths: &'static str,
}

impl ChainInfo {
	/// Lookup table for the three supported chains
	pub fn for_chain(chain: ChainId) -> Self {
		match chain {
			ChainId::Ethereum => Self {
				id: chain,
				name: chain.display_name(),
				symbol: chain.native_symbol(),
				average_block_time_ms: 12_000,
				cost_model: CostModelKind::FeeMarket,
				consensus: "Proof of Stake (Gasper)",
				ecosystem: "Largest smart-contract ecosystem; EVM tooling, deep DeFi liquidity",
				trinity_strengths: "Most decentralized validator set; strongest settlement guarantees",
			},
			ChainId::Solana => Self {
				id: chain,
				name: chain.display_name(),
				symbol: chain.native_symbol(),
				average_block_time_ms: 400,
				cost_model: CostModelKind::Flat,
				consensus: "Proof of Stake with Proof of History",
				ecosystem: "High-throughput programs; low-latency trading and payments",
				trinity_strengths: "Sub-second confirmation for fast verification rounds",
			},
			ChainId::Ton => Self {
				id: chain,
				name: chain.display_name(),
				symbol: chain.native_symbol(),
				average_block_time_ms: 5_000,
				cost_model: CostModelKind::Flat,
				consensus: "Proof of Stake (Catchain BFT)",
				ecosystem: "Mobile-first wallets and messenger integration",
				trinity_strengths: "Very low fees for inexpensive backup verification",
			},
		}
	}

	/// Metadata for every supported chain in canonical order
	pub fn all() -> Vec<Self> {
		ChainId::ALL.iter().map(|c| Self::for_chain(*c)).collect()
	}
}
