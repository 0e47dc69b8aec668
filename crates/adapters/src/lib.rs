//! Trinity Adapters
//!
//! Upstream market data feeds: USD prices of native tokens and gas prices of
//! fee-market chains.

pub mod client;
pub mod coingecko;
pub mod fixed;
pub mod json_rpc;

pub use client::{build_client, build_url};
pub use coingecko::CoinGeckoPriceSource;
pub use fixed::{StaticGasPriceSource, StaticPriceSource};
pub use json_rpc::JsonRpcGasPriceSource;
pub use trinity_types::{GasPriceSource, PriceError, PriceResult, PriceSource};
