//! Configuration settings structures

use crate::configurable_value::ConfigurableValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use trinity_types::{ChainId, ChainOrder, CongestionLevel, OperationKind};

/// Main application settings
///
/// Every section has defaults, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub timeouts: TimeoutSettings,
	pub pricing: PricingSettings,
	pub gas: GasSettings,
	pub chains: ChainSettings,
	/// Per-chain cost models; chains without an entry use the reference table
	pub fees: BTreeMap<ChainId, ChainFeeSettings>,
	pub validation: ValidationSettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutSettings {
	/// Budget for one planning request; chains still estimating fall back to defaults
	pub planning_ms: u64,
	/// Upper bound on a single price feed call
	pub price_fetch_ms: u64,
	/// Upper bound on a single gas price call
	pub gas_fetch_ms: u64,
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			planning_ms: 3000,
			price_fetch_ms: 1500,
			gas_fetch_ms: 1500,
		}
	}
}

/// Which price feed implementation to use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSourceKind {
	Coingecko,
	/// Serve `default_prices` without network access
	Static,
}

/// CoinGecko feed configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CoinGeckoSettings {
	pub endpoint: String,
	/// Optional demo/pro API key, e.g. `{"type": "env", "value": "COINGECKO_API_KEY"}`
	pub api_key: Option<ConfigurableValue>,
}

impl Default for CoinGeckoSettings {
	fn default() -> Self {
		Self {
			endpoint: "https://api.coingecko.com/api/v3".to_string(),
			api_key: None,
		}
	}
}

/// Price cache and feed configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PricingSettings {
	pub source: PriceSourceKind,
	pub cache_ttl_secs: u64,
	/// Interval of the background cache warmer; 0 disables it
	pub refresh_interval_secs: u64,
	pub coingecko: CoinGeckoSettings,
	/// Conservative prices used when the feed fails and nothing is cached
	pub default_prices: BTreeMap<ChainId, Decimal>,
}

impl Default for PricingSettings {
	fn default() -> Self {
		Self {
			source: PriceSourceKind::Coingecko,
			cache_ttl_secs: 60,
			refresh_interval_secs: 0,
			coingecko: CoinGeckoSettings::default(),
			default_prices: reference_prices(),
		}
	}
}

/// Reference USD prices of each native token
pub fn reference_prices() -> BTreeMap<ChainId, Decimal> {
	BTreeMap::from([
		(ChainId::Ethereum, Decimal::from(3610)),
		(ChainId::Solana, Decimal::from(150)),
		(ChainId::Ton, Decimal::new(55, 1)),
	])
}

/// Which gas price feed implementation to use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GasSourceKind {
	/// `eth_gasPrice` over JSON-RPC
	JsonRpc,
	/// Serve each fee-market chain's `default_gas_price_gwei`
	Static,
}

/// Gas price feed configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GasSettings {
	pub source: GasSourceKind,
	pub rpc_url: String,
}

impl Default for GasSettings {
	fn default() -> Self {
		Self {
			source: GasSourceKind::JsonRpc,
			rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
		}
	}
}

/// Orderings over the chain universe
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ChainSettings {
	/// Decides verifier slots: verifiers keep this order with the primary removed
	pub canonical_order: ChainOrder,
	/// Priority among chains with equal USD fees
	pub tie_break_order: ChainOrder,
	/// Chain the primary's fee is compared against in plans
	pub baseline: ChainId,
}

impl Default for ChainSettings {
	fn default() -> Self {
		Self {
			canonical_order: ChainOrder::canonical(),
			tie_break_order: ChainOrder::low_fee_first(),
			baseline: ChainId::Ethereum,
		}
	}
}

/// Gas price bands for congestion classification, in gwei
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CongestionThresholds {
	/// Prices at or above this are `medium`
	pub medium_gwei: Decimal,
	/// Prices at or above this are `high`
	pub high_gwei: Decimal,
}

impl CongestionThresholds {
	pub fn classify(&self, gas_price_gwei: Decimal) -> CongestionLevel {
		if gas_price_gwei >= self.high_gwei {
			CongestionLevel::High
		} else if gas_price_gwei >= self.medium_gwei {
			CongestionLevel::Medium
		} else {
			CongestionLevel::Low
		}
	}
}

/// Gas price times gas limit
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeMarketSettings {
	/// Gas price assumed when the gas feed is unavailable
	pub default_gas_price_gwei: Decimal,
	pub gas_limits: BTreeMap<String, u64>,
	pub default_gas_limit: u64,
	pub congestion: CongestionThresholds,
}

impl FeeMarketSettings {
	pub fn gas_limit(&self, operation: &OperationKind) -> u64 {
		self.gas_limits
			.get(operation.as_str())
			.copied()
			.unwrap_or(self.default_gas_limit)
	}
}

/// Base fee times an operation multiplier
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlatFeeSettings {
	/// Base fee in native units
	pub base_fee: Decimal,
	pub multipliers: BTreeMap<String, Decimal>,
	pub default_multiplier: Decimal,
}

impl FlatFeeSettings {
	pub fn multiplier(&self, operation: &OperationKind) -> Decimal {
		self.multipliers
			.get(operation.as_str())
			.copied()
			.unwrap_or(self.default_multiplier)
	}
}

/// Cost model of a chain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CostModelSettings {
	FeeMarket(FeeMarketSettings),
	Flat(FlatFeeSettings),
}

/// Expected confirmation seconds per congestion level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfirmationTimes {
	pub low: u64,
	pub medium: u64,
	pub high: u64,
}

impl ConfirmationTimes {
	pub fn seconds(&self, congestion: CongestionLevel) -> u64 {
		match congestion {
			CongestionLevel::Low => self.low,
			CongestionLevel::Medium => self.medium,
			CongestionLevel::High => self.high,
		}
	}
}

/// Fee configuration of one chain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChainFeeSettings {
	pub cost_model: CostModelSettings,
	pub confirmation_seconds: ConfirmationTimes,
}

impl ChainFeeSettings {
	/// Reference cost tables; also the source of static fallback estimates
	pub fn reference(chain: ChainId) -> Self {
		match chain {
			ChainId::Ethereum => Self {
				cost_model: CostModelSettings::FeeMarket(FeeMarketSettings {
					default_gas_price_gwei: Decimal::from(20),
					gas_limits: BTreeMap::from([
						(OperationKind::VAULT_CREATION.to_string(), 500_000),
						(OperationKind::WITHDRAWAL.to_string(), 150_000),
						(OperationKind::SWAP.to_string(), 200_000),
						(OperationKind::TRANSFER.to_string(), 21_000),
					]),
					default_gas_limit: 100_000,
					congestion: CongestionThresholds {
						medium_gwei: Decimal::from(30),
						high_gwei: Decimal::from(80),
					},
				}),
				confirmation_seconds: ConfirmationTimes {
					low: 15,
					medium: 30,
					high: 60,
				},
			},
			ChainId::Solana => Self {
				cost_model: CostModelSettings::Flat(FlatFeeSettings {
					base_fee: Decimal::new(25, 5),
					multipliers: BTreeMap::from([
						(OperationKind::VAULT_CREATION.to_string(), Decimal::new(12, 1)),
						(OperationKind::WITHDRAWAL.to_string(), Decimal::new(8, 1)),
						(OperationKind::SWAP.to_string(), Decimal::ONE),
						(OperationKind::TRANSFER.to_string(), Decimal::new(4, 1)),
					]),
					default_multiplier: Decimal::ONE,
				}),
				confirmation_seconds: ConfirmationTimes {
					low: 1,
					medium: 2,
					high: 5,
				},
			},
			ChainId::Ton => Self {
				cost_model: CostModelSettings::Flat(FlatFeeSettings {
					base_fee: Decimal::new(1, 2),
					multipliers: BTreeMap::from([
						(OperationKind::VAULT_CREATION.to_string(), Decimal::from(3)),
						(OperationKind::WITHDRAWAL.to_string(), Decimal::from(2)),
						(OperationKind::SWAP.to_string(), Decimal::new(25, 1)),
						(OperationKind::TRANSFER.to_string(), Decimal::ONE),
					]),
					default_multiplier: Decimal::new(15, 1),
				}),
				confirmation_seconds: ConfirmationTimes {
					low: 5,
					medium: 8,
					high: 15,
				},
			},
		}
	}
}

/// Thresholds for advisory selection warnings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ValidationSettings {
	/// Fees above this USD amount produce a warning
	pub max_fee_usd: Decimal,
	/// Balances below this multiple of the fee produce a warning
	pub balance_multiple: Decimal,
}

impl Default for ValidationSettings {
	fn default() -> Self {
		Self {
			max_fee_usd: Decimal::from(10),
			balance_multiple: Decimal::from(2),
		}
	}
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub rate_limiting: RateLimitSettings,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	#[default]
	Development,
	Staging,
	Production,
}

/// Rate limiting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitSettings {
	pub enabled: bool,
	pub requests_per_minute: u32,
}

impl Default for RateLimitSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			requests_per_minute: 120,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
	#[error("{field} must be greater than zero")]
	NotPositive { field: String },

	#[error("Invalid congestion thresholds for {chain}: medium {medium} must be below high {high}")]
	InvalidThresholds {
		chain: ChainId,
		medium: Decimal,
		high: Decimal,
	},

	#[error("Invalid URL for {field}: {reason}")]
	InvalidUrl { field: String, reason: String },

	#[error("Missing default price for {chain}")]
	MissingDefaultPrice { chain: ChainId },
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Fee configuration for a chain, falling back to the reference table
	pub fn fee_settings(&self, chain: ChainId) -> ChainFeeSettings {
		self.fees
			.get(&chain)
			.cloned()
			.unwrap_or_else(|| ChainFeeSettings::reference(chain))
	}

	/// Default USD price of a chain's native token
	pub fn default_price(&self, chain: ChainId) -> Decimal {
		self.pricing
			.default_prices
			.get(&chain)
			.copied()
			.or_else(|| reference_prices().get(&chain).copied())
			.unwrap_or(Decimal::ONE)
	}

	/// Check if running in production
	pub fn is_production(&self) -> bool {
		self.environment.profile == EnvironmentProfile::Production
	}

	/// Validate cross-field constraints that serde cannot express
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let positive = [
			("pricing.cache_ttl_secs", self.pricing.cache_ttl_secs),
			("timeouts.planning_ms", self.timeouts.planning_ms),
			("timeouts.price_fetch_ms", self.timeouts.price_fetch_ms),
			("timeouts.gas_fetch_ms", self.timeouts.gas_fetch_ms),
		];
		for (field, value) in positive {
			if value == 0 {
				return Err(ConfigValidationError::NotPositive {
					field: field.to_string(),
				});
			}
		}

		for chain in ChainId::ALL {
			if !self.pricing.default_prices.contains_key(&chain) {
				return Err(ConfigValidationError::MissingDefaultPrice { chain });
			}
			if let CostModelSettings::FeeMarket(model) = &self.fee_settings(chain).cost_model {
				let thresholds = &model.congestion;
				if thresholds.medium_gwei >= thresholds.high_gwei {
					return Err(ConfigValidationError::InvalidThresholds {
						chain,
						medium: thresholds.medium_gwei,
						high: thresholds.high_gwei,
					});
				}
			}
		}

		if self.pricing.source == PriceSourceKind::Coingecko {
			check_url("pricing.coingecko.endpoint", &self.pricing.coingecko.endpoint)?;
		}
		if self.gas.source == GasSourceKind::JsonRpc {
			check_url("gas.rpc_url", &self.gas.rpc_url)?;
		}

		Ok(())
	}
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigValidationError> {
	url::Url::parse(value)
		.map(|_| ())
		.map_err(|e| ConfigValidationError::InvalidUrl {
			field: field.to_string(),
			reason: e.to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
		assert_eq!(settings.pricing.cache_ttl_secs, 60);
	}

	#[test]
	fn test_reference_tables() {
		let settings = Settings::default();
		let CostModelSettings::FeeMarket(ethereum) = settings.fee_settings(ChainId::Ethereum).cost_model
		else {
			panic!("ethereum should use a fee market model");
		};
		assert_eq!(ethereum.gas_limit(&OperationKind::vault_creation()), 500_000);
		assert_eq!(ethereum.gas_limit(&OperationKind::transfer()), 21_000);
		assert_eq!(ethereum.gas_limit(&OperationKind::new("bridge")), 100_000);

		let CostModelSettings::Flat(ton) = settings.fee_settings(ChainId::Ton).cost_model else {
			panic!("ton should use a flat model");
		};
		assert_eq!(ton.multiplier(&OperationKind::vault_creation()), Decimal::from(3));
		assert_eq!(ton.multiplier(&OperationKind::new("bridge")), Decimal::new(15, 1));
	}

	#[test]
	fn test_congestion_bands() {
		let thresholds = CongestionThresholds {
			medium_gwei: Decimal::from(30),
			high_gwei: Decimal::from(80),
		};
		assert_eq!(thresholds.classify(Decimal::from(12)), CongestionLevel::Low);
		assert_eq!(thresholds.classify(Decimal::from(30)), CongestionLevel::Medium);
		assert_eq!(thresholds.classify(Decimal::from(79)), CongestionLevel::Medium);
		assert_eq!(thresholds.classify(Decimal::from(150)), CongestionLevel::High);
	}

	#[test]
	fn test_validation_rejects_inverted_thresholds() {
		let mut settings = Settings::default();
		let mut ethereum = ChainFeeSettings::reference(ChainId::Ethereum);
		if let CostModelSettings::FeeMarket(model) = &mut ethereum.cost_model {
			model.congestion.medium_gwei = Decimal::from(100);
		}
		settings.fees.insert(ChainId::Ethereum, ethereum);

		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidThresholds { .. })
		));
	}

	#[test]
	fn test_validation_rejects_zero_ttl_and_bad_url() {
		let mut settings = Settings::default();
		settings.pricing.cache_ttl_secs = 0;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::NotPositive { .. })
		));

		let mut settings = Settings::default();
		settings.gas.rpc_url = "not a url".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidUrl { .. })
		));
	}

	#[test]
	fn test_partial_json_uses_defaults() {
		let settings: Settings = serde_json::from_str(
			r#"{
				"server": {"port": 8080},
				"pricing": {"source": "static", "cache_ttl_secs": 30},
				"chains": {"tie_break_order": ["solana", "ton", "ethereum"]},
				"fees": {
					"ton": {
						"cost_model": {
							"type": "flat",
							"base_fee": "0.02",
							"multipliers": {},
							"default_multiplier": "1"
						},
						"confirmation_seconds": {"low": 4, "medium": 6, "high": 10}
					}
				}
			}"#,
		)
		.unwrap();

		assert_eq!(settings.server.port, 8080);
		assert_eq!(settings.server.host, "0.0.0.0");
		assert_eq!(settings.pricing.source, PriceSourceKind::Static);
		assert_eq!(settings.pricing.default_prices, reference_prices());
		assert_eq!(settings.chains.tie_break_order.rank(ChainId::Solana), 0);
		assert_eq!(settings.fee_settings(ChainId::Ton).confirmation_seconds.low, 4);
		assert_eq!(
			settings.fee_settings(ChainId::Solana),
			ChainFeeSettings::reference(ChainId::Solana)
		);
		assert!(settings.validate().is_ok());
	}
}
