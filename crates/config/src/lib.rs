//! Trinity Configuration
//!
//! Configuration management and startup utilities for the trinity vault planner.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	reference_prices, ChainFeeSettings, ChainSettings, CoinGeckoSettings, ConfigValidationError,
	ConfirmationTimes, CongestionThresholds, CostModelSettings, EnvironmentProfile,
	EnvironmentSettings, FeeMarketSettings, FlatFeeSettings, GasSettings, GasSourceKind,
	LogFormat, LoggingSettings, PriceSourceKind, PricingSettings, RateLimitSettings,
	ServerSettings, Settings, TimeoutSettings, ValidationSettings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
