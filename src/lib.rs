//! Trinity Planner Library
//!
//! Plans vault deployments across Ethereum, Solana and TON: live fee
//! comparison, trinity role assignment and verification policy, served over
//! an axum API.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{info, warn};

// Core domain types
pub use trinity_types::{
	chrono,
	serde_json,
	ChainComparison,
	ChainError,
	ChainId,
	ChainInfo,
	ChainRecommendation,
	CongestionLevel,
	EstimateOutcome,
	FeeEstimate,
	FeeSavings,
	// Pricing seams
	GasPriceSource,
	OperationKind,
	OperationRecommendation,
	PlanRequest,
	PlanValidationError,
	PreferenceQuery,
	PriceError,
	PriceSource,
	RoleAssignment,
	SecurityLevel,
	SelectionRequest,
	SelectionValidation,
	TrinityRole,
	TrinityRoles,
	VaultCreationPlan,
};

// Service layer
pub use trinity_service::{
	ChainComparator, ComparisonReport, FeeEstimator, FeeEstimatorTrait, PlanReport, PlannerError,
	PriceService, PriceServiceTrait, RecordService, SystemClock, TrinityRoleAssigner,
	VaultDeploymentPlanner,
};

// Storage layer
pub use trinity_storage::{MemoryStore, Storage, StorageError, StorageResult};

// API layer
pub use trinity_api::{create_router, AppState};

// Adapters
pub use trinity_adapters::{
	CoinGeckoPriceSource, JsonRpcGasPriceSource, StaticGasPriceSource, StaticPriceSource,
};

// Config
pub use trinity_config::{
	load_config, log_service_info, log_service_shutdown, log_startup_complete, Settings,
};

pub mod config {
	pub use trinity_config::*;
}

pub mod service {
	pub use trinity_service::*;
}

pub mod storage {
	pub use trinity_storage::*;
}

pub mod adapters {
	pub use trinity_adapters::*;
}

pub mod api {
	pub use trinity_api::*;
}

pub mod mocks;

pub use async_trait;
pub use reqwest;

/// Builder pattern for configuring the planner
pub struct PlannerBuilder<S = MemoryStore>
where
	S: Storage + Clone + 'static,
{
	settings: Option<Settings>,
	storage: S,
	price_source: Option<Arc<dyn PriceSource>>,
	gas_source: Option<Arc<dyn GasPriceSource>>,
}

impl<S> PlannerBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a new planner builder with the provided storage
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			price_source: None,
			gas_source: None,
		}
	}
}

impl Default for PlannerBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl PlannerBuilder<MemoryStore> {
	/// Create a new planner builder with default memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}

	pub fn from_config(settings: Settings) -> Self {
		Self::new().with_settings(settings)
	}
}

impl<S> PlannerBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Use this price feed instead of the configured one
	pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
		self.price_source = Some(source);
		self
	}

	/// Use this gas price feed instead of the configured one
	pub fn with_gas_source(mut self, source: Arc<dyn GasPriceSource>) -> Self {
		self.gas_source = Some(source);
		self
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use trinity_config::LogFormat;

		// RUST_LOG wins over the configured level
		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber
						.with_target(true)
						.with_thread_ids(true)
						.try_init()
						.map_err(|e| e.to_string())?;
				} else {
					subscriber.try_init().map_err(|e| e.to_string())?;
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber
						.with_target(true)
						.with_thread_ids(true)
						.try_init()
						.map_err(|e| e.to_string())?;
				} else {
					subscriber.try_init().map_err(|e| e.to_string())?;
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber
						.with_target(true)
						.with_thread_ids(true)
						.try_init()
						.map_err(|e| e.to_string())?;
				} else {
					subscriber.try_init().map_err(|e| e.to_string())?;
				}
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Start the planner and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings
			.validate()
			.map_err(|e| format!("Invalid configuration: {}", e))?;

		let price_source = match self.price_source {
			Some(source) => source,
			None => price_source_from_settings(&settings)?,
		};
		let gas_source = match self.gas_source {
			Some(source) => source,
			None => gas_source_from_settings(&settings)?,
		};
		info!(
			"Market data: prices from '{}', gas from '{}'",
			price_source.source_id(),
			gas_source.source_id()
		);

		let prices: Arc<dyn PriceServiceTrait> = Arc::new(PriceService::new(
			price_source,
			Arc::new(SystemClock),
			&settings,
		));
		if settings.pricing.refresh_interval_secs > 0 {
			trinity_service::spawn_price_refresh(
				Arc::clone(&prices),
				Duration::from_secs(settings.pricing.refresh_interval_secs),
			);
		}

		let estimator: Arc<dyn FeeEstimatorTrait> =
			Arc::new(FeeEstimator::new(prices, gas_source, &settings));
		let comparator = ChainComparator::new(Arc::clone(&estimator), &settings);
		let planner = VaultDeploymentPlanner::new(
			comparator,
			TrinityRoleAssigner::from_settings(&settings),
			&settings,
		);

		let storage: Arc<dyn Storage> = Arc::new(self.storage.clone());
		let app_state = AppState {
			planner: Arc::new(planner),
			estimator,
			records: Arc::new(RecordService::new(storage)),
		};

		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	///
	/// Loads `.env`, reads configuration unless settings were provided,
	/// initializes tracing, then serves until ctrl-c.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_else(|e| {
				eprintln!("Failed to load configuration, using defaults: {}", e);
				Settings::default()
			}),
		};

		self.init_tracing_from_settings(&settings)?;

		log_service_info(&settings);
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		let rate_cfg = settings.environment.rate_limiting.clone();
		self.settings = Some(settings);
		let (app, state) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /ready");
		info!("  GET  /api/chain/fees/compare");
		info!("  GET  /api/chain/fees/recommendation/{{operation_type}}");
		info!("  GET  /api/chain/fees/history/{{chain}}");
		info!("  GET  /api/chain/fees/{{chain}}");
		info!("  POST /api/chain/plan");
		info!("  POST /api/chain/validate");
		info!("  GET  /api/chain/recommend");
		info!("  GET  /api/chain/info/{{chain}}");
		if cfg!(feature = "openapi") {
			info!("  GET  /swagger-ui");
			info!("  GET  /api-docs/openapi.json");
		}

		// Global rate limiting applies at the make_service level
		if rate_cfg.enabled {
			use tower::limit::RateLimitLayer;
			use tower::ServiceBuilder;
			let make_svc = ServiceBuilder::new()
				.layer(RateLimitLayer::new(
					rate_cfg.requests_per_minute as u64,
					Duration::from_secs(60),
				))
				.service(app.into_make_service());
			axum::serve(listener, make_svc)
				.with_graceful_shutdown(shutdown_signal())
				.await?;
		} else {
			axum::serve(listener, app)
				.with_graceful_shutdown(shutdown_signal())
				.await?;
		}

		state.records.close().await;
		log_service_shutdown();
		Ok(())
	}
}

/// Price feed selected by `pricing.source`
pub fn price_source_from_settings(
	settings: &Settings,
) -> Result<Arc<dyn PriceSource>, Box<dyn std::error::Error>> {
	use trinity_config::PriceSourceKind;

	match settings.pricing.source {
		PriceSourceKind::Static => Ok(Arc::new(StaticPriceSource::from_chain_prices(
			&settings.pricing.default_prices,
		))),
		PriceSourceKind::Coingecko => {
			let api_key = match &settings.pricing.coingecko.api_key {
				Some(value) => match value.resolve() {
					Ok(secret) => Some(secret),
					Err(e) => {
						warn!("Price feed key unavailable, continuing without it: {}", e);
						None
					},
				},
				None => None,
			};
			let source = CoinGeckoPriceSource::new(
				&settings.pricing.coingecko.endpoint,
				api_key,
				settings.timeouts.price_fetch_ms,
			)
			.map_err(|e| format!("Failed to create price source: {}", e))?;
			Ok(Arc::new(source))
		},
	}
}

/// Gas price feed selected by `gas.source`
pub fn gas_source_from_settings(
	settings: &Settings,
) -> Result<Arc<dyn GasPriceSource>, Box<dyn std::error::Error>> {
	use trinity_config::{CostModelSettings, GasSourceKind};

	match settings.gas.source {
		GasSourceKind::Static => {
			let gas_prices: BTreeMap<ChainId, Decimal> = ChainId::ALL
				.into_iter()
				.filter_map(|chain| match settings.fee_settings(chain).cost_model {
					CostModelSettings::FeeMarket(market) => {
						Some((chain, market.default_gas_price_gwei))
					},
					CostModelSettings::Flat(_) => None,
				})
				.collect();
			Ok(Arc::new(StaticGasPriceSource::new(gas_prices)))
		},
		GasSourceKind::JsonRpc => {
			let source =
				JsonRpcGasPriceSource::new(&settings.gas.rpc_url, settings.timeouts.gas_fetch_ms)
					.map_err(|e| format!("Failed to create gas price source: {}", e))?;
			Ok(Arc::new(source))
		},
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	info!("Shutdown signal received");
}
