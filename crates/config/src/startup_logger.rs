//! Startup and shutdown logging

use crate::Settings;
use std::env;
use tracing::info;

/// Logs service and effective configuration details at startup
pub fn log_service_info(settings: &Settings) {
	info!("=== Trinity Planner Starting ===");
	info!("Service: trinity-planner v{}", env!("CARGO_PKG_VERSION"));
	info!("Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("Log filter: {}", rust_log);
	}

	info!("Environment: {:?}", settings.environment.profile);
	info!(
		"Price source: {:?} (cache ttl {}s, refresh every {}s)",
		settings.pricing.source, settings.pricing.cache_ttl_secs, settings.pricing.refresh_interval_secs
	);
	if let Some(key) = &settings.pricing.coingecko.api_key {
		info!("Price feed key: {}", key.description());
	}
	info!("Gas source: {:?}", settings.gas.source);
	info!(
		"Planning timeout: {}ms, baseline chain: {}",
		settings.timeouts.planning_ms, settings.chains.baseline
	);
}

pub fn log_service_shutdown() {
	info!(
		"Trinity Planner shutting down at {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

pub fn log_startup_complete(bind_address: &str) {
	info!("Trinity Planner listening on {}", bind_address);
}
