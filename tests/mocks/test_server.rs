//! Test server for integration tests

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;
use trinity_planner::mocks::{mock_settings, MockGasSource, MockPriceSource};
use trinity_planner::{AppState, MemoryStore, PlannerBuilder};

/// Planner served on an ephemeral local port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
	#[allow(dead_code)]
	pub state: AppState,
	/// Shares its maps with the served planner
	#[allow(dead_code)]
	pub store: MemoryStore,
}

#[allow(dead_code)]
impl TestServer {
	/// Serve reference prices and a 20 gwei gas price
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with_sources(MockPriceSource::new(), MockGasSource::default()).await
	}

	/// Serve with a price feed that always fails
	pub async fn spawn_with_dead_price_feed() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with_sources(MockPriceSource::failing(), MockGasSource::default()).await
	}

	pub async fn spawn_with_sources(
		prices: MockPriceSource,
		gas: MockGasSource,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let store = MemoryStore::new();
		let (app, state) = PlannerBuilder::with_storage(store.clone())
			.with_settings(mock_settings())
			.with_price_source(Arc::new(prices))
			.with_gas_source(Arc::new(gas))
			.start()
			.await?;

		Self::spawn_server_with_app(app, state, store).await
	}

	async fn spawn_server_with_app(
		app: Router,
		state: AppState,
		store: MemoryStore,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Ok(Self {
			base_url,
			handle,
			state,
			store,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn abort(&self) {
		self.handle.abort();
	}
}
