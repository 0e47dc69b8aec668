//! Background price cache warming

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use trinity_types::ChainId;

use crate::price::PriceServiceTrait;

/// Refresh every chain's native token price on a fixed interval
///
/// The first refresh runs immediately. Failures leave the existing cache
/// entry in place.
pub fn spawn_price_refresh(prices: Arc<dyn PriceServiceTrait>, every: Duration) -> JoinHandle<()> {
	info!("Starting price refresh every {}s", every.as_secs());
	tokio::spawn(async move {
		let mut ticker = interval(every);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		loop {
			ticker.tick().await;
			refresh_all(prices.as_ref()).await;
		}
	})
}

/// Refresh all chains once; returns how many refreshes succeeded
pub async fn refresh_all(prices: &dyn PriceServiceTrait) -> usize {
	let results = futures::future::join_all(ChainId::ALL.into_iter().map(|chain| async move {
		match prices.refresh(chain).await {
			Ok(usd) => {
				debug!("Refreshed {} price: ${}", chain, usd);
				true
			},
			Err(e) => {
				warn!("Price refresh for {} failed: {}", chain, e);
				false
			},
		}
	}))
	.await;
	results.into_iter().filter(|ok| *ok).count()
}
