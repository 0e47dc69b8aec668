//! Persistence of fee history and generated plans
//!
//! Writes are best effort: failures are logged and never fail the request
//! that produced the data.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use trinity_storage::Storage;
use trinity_types::{ChainId, FeeHistoryRecord, PlanRecord, VaultCreationPlan};
use uuid::Uuid;

use crate::comparator::ComparisonReport;
use crate::errors::PlannerError;

/// Upper bound on history entries returned per request
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Clone)]
pub struct RecordService {
	storage: Arc<dyn Storage>,
}

impl RecordService {
	pub fn new(storage: Arc<dyn Storage>) -> Self {
		Self { storage }
	}

	/// Store every estimate of a comparison; returns how many were stored
	pub async fn record_comparison(&self, report: &ComparisonReport) -> usize {
		let mut stored = 0;
		for (chain, estimate) in &report.comparison.estimates {
			let record = FeeHistoryRecord {
				id: Uuid::new_v4().to_string(),
				estimate: estimate.clone(),
				fallback: report.is_fallback(*chain),
				recorded_at: Utc::now(),
			};
			match self.storage.record_fee(record).await {
				Ok(()) => stored += 1,
				Err(e) => warn!("Failed to record {} fee estimate: {}", chain, e),
			}
		}
		debug!("Recorded {} fee estimates", stored);
		stored
	}

	/// Store a plan; returns its record id when the write succeeded
	pub async fn record_plan(&self, plan: &VaultCreationPlan) -> Option<String> {
		let record = PlanRecord {
			id: Uuid::new_v4().to_string(),
			plan: plan.clone(),
			created_at: Utc::now(),
		};
		let id = record.id.clone();
		match self.storage.add_plan(record).await {
			Ok(()) => Some(id),
			Err(e) => {
				warn!("Failed to record plan for {}: {}", plan.primary_chain, e);
				None
			},
		}
	}

	/// Most recent stored estimates for a chain, newest first
	pub async fn fee_history(&self, chain: ChainId, limit: usize) -> Result<Vec<FeeHistoryRecord>, PlannerError> {
		let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
		Ok(self.storage.recent_fees(chain, limit).await?)
	}

	pub async fn is_healthy(&self) -> bool {
		match self.storage.health_check().await {
			Ok(healthy) => healthy,
			Err(e) => {
				warn!("Storage health check failed: {}", e);
				false
			},
		}
	}

	/// Release the backing store; returns whether it closed cleanly
	pub async fn close(&self) -> bool {
		match self.storage.close().await {
			Ok(()) => {
				debug!("Storage closed");
				true
			},
			Err(e) => {
				warn!("Failed to close storage: {}", e);
				false
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rust_decimal::Decimal;
	use std::collections::BTreeMap;
	use trinity_storage::{FeeHistoryStorage, MemoryStore, PlanStorage, StorageResult, StorageStats};
	use trinity_types::{
		ChainComparison, ChainOrder, CongestionLevel, EstimationFailure, FeeBreakdown, FeeEstimate,
		OperationKind, StorageError,
	};

	struct BrokenStore;

	fn broken() -> StorageError {
		StorageError::Connection {
			message: "store offline".to_string(),
		}
	}

	#[async_trait]
	impl FeeHistoryStorage for BrokenStore {
		async fn record_fee(&self, _record: FeeHistoryRecord) -> StorageResult<()> {
			Err(broken())
		}

		async fn recent_fees(&self, _chain: ChainId, _limit: usize) -> StorageResult<Vec<FeeHistoryRecord>> {
			Err(broken())
		}

		async fn fee_record_count(&self) -> StorageResult<usize> {
			Err(broken())
		}
	}

	#[async_trait]
	impl PlanStorage for BrokenStore {
		async fn add_plan(&self, _record: PlanRecord) -> StorageResult<()> {
			Err(broken())
		}

		async fn get_plan(&self, _plan_id: &str) -> StorageResult<Option<PlanRecord>> {
			Err(broken())
		}

		async fn plans_by_primary(&self, _chain: ChainId) -> StorageResult<Vec<PlanRecord>> {
			Err(broken())
		}

		async fn plan_count(&self) -> StorageResult<usize> {
			Err(broken())
		}
	}

	#[async_trait]
	impl Storage for BrokenStore {
		async fn health_check(&self) -> StorageResult<bool> {
			Err(broken())
		}

		async fn stats(&self) -> StorageResult<StorageStats> {
			Err(broken())
		}

		async fn close(&self) -> StorageResult<()> {
			Err(broken())
		}
	}

	fn report() -> ComparisonReport {
		let estimates = ChainId::ALL.into_iter().map(|chain| FeeEstimate {
			chain,
			operation_type: OperationKind::vault_creation(),
			estimated_fee: Decimal::ONE,
			estimated_fee_usd: Decimal::ONE,
			native_price_usd: Decimal::ONE,
			network_congestion: CongestionLevel::Low,
			estimated_time: 1,
			breakdown: FeeBreakdown::Flat {
				base_fee: Decimal::ONE,
				multiplier: Decimal::ONE,
			},
		});
		ComparisonReport {
			comparison: ChainComparison::from_estimates(
				OperationKind::vault_creation(),
				estimates,
				&ChainOrder::low_fee_first(),
			)
			.unwrap(),
			fallbacks: BTreeMap::from([(
				ChainId::Ton,
				EstimationFailure::PriceUnavailable {
					token: "the-open-network".to_string(),
				},
			)]),
		}
	}

	#[tokio::test]
	async fn test_records_comparison_with_fallback_flags() {
		let store = Arc::new(MemoryStore::new());
		let records = RecordService::new(store.clone());

		assert_eq!(records.record_comparison(&report()).await, 3);

		let ton = records.fee_history(ChainId::Ton, 10).await.unwrap();
		assert_eq!(ton.len(), 1);
		assert!(ton[0].fallback);
		let solana = records.fee_history(ChainId::Solana, 0).await.unwrap();
		assert_eq!(solana.len(), 1);
		assert!(!solana[0].fallback);
		assert!(records.is_healthy().await);
		assert!(records.close().await);
	}

	#[tokio::test]
	async fn test_storage_failures_are_swallowed() {
		let records = RecordService::new(Arc::new(BrokenStore));

		assert_eq!(records.record_comparison(&report()).await, 0);
		assert!(!records.is_healthy().await);
		assert!(matches!(
			records.fee_history(ChainId::Ethereum, 5).await,
			Err(PlannerError::Storage(StorageError::Connection { .. }))
		));
		assert!(!records.close().await);
	}
}
