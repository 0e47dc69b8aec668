//! Storage traits for pluggable storage implementations

use async_trait::async_trait;

use super::{FeeHistoryRecord, PlanRecord, StorageResult};
use crate::chains::ChainId;

/// Statistics about storage usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
	pub total_fee_records: usize,
	pub total_plans: usize,
}

/// Trait for fee history storage operations
#[async_trait]
pub trait FeeHistoryStorageTrait: Send + Sync {
	/// Append a fee estimate to the history of its chain
	async fn record_fee(&self, record: FeeHistoryRecord) -> StorageResult<()>;

	/// Most recent records for a chain, newest first
	async fn recent_fees(&self, chain: ChainId, limit: usize)
		-> StorageResult<Vec<FeeHistoryRecord>>;

	/// Number of stored fee records across all chains
	async fn fee_record_count(&self) -> StorageResult<usize>;
}

/// Trait for plan storage operations
#[async_trait]
pub trait PlanStorageTrait: Send + Sync {
	/// Store a new plan; ids must be unique
	async fn add_plan(&self, record: PlanRecord) -> StorageResult<()>;

	/// Get a plan by ID
	async fn get_plan(&self, plan_id: &str) -> StorageResult<Option<PlanRecord>>;

	/// Plans whose primary chain is `chain`
	async fn plans_by_primary(&self, chain: ChainId) -> StorageResult<Vec<PlanRecord>>;

	/// Number of stored plans
	async fn plan_count(&self) -> StorageResult<usize>;
}

/// Main storage trait that combines all storage operations
#[async_trait]
pub trait StorageTrait: FeeHistoryStorageTrait + PlanStorageTrait {
	/// Health check for the storage system
	async fn health_check(&self) -> StorageResult<bool>;

	/// Get overall storage statistics
	async fn stats(&self) -> StorageResult<StorageStats>;

	/// Close the storage connection
	async fn close(&self) -> StorageResult<()>;
}
