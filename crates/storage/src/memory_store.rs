//! In-memory storage implementation using DashMap with bounded fee history

use crate::traits::{FeeHistoryStorage, PlanStorage, Storage, StorageResult, StorageStats};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;
use trinity_types::{ChainId, FeeHistoryRecord, PlanRecord, StorageError};

/// Fee records kept per chain before the oldest are evicted
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// Plans kept before the oldest are evicted
pub const DEFAULT_PLAN_CAPACITY: usize = 1_000;

/// In-memory storage for fee history and plans
#[derive(Clone)]
pub struct MemoryStore {
	/// Oldest record at the front
	pub fee_history: Arc<DashMap<ChainId, VecDeque<FeeHistoryRecord>>>,
	pub plans: Arc<DashMap<String, PlanRecord>>,
	pub history_capacity: usize,
	pub plan_capacity: usize,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
	}

	/// Create a store keeping at most `capacity` fee records per chain
	pub fn with_history_capacity(capacity: usize) -> Self {
		Self {
			fee_history: Arc::new(DashMap::new()),
			plans: Arc::new(DashMap::new()),
			history_capacity: capacity.max(1),
			plan_capacity: DEFAULT_PLAN_CAPACITY,
		}
	}

	/// Keep at most `capacity` plans, evicting by creation time
	pub fn with_plan_capacity(mut self, capacity: usize) -> Self {
		self.plan_capacity = capacity.max(1);
		self
	}

	fn evict_oldest_plans(&self) {
		while self.plans.len() > self.plan_capacity {
			let oldest = self
				.plans
				.iter()
				.min_by(|a, b| {
					a.created_at
						.cmp(&b.created_at)
						.then_with(|| a.id.cmp(&b.id))
				})
				.map(|entry| entry.key().clone());
			match oldest {
				Some(id) => {
					self.plans.remove(&id);
					debug!("Evicted plan {}", id);
				},
				None => break,
			}
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl FeeHistoryStorage for MemoryStore {
	async fn record_fee(&self, record: FeeHistoryRecord) -> StorageResult<()> {
		let mut history = self.fee_history.entry(record.chain()).or_default();
		history.push_back(record);
		while history.len() > self.history_capacity {
			if let Some(evicted) = history.pop_front() {
				debug!("Evicted fee record {} for {}", evicted.id, evicted.chain());
			}
		}
		Ok(())
	}

	async fn recent_fees(&self, chain: ChainId, limit: usize) -> StorageResult<Vec<FeeHistoryRecord>> {
		Ok(self
			.fee_history
			.get(&chain)
			.map(|history| history.iter().rev().take(limit).cloned().collect())
			.unwrap_or_default())
	}

	async fn fee_record_count(&self) -> StorageResult<usize> {
		Ok(self.fee_history.iter().map(|entry| entry.value().len()).sum())
	}
}

#[async_trait]
impl PlanStorage for MemoryStore {
	async fn add_plan(&self, record: PlanRecord) -> StorageResult<()> {
		match self.plans.entry(record.id.clone()) {
			dashmap::mapref::entry::Entry::Occupied(_) => {
				return Err(StorageError::Duplicate { id: record.id });
			},
			dashmap::mapref::entry::Entry::Vacant(slot) => {
				slot.insert(record);
			},
		}
		self.evict_oldest_plans();
		Ok(())
	}

	async fn get_plan(&self, plan_id: &str) -> StorageResult<Option<PlanRecord>> {
		Ok(self.plans.get(plan_id).map(|p| p.clone()))
	}

	async fn plans_by_primary(&self, chain: ChainId) -> StorageResult<Vec<PlanRecord>> {
		let mut plans: Vec<PlanRecord> = self
			.plans
			.iter()
			.filter_map(|entry| {
				let record = entry.value();
				if record.primary_chain() == chain {
					Some(record.clone())
				} else {
					None
				}
			})
			.collect();
		plans.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
		Ok(plans)
	}

	async fn plan_count(&self) -> StorageResult<usize> {
		Ok(self.plans.len())
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn health_check(&self) -> StorageResult<bool> {
		Ok(true)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		Ok(StorageStats {
			total_fee_records: self.fee_record_count().await?,
			total_plans: self.plans.len(),
		})
	}

	async fn close(&self) -> StorageResult<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, Utc};
	use rust_decimal::Decimal;
	use std::collections::BTreeMap;
	use trinity_types::{
		CongestionLevel, FeeBreakdown, FeeEstimate, FeeSavings, OperationKind, RoleAssignment,
		SecurityConfig, SecurityLevel, TrinityRoles, VaultCreationPlan, VaultDescriptor,
		VerificationRequirements,
	};

	fn estimate(chain: ChainId, fee_usd: i64) -> FeeEstimate {
		FeeEstimate {
			chain,
			operation_type: OperationKind::vault_creation(),
			estimated_fee: Decimal::ONE,
			estimated_fee_usd: Decimal::from(fee_usd),
			native_price_usd: Decimal::from(fee_usd),
			network_congestion: CongestionLevel::Low,
			estimated_time: 5,
			breakdown: FeeBreakdown::Flat {
				base_fee: Decimal::ONE,
				multiplier: Decimal::ONE,
			},
		}
	}

	fn fee_record(id: &str, chain: ChainId) -> FeeHistoryRecord {
		FeeHistoryRecord {
			id: id.to_string(),
			estimate: estimate(chain, 1),
			fallback: false,
			recorded_at: Utc::now(),
		}
	}

	fn plan_record(id: &str, primary: ChainId, age_secs: i64) -> PlanRecord {
		let [verify1, verify2] = trinity_types::ChainOrder::canonical().without(primary);
		let selected = estimate(primary, 1);
		let plan = VaultCreationPlan {
			primary_chain: primary,
			operation_type: OperationKind::vault_creation(),
			vault: VaultDescriptor::default(),
			trinity: RoleAssignment {
				roles: TrinityRoles {
					primary,
					verify1,
					verify2,
				},
				responsibilities: BTreeMap::new(),
				description: String::new(),
			},
			fee_estimates: BTreeMap::from([(primary, selected.clone())]),
			selected_fee: selected.clone(),
			recommended_chain: primary,
			cheapest_fee: selected,
			savings: FeeSavings {
				selected_chain: primary,
				selected_fee_usd: Decimal::ONE,
				baseline_chain: ChainId::Ethereum,
				baseline_fee_usd: Decimal::ONE,
				savings_usd: Decimal::ZERO,
				percent_saved: Decimal::ZERO,
			},
			deployment_priority: vec![verify1, verify2, primary],
			security_config: SecurityConfig::new(
				SecurityLevel::default(),
				VerificationRequirements(BTreeMap::new()),
			),
		};
		PlanRecord {
			id: id.to_string(),
			plan,
			created_at: Utc::now() - Duration::seconds(age_secs),
		}
	}

	#[tokio::test]
	async fn test_recent_fees_newest_first() {
		let store = MemoryStore::new();
		for id in ["a", "b", "c"] {
			store.record_fee(fee_record(id, ChainId::Ton)).await.unwrap();
		}
		store.record_fee(fee_record("x", ChainId::Solana)).await.unwrap();

		let recent = store.recent_fees(ChainId::Ton, 2).await.unwrap();
		let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, vec!["c", "b"]);
		assert!(store.recent_fees(ChainId::Ethereum, 10).await.unwrap().is_empty());
		assert_eq!(store.fee_record_count().await.unwrap(), 4);
	}

	#[tokio::test]
	async fn test_history_is_bounded_per_chain() {
		let store = MemoryStore::with_history_capacity(2);
		for id in ["a", "b", "c"] {
			store.record_fee(fee_record(id, ChainId::Ethereum)).await.unwrap();
		}

		let recent = store.recent_fees(ChainId::Ethereum, 10).await.unwrap();
		let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, vec!["c", "b"]);
	}

	#[tokio::test]
	async fn test_plan_storage() {
		let store = MemoryStore::new();
		store.add_plan(plan_record("p1", ChainId::Ton, 10)).await.unwrap();
		store.add_plan(plan_record("p2", ChainId::Ton, 5)).await.unwrap();
		store.add_plan(plan_record("p3", ChainId::Solana, 1)).await.unwrap();

		assert!(matches!(
			store.add_plan(plan_record("p1", ChainId::Ton, 0)).await,
			Err(StorageError::Duplicate { .. })
		));
		assert_eq!(
			store.get_plan("p3").await.unwrap().map(|r| r.primary_chain()),
			Some(ChainId::Solana)
		);
		assert!(store.get_plan("missing").await.unwrap().is_none());

		let ton: Vec<String> = store
			.plans_by_primary(ChainId::Ton)
			.await
			.unwrap()
			.into_iter()
			.map(|r| r.id)
			.collect();
		assert_eq!(ton, vec!["p1".to_string(), "p2".to_string()]);

		let stats = store.stats().await.unwrap();
		assert_eq!(stats.total_plans, 3);
		assert_eq!(stats.total_fee_records, 0);
		assert!(store.health_check().await.unwrap());
	}

	#[tokio::test]
	async fn test_plans_are_bounded_oldest_first() {
		let store = MemoryStore::new().with_plan_capacity(2);
		store.add_plan(plan_record("new", ChainId::Ton, 1)).await.unwrap();
		store.add_plan(plan_record("old", ChainId::Ton, 30)).await.unwrap();
		store.add_plan(plan_record("mid", ChainId::Solana, 10)).await.unwrap();

		assert_eq!(store.plan_count().await.unwrap(), 2);
		assert!(store.get_plan("old").await.unwrap().is_none());
		assert!(store.get_plan("mid").await.unwrap().is_some());
		assert!(store.get_plan("new").await.unwrap().is_some());
		assert_eq!(MemoryStore::new().plan_capacity, DEFAULT_PLAN_CAPACITY);
	}

	#[tokio::test]
	async fn test_close_keeps_store_readable() {
		let store = MemoryStore::new();
		store.add_plan(plan_record("p1", ChainId::Ethereum, 0)).await.unwrap();

		store.close().await.unwrap();
		assert_eq!(store.plan_count().await.unwrap(), 1);
	}
}
