//! Trinity Storage
//!
//! Storage implementations for fee history and generated vault plans.

pub mod memory_store;
pub mod traits;

pub use memory_store::{MemoryStore, DEFAULT_HISTORY_CAPACITY, DEFAULT_PLAN_CAPACITY};
pub use traits::{
	FeeHistoryStorage, PlanStorage, Storage, StorageError, StorageResult, StorageStats,
};
