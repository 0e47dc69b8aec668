//! Storage traits for pluggable storage implementations

// Re-export the storage traits from types crate
pub use trinity_types::storage::{
	FeeHistoryStorageTrait as FeeHistoryStorage, PlanStorageTrait as PlanStorage, StorageError,
	StorageResult, StorageStats, StorageTrait as Storage,
};
