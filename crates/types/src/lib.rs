//! Trinity Types
//!
//! Shared models and traits for the trinity vault planner.
//! This crate contains all domain models organized by concern.

pub mod chains;
pub mod fees;
pub mod plans;
pub mod pricing;
pub mod roles;
pub mod secret;
pub mod storage;

// Re-export chrono, rust_decimal and serde_json for convenience
pub use chrono;
pub use rust_decimal;
pub use serde_json;

pub use chains::{ChainError, ChainId, ChainInfo, ChainOrder, CostModelKind, TRINITY_SIZE};

pub use fees::{
	ChainComparison, ComparisonSavings, CongestionLevel, EstimateOutcome, EstimationFailure,
	FeeBreakdown, FeeEstimate, OperationKind,
};

pub use roles::{
	FeeSavings, RoleAssignment, SecurityLevel, SecurityLevelError, TrinityRole, TrinityRoles,
	VerificationRequirements,
};

pub use plans::{
	ChainRecommendation, OperationRecommendation, PlanParameters, PlanRequest,
	PlanValidationError, PreferenceQuery, SecurityConfig, SelectionRequest, SelectionValidation,
	VaultCreationPlan, VaultDescriptor,
};

pub use pricing::{GasPriceSource, PriceError, PriceOrigin, PriceResult, PriceSource, ResolvedPrice};

pub use secret::SecretString;

pub use storage::{
	FeeHistoryRecord, FeeHistoryStorageTrait, PlanRecord, PlanStorageTrait, StorageError,
	StorageResult, StorageStats, StorageTrait,
};
