//! Trinity Service
//!
//! Fee estimation, cross-chain comparison, role assignment and vault
//! deployment planning.

pub mod clock;
pub mod comparator;
pub mod errors;
pub mod estimator;
pub mod planner;
pub mod price;
pub mod records;
pub mod refresh;
pub mod roles;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use comparator::{ChainComparator, ComparisonReport};
pub use errors::PlannerError;
pub use estimator::{native_fee, FeeEstimator, FeeEstimatorTrait};
pub use planner::{PlanReport, VaultDeploymentPlanner};
pub use price::{PriceService, PriceServiceTrait};
pub use records::{RecordService, MAX_HISTORY_LIMIT};
pub use refresh::{refresh_all, spawn_price_refresh};
pub use roles::TrinityRoleAssigner;
