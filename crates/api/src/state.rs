use std::sync::Arc;

use trinity_service::{FeeEstimatorTrait, RecordService, VaultDeploymentPlanner};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub planner: Arc<VaultDeploymentPlanner>,
	pub estimator: Arc<dyn FeeEstimatorTrait>,
	pub records: Arc<RecordService>,
}
