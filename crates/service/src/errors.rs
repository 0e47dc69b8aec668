//! Service error types

use thiserror::Error;
use trinity_types::{ChainError, PlanValidationError, StorageError};

/// Errors returned by planning operations
///
/// Only invalid input and storage reads reach callers; upstream feed
/// failures are absorbed by fallbacks.
#[derive(Debug, Error)]
pub enum PlannerError {
	#[error(transparent)]
	InvalidRequest(#[from] PlanValidationError),

	#[error("no fee estimates were produced")]
	NoEstimates,

	#[error("storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<ChainError> for PlannerError {
	fn from(error: ChainError) -> Self {
		PlannerError::InvalidRequest(PlanValidationError::Chain(error))
	}
}
