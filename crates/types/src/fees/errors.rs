//! Internal estimation failure reasons
//!
//! These never reach API callers; they tag fallback estimates so logs and
//! tests can tell live data from static defaults.

use thiserror::Error;

use crate::chains::ChainId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimationFailure {
	#[error("No live or cached USD price for token '{token}'")]
	PriceUnavailable { token: String },

	#[error("Gas price unavailable for {chain}: {reason}")]
	GasPriceUnavailable { chain: ChainId, reason: String },

	#[error("Fee arithmetic overflowed for {chain}")]
	Overflow { chain: ChainId },

	#[error("Estimation for {chain} did not finish within {timeout_ms}ms")]
	TimedOut { chain: ChainId, timeout_ms: u64 },

	#[error("Estimation task for {chain} failed: {reason}")]
	TaskFailed { chain: ChainId, reason: String },
}
