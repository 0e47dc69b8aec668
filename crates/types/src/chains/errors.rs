//! Error types for chain identifiers

use thiserror::Error;

/// Errors raised while resolving chain identifiers at the request boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
	#[error("Invalid chain '{chain}'. Valid chains: {valid}")]
	InvalidChain { chain: String, valid: String },

	#[error("Invalid chain order: {reason}")]
	InvalidOrder { reason: String },
}
