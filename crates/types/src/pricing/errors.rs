//! Error types for upstream price feeds

use thiserror::Error;

use crate::chains::ChainId;

/// Upstream price feed errors
///
/// Always recovered inside the service layer; never surfaced to API callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
	#[error("HTTP request failed: {0}")]
	Http(String),

	#[error("HTTP {status_code} from price feed")]
	HttpStatus { status_code: u16 },

	#[error("Price request timed out after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid price feed response: {reason}")]
	InvalidResponse { reason: String },

	#[error("Token not quoted by price feed: {token}")]
	MissingToken { token: String },

	#[error("Gas price not available for chain {chain}")]
	UnsupportedChain { chain: ChainId },

	#[error("Price feed configuration error: {reason}")]
	Config { reason: String },
}
