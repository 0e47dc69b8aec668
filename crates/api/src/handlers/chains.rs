//! Chain metadata handler

use axum::{extract::Path, response::Json};
use trinity_types::ChainInfo;

use crate::handlers::common::{parse_chain, ApiError};
#[cfg(feature = "openapi")]
use crate::handlers::common::ErrorResponse;

/// GET /api/chain/info/{chain} - Static chain metadata
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/info/{chain}",
	params(("chain" = String, Path, description = "ethereum, solana or ton")),
	responses(
		(status = 200, description = "Chain metadata", body = ChainInfo),
		(status = 400, description = "Unsupported chain", body = ErrorResponse)
	),
	tag = "chains"
))]
pub async fn get_chain_info(Path(chain): Path<String>) -> Result<Json<ChainInfo>, ApiError> {
	let chain = parse_chain(&chain)?;
	Ok(Json(ChainInfo::for_chain(chain)))
}
