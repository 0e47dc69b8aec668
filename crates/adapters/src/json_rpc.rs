//! Gas price feed over Ethereum JSON-RPC

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use trinity_types::{ChainId, GasPriceSource, PriceError, PriceResult};
use url::Url;

use crate::client::{build_client, transport_error};

const WEI_PER_GWEI: u64 = 1_000_000_000;

#[derive(Debug, Deserialize)]
struct RpcResponse {
	result: Option<String>,
	error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
	code: i64,
	message: String,
}

/// Gas prices from `eth_gasPrice`; only ethereum has a fee market
#[derive(Debug, Clone)]
pub struct JsonRpcGasPriceSource {
	client: Client,
	rpc_url: Url,
	timeout_ms: u64,
}

impl JsonRpcGasPriceSource {
	pub fn new(rpc_url: &str, timeout_ms: u64) -> PriceResult<Self> {
		let rpc_url = Url::parse(rpc_url).map_err(|e| PriceError::Config {
			reason: format!("invalid RPC URL '{}': {}", rpc_url, e),
		})?;
		Ok(Self {
			client: build_client(timeout_ms, None)?,
			rpc_url,
			timeout_ms,
		})
	}
}

#[async_trait]
impl GasPriceSource for JsonRpcGasPriceSource {
	fn source_id(&self) -> &str {
		"json_rpc"
	}

	async fn fetch_gas_price_gwei(&self, chain: ChainId) -> PriceResult<Decimal> {
		if chain != ChainId::Ethereum {
			return Err(PriceError::UnsupportedChain { chain });
		}

		let response = self
			.client
			.post(self.rpc_url.clone())
			.json(&json!({
				"jsonrpc": "2.0",
				"id": 1,
				"method": "eth_gasPrice",
				"params": [],
			}))
			.send()
			.await
			.map_err(|e| transport_error(e, self.timeout_ms))?;

		if !response.status().is_success() {
			return Err(PriceError::HttpStatus {
				status_code: response.status().as_u16(),
			});
		}

		let body: RpcResponse = response.json().await.map_err(|e| PriceError::InvalidResponse {
			reason: format!("failed to parse eth_gasPrice response: {}", e),
		})?;

		if let Some(error) = body.error {
			return Err(PriceError::InvalidResponse {
				reason: format!("eth_gasPrice error {}: {}", error.code, error.message),
			});
		}

		let result = body.result.ok_or_else(|| PriceError::InvalidResponse {
			reason: "eth_gasPrice response has no result".to_string(),
		})?;
		let gwei = wei_hex_to_gwei(&result)?;
		debug!("eth_gasPrice returned {} gwei", gwei);
		Ok(gwei)
	}
}

/// Convert a `0x`-prefixed wei quantity into gwei
fn wei_hex_to_gwei(quantity: &str) -> PriceResult<Decimal> {
	let digits = quantity
		.strip_prefix("0x")
		.ok_or_else(|| PriceError::InvalidResponse {
			reason: format!("quantity '{}' is not 0x-prefixed", quantity),
		})?;

	let wei = u128::from_str_radix(digits, 16).map_err(|e| PriceError::InvalidResponse {
		reason: format!("quantity '{}' is not hex: {}", quantity, e),
	})?;

	let out_of_range = || PriceError::InvalidResponse {
		reason: format!("quantity '{}' is out of range", quantity),
	};
	let wei = i128::try_from(wei)
		.ok()
		.and_then(|wei| Decimal::try_from_i128_with_scale(wei, 0).ok())
		.ok_or_else(out_of_range)?;

	wei.checked_div(Decimal::from(WEI_PER_GWEI))
		.map(|gwei| gwei.normalize())
		.ok_or_else(out_of_range)
}
