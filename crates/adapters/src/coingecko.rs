//! CoinGecko simple price feed

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;
use trinity_types::{PriceError, PriceResult, PriceSource, SecretString};
use url::Url;

use crate::client::{build_client, build_url, transport_error};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// USD prices from `GET {endpoint}/simple/price?ids={token}&vs_currencies=usd`
#[derive(Debug, Clone)]
pub struct CoinGeckoPriceSource {
	client: Client,
	price_url: Url,
	timeout_ms: u64,
}

impl CoinGeckoPriceSource {
	pub fn new(endpoint: &str, api_key: Option<SecretString>, timeout_ms: u64) -> PriceResult<Self> {
		let credential = api_key.as_ref().map(|key| (API_KEY_HEADER, key));
		Ok(Self {
			client: build_client(timeout_ms, credential)?,
			price_url: build_url(endpoint, "simple/price")?,
			timeout_ms,
		})
	}
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
	fn source_id(&self) -> &str {
		"coingecko"
	}

	async fn fetch_usd_price(&self, token: &str) -> PriceResult<Decimal> {
		debug!("Fetching {} price from CoinGecko", token);

		let response = self
			.client
			.get(self.price_url.clone())
			.query(&[("ids", token), ("vs_currencies", "usd")])
			.send()
			.await
			.map_err(|e| transport_error(e, self.timeout_ms))?;

		if !response.status().is_success() {
			return Err(PriceError::HttpStatus {
				status_code: response.status().as_u16(),
			});
		}

		let body: Value = response.json().await.map_err(|e| PriceError::InvalidResponse {
			reason: format!("failed to parse CoinGecko response: {}", e),
		})?;

		parse_usd_price(&body, token)
	}
}

/// Extract `{token: {usd: <number>}}` as an exact decimal
fn parse_usd_price(body: &Value, token: &str) -> PriceResult<Decimal> {
	let quote = body
		.get(token)
		.and_then(|entry| entry.get("usd"))
		.ok_or_else(|| PriceError::MissingToken {
			token: token.to_string(),
		})?;

	let text = match quote {
		Value::Number(number) => number.to_string(),
		Value::String(text) => text.clone(),
		other => {
			return Err(PriceError::InvalidResponse {
				reason: format!("usd price for {} is not numeric: {}", token, other),
			})
		},
	};

	let price = Decimal::from_str(&text)
		.or_else(|_| Decimal::from_scientific(&text))
		.map_err(|e| PriceError::InvalidResponse {
			reason: format!("usd price '{}' for {} is not a decimal: {}", text, token, e),
		})?;

	if price <= Decimal::ZERO {
		return Err(PriceError::InvalidResponse {
			reason: format!("usd price for {} must be positive, got {}", token, price),
		});
	}

	Ok(price)
}
