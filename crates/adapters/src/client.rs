//! Shared HTTP client construction

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use trinity_types::{PriceError, PriceResult, SecretString};
use url::Url;

const USER_AGENT: &str = concat!("trinity-planner/", env!("CARGO_PKG_VERSION"));

/// Build a pooled client with a per-request timeout and optional credential header
pub fn build_client(timeout_ms: u64, credential: Option<(&str, &SecretString)>) -> PriceResult<Client> {
	let mut headers = HeaderMap::new();
	headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));

	if let Some((name, secret)) = credential {
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| PriceError::Config {
			reason: format!("invalid header name '{}': {}", name, e),
		})?;
		let mut value = HeaderValue::from_str(secret.expose_secret()).map_err(|_| PriceError::Config {
			reason: "credential is not a valid header value".to_string(),
		})?;
		value.set_sensitive(true);
		headers.insert(name, value);
	}

	ClientBuilder::new()
		.user_agent(USER_AGENT)
		.default_headers(headers)
		.timeout(Duration::from_millis(timeout_ms))
		.pool_idle_timeout(Duration::from_secs(90))
		.tcp_keepalive(Duration::from_secs(60))
		.build()
		.map_err(|e| PriceError::Config {
			reason: format!("failed to build HTTP client: {}", e),
		})
}

/// Join a path onto a base endpoint, treating the base as a directory
pub fn build_url(base_url: &str, path: &str) -> PriceResult<Url> {
	let mut base = Url::parse(base_url).map_err(|e| PriceError::Config {
		reason: format!("invalid base URL '{}': {}", base_url, e),
	})?;

	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	base.join(path).map_err(|e| PriceError::Config {
		reason: format!("failed to join '{}' onto '{}': {}", path, base_url, e),
	})
}

/// Map a transport error, keeping timeouts distinguishable
pub(crate) fn transport_error(error: reqwest::Error, timeout_ms: u64) -> PriceError {
	if error.is_timeout() {
		PriceError::Timeout { timeout_ms }
	} else {
		PriceError::Http(error.to_string())
	}
}
