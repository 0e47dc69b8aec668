//! Request bodies and response helpers

use std::str::FromStr;

use serde_json::{json, Value};
use rust_decimal::Decimal;

pub struct ApiFixtures;

#[allow(dead_code)]
impl ApiFixtures {
	pub fn plan_request(chain: &str, security_level: u8) -> Value {
		json!({
			"primaryChain": chain,
			"securityLevel": security_level,
		})
	}

	pub fn time_lock_plan_request() -> Value {
		json!({
			"primaryChain": "ton",
			"vaultType": "time_lock",
			"assetAmount": "2.5",
			"assetType": "TON",
			"securityLevel": 5,
		})
	}

	pub fn selection_request(chain: &str, user_balance: &str) -> Value {
		json!({
			"primaryChain": chain,
			"userBalance": user_balance,
		})
	}

	/// Read a decimal serialized as a JSON string
	pub fn decimal(value: &Value) -> Decimal {
		let raw = value
			.as_str()
			.unwrap_or_else(|| panic!("expected decimal string, got {}", value));
		Decimal::from_str(raw).unwrap()
	}
}
