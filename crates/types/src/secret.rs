//! Redacted, zeroized string for upstream API credentials

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Holds a credential such as a price-feed API key
///
/// The value never appears in `Debug` or `Display` output and is wiped from
/// memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			inner: secret.into(),
		}
	}

	/// Expose the secret value; call only where the credential is sent upstream
	pub fn expose_secret(&self) -> &str {
		&self.inner
	}

	pub fn is_empty(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(secret: String) -> Self {
		Self::new(secret)
	}
}

impl From<&str> for SecretString {
	fn from(secret: &str) -> Self {
		Self::new(secret)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_secret_is_redacted() {
		let secret = SecretString::new("cg-demo-key");
		assert_eq!(format!("{}", secret), "[REDACTED]");
		assert!(!format!("{:?}", secret).contains("cg-demo-key"));
		assert_eq!(secret.expose_secret(), "cg-demo-key");
	}

	#[test]
	fn test_blank_secret_is_empty() {
		assert!(SecretString::from("   ").is_empty());
		assert!(!SecretString::from("key").is_empty());
	}
}
