//! Time source for cache freshness checks

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic clock injected into services that track freshness
pub trait Clock: Send + Sync {
	fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
	origin: Instant,
	offset_ms: AtomicU64,
}

impl ManualClock {
	pub fn new() -> Self {
		Self {
			origin: Instant::now(),
			offset_ms: AtomicU64::new(0),
		}
	}

	pub fn advance(&self, by: Duration) {
		let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
		self.offset_ms.fetch_add(millis, Ordering::SeqCst);
	}
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
	}
}
