//! Time sources for issuance and validation.

// self
use crate::_prelude::*;

/// Source of the current instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock; clones share the same instant.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<RwLock<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(RwLock::new(start)))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.write() = instant;
	}

	/// Moves the clock forward (or backward, for negative values) by `delta`.
	pub fn advance(&self, delta: Duration) {
		*self.0.write() += delta;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.read()
	}
}
