//! Background task that bounds token-registry memory by purging expired entries.

// crates.io
use tokio::{
	sync::oneshot,
	task::JoinHandle,
	time::{Instant, MissedTickBehavior, interval_at},
};
// self
use crate::{_prelude::*, clock::Clock, store::TokenStore};

/// Handle to a running reaper task; dropping it aborts the task.
#[derive(Debug)]
pub struct Reaper {
	stop: Option<oneshot::Sender<()>>,
	task: JoinHandle<()>,
}
impl Reaper {
	/// Default sweep period.
	pub const DEFAULT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

	const MIN_INTERVAL: std::time::Duration = std::time::Duration::from_millis(10);

	/// Spawns a sweep over `store` every `interval`, evaluating expiry against `clock`.
	///
	/// Must be called from within a Tokio runtime. The first sweep happens one interval after
	/// spawning.
	pub fn spawn(
		store: Arc<dyn TokenStore>,
		clock: Arc<dyn Clock>,
		interval: std::time::Duration,
	) -> Self {
		let period = interval.max(Self::MIN_INTERVAL);
		let (stop, mut stopped) = oneshot::channel();
		let task = tokio::spawn(async move {
			let mut ticker = interval_at(Instant::now() + period, period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				tokio::select! {
					_ = &mut stopped => break,
					_ = ticker.tick() => match store.purge_expired(clock.now()).await {
						Ok(0) => {},
						Ok(purged) => tracing::debug!(purged, "purged expired access tokens"),
						Err(e) => tracing::warn!(error = %e, "failed to purge expired access tokens"),
					},
				}
			}
		});

		Self { stop: Some(stop), task }
	}

	/// Signals the task to stop and waits for it to finish its current sweep.
	pub async fn shutdown(mut self) {
		if let Some(stop) = self.stop.take() {
			let _ = stop.send(());
		}

		let _ = (&mut self.task).await;
	}
}
impl Drop for Reaper {
	fn drop(&mut self) {
		self.task.abort();
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		auth::{AccessToken, AccessTokenClaims, ClientId, IssuedToken, ScopeSet},
		clock::ManualClock,
		store::MemoryTokenStore,
	};

	fn record(value: &str, ttl: Duration) -> IssuedToken {
		let claims = AccessTokenClaims::mint(
			ClientId::new("acme").expect("Client fixture should be valid."),
			ScopeSet::default(),
			macros::datetime!(2025-01-01 00:00 UTC),
			ttl,
		)
		.expect("Claims fixture should mint.");

		IssuedToken::new(AccessToken::new(value), &claims)
	}

	#[tokio::test]
	async fn sweeps_expired_tokens_until_shut_down() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let store = MemoryTokenStore::default();

		store.put(record("short", Duration::minutes(1))).await.expect("Insert should succeed.");
		store.put(record("long", Duration::hours(1))).await.expect("Insert should succeed.");

		let reaper = Reaper::spawn(
			Arc::new(store.clone()),
			Arc::new(clock.clone()),
			std::time::Duration::from_millis(10),
		);

		tokio::time::sleep(std::time::Duration::from_millis(50)).await;

		assert_eq!(store.len(), 2);

		clock.advance(Duration::minutes(5));

		for _ in 0..100 {
			if store.len() == 1 {
				break;
			}

			tokio::time::sleep(std::time::Duration::from_millis(10)).await;
		}

		assert_eq!(store.len(), 1);
		assert!(store.get("long").await.expect("Fetch should succeed.").is_some());

		reaper.shutdown().await;
	}
}
