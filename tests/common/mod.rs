#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime, macros};
// self
use oauth2_issuer::{
	auth::{Client, ClientId},
	clock::ManualClock,
	codec::SigningKey,
	flows::Issuer,
	store::{MemoryClientStore, MemoryTokenStore},
};

pub const CLIENT_ID: &str = "acme";
pub const CLIENT_SECRET: &str = "s3cr3t";
pub const TTL_SECS: i64 = 3600;

/// Everything a test needs to drive issuance and inspect the registries.
pub struct Harness {
	pub issuer: Issuer,
	pub clients: Arc<MemoryClientStore>,
	pub tokens: Arc<MemoryTokenStore>,
	pub clock: ManualClock,
}

pub fn start() -> OffsetDateTime {
	macros::datetime!(2025-01-01 00:00 UTC)
}

pub fn signing_key() -> SigningKey {
	SigningKey::new("integration-test-key").expect("Signing key fixture should be valid.")
}

pub fn client(id: &str, secret: &str) -> Client {
	Client::new(ClientId::new(id).expect("Client fixture should be valid."), secret)
}

pub fn harness() -> Harness {
	let clients = Arc::new(MemoryClientStore::with_clients([client(CLIENT_ID, CLIENT_SECRET)]));
	let tokens = Arc::new(MemoryTokenStore::default());
	let clock = ManualClock::new(start());
	let issuer =
		Issuer::new(clients.clone(), tokens.clone(), &signing_key(), Duration::seconds(TTL_SECS))
			.with_clock(Arc::new(clock.clone()));

	Harness { issuer, clients, tokens, clock }
}
