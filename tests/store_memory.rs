mod common;

// std
use std::sync::Arc;
// crates.io
use time::{Duration, macros};
// self
use common::client;
use oauth2_issuer::{
	auth::{AccessToken, AccessTokenClaims, ClientId, IssuedToken, ScopeSet},
	codec::AccessTokenCodec,
	store::{ClientStore, MemoryClientStore, MemoryTokenStore, StoreError, TokenStore},
};

fn issued(ttl: Duration) -> IssuedToken {
	let claims = AccessTokenClaims::mint(
		ClientId::new("acme").expect("Client fixture should be valid."),
		ScopeSet::default(),
		common::start(),
		ttl,
	)
	.expect("Claims fixture should mint.");
	let token = AccessTokenCodec::new(&common::signing_key())
		.encode(&claims)
		.expect("Encoding token fixture should succeed.");

	IssuedToken::new(token, &claims)
}

#[tokio::test]
async fn put_get_delete_round_trip() {
	let store = MemoryTokenStore::default();
	let record = issued(Duration::hours(1));
	let value = record.token.as_str().to_owned();

	store.put(record.clone()).await.expect("Storing a fresh token should succeed.");

	let fetched = store
		.get(&value)
		.await
		.expect("Fetching a stored token should succeed.")
		.expect("Stored token should be present.");

	assert_eq!(fetched, record);

	let removed = store.delete(&value).await.expect("Deleting should succeed.");

	assert_eq!(removed, Some(record));
	assert!(store.get(&value).await.expect("Fetching should succeed.").is_none());
	assert!(store.delete(&value).await.expect("Deleting twice should succeed.").is_none());
}

#[tokio::test]
async fn put_never_overwrites() {
	let store = MemoryTokenStore::default();
	let original = issued(Duration::hours(1));
	let mut impostor = original.clone();

	impostor.expires_at += Duration::days(30);

	store.put(original.clone()).await.expect("First insert should succeed.");

	assert_eq!(store.put(impostor).await, Err(StoreError::DuplicateToken));

	let fetched = store
		.get(original.token.as_str())
		.await
		.expect("Fetching should succeed.")
		.expect("Original token should remain present.");

	assert_eq!(fetched.expires_at, original.expires_at);
}

#[tokio::test]
async fn purge_removes_only_expired_entries() {
	let store = MemoryTokenStore::default();
	let short = issued(Duration::minutes(1));
	let long = issued(Duration::hours(1));

	store.put(short.clone()).await.expect("Storing short-lived token should succeed.");
	store.put(long.clone()).await.expect("Storing long-lived token should succeed.");

	let purged = store
		.purge_expired(macros::datetime!(2025-01-01 00:30 UTC))
		.await
		.expect("Purging should succeed.");

	assert_eq!(purged, 1);
	assert_eq!(store.len(), 1);
	assert!(store.get(short.token.as_str()).await.expect("Fetch should succeed.").is_none());
	assert!(store.get(long.token.as_str()).await.expect("Fetch should succeed.").is_some());
}

#[tokio::test]
async fn unknown_token_lookups_are_empty() {
	let store = MemoryTokenStore::default();
	let missing = AccessToken::new("not-issued-here");

	assert!(store.get(missing.as_str()).await.expect("Fetch should succeed.").is_none());
	assert!(store.is_empty());
}

#[tokio::test]
async fn register_upserts_and_register_new_is_strict() {
	let store = MemoryClientStore::default();

	store.register(client("acme", "old")).await.expect("Registering should succeed.");
	store.register(client("acme", "new")).await.expect("Re-registering should upsert.");

	let found = store
		.lookup("acme")
		.await
		.expect("Lookup should succeed.")
		.expect("Registered client should be present.");

	assert!(found.secret.verify("new"));
	assert_eq!(store.len(), 1);
	assert_eq!(
		store.register_new(client("acme", "other")).await,
		Err(StoreError::DuplicateClient { client_id: "acme".into() })
	);
	assert!(store.lookup("unknown").await.expect("Lookup should succeed.").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lookups_tolerate_concurrent_writes() {
	const TASKS: usize = 256;

	let store = Arc::new(MemoryClientStore::with_clients([client("acme", "s3cr3t")]));
	let mut tasks = Vec::with_capacity(TASKS);

	for i in 0..TASKS {
		let store = store.clone();

		tasks.push(tokio::spawn(async move {
			if i % 4 == 0 {
				store
					.register(client(&format!("client-{i}"), "secret"))
					.await
					.expect("Concurrent registration should succeed.");
			}

			store
				.lookup("acme")
				.await
				.expect("Concurrent lookup should succeed.")
				.expect("Existing client should stay visible during writes.")
		}));
	}

	for task in tasks {
		let found = task.await.expect("Lookup task should not panic.");

		assert_eq!(found.id.as_str(), "acme");
	}

	assert_eq!(store.len(), 1 + TASKS / 4);
}
