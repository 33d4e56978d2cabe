//! Thread-safe in-memory registries.

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	auth::{Client, ClientId, IssuedToken},
	store::{ClientStore, StoreError, StoreFuture, TokenStore},
};

type ClientMap = Arc<RwLock<HashMap<ClientId, Client>>>;
type TokenMap = Arc<RwLock<HashMap<String, IssuedToken>>>;

/// Client registry kept in-process behind a reader/writer lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryClientStore(ClientMap);
impl MemoryClientStore {
	/// Builds a registry pre-populated with `clients`; later duplicates replace earlier ones.
	pub fn with_clients(clients: impl IntoIterator<Item = Client>) -> Self {
		let map = clients.into_iter().map(|client| (client.id.clone(), client)).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Number of registered clients.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true if no client is registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn register_now(map: ClientMap, client: Client) {
		map.write().insert(client.id.clone(), client);
	}

	fn register_new_now(map: ClientMap, client: Client) -> Result<(), StoreError> {
		match map.write().entry(client.id.clone()) {
			Entry::Occupied(existing) =>
				Err(StoreError::DuplicateClient { client_id: existing.key().to_string() }),
			Entry::Vacant(slot) => {
				slot.insert(client);

				Ok(())
			},
		}
	}
}
impl ClientStore for MemoryClientStore {
	fn register(&self, client: Client) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::register_now(map, client);

			Ok(())
		})
	}

	fn register_new(&self, client: Client) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::register_new_now(map, client) })
	}

	fn lookup<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(client_id).cloned()) })
	}
}

/// Token registry kept in-process behind a reader/writer lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore(TokenMap);
impl MemoryTokenStore {
	/// Number of stored tokens, expired or not.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true if no token is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn put_now(map: TokenMap, token: IssuedToken) -> Result<(), StoreError> {
		match map.write().entry(token.token.registry_key().to_owned()) {
			Entry::Occupied(_) => Err(StoreError::DuplicateToken),
			Entry::Vacant(slot) => {
				slot.insert(token);

				Ok(())
			},
		}
	}

	fn purge_now(map: TokenMap, now: OffsetDateTime) -> usize {
		let mut guard = map.write();
		let before = guard.len();

		guard.retain(|_, record| !record.is_expired_at(now));

		before - guard.len()
	}
}
impl TokenStore for MemoryTokenStore {
	fn put(&self, token: IssuedToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::put_now(map, token) })
	}

	fn get<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IssuedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(token).cloned()) })
	}

	fn delete<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IssuedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(token)) })
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::purge_now(map, now)) })
	}
}
