//! Registry contracts for clients and issued tokens, plus the in-memory implementations.

pub mod memory;
pub mod reaper;

pub use memory::{MemoryClientStore, MemoryTokenStore};
pub use reaper::Reaper;

// self
use crate::{
	_prelude::*,
	auth::{Client, IssuedToken},
};

/// Boxed future returned by registry operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Registry of clients keyed by client ID.
///
/// Reads happen on every issuance; writes are expected only at startup, but implementations must
/// tolerate lookups racing a write.
pub trait ClientStore
where
	Self: Send + Sync,
{
	/// Inserts or replaces the client keyed by its identifier.
	fn register(&self, client: Client) -> StoreFuture<'_, ()>;

	/// Inserts the client, failing with [`StoreError::DuplicateClient`] if the identifier exists.
	fn register_new(&self, client: Client) -> StoreFuture<'_, ()>;

	/// Fetches the client registered under `client_id`, if any.
	fn lookup<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>>;
}

/// Registry of issued tokens keyed by token value.
///
/// Presence in this registry is authoritative: a token that verifies but is not stored here is
/// not valid.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Stores a newly issued token; never overwrites an existing entry.
	fn put(&self, token: IssuedToken) -> StoreFuture<'_, ()>;

	/// Fetches the entry for `token`, if present.
	fn get<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IssuedToken>>;

	/// Removes the entry for `token` (revocation), returning it if it existed.
	fn delete<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<IssuedToken>>;

	/// Removes every entry expired at `now`, returning how many were removed.
	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Error type produced by [`ClientStore`] and [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// A token with the same value is already stored.
	#[error("Token value is already registered.")]
	DuplicateToken,
	/// A client with the same identifier is already registered.
	#[error("Client `{client_id}` is already registered.")]
	DuplicateClient {
		/// Conflicting identifier.
		client_id: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
