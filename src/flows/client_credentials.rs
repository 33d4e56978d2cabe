//! Client Credentials grant: mint claims, sign, and record the token.
//!
//! The token ID embedded in every token is random, so a registry collision means either a broken
//! randomness source or a registry fault. Minting retries a bounded number of times before giving
//! up with [`Error::TokenGeneration`].

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenClaims, ClientId, IssuedToken, ScopeSet},
	flows::{Issuer, TokenResponse},
	store::StoreError,
};

impl Issuer {
	pub(super) async fn client_credentials(
		&self,
		client_id: ClientId,
		scope: ScopeSet,
	) -> Result<TokenResponse> {
		let expires_in = u64::try_from(self.ttl.whole_seconds()).unwrap_or_default();

		for attempt in 1..=Self::MAX_MINT_ATTEMPTS {
			let claims =
				AccessTokenClaims::mint(client_id.clone(), scope.clone(), self.clock.now(), self.ttl)
					.ok_or(Error::TokenLifetimeOutOfRange { ttl: self.ttl })?;
			let token = self.codec.encode(&claims)?;
			let record = IssuedToken::new(token.clone(), &claims);

			match self.tokens.put(record).await {
				Ok(()) => {
					tracing::debug!(
						client_id = %client_id,
						token_id = %claims.token_id,
						token = %token,
						"token recorded"
					);

					return Ok(TokenResponse {
						access_token: token.into_string(),
						token_type: Self::TOKEN_TYPE,
						expires_in,
						scope: (!scope.is_empty()).then(|| scope.normalized()),
					});
				},
				Err(StoreError::DuplicateToken) => {
					tracing::warn!(client_id = %client_id, attempt, "minted token collided; retrying");
				},
				Err(e) => return Err(e.into()),
			}
		}

		Err(Error::TokenGeneration { attempts: Self::MAX_MINT_ATTEMPTS })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		auth::{Client, ClientCredentials},
		clock::ManualClock,
		codec::SigningKey,
		flows::TokenRequest,
		obs::RequestContext,
		store::{MemoryClientStore, MemoryTokenStore, StoreFuture, TokenStore},
	};

	/// Token store that reports every insert as a collision.
	#[derive(Debug, Default)]
	struct CollidingTokenStore {
		puts: parking_lot::Mutex<usize>,
	}
	impl TokenStore for CollidingTokenStore {
		fn put(&self, _: IssuedToken) -> StoreFuture<'_, ()> {
			*self.puts.lock() += 1;

			Box::pin(async { Err(StoreError::DuplicateToken) })
		}

		fn get<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<IssuedToken>> {
			Box::pin(async { Ok(None) })
		}

		fn delete<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<IssuedToken>> {
			Box::pin(async { Ok(None) })
		}

		fn purge_expired(&self, _: OffsetDateTime) -> StoreFuture<'_, usize> {
			Box::pin(async { Ok(0) })
		}
	}

	fn clients() -> Arc<MemoryClientStore> {
		let id = ClientId::new("acme").expect("Client fixture should be valid.");

		Arc::new(MemoryClientStore::with_clients([Client::new(id, "s3cr3t")]))
	}

	fn key() -> SigningKey {
		SigningKey::new("unit-test-key").expect("Signing key fixture should be valid.")
	}

	#[tokio::test]
	async fn collisions_exhaust_attempts() {
		let tokens = Arc::new(CollidingTokenStore::default());
		let issuer = Issuer::new(clients(), tokens.clone(), &key(), Duration::minutes(5));
		let err = issuer
			.issue(
				&RequestContext::generate(),
				TokenRequest::client_credentials(ClientCredentials::new("acme", "s3cr3t")),
			)
			.await
			.expect_err("Every insert colliding should fail issuance.");

		assert!(matches!(err, Error::TokenGeneration { attempts: Issuer::MAX_MINT_ATTEMPTS }));
		assert_eq!(*tokens.puts.lock(), Issuer::MAX_MINT_ATTEMPTS);
	}

	#[tokio::test]
	async fn overflowing_ttl_fails_without_recording() {
		let tokens = Arc::new(MemoryTokenStore::default());
		let issuer = Issuer::new(clients(), tokens.clone(), &key(), Duration::MAX);
		let err = issuer
			.issue(
				&RequestContext::generate(),
				TokenRequest::client_credentials(ClientCredentials::new("acme", "s3cr3t")),
			)
			.await
			.expect_err("A lifetime past the calendar range should fail issuance.");

		assert!(matches!(err, Error::TokenLifetimeOutOfRange { ttl } if ttl == Duration::MAX));
		assert_eq!(tokens.len(), 0);
	}

	#[tokio::test]
	async fn recorded_claims_match_the_clock_and_ttl() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00:00.75 UTC));
		let tokens = Arc::new(MemoryTokenStore::default());
		let issuer = Issuer::new(clients(), tokens.clone(), &key(), Duration::seconds(90))
			.with_clock(Arc::new(clock));
		let response = issuer
			.issue(
				&RequestContext::generate(),
				TokenRequest::client_credentials(ClientCredentials::new("acme", "s3cr3t"))
					.with_scope("b a"),
			)
			.await
			.expect("Issuance should succeed.");
		let record = tokens
			.get(&response.access_token)
			.await
			.expect("Lookup should succeed.")
			.expect("Issued token should be recorded.");

		assert_eq!(response.expires_in, 90);
		assert_eq!(response.scope.as_deref(), Some("a b"));
		assert_eq!(record.issued_at, macros::datetime!(2025-01-01 00:00 UTC));
		assert_eq!(record.expires_at, macros::datetime!(2025-01-01 00:01:30 UTC));
		assert_eq!(record.client_id.as_str(), "acme");
		assert_eq!(
			issuer.codec().decode(&response.access_token).expect("Token should decode.").token_id,
			record.token_id
		);
	}
}
