//! Registry records for issued access tokens and their lifecycle helpers.

// self
use crate::{
	_prelude::*,
	auth::{
		ClientId, ScopeSet, TokenId,
		token::{claims::AccessTokenClaims, secret::AccessToken},
	},
};

/// Current lifecycle status for an issued token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token is not yet valid because the issued-at instant is in the future.
	Pending,
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Token registry entry written once per issuance and never updated.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
	/// Signed token value; also the registry key.
	pub token: AccessToken,
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Scopes embedded in the token.
	pub scope: ScopeSet,
	/// Nonce embedded as `jti`.
	pub token_id: TokenId,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}
impl IssuedToken {
	/// Builds the registry entry for a freshly encoded token.
	pub fn new(token: AccessToken, claims: &AccessTokenClaims) -> Self {
		Self {
			token,
			client_id: claims.client_id.clone(),
			scope: claims.scope.clone(),
			token_id: claims.token_id.clone(),
			issued_at: claims.issued_at,
			expires_at: claims.expires_at,
		}
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.issued_at {
			return TokenStatus::Pending;
		}
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token is active at the provided instant.
	pub fn is_active_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Active)
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}
}
impl Debug for IssuedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IssuedToken")
			.field("token", &self.token)
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.field("token_id", &self.token_id)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
