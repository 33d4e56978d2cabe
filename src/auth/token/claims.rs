//! Claims embedded in every signed access token.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TokenId},
};

/// Who a token was issued to and when it stops being valid.
///
/// Field names follow the registered JWT claim names (`sub`, `iat`, `exp`, `jti`); instants are
/// whole Unix seconds so a decoded token compares equal to the claims it was minted from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
	/// Client the token was issued to.
	#[serde(rename = "sub")]
	pub client_id: ClientId,
	/// Granted scopes; omitted from the payload when empty.
	#[serde(default, skip_serializing_if = "ScopeSet::is_empty")]
	pub scope: ScopeSet,
	/// Issued-at instant.
	#[serde(rename = "iat", with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	#[serde(rename = "exp", with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Per-token nonce.
	#[serde(rename = "jti")]
	pub token_id: TokenId,
}
impl AccessTokenClaims {
	/// Mints claims for `client_id` valid from `now` for `ttl`, with a fresh random token ID.
	///
	/// `now` is truncated to whole seconds. Returns `None` when `issued_at + ttl` falls outside the
	/// representable date range.
	pub fn mint(
		client_id: ClientId,
		scope: ScopeSet,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Option<Self> {
		let issued_at = now.replace_nanosecond(0).ok()?;
		let expires_at = issued_at.checked_add(ttl)?;

		Some(Self { client_id, scope, issued_at, expires_at, token_id: TokenId::random() })
	}

	/// Returns `true` once `instant` reaches the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
