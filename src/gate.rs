//! Bearer validation for protected routes.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet},
	clock::{Clock, SystemClock},
	codec::{AccessTokenCodec, SigningKey},
	error::AuthFailure,
	flows::Issuer,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, RequestContext},
	store::TokenStore,
};

/// Identity resolved from a valid bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Scopes granted to the token.
	pub scope: ScopeSet,
	/// Expiry of the presented token.
	pub expires_at: OffsetDateTime,
}

/// Verifies `Authorization: Bearer` credentials against the codec and the token registry.
///
/// Every rejection reason collapses into [`Error::Unauthorized`] or [`Error::MissingToken`];
/// the precise [`AuthFailure`] is kept for logs only.
#[derive(Clone)]
pub struct BearerValidator {
	tokens: Arc<dyn TokenStore>,
	codec: AccessTokenCodec,
	clock: Arc<dyn Clock>,
}
impl BearerValidator {
	/// Creates a validator over `tokens` that verifies signatures with `key`.
	pub fn new(tokens: Arc<dyn TokenStore>, key: &SigningKey) -> Self {
		Self { tokens, codec: AccessTokenCodec::new(key), clock: Arc::new(SystemClock) }
	}

	/// Creates a validator sharing the issuer's registry, codec, and clock.
	pub fn from_issuer(issuer: &Issuer) -> Self {
		Self {
			tokens: issuer.tokens().clone(),
			codec: issuer.codec().clone(),
			clock: issuer.clock().clone(),
		}
	}

	/// Replaces the clock used for expiry checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Validates a raw `Authorization` header value.
	pub async fn validate(
		&self,
		ctx: &RequestContext,
		authorization: Option<&str>,
	) -> Result<Authenticated> {
		const KIND: FlowKind = FlowKind::Bearer;

		let span = FlowSpan::new(KIND, "validate", ctx);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.validate_inner(authorization)).await;

		if let Err(e) = &result {
			tracing::debug!(request_id = %ctx.request_id, error = %e, "bearer token rejected");
		}

		obs::record_flow_result(KIND, &result);

		result
	}

	async fn validate_inner(&self, authorization: Option<&str>) -> Result<Authenticated> {
		let token = authorization.and_then(bearer_token).ok_or(Error::MissingToken)?;
		// Nothing in the claims is read before the signature verifies.
		let claims =
			self.codec.decode(token).map_err(|_| Error::Unauthorized(AuthFailure::RejectedToken))?;
		let record = self
			.tokens
			.get(token)
			.await?
			.ok_or(Error::Unauthorized(AuthFailure::UnknownToken))?;

		let now = self.clock.now();

		if claims.is_expired_at(now) || !record.is_active_at(now) {
			return Err(Error::Unauthorized(AuthFailure::ExpiredToken));
		}

		Ok(Authenticated {
			client_id: record.client_id,
			scope: record.scope,
			expires_at: record.expires_at,
		})
	}
}
impl Debug for BearerValidator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerValidator").field("codec", &self.codec).finish_non_exhaustive()
	}
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; an empty token or embedded whitespace yields `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
	let (scheme, token) = header.trim().split_once(' ')?;
	let token = token.trim_start();

	if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(char::is_whitespace)
	{
		return None;
	}

	Some(token)
}
