//! Token issuance orchestrated by the [`Issuer`].
//!
//! The issuer owns references to both registries, the token codec, and the configured TTL. It
//! keeps no per-request state: every call authenticates the client, resolves the grant, and
//! dispatches to the grant-specific minting routine.

mod client_credentials;

// std
use std::sync::LazyLock;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, ClientId, ClientSecret, ScopeSet},
	clock::{Clock, SystemClock},
	codec::{AccessTokenCodec, SigningKey},
	error::AuthFailure,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, RequestContext},
	store::{ClientStore, TokenStore},
};

/// Grant types this issuer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantType {
	/// RFC 6749 §4.4 client credentials grant.
	ClientCredentials,
}
impl GrantType {
	/// Returns the wire value used in `grant_type`.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"client_credentials" => Ok(GrantType::ClientCredentials),
			other => Err(Error::UnsupportedGrantType { grant: other.to_owned() }),
		}
	}
}

/// Token request as extracted by the transport.
#[derive(Clone, Debug)]
pub struct TokenRequest {
	/// Raw `grant_type` parameter, if present.
	pub grant_type: Option<String>,
	/// Presented client credentials.
	pub credentials: ClientCredentials,
	/// Raw `scope` parameter, if present.
	pub scope: Option<String>,
}
impl TokenRequest {
	/// Builds a `client_credentials` request with no scope.
	pub fn client_credentials(credentials: ClientCredentials) -> Self {
		Self {
			grant_type: Some(GrantType::ClientCredentials.as_str().into()),
			credentials,
			scope: None,
		}
	}

	/// Attaches a raw space-delimited scope parameter.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}
}

/// Successful token response body (RFC 6749 §5.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
	/// Signed access token.
	pub access_token: String,
	/// Always `Bearer`.
	pub token_type: &'static str,
	/// Lifetime of the token in seconds.
	pub expires_in: u64,
	/// Granted scopes, omitted when none were requested.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
}

/// Issues access tokens to registered clients.
#[derive(Clone)]
pub struct Issuer {
	clients: Arc<dyn ClientStore>,
	tokens: Arc<dyn TokenStore>,
	codec: AccessTokenCodec,
	ttl: Duration,
	clock: Arc<dyn Clock>,
}
impl Issuer {
	/// Upper bound on minting attempts when a fresh token collides with a stored one.
	pub const MAX_MINT_ATTEMPTS: usize = 3;
	/// Token type reported in every successful response.
	pub const TOKEN_TYPE: &'static str = "Bearer";

	/// Creates an issuer over the given registries, signing key, and token lifetime.
	pub fn new(
		clients: Arc<dyn ClientStore>,
		tokens: Arc<dyn TokenStore>,
		key: &SigningKey,
		ttl: Duration,
	) -> Self {
		Self {
			clients,
			tokens,
			codec: AccessTokenCodec::new(key),
			ttl,
			clock: Arc::new(SystemClock),
		}
	}

	/// Replaces the clock used to stamp `iat`/`exp`.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Token registry shared with the bearer gate.
	pub fn tokens(&self) -> &Arc<dyn TokenStore> {
		&self.tokens
	}

	/// Codec used to sign tokens.
	pub fn codec(&self) -> &AccessTokenCodec {
		&self.codec
	}

	/// Clock used to stamp tokens.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Configured token lifetime.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Handles one token request.
	///
	/// Credentials are checked before the grant type so an unauthenticated caller learns nothing
	/// about which grants are supported.
	pub async fn issue(&self, ctx: &RequestContext, request: TokenRequest) -> Result<TokenResponse> {
		const KIND: FlowKind = FlowKind::Token;

		let span = FlowSpan::new(KIND, "issue", ctx);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client_id = self.authenticate(&request.credentials).await?;
				let grant = request
					.grant_type
					.as_deref()
					.ok_or(Error::InvalidRequest { reason: "grant_type is required" })?
					.parse::<GrantType>()?;
				let scope = match request.scope.as_deref() {
					Some(raw) => raw.parse::<ScopeSet>()?,
					None => ScopeSet::default(),
				};

				match grant {
					GrantType::ClientCredentials => self.client_credentials(client_id, scope).await,
				}
			})
			.await;

		match &result {
			Ok(_) => tracing::info!(request_id = %ctx.request_id, "access token issued"),
			Err(e) => tracing::debug!(request_id = %ctx.request_id, error = %e, "token request rejected"),
		}

		obs::record_flow_result(KIND, &result);

		result
	}

	async fn authenticate(&self, credentials: &ClientCredentials) -> Result<ClientId> {
		let Some(client) = self.clients.lookup(&credentials.client_id).await? else {
			// Burn a comparison so unknown IDs cost the same as wrong secrets.
			let _ = DECOY_SECRET.verify(credentials.client_secret.expose());

			return Err(Error::Unauthorized(AuthFailure::UnknownClient));
		};

		if !client.secret.verify(credentials.client_secret.expose()) {
			return Err(Error::Unauthorized(AuthFailure::SecretMismatch));
		}

		Ok(client.id)
	}
}
impl Debug for Issuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issuer")
			.field("codec", &self.codec)
			.field("ttl", &self.ttl)
			.finish_non_exhaustive()
	}
}

static DECOY_SECRET: LazyLock<ClientSecret> = LazyLock::new(|| ClientSecret::new("decoy"));
