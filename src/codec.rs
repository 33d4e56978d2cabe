//! Signed, self-contained access-token encoding.
//!
//! Tokens are compact JWS values (`header.payload.signature`) signed with HMAC-SHA256 under a
//! shared signing key. The codec only guarantees integrity: claims are released only after the
//! signature verifies, and expiry is left to the caller.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenClaims},
};

/// Errors produced while encoding or decoding access tokens.
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// The signing key was empty.
	#[error("Signing key cannot be empty.")]
	EmptyKey,
	/// The token is not a well-formed compact JWS carrying access-token claims.
	#[error("Access token is malformed.")]
	Malformed,
	/// The signature does not verify under the configured key and algorithm.
	#[error("Access token signature does not verify.")]
	InvalidSignature,
	/// Signing failed.
	#[error("Access token could not be signed.")]
	Encode {
		/// Underlying signer failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Secret HMAC key material supplied once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);
impl SigningKey {
	/// Wraps key bytes; rejects an empty key.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CodecError> {
		let bytes = bytes.into();

		if bytes.is_empty() {
			return Err(CodecError::EmptyKey);
		}

		Ok(Self(bytes))
	}

	/// Returns the raw key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}

/// HS256 encoder/decoder for [`AccessTokenClaims`].
#[derive(Clone)]
pub struct AccessTokenCodec {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
}
impl AccessTokenCodec {
	/// Signature algorithm used for every token.
	pub const ALGORITHM: Algorithm = Algorithm::HS256;
	/// `typ` header value for JWT access tokens (RFC 9068).
	pub const TOKEN_TYPE: &'static str = "at+jwt";

	/// Builds a codec bound to `key`.
	pub fn new(key: &SigningKey) -> Self {
		let mut validation = Validation::new(Self::ALGORITHM);

		// Expiry is enforced against the registry record, not here.
		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.validate_aud = false;
		validation.required_spec_claims.clear();

		Self {
			encoding: EncodingKey::from_secret(key.expose()),
			decoding: DecodingKey::from_secret(key.expose()),
			validation,
		}
	}

	/// Signs `claims` into a compact token.
	pub fn encode(&self, claims: &AccessTokenClaims) -> Result<AccessToken, CodecError> {
		let mut header = Header::new(Self::ALGORITHM);

		header.typ = Some(Self::TOKEN_TYPE.into());

		jsonwebtoken::encode(&header, claims, &self.encoding)
			.map(AccessToken::new)
			.map_err(|source| CodecError::Encode { source })
	}

	/// Verifies `token` and returns its claims.
	///
	/// Structural problems surface as [`CodecError::Malformed`]; a signature or algorithm that
	/// does not match surfaces as [`CodecError::InvalidSignature`]. No claim is inspected
	/// before the signature has been checked.
	pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, CodecError> {
		let mut segments = token.split('.');
		let well_formed = (0..3).all(|_| segments.next().is_some_and(|s| !s.is_empty()))
			&& segments.next().is_none();

		if !well_formed {
			return Err(CodecError::Malformed);
		}

		jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding, &self.validation)
			.map(|data| data.claims)
			.map_err(|e| match e.kind() {
				ErrorKind::InvalidSignature
				| ErrorKind::InvalidAlgorithm
				| ErrorKind::InvalidAlgorithmName => CodecError::InvalidSignature,
				_ => CodecError::Malformed,
			})
	}
}
impl Debug for AccessTokenCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenCodec").field("algorithm", &Self::ALGORITHM).finish()
	}
}
