//! Error-to-response mapping.
//!
//! Response bodies only ever carry an RFC 6749/6750 error code. Whether a client ID exists, or
//! why a token was rejected, stays in the logs.

// std
use std::any::Any;
// crates.io
use axum::{
	Json,
	http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
	response::{IntoResponse, Response},
};
// self
use crate::_prelude::*;

const BASIC_CHALLENGE: &str = r#"Basic realm="oauth2-issuer""#;
const BEARER_CHALLENGE: &str = r#"Bearer realm="oauth2-issuer""#;
const INVALID_BEARER_CHALLENGE: &str = r#"Bearer realm="oauth2-issuer", error="invalid_token""#;

/// JSON error body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// OAuth 2.0 error code.
	pub error: String,
}

/// Token endpoint failure.
#[derive(Debug)]
pub(super) struct TokenRejection(pub(super) Error);
impl IntoResponse for TokenRejection {
	fn into_response(self) -> Response {
		let (status, code, challenge) = match &self.0 {
			Error::Unauthorized(_) | Error::MissingClientCredentials =>
				(StatusCode::UNAUTHORIZED, "invalid_client", Some(BASIC_CHALLENGE)),
			Error::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request", None),
			Error::UnsupportedGrantType { .. } =>
				(StatusCode::BAD_REQUEST, "unsupported_grant_type", None),
			Error::InvalidScope(_) => (StatusCode::BAD_REQUEST, "invalid_scope", None),
			other => return internal(other),
		};

		error_response(status, code, challenge)
	}
}

/// Protected-route failure.
#[derive(Debug)]
pub(super) struct BearerRejection(pub(super) Error);
impl IntoResponse for BearerRejection {
	fn into_response(self) -> Response {
		match &self.0 {
			Error::MissingToken =>
				error_response(StatusCode::UNAUTHORIZED, "invalid_token", Some(BEARER_CHALLENGE)),
			Error::Unauthorized(_) => error_response(
				StatusCode::UNAUTHORIZED,
				"invalid_token",
				Some(INVALID_BEARER_CHALLENGE),
			),
			other => internal(other),
		}
	}
}

/// Converts a caught panic into a generic 500.
pub(super) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
	let message = panic
		.downcast_ref::<&str>()
		.copied()
		.or_else(|| panic.downcast_ref::<String>().map(String::as_str))
		.unwrap_or("<non-string panic>");

	tracing::warn!(panic = message, "request handler panicked");

	error_response(StatusCode::INTERNAL_SERVER_ERROR, "server_error", None)
}

fn internal(error: &Error) -> Response {
	tracing::error!(error = %error, "request failed");

	error_response(StatusCode::INTERNAL_SERVER_ERROR, "server_error", None)
}

fn error_response(status: StatusCode, code: &str, challenge: Option<&'static str>) -> Response {
	let mut response = (status, Json(ErrorBody { error: code.to_owned() })).into_response();

	if let Some(challenge) = challenge {
		response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
	}

	response
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::AuthFailure;

	#[test]
	fn unknown_client_and_wrong_secret_look_identical() {
		let unknown = TokenRejection(Error::Unauthorized(AuthFailure::UnknownClient)).into_response();
		let mismatch =
			TokenRejection(Error::Unauthorized(AuthFailure::SecretMismatch)).into_response();

		assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(unknown.status(), mismatch.status());
		assert_eq!(unknown.headers().get(WWW_AUTHENTICATE), mismatch.headers().get(WWW_AUTHENTICATE));
	}

	#[test]
	fn client_errors_are_not_server_errors() {
		let unsupported =
			TokenRejection(Error::UnsupportedGrantType { grant: "authorization_code".into() })
				.into_response();
		let generation = TokenRejection(Error::TokenGeneration { attempts: 3 }).into_response();
		let lifetime =
			TokenRejection(Error::TokenLifetimeOutOfRange { ttl: Duration::MAX }).into_response();

		assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
		assert_eq!(generation.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(lifetime.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn bearer_rejections_carry_a_challenge() {
		let missing = BearerRejection(Error::MissingToken).into_response();
		let rejected = BearerRejection(Error::Unauthorized(AuthFailure::RejectedToken)).into_response();

		assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			rejected.headers().get(WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
			Some(INVALID_BEARER_CHALLENGE)
		);
	}
}
