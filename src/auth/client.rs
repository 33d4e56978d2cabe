//! Registered client identities and their secrets.

// crates.io
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, auth::ClientId};

/// Redacted client secret with constant-time verification.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Compares `presented` against the stored secret in constant time.
	///
	/// Both sides are reduced to SHA-256 digests first so neither the content nor the length of
	/// the stored secret influences timing.
	pub fn verify(&self, presented: &str) -> bool {
		let expected = Sha256::digest(self.0.as_bytes());
		let actual = Sha256::digest(presented.as_bytes());

		expected.as_slice().ct_eq(actual.as_slice()).into()
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
	}
}
impl Display for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Identity of a machine caller, registered at startup and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
	/// Unique client identifier.
	pub id: ClientId,
	/// Shared secret presented on the token endpoint.
	pub secret: ClientSecret,
}
impl Client {
	/// Creates a client from an identifier and secret.
	pub fn new(id: ClientId, secret: impl Into<String>) -> Self {
		Self { id, secret: ClientSecret::new(secret) }
	}
}

/// Credentials a caller presented on the token endpoint, as extracted by the transport.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
	/// Raw client identifier; unvalidated until looked up.
	pub client_id: String,
	/// Presented secret.
	pub client_secret: ClientSecret,
}
impl ClientCredentials {
	/// Bundles a presented identifier and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: ClientSecret::new(client_secret) }
	}
}
