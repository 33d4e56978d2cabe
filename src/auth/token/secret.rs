//! Signed access-token values as handed to clients and keyed in the registry.

// std
use std::fmt::Write as _;
// crates.io
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Compact JWS string minted by the codec.
///
/// The full value is both the bearer credential and the registry key, so formatters print a
/// short SHA-256 fingerprint instead. Two log lines about the same token share a fingerprint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);
impl AccessToken {
	const FINGERPRINT_BYTES: usize = 6;

	/// Wraps an encoded token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Key under which the token registry stores this token.
	pub fn registry_key(&self) -> &str {
		&self.0
	}

	/// Borrows the raw value. Callers must avoid logging this string.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper, yielding the value placed in the token response.
	pub fn into_string(self) -> String {
		self.0
	}

	/// Lowercase hex prefix of the value's SHA-256 digest.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());

		digest[..Self::FINGERPRINT_BYTES].iter().fold(
			String::with_capacity(Self::FINGERPRINT_BYTES * 2),
			|mut hex, byte| {
				let _ = write!(hex, "{byte:02x}");

				hex
			},
		)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&format_args!("sha256:{}", self.fingerprint())).finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "sha256:{}", self.fingerprint())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_print_only_the_fingerprint() {
		let token = AccessToken::new("header.claims.signature");
		let fingerprint = token.fingerprint();

		assert_eq!(fingerprint.len(), 12);
		assert!(fingerprint.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
		assert_eq!(format!("{token}"), format!("sha256:{fingerprint}"));
		assert_eq!(format!("{token:?}"), format!("AccessToken(sha256:{fingerprint})"));
		assert!(!format!("{token:?}").contains("claims"));
	}

	#[test]
	fn fingerprint_tracks_the_value() {
		let token = AccessToken::new("header.claims.signature");

		assert_eq!(token.fingerprint(), token.clone().fingerprint());
		assert_ne!(token.fingerprint(), AccessToken::new("header.claims.signaturf").fingerprint());
		assert_eq!(token.registry_key(), "header.claims.signature");
		assert_eq!(token.into_string(), "header.claims.signature");
	}
}
