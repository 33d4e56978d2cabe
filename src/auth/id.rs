//! Strongly typed identifiers for registered clients and minted tokens.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}

			/// Borrows the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const TOKEN_ID_BYTES: usize = 16;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (client, token).
		kind: &'static str,
	},
	/// The identifier contains whitespace or control characters.
	#[error("{kind} identifier contains whitespace or control characters.")]
	ContainsWhitespace {
		/// Kind of identifier (client, token).
		kind: &'static str,
	},
	/// The identifier contains `:`, which cannot survive HTTP Basic credentials.
	#[error("{kind} identifier cannot contain ':'.")]
	ContainsColon {
		/// Kind of identifier (client, token).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (client, token).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ClientId, "Identifier of a registered machine client.", "Client" }
def_id! { TokenId, "Per-token unique identifier carried as the `jti` claim.", "Token" }

impl TokenId {
	/// Draws a fresh 128-bit random identifier, URL-safe base64 encoded.
	///
	/// The identifier is the nonce that keeps two tokens minted for the same client within the
	/// same second distinct.
	pub fn random() -> Self {
		let mut bytes = [0_u8; TOKEN_ID_BYTES];

		rand::rng().fill(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains(':') {
		return Err(IdentifierError::ContainsColon { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
