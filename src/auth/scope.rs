//! Scope sets carried inside access-token claims.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scope tokens are restricted to printable ASCII without `"` or `\`.
	#[error("Scope contains characters outside the RFC 6749 scope-token grammar: {scope}.")]
	InvalidCharacter {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized (deduplicated, sorted) set of OAuth scope tokens.
///
/// Serialized as the space-delimited string form used by the `scope` claim and the token
/// response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(BTreeSet<String>);
impl ScopeSet {
	/// Creates a normalized scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut set = BTreeSet::new();

		for scope in scopes {
			let owned: String = scope.into();

			validate_scope(&owned)?;
			set.insert(owned);
		}

		Ok(Self(set))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.contains(scope)
	}

	/// Iterator over scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Space-delimited representation; empty for an empty set.
	pub fn normalized(&self) -> String {
		self.iter().collect::<Vec<_>>().join(" ")
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(|c| c == ' ') {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split(' ').filter(|part| !part.is_empty()))
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.normalized())
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = <String>::deserialize(deserializer)?;

		raw.parse().map_err(DeError::custom)
	}
}

fn validate_scope(scope: &str) -> Result<(), ScopeValidationError> {
	if scope.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	// scope-token = 1*( %x21 / %x23-5B / %x5D-7E )
	if !scope.bytes().all(|b| matches!(b, 0x21 | 0x23..=0x5B | 0x5D..=0x7E)) {
		return Err(ScopeValidationError::InvalidCharacter { scope: scope.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_and_deduplicate() {
		let lhs = ScopeSet::new(["profile", "email", "email"])
			.expect("Left-hand scope set should be valid.");
		let rhs =
			ScopeSet::new(["email", "profile"]).expect("Right-hand scope set should be valid.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.len(), 2);
		assert_eq!(lhs.normalized(), "email profile");
	}

	#[test]
	fn parsing_tolerates_repeated_separators() {
		let scopes = ScopeSet::from_str("api.read  api.write")
			.expect("Scope string should parse successfully.");

		assert!(scopes.contains("api.read"));
		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["api.read", "api.write"]);
		assert!(ScopeSet::from_str("").expect("Empty input is the empty set.").is_empty());
		assert_eq!(ScopeSet::from_str("   "), Err(ScopeValidationError::Empty));
	}

	#[test]
	fn scopes_reject_characters_outside_grammar() {
		assert_eq!(ScopeSet::new([""]), Err(ScopeValidationError::Empty));
		assert!(matches!(
			ScopeSet::new(["contains space"]),
			Err(ScopeValidationError::InvalidCharacter { .. })
		));
		assert!(ScopeSet::from_str("quote\"d").is_err());
		assert!(ScopeSet::from_str("back\\slash").is_err());
		assert!(ScopeSet::from_str("tab\tseparated").is_err());
	}

	#[test]
	fn serde_uses_space_delimited_form() {
		let scopes = ScopeSet::new(["write", "read"]).expect("Scope fixture should be valid.");
		let payload = serde_json::to_string(&scopes).expect("Scopes should serialize.");

		assert_eq!(payload, "\"read write\"");

		let back: ScopeSet = serde_json::from_str(&payload).expect("Scopes should deserialize.");

		assert_eq!(back, scopes);
		assert!(serde_json::from_str::<ScopeSet>("\"bad\\\\scope\"").is_err());
	}
}
