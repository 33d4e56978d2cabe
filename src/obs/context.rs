//! Typed request-scoped context threaded from the transport into issuance and validation.

// crates.io
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Correlation identifier echoed in the `X-Request-ID` header and every log line of a request.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);
impl RequestId {
	const MAX_LEN: usize = 128;

	/// Generates a fresh UUID v4 identifier.
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	/// Accepts an inbound identifier made of ASCII alphanumerics, `-`, `_`, or `.`.
	pub fn parse(raw: &str) -> Option<Self> {
		let acceptable = !raw.is_empty()
			&& raw.len() <= Self::MAX_LEN
			&& raw.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));

		acceptable.then(|| Self(raw.to_owned()))
	}

	/// Borrows the identifier.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Debug for RequestId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "RequestId({})", self.0)
	}
}
impl Display for RequestId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Per-request state passed by reference through the request-handling call chain.
#[derive(Clone, Debug)]
pub struct RequestContext {
	/// Correlation identifier for this request.
	pub request_id: RequestId,
}
impl RequestContext {
	/// Creates a context for an already-known request identifier.
	pub fn new(request_id: RequestId) -> Self {
		Self { request_id }
	}

	/// Creates a context with a freshly generated identifier, for calls made outside HTTP.
	pub fn generate() -> Self {
		Self::new(RequestId::generate())
	}
}
