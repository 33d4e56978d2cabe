//! Issuer-level error types shared across flows, the bearer gate, stores, and configuration.

// self
use crate::_prelude::*;

/// Issuer-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Variants are deliberately coarse toward callers: the transport maps each kind onto an HTTP
/// status and a generic message, while [`AuthFailure`] keeps the precise reason for logs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Token encoding failure.
	#[error(transparent)]
	Codec(#[from] crate::codec::CodecError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Credentials or bearer token were rejected.
	#[error("Unauthorized: {0}.")]
	Unauthorized(AuthFailure),
	/// No client credentials accompanied a token request.
	#[error("Client credentials are missing.")]
	MissingClientCredentials,
	/// Authorization header absent or not of the form `Bearer <token>`.
	#[error("Bearer token is missing.")]
	MissingToken,
	/// The token request is malformed.
	#[error("Token request is invalid: {reason}.")]
	InvalidRequest {
		/// Short description of what is wrong with the request.
		reason: &'static str,
	},
	/// The requested grant type is not `client_credentials`.
	#[error("Grant type `{grant}` is not supported.")]
	UnsupportedGrantType {
		/// Grant type string as presented.
		grant: String,
	},
	/// The `scope` parameter is malformed.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Every minting attempt collided with an existing token.
	#[error("Token generation failed after {attempts} attempts.")]
	TokenGeneration {
		/// Number of attempts made.
		attempts: usize,
	},
	/// The configured lifetime pushes the expiry instant out of the representable range.
	#[error("Token lifetime of {ttl} cannot be applied to the issue time.")]
	TokenLifetimeOutOfRange {
		/// Lifetime the issuer was built with.
		ttl: Duration,
	},
}

/// Internal reason behind [`Error::Unauthorized`]; never sent to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFailure {
	/// No client is registered under the presented identifier.
	UnknownClient,
	/// The presented secret does not match.
	SecretMismatch,
	/// The presented credentials could not be decoded.
	MalformedCredentials,
	/// The token failed structural or signature checks.
	RejectedToken,
	/// The token verifies but is absent from the registry (revoked or never issued here).
	UnknownToken,
	/// The token's registry record is not active.
	ExpiredToken,
}
impl AuthFailure {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthFailure::UnknownClient => "unknown client",
			AuthFailure::SecretMismatch => "secret mismatch",
			AuthFailure::MalformedCredentials => "malformed credentials",
			AuthFailure::RejectedToken => "rejected token",
			AuthFailure::UnknownToken => "unknown token",
			AuthFailure::ExpiredToken => "expired token",
		}
	}
}
impl Display for AuthFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and startup failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The configuration file could not be read.
	#[error("Configuration file `{path}` could not be read.")]
	Read {
		/// Path that failed.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The configuration file is not valid YAML for [`crate::config::Config`].
	#[error("Configuration is invalid at `{}`.", .source.path())]
	Parse {
		/// Parsing failure annotated with the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_yaml::Error>,
	},
	/// No signing key was configured.
	#[error("A token signing key is required.")]
	MissingSigningKey,
	/// The token TTL is zero or unreasonably long.
	#[error("Token TTL must be between one second and {max_secs} seconds.")]
	TtlOutOfRange {
		/// Largest accepted TTL.
		max_secs: u64,
	},
	/// The HTTP timeout must be at least one second.
	#[error("HTTP timeout must be at least one second.")]
	NonPositiveTimeout,
	/// The reaper interval must be at least one second.
	#[error("Reaper interval must be at least one second.")]
	NonPositiveReapInterval,
	/// A configured client is invalid.
	#[error("Configured client `{id}` is invalid.")]
	InvalidClient {
		/// Identifier as configured.
		id: String,
		/// Validation failure.
		#[source]
		source: crate::auth::IdentifierError,
	},
	/// The same client identifier is configured twice.
	#[error("Client `{id}` is configured more than once.")]
	DuplicateClient {
		/// Duplicated identifier.
		id: String,
	},
	/// The log filter directive could not be parsed.
	#[error("Log level `{level}` is not a valid filter directive.")]
	LogFilter {
		/// Directive as configured.
		level: String,
		/// Parser failure.
		#[source]
		source: tracing_subscriber::filter::ParseError,
	},
	/// A global tracing subscriber was already installed.
	#[error("Tracing subscriber could not be installed.")]
	TracingInit(#[from] tracing_subscriber::util::TryInitError),
}
