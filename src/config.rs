//! Runtime configuration.
//!
//! Values resolve from built-in defaults, then an optional YAML file, then command-line flags or
//! their `OAUTH2_ISSUER_*` environment variables. Durations are whole seconds.
//!
//! ```yaml
//! http:
//!   addr: 0.0.0.0:3000
//!   timeout_secs: 10
//! token:
//!   signing_key: change-me
//!   ttl_secs: 3600
//!   reap_interval_secs: 60
//! log:
//!   level: info
//!   json: false
//! clients:
//!   - id: acme
//!     secret: s3cr3t
//! ```

// std
use std::{collections::HashSet, net::SocketAddr, path::PathBuf};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::{Client, ClientId},
	codec::SigningKey,
	error::ConfigError,
};

/// Fully resolved configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// HTTP listener settings.
	pub http: HttpConfig,
	/// Token issuance settings.
	pub token: TokenConfig,
	/// Logging settings.
	pub log: LogConfig,
	/// Clients registered at startup.
	pub clients: Vec<ClientConfig>,
}
impl Config {
	/// Longest accepted token lifetime (one year).
	pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;
	const DEV_CLIENT_ID: &'static str = "client_id";
	const DEV_CLIENT_SECRET: &'static str = "client_secret";

	/// Parses YAML, reporting the path of the first offending field on failure.
	pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
		let deserializer = serde_yaml::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(deserializer).map_err(|source| ConfigError::Parse { source })
	}

	/// Reads and parses a YAML file.
	pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

		Self::from_yaml_str(&raw)
	}

	/// Resolves the configuration for `cli` and validates it.
	pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
		let mut config = match &cli.config {
			Some(path) => Self::from_path(path)?,
			None => Self::default(),
		};

		config.apply_cli(cli);
		config.validate()?;

		Ok(config)
	}

	/// Checks every invariant the server relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.token.signing_key.is_empty() {
			return Err(ConfigError::MissingSigningKey);
		}
		if self.token.ttl_secs == 0 || self.token.ttl_secs > Self::MAX_TTL_SECS {
			return Err(ConfigError::TtlOutOfRange { max_secs: Self::MAX_TTL_SECS });
		}
		if self.http.timeout_secs == 0 {
			return Err(ConfigError::NonPositiveTimeout);
		}
		if self.token.reap_interval_secs == 0 {
			return Err(ConfigError::NonPositiveReapInterval);
		}

		self.configured_clients().map(|_| ())
	}

	/// Token lifetime.
	pub fn ttl(&self) -> Duration {
		Duration::seconds(i64::try_from(self.token.ttl_secs).unwrap_or(i64::MAX))
	}

	/// Per-request timeout.
	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.http.timeout_secs)
	}

	/// Period between reaper sweeps.
	pub fn reap_interval(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.token.reap_interval_secs)
	}

	/// Signing key material.
	pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
		SigningKey::new(self.token.signing_key.as_bytes()).map_err(|_| ConfigError::MissingSigningKey)
	}

	/// Clients to register at startup.
	///
	/// Falls back to a development client (`client_id` / `client_secret`) when none are
	/// configured.
	pub fn clients(&self) -> Result<Vec<Client>, ConfigError> {
		let clients = self.configured_clients()?;

		if !clients.is_empty() {
			return Ok(clients);
		}

		tracing::warn!(
			client_id = Self::DEV_CLIENT_ID,
			"no clients configured; registering the development client"
		);

		let id = ClientId::new(Self::DEV_CLIENT_ID).map_err(|source| ConfigError::InvalidClient {
			id: Self::DEV_CLIENT_ID.into(),
			source,
		})?;

		Ok(vec![Client::new(id, Self::DEV_CLIENT_SECRET)])
	}

	fn configured_clients(&self) -> Result<Vec<Client>, ConfigError> {
		let mut seen = HashSet::new();

		self.clients
			.iter()
			.map(|client| {
				let id = ClientId::new(&client.id)
					.map_err(|source| ConfigError::InvalidClient { id: client.id.clone(), source })?;

				if !seen.insert(id.clone()) {
					return Err(ConfigError::DuplicateClient { id: client.id.clone() });
				}

				Ok(Client::new(id, client.secret.clone()))
			})
			.collect()
	}

	fn apply_cli(&mut self, cli: &Cli) {
		if let Some(addr) = cli.addr {
			self.http.addr = addr;
		}
		if let Some(timeout_secs) = cli.timeout_secs {
			self.http.timeout_secs = timeout_secs;
		}
		if let Some(signing_key) = &cli.signing_key {
			self.token.signing_key = signing_key.clone();
		}
		if let Some(ttl_secs) = cli.token_ttl_secs {
			self.token.ttl_secs = ttl_secs;
		}
		if let Some(reap_interval_secs) = cli.reap_interval_secs {
			self.token.reap_interval_secs = reap_interval_secs;
		}
		if let Some(level) = &cli.log_level {
			self.log.level = level.clone();
		}
		if cli.json_logs {
			self.log.json = true;
		}
	}
}

/// HTTP listener settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
	/// Socket address to bind.
	pub addr: SocketAddr,
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
}
impl Default for HttpConfig {
	fn default() -> Self {
		Self { addr: SocketAddr::from(([0, 0, 0, 0], 3000)), timeout_secs: 10 }
	}
}

/// Token issuance settings.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenConfig {
	/// HMAC signing key; required.
	pub signing_key: String,
	/// Token lifetime in seconds.
	pub ttl_secs: u64,
	/// Seconds between sweeps of expired tokens.
	pub reap_interval_secs: u64,
}
impl Default for TokenConfig {
	fn default() -> Self {
		Self { signing_key: String::new(), ttl_secs: 3600, reap_interval_secs: 60 }
	}
}
impl Debug for TokenConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenConfig")
			.field("signing_key", &"<redacted>")
			.field("ttl_secs", &self.ttl_secs)
			.field("reap_interval_secs", &self.reap_interval_secs)
			.finish()
	}
}

/// Logging settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `tracing` filter directive, e.g. `info` or `oauth2_issuer=debug`.
	pub level: String,
	/// Emit JSON lines instead of compact text.
	pub json: bool,
}
impl Default for LogConfig {
	fn default() -> Self {
		Self { level: "info".into(), json: false }
	}
}

/// A client registered at startup.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Client identifier.
	pub id: String,
	/// Client secret.
	pub secret: String,
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig").field("id", &self.id).field("secret", &"<redacted>").finish()
	}
}

/// Command-line interface.
#[derive(Clone, Default, Parser)]
#[command(name = "oauth2-issuer", version, about = "OAuth 2.0 client credentials token issuer.")]
pub struct Cli {
	/// YAML configuration file.
	#[arg(short, long, env = "OAUTH2_ISSUER_CONFIG")]
	pub config: Option<PathBuf>,
	/// Address to listen on.
	#[arg(long, env = "OAUTH2_ISSUER_ADDR")]
	pub addr: Option<SocketAddr>,
	/// Per-request timeout in seconds.
	#[arg(long, env = "OAUTH2_ISSUER_TIMEOUT_SECS")]
	pub timeout_secs: Option<u64>,
	/// HMAC key used to sign access tokens.
	#[arg(long, env = "OAUTH2_ISSUER_SIGNING_KEY", hide_env_values = true)]
	pub signing_key: Option<String>,
	/// Access token lifetime in seconds.
	#[arg(long, env = "OAUTH2_ISSUER_TOKEN_TTL_SECS")]
	pub token_ttl_secs: Option<u64>,
	/// Seconds between sweeps of expired tokens.
	#[arg(long, env = "OAUTH2_ISSUER_REAP_INTERVAL_SECS")]
	pub reap_interval_secs: Option<u64>,
	/// `tracing` filter directive.
	#[arg(long, env = "OAUTH2_ISSUER_LOG_LEVEL")]
	pub log_level: Option<String>,
	/// Emit JSON logs.
	#[arg(long, env = "OAUTH2_ISSUER_JSON_LOGS")]
	pub json_logs: bool,
}
impl Debug for Cli {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Cli")
			.field("config", &self.config)
			.field("addr", &self.addr)
			.field("signing_key_set", &self.signing_key.is_some())
			.finish_non_exhaustive()
	}
}
