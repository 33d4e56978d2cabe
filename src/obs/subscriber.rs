// crates.io
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::{config::LogConfig, error::ConfigError};

/// Installs the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured level when set. Fails if a global subscriber is already
/// installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), ConfigError> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(&config.level)
			.map_err(|source| ConfigError::LogFilter { level: config.level.clone(), source })?,
	};
	let registry = tracing_subscriber::registry().with(filter);

	if config.json {
		registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
	} else {
		registry.with(tracing_subscriber::fmt::layer().compact()).try_init()?;
	}

	Ok(())
}
