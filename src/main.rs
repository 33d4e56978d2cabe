//! `oauth2-issuer` server binary.

// std
use std::sync::Arc;
// crates.io
use clap::Parser;
use tokio::net::TcpListener;
// self
use oauth2_issuer::{
	config::{Cli, Config},
	flows::Issuer,
	http::{self, AppState},
	obs,
	store::{ClientStore, MemoryClientStore, MemoryTokenStore, Reaper},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();
	let config = Config::load(&cli)?;

	obs::init_tracing(&config.log)?;

	tracing::info!(version = env!("CARGO_PKG_VERSION"), addr = %config.http.addr, "starting");

	let clients = Arc::new(MemoryClientStore::default());

	for client in config.clients()? {
		tracing::info!(client_id = %client.id, "registering client");
		clients.register_new(client).await?;
	}

	let tokens = Arc::new(MemoryTokenStore::default());
	let issuer = Issuer::new(clients, tokens.clone(), &config.signing_key()?, config.ttl());
	let reaper = Reaper::spawn(tokens, issuer.clock().clone(), config.reap_interval());
	let router = http::router(AppState::new(issuer), config.timeout());
	let listener = TcpListener::bind(config.http.addr).await?;

	http::serve(listener, router, http::shutdown_signal()).await?;
	reaper.shutdown().await;

	Ok(())
}
