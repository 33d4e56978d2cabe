//! HTTP transport: routes, middleware, and server lifecycle.
//!
//! The router exposes:
//!
//! - `GET /health` for liveness checks.
//! - `POST /token` for the client credentials grant. Parameters are read from the query string
//!   or an `application/x-www-form-urlencoded` body; credentials from HTTP Basic or the
//!   `client_id`/`client_secret` parameters.
//! - `GET|POST /secure`, a protected resource behind the bearer gate.
//!
//! Every response carries an `X-Request-ID` header. Panics inside handlers become a generic 500
//! and requests exceeding the configured timeout become a 408.

mod handlers;
mod middleware;
mod response;

pub use middleware::REQUEST_ID_HEADER;
pub use response::ErrorBody;

// crates.io
use axum::{
	Router,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer};
// self
use crate::{_prelude::*, flows::Issuer, gate::BearerValidator};

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Token issuer backing `/token`.
	pub issuer: Arc<Issuer>,
	/// Bearer gate guarding protected routes.
	pub validator: Arc<BearerValidator>,
}
impl AppState {
	/// Builds state around an issuer, deriving the bearer gate from it.
	pub fn new(issuer: Issuer) -> Self {
		let validator = BearerValidator::from_issuer(&issuer);

		Self { issuer: Arc::new(issuer), validator: Arc::new(validator) }
	}
}

/// Builds the application router with every middleware layer applied.
pub fn router(state: AppState, timeout: std::time::Duration) -> Router {
	let protected = Router::new()
		.route("/secure", get(handlers::secure).post(handlers::secure))
		.route_layer(axum::middleware::from_fn_with_state(
			state.clone(),
			middleware::require_bearer,
		));
	let routes = Router::new()
		.route("/health", get(handlers::health))
		.route("/token", post(handlers::token))
		.merge(protected)
		.with_state(state);

	layered(routes, timeout)
}

/// Runs the server on `listener` until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
	F: 'static + Future<Output = ()> + Send,
{
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "listening");
	}

	axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;

	tracing::info!("server stopped");

	Ok(())
}

/// Resolves on Ctrl-C or, on Unix, `SIGTERM`.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::warn!(error = %e, "failed to listen for ctrl-c");
			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			},
			Err(e) => {
				tracing::warn!(error = %e, "failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("shutdown signal received");
}

// Outermost first: the request ID is assigned before anything can fail.
#[allow(deprecated)]
fn layered(routes: Router, timeout: std::time::Duration) -> Router {
	routes.layer(
		ServiceBuilder::new()
			.layer(axum::middleware::from_fn(middleware::track_requests))
			.layer(axum::middleware::from_fn(middleware::log_requests))
			.layer(CatchPanicLayer::custom(response::panic_response))
			.layer(TimeoutLayer::new(timeout)),
	)
}

#[cfg(test)]
mod tests {
	// crates.io
	use axum::{
		body::{self, Body},
		http::{Request, StatusCode},
	};
	use tower::ServiceExt;
	// self
	use super::*;

	async fn boom() -> &'static str {
		panic!("handler defect")
	}

	async fn slow() -> &'static str {
		tokio::time::sleep(std::time::Duration::from_secs(5)).await;

		"late"
	}

	fn test_router() -> Router {
		let routes = Router::new()
			.route("/ok", get(|| async { "ok" }))
			.route("/boom", get(boom))
			.route("/slow", get(slow));

		layered(routes, std::time::Duration::from_millis(50))
	}

	#[tokio::test]
	async fn panics_become_generic_500() {
		let response = test_router()
			.oneshot(Request::get("/boom").body(Body::empty()).expect("Request should build."))
			.await
			.expect("Router should respond.");

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.headers().contains_key(REQUEST_ID_HEADER));

		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Body should be readable.");
		let json: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Body should be JSON.");

		assert_eq!(json, serde_json::json!({ "error": "server_error" }));
	}

	#[tokio::test]
	async fn slow_handlers_time_out() {
		let response = test_router()
			.oneshot(Request::get("/slow").body(Body::empty()).expect("Request should build."))
			.await
			.expect("Router should respond.");

		assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
	}

	#[tokio::test]
	async fn inbound_request_id_is_echoed() {
		let response = test_router()
			.oneshot(
				Request::get("/ok")
					.header(REQUEST_ID_HEADER, "upstream-7")
					.body(Body::empty())
					.expect("Request should build."),
			)
			.await
			.expect("Router should respond.");

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
			Some("upstream-7")
		);
	}
}
