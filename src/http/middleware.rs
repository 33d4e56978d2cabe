// std
use std::time::Instant;
// crates.io
use axum::{
	extract::{Request, State},
	http::{HeaderValue, header::AUTHORIZATION},
	middleware::Next,
	response::{IntoResponse, Response},
};
// self
use crate::{
	http::{AppState, response::BearerRejection},
	obs::{RequestContext, RequestId},
};

/// Header carrying the request correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns a [`RequestContext`] to every request and echoes its ID on the response.
///
/// A well-formed inbound `X-Request-ID` is reused; anything else is replaced by a fresh ID.
pub(super) async fn track_requests(mut req: Request, next: Next) -> Response {
	let request_id = req
		.headers()
		.get(REQUEST_ID_HEADER)
		.and_then(|value| value.to_str().ok())
		.and_then(RequestId::parse)
		.unwrap_or_else(RequestId::generate);
	let header = HeaderValue::from_str(request_id.as_str()).ok();

	req.extensions_mut().insert(RequestContext::new(request_id));

	let mut response = next.run(req).await;

	if let Some(header) = header {
		response.headers_mut().insert(REQUEST_ID_HEADER, header);
	}

	response
}

/// Logs one line per request with its status and elapsed time.
pub(super) async fn log_requests(req: Request, next: Next) -> Response {
	let started = Instant::now();
	let method = req.method().clone();
	let uri = req.uri().path().to_owned();
	let request_id = req.extensions().get::<RequestContext>().map(|ctx| ctx.request_id.clone());
	let response = next.run(req).await;
	let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.;

	tracing::info!(
		request_id = request_id.as_ref().map(RequestId::as_str).unwrap_or("-"),
		%method,
		uri = %uri,
		status = response.status().as_u16(),
		elapsed_ms,
		"request completed"
	);

	response
}

/// Rejects requests without a valid bearer token; on success the resolved
/// [`Authenticated`](crate::gate::Authenticated) identity is attached as an extension.
pub(super) async fn require_bearer(
	State(state): State<AppState>,
	mut req: Request,
	next: Next,
) -> Response {
	let ctx =
		req.extensions().get::<RequestContext>().cloned().unwrap_or_else(RequestContext::generate);
	let authorization = req.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok());
	let verdict = state.validator.validate(&ctx, authorization).await;

	match verdict {
		Ok(identity) => {
			req.extensions_mut().insert(identity);

			next.run(req).await
		},
		Err(e) => BearerRejection(e).into_response(),
	}
}
