// crates.io
use axum::{
	Extension, Form, Json,
	extract::{
		Query, State,
		rejection::{FormRejection, QueryRejection},
	},
	http::{
		HeaderMap, HeaderValue,
		header::{AUTHORIZATION, CACHE_CONTROL, PRAGMA},
	},
	response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	error::AuthFailure,
	flows::TokenRequest,
	gate::Authenticated,
	http::{AppState, response::TokenRejection},
	obs::RequestContext,
};

/// Token endpoint parameters; each may arrive in the query string or the form body.
#[derive(Default, Deserialize)]
pub(super) struct TokenParams {
	grant_type: Option<String>,
	scope: Option<String>,
	client_id: Option<String>,
	client_secret: Option<String>,
}
impl TokenParams {
	fn merge(self, body: Self) -> Self {
		Self {
			grant_type: body.grant_type.or(self.grant_type),
			scope: body.scope.or(self.scope),
			client_id: body.client_id.or(self.client_id),
			client_secret: body.client_secret.or(self.client_secret),
		}
	}
}

pub(super) async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn token(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	headers: HeaderMap,
	query: Result<Query<TokenParams>, QueryRejection>,
	form: Result<Form<TokenParams>, FormRejection>,
) -> Response {
	let request = match token_request(&headers, query, form) {
		Ok(request) => request,
		Err(e) => {
			tracing::debug!(request_id = %ctx.request_id, error = %e, "token request rejected");

			return TokenRejection(e).into_response();
		},
	};

	match state.issuer.issue(&ctx, request).await {
		Ok(body) => {
			let mut response = Json(body).into_response();
			let headers = response.headers_mut();

			headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
			headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

			response
		},
		Err(e) => TokenRejection(e).into_response(),
	}
}

pub(super) async fn secure(Extension(identity): Extension<Authenticated>) -> Json<serde_json::Value> {
	Json(serde_json::json!({
		"message": "You have access!",
		"client_id": identity.client_id.as_str(),
	}))
}

fn token_request(
	headers: &HeaderMap,
	query: Result<Query<TokenParams>, QueryRejection>,
	form: Result<Form<TokenParams>, FormRejection>,
) -> Result<TokenRequest> {
	let query = query
		.map(|Query(params)| params)
		.map_err(|_| Error::InvalidRequest { reason: "query string is malformed" })?;
	let body = match form {
		Ok(Form(params)) => params,
		Err(FormRejection::InvalidFormContentType(_)) => TokenParams::default(),
		Err(_) => return Err(Error::InvalidRequest { reason: "form body is malformed" }),
	};
	let params = query.merge(body);
	let credentials = match basic_credentials(headers) {
		Some(credentials) => credentials?,
		None => match (params.client_id, params.client_secret) {
			(Some(id), Some(secret)) => ClientCredentials::new(id, secret),
			_ => return Err(Error::MissingClientCredentials),
		},
	};

	Ok(TokenRequest { grant_type: params.grant_type, credentials, scope: params.scope })
}

/// Reads `Authorization: Basic` credentials; `None` when the header is absent or uses another
/// scheme.
fn basic_credentials(headers: &HeaderMap) -> Option<Result<ClientCredentials>> {
	let malformed = || Error::Unauthorized(AuthFailure::MalformedCredentials);
	let value = headers.get(AUTHORIZATION)?;
	let Ok(value) = value.to_str() else {
		return Some(Err(malformed()));
	};
	let (scheme, encoded) = value.trim().split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("basic") {
		return None;
	}

	let credentials = STANDARD
		.decode(encoded.trim())
		.ok()
		.and_then(|bytes| String::from_utf8(bytes).ok())
		.and_then(|decoded| {
			decoded.split_once(':').map(|(id, secret)| ClientCredentials::new(id, secret))
		})
		.ok_or_else(malformed);

	Some(credentials)
}
