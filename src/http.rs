//! Transport primitives for authenticated identity-endpoint requests.
//!
//! The module exposes [`IdentityHttpClient`] alongside [`RawResponse`] so downstream crates
//! can integrate custom HTTP clients without pulling in the crate's default reqwest stack.
//! Transports report status, reason phrase, and body verbatim; classification and JSON
//! parsing stay on the resolver side so every implementation observes identical semantics.

// std
use std::ops::Deref;
// crates.io
use oauth2::AccessToken;
// self
use crate::{_prelude::*, error::ParseError};

/// Boxed future returned by [`IdentityHttpClient`] implementations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing bearer-authenticated GET requests
/// against identity endpoints.
///
/// The trait is the resolver's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a resolver can be shared across tasks without additional
/// wrappers, and the futures they return must be `Send` for the lifetime of the in-flight
/// request so callers can box resolution futures freely.
pub trait IdentityHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Issues a GET against `url` with the bearer token attached.
	fn get<'a>(
		&'a self,
		url: &'a Url,
		token: &'a AccessToken,
	) -> HttpFuture<'a, Result<RawResponse, Self::TransportError>>;
}

/// Raw identity-endpoint response surfaced to the classification layer.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Reason phrase for the status line, when the transport knows one.
	pub reason: Option<String>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Parses the body as JSON. Empty bodies parse as `null`.
	pub fn parse_json(&self) -> Result<Value, ParseError> {
		if self.body.is_empty() {
			return Ok(Value::Null);
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ParseError { source, status: self.status })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Supply a custom [`ReqwestClient`] through [`with_client`](Self::with_client) to control
/// TLS, proxies, or timeouts; the resolver only ever issues GET requests through it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IdentityHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn get<'a>(
		&'a self,
		url: &'a Url,
		token: &'a AccessToken,
	) -> HttpFuture<'a, Result<RawResponse, Self::TransportError>> {
		Box::pin(async move {
			let response = self.0.get(url.clone()).bearer_auth(token.secret()).send().await?;
			let status = response.status();
			let reason = status.canonical_reason().map(str::to_owned);
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status: status.as_u16(), reason, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn response(status: u16, body: &str) -> RawResponse {
		RawResponse { status, reason: None, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn bodies_parse_as_json() {
		let parsed = response(200, "{\"id\":\"abc\"}")
			.parse_json()
			.expect("Valid JSON body should parse successfully.");

		assert_eq!(parsed, json!({ "id": "abc" }));
	}

	#[test]
	fn empty_bodies_parse_as_null() {
		let parsed =
			response(204, "").parse_json().expect("Empty body should parse successfully.");

		assert_eq!(parsed, Value::Null);
	}

	#[test]
	fn malformed_bodies_keep_the_response_status() {
		let err = response(502, "<html>bad gateway</html>")
			.parse_json()
			.expect_err("Malformed JSON must fail to parse.");

		assert_eq!(err.status, 502);
	}
}
