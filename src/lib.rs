//! OAuth 2.0 resource-owner resolution—turn a bearer token into a normalized user profile with
//! schema-aware projection, scope-tolerant email lookup, and transport-aware error classification.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod classify;
pub mod error;
pub mod fields;
pub mod http;
pub mod obs;
pub mod owner;
pub mod provider;
pub mod resolve;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	pub use oauth2::AccessToken;
	// self
	use crate::{http::ReqwestHttpClient, provider::ProviderDescriptor, resolve::Resolver};

	/// Resolver type alias used by reqwest-backed integration tests.
	pub type ReqwestTestResolver = Resolver<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Resolver`] backed by the reqwest transport used across integration tests.
	pub fn build_reqwest_test_resolver(descriptor: ProviderDescriptor) -> ReqwestTestResolver {
		Resolver::with_http_client(descriptor, test_reqwest_http_client())
	}

	/// Wraps a raw string into the bearer token type consumed by the resolver.
	pub fn test_access_token(raw: &str) -> AccessToken {
		AccessToken::new(raw.to_owned())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))]
use {color_eyre as _, httpmock as _, identity_resolver as _, tokio as _};
