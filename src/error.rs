//! Resolver-level error types shared across transport, classification, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical resolver error exposed by public APIs.
///
/// A resolution call either returns a fully populated resource owner or exactly one of these
/// variants; partial results never leak out.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity endpoint returned malformed JSON on an otherwise successful response.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Generic identity-provider failure (HTTP 4xx/5xx or an OAuth-style error body).
	#[error("Identity provider rejected the request: {0}")]
	Provider(ProviderFailure),
	/// Provider refused the request because a required scope was not granted.
	#[error("Identity provider denied access: {0}")]
	AccessDenied(ProviderFailure),
}

/// Provider-supplied failure payload carried by [`Error::Provider`] and [`Error::AccessDenied`].
///
/// The payload keeps the parsed response body verbatim so callers can inspect
/// provider-specific diagnostics (`serviceErrorCode` and friends) without re-fetching.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderFailure {
	/// Human-readable message chosen from the response body or the HTTP reason phrase.
	pub message: String,
	/// Status code taken from the body's `status` field, falling back to the HTTP status.
	pub status: u16,
	/// Parsed response body.
	pub body: Value,
}
impl Display for ProviderFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} (status {}).", self.message, self.status)
	}
}

/// Configuration and validation failures raised by the resolver.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Requested profile field list failed validation.
	#[error("Requested profile fields are invalid.")]
	InvalidFieldSelection(#[from] crate::fields::FieldSelectionError),
	/// Descriptor fails its own invariants.
	#[error("Provider descriptor is invalid.")]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Email resolution was requested against a descriptor without an email endpoint.
	#[error("Descriptor `{descriptor}` does not define an email endpoint.")]
	MissingEmailEndpoint {
		/// Provider identifier string.
		descriptor: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Malformed JSON returned by an identity endpoint that did not report an error status.
#[derive(Debug, ThisError)]
#[error("Identity endpoint returned malformed JSON.")]
pub struct ParseError {
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response that failed to parse.
	pub status: u16,
}
