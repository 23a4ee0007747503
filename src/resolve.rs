//! Resource-owner resolution pipeline.
//!
//! The resolver turns a bearer token into a [`ResourceOwner`] in three steps: fetch the
//! profile document (any classified failure is fatal; profile-read scope is assumed
//! mandatory), optionally fetch the member-handle document (a scope denial degrades to an
//! absent email instead of failing the call, matching how adapters for other providers model
//! optional, scope-gated fields), then merge and wrap. The two fetches run sequentially so a
//! future schema generation may derive the email request from profile data without changing
//! observable ordering.

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	classify::{self, ClassifiedError},
	error::{ConfigError, ProviderFailure, TransportError},
	fields::FieldSelection,
	http::{IdentityHttpClient, RawResponse},
	obs::{self, FetchOutcome, FetchSpan, FetchStep},
	owner::{ResourceOwner, email},
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Resolver specialized for the crate's default reqwest transport stack.
pub type ReqwestResolver = Resolver<ReqwestHttpClient>;

/// Per-call options for a resource-owner resolution.
#[derive(Clone, Debug)]
pub struct ResolutionRequest {
	/// Fields requested from the profile endpoint.
	pub fields: FieldSelection,
	/// Whether the email endpoint should be consulted.
	pub fetch_email: bool,
}
impl ResolutionRequest {
	/// Creates a request for the provided field selection with the email fetch enabled.
	pub fn new(fields: FieldSelection) -> Self {
		Self { fields, fetch_email: true }
	}

	/// Returns a request identical to this one carrying a different field selection.
	pub fn with_fields(&self, fields: FieldSelection) -> Self {
		Self { fields, fetch_email: self.fetch_email }
	}

	/// Overrides whether the email endpoint is consulted.
	pub fn with_fetch_email(mut self, fetch_email: bool) -> Self {
		self.fetch_email = fetch_email;

		self
	}
}

/// Outcome of the email fetch, consumed by an explicit branch in the pipeline.
///
/// Denial is an ordinary value rather than an error: the provider gates email behind a
/// narrower scope than basic profile, and callers that never requested that scope still
/// deserve a resolved owner.
#[derive(Clone, Debug, PartialEq)]
pub enum EmailOutcome {
	/// Email scope was granted; the address may still be absent on the account.
	Granted(Option<String>),
	/// Provider denied the email scope.
	Denied(ProviderFailure),
}
impl EmailOutcome {
	/// Flattens the outcome into the address merged into the owner document.
	pub fn into_address(self) -> Option<String> {
		match self {
			EmailOutcome::Granted(address) => address,
			EmailOutcome::Denied(_) => None,
		}
	}
}

/// Coordinates resource-owner resolution against a single provider descriptor.
///
/// The resolver owns the HTTP client and descriptor so each call stays a linear
/// request/response composition suspending only at the two network points. Calls share no
/// mutable state, and the owners they return are immutable, so both the resolver and its
/// results can be shared freely across tasks.
#[derive(Clone)]
pub struct Resolver<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Provider descriptor defining endpoints, schema generation, and defaults.
	pub descriptor: ProviderDescriptor,
}
impl<C> Resolver<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// Creates a resolver that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), descriptor }
	}

	/// Seeds a request from the descriptor's default field selection.
	pub fn request(&self) -> ResolutionRequest {
		ResolutionRequest::new(self.descriptor.default_fields.clone())
	}

	/// Resolves the resource owner behind `token`.
	///
	/// Returns a fully populated [`ResourceOwner`] (with `None` for any ungranted or absent
	/// field) or exactly one error; partial results never escape.
	pub async fn resolve_resource_owner(
		&self,
		token: &AccessToken,
		request: &ResolutionRequest,
	) -> Result<ResourceOwner> {
		let mut profile = self.fetch_profile(token, &request.fields).await?;
		let address = if request.fetch_email && self.descriptor.endpoints.email.is_some() {
			self.resolve_email(token).await?.into_address()
		} else {
			None
		};

		// Merge under the `email` key so the named accessor and the raw document agree.
		if let Value::Object(map) = &mut profile {
			map.insert("email".into(), address.map(Value::String).unwrap_or(Value::Null));
		}

		Ok(ResourceOwner::new(profile, self.descriptor.artifact_path.clone()))
	}

	/// Fetches the confirmed primary email address as an explicit [`EmailOutcome`].
	///
	/// Errors when the descriptor defines no email endpoint, when transport or parsing
	/// fails, or when the provider reports a non-denial failure.
	pub async fn resolve_email(&self, token: &AccessToken) -> Result<EmailOutcome> {
		let url = self.descriptor.endpoints.email.clone().ok_or_else(|| {
			ConfigError::MissingEmailEndpoint { descriptor: self.descriptor.id.to_string() }
		})?;

		match self.fetch_document(FetchStep::Email, &url, token).await {
			Ok(document) => {
				obs::record_fetch_outcome(FetchStep::Email, FetchOutcome::Success);

				Ok(EmailOutcome::Granted(email::extract(Some(&document))))
			},
			Err(FetchFailure::Denied(failure)) => {
				obs::record_fetch_outcome(FetchStep::Email, FetchOutcome::Denied);

				Ok(EmailOutcome::Denied(failure))
			},
			Err(FetchFailure::Fatal(err)) => {
				obs::record_fetch_outcome(FetchStep::Email, FetchOutcome::Failure);

				Err(err)
			},
		}
	}

	/// Renders the profile endpoint URL carrying the generation's projection parameter.
	pub fn profile_url(&self, fields: &FieldSelection) -> Url {
		let mut url = self.descriptor.endpoints.profile.clone();

		if !fields.is_empty() {
			let parameter = self.descriptor.generation.projection_parameter();
			// The provider rejects percent-encoded projection syntax, so the query is
			// assembled by hand instead of going through the form-urlencoded serializer.
			let projection = format!("{parameter}={}", fields.projection_value());
			let query = match url.query() {
				Some(existing) if !existing.is_empty() => format!("{existing}&{projection}"),
				_ => projection,
			};

			url.set_query(Some(&query));
		}

		url
	}

	async fn fetch_profile(&self, token: &AccessToken, fields: &FieldSelection) -> Result<Value> {
		let url = self.profile_url(fields);

		match self.fetch_document(FetchStep::Profile, &url, token).await {
			Ok(document) => {
				obs::record_fetch_outcome(FetchStep::Profile, FetchOutcome::Success);

				Ok(document)
			},
			Err(failure) => {
				obs::record_fetch_outcome(FetchStep::Profile, FetchOutcome::Failure);

				// A denied profile fetch is fatal; profile-read scope is mandatory.
				Err(failure.into_error())
			},
		}
	}

	async fn fetch_document(
		&self,
		step: FetchStep,
		url: &Url,
		token: &AccessToken,
	) -> Result<Value, FetchFailure> {
		let span = FetchSpan::new(step, "fetch_document");

		obs::record_fetch_outcome(step, FetchOutcome::Attempt);

		span.instrument(async move {
			let response = self
				.http_client
				.get(url, token)
				.await
				.map_err(|err| FetchFailure::fatal(TransportError::network(err)))?;

			parse_classified(&response)
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Resolver<ReqwestHttpClient> {
	/// Creates a resolver provisioned with its own reqwest-backed transport.
	pub fn new(descriptor: ProviderDescriptor) -> Self {
		Self::with_http_client(descriptor, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Resolver<C>
where
	C: ?Sized + IdentityHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Resolver").field("descriptor", &self.descriptor).finish()
	}
}

enum FetchFailure {
	Denied(ProviderFailure),
	Fatal(Error),
}
impl FetchFailure {
	fn fatal(err: impl Into<Error>) -> Self {
		Self::Fatal(err.into())
	}

	fn into_error(self) -> Error {
		match self {
			FetchFailure::Denied(failure) => Error::AccessDenied(failure),
			FetchFailure::Fatal(err) => err,
		}
	}
}
impl From<ClassifiedError> for FetchFailure {
	fn from(e: ClassifiedError) -> Self {
		match e {
			ClassifiedError::AccessDenied(failure) => FetchFailure::Denied(failure),
			ClassifiedError::Provider(failure) => FetchFailure::Fatal(Error::Provider(failure)),
		}
	}
}

fn parse_classified(response: &RawResponse) -> Result<Value, FetchFailure> {
	let document = match response.parse_json() {
		Ok(document) => document,
		Err(parse_error) => {
			// A broken body on an error status still classifies from the status line.
			classify::classify(response.status, response.reason.as_deref(), &Value::Null)
				.map_err(FetchFailure::from)?;

			return Err(FetchFailure::Fatal(parse_error.into()));
		},
	};

	classify::classify(response.status, response.reason.as_deref(), &document)?;

	Ok(document)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	#[cfg(feature = "reqwest")]
	use crate::provider::{ProviderId, SchemaGeneration};

	#[cfg(feature = "reqwest")]
	fn descriptor(generation: SchemaGeneration) -> ProviderDescriptor {
		ProviderDescriptor::builder(
			ProviderId::new("mock-provider").expect("Identifier fixture should be valid."),
		)
		.profile_endpoint(
			Url::parse("https://api.example.com/v2/me").expect("URL fixture should parse."),
		)
		.generation(generation)
		.default_fields(
			FieldSelection::new(["id", "localizedFirstName"])
				.expect("Field fixture should be valid."),
		)
		.build()
		.expect("Descriptor fixture should build successfully.")
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn profile_urls_keep_projection_syntax_unencoded() {
		let resolver = Resolver::new(descriptor(SchemaGeneration::V2));
		let fields = FieldSelection::new(["id", "profilePicture(displayImage~:playableStreams)"])
			.expect("Field fixture should be valid.");
		let url = resolver.profile_url(&fields);

		assert_eq!(
			url.as_str(),
			"https://api.example.com/v2/me?projection=(id,profilePicture(displayImage~:playableStreams))"
		);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn legacy_generations_use_the_fields_parameter() {
		let resolver = Resolver::new(descriptor(SchemaGeneration::V1));
		let url = resolver.profile_url(&resolver.request().fields);

		assert_eq!(url.query(), Some("fields=(id,localizedFirstName)"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn requests_seed_from_descriptor_defaults_and_stay_pure() {
		let resolver = Resolver::new(descriptor(SchemaGeneration::V2));
		let request = resolver.request();

		assert!(request.fetch_email);
		assert_eq!(request.fields.normalized(), "id,localizedFirstName");

		let narrowed = request
			.with_fields(FieldSelection::new(["id"]).expect("Field fixture should be valid."));

		// Deriving a new request leaves the original untouched.
		assert_eq!(request.fields.normalized(), "id,localizedFirstName");
		assert_eq!(narrowed.fields.normalized(), "id");
		assert!(!narrowed.with_fetch_email(false).fetch_email);
	}

	#[test]
	fn email_outcomes_flatten_into_addresses() {
		assert_eq!(
			EmailOutcome::Granted(Some("a@x.com".into())).into_address(),
			Some("a@x.com".to_owned())
		);
		assert_eq!(EmailOutcome::Granted(None).into_address(), None);
		assert_eq!(
			EmailOutcome::Denied(ProviderFailure {
				message: "no scope".into(),
				status: 403,
				body: json!({ "status": 403 }),
			})
			.into_address(),
			None
		);
	}
}
