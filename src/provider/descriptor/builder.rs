// self
use crate::{
	_prelude::*,
	fields::{FieldSelection, FieldSelectionError},
	provider::{
		IdentifierError, ProviderDescriptor, ProviderEndpoints, ProviderId, SchemaGeneration,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Profile endpoint is mandatory for every descriptor.
	#[error("Missing profile endpoint.")]
	MissingProfileEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Artifact paths cannot be empty.
	#[error("Artifact path cannot be empty.")]
	EmptyArtifactPath,
	/// Endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Descriptor identifier failed validation.
	#[error("Descriptor identifier is invalid.")]
	InvalidId(#[from] IdentifierError),
	/// Default field selection failed validation.
	#[error("Default field selection is invalid.")]
	InvalidFields(#[from] FieldSelectionError),
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Profile endpoint (required).
	pub profile_endpoint: Option<Url>,
	/// Optional member-handle endpoint, fixed query included.
	pub email_endpoint: Option<Url>,
	/// Schema generation in effect.
	pub generation: SchemaGeneration,
	/// Override for the artifact path; defaults to the generation-two location.
	pub artifact_path: Option<String>,
	/// Default field selection.
	pub default_fields: FieldSelection,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			profile_endpoint: None,
			email_endpoint: None,
			generation: SchemaGeneration::default(),
			artifact_path: None,
			default_fields: FieldSelection::default(),
		}
	}

	/// Sets the profile endpoint.
	pub fn profile_endpoint(mut self, url: Url) -> Self {
		self.profile_endpoint = Some(url);

		self
	}

	/// Sets the optional email endpoint.
	pub fn email_endpoint(mut self, url: Url) -> Self {
		self.email_endpoint = Some(url);

		self
	}

	/// Overrides the schema generation.
	pub fn generation(mut self, generation: SchemaGeneration) -> Self {
		self.generation = generation;

		self
	}

	/// Overrides the artifact path used to locate profile pictures.
	pub fn artifact_path(mut self, path: impl Into<String>) -> Self {
		self.artifact_path = Some(path.into());

		self
	}

	/// Sets the default field selection.
	pub fn default_fields(mut self, fields: FieldSelection) -> Self {
		self.default_fields = fields;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let profile =
			self.profile_endpoint.ok_or(ProviderDescriptorError::MissingProfileEndpoint)?;
		let endpoints = ProviderEndpoints { profile, email: self.email_endpoint };
		let artifact_path = self
			.artifact_path
			.unwrap_or_else(|| ProviderDescriptor::DEFAULT_ARTIFACT_PATH.to_owned());
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints,
			generation: self.generation,
			artifact_path,
			default_fields: self.default_fields,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("profile", &self.endpoints.profile)?;

		if let Some(email) = self.endpoints.email.as_ref() {
			validate_endpoint("email", email)?;
		}
		if self.artifact_path.is_empty() {
			return Err(ProviderDescriptorError::EmptyArtifactPath);
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder(
			ProviderId::new("mock-provider").expect("Identifier fixture should be valid."),
		)
	}

	#[test]
	fn descriptors_require_a_profile_endpoint() {
		let err = builder().build().expect_err("Missing profile endpoint must be rejected.");

		assert_eq!(err, ProviderDescriptorError::MissingProfileEndpoint);
	}

	#[test]
	fn descriptors_reject_insecure_endpoints() {
		let err = builder()
			.profile_endpoint(
				Url::parse("http://api.example.com/me").expect("URL fixture should parse."),
			)
			.build()
			.expect_err("Plain HTTP endpoints must be rejected.");

		assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "profile", .. }));
	}

	#[test]
	fn artifact_path_defaults_to_the_generation_two_location() {
		let descriptor = builder()
			.profile_endpoint(
				Url::parse("https://api.example.com/me").expect("URL fixture should parse."),
			)
			.build()
			.expect("Descriptor should build successfully.");

		assert_eq!(descriptor.artifact_path, ProviderDescriptor::DEFAULT_ARTIFACT_PATH);
		assert_eq!(descriptor.generation, SchemaGeneration::V2);
	}

	#[test]
	fn empty_artifact_path_overrides_are_rejected() {
		let err = builder()
			.profile_endpoint(
				Url::parse("https://api.example.com/me").expect("URL fixture should parse."),
			)
			.artifact_path("")
			.build()
			.expect_err("Empty artifact paths must be rejected.");

		assert_eq!(err, ProviderDescriptorError::EmptyArtifactPath);
	}

	#[test]
	fn linkedin_preset_carries_the_published_surface() {
		let descriptor =
			ProviderDescriptor::linkedin().expect("LinkedIn preset should build successfully.");

		assert_eq!(descriptor.endpoints.profile.as_str(), "https://api.linkedin.com/v2/me");

		let email = descriptor.endpoints.email.expect("LinkedIn preset should carry email.");

		assert_eq!(email.path(), "/v2/clientAwareMemberHandles");
		assert_eq!(
			email.query(),
			Some("q=members&projection=(elements*(state,primary,type,handle~))")
		);
		assert!(descriptor.default_fields.contains("id"));
		assert!(
			descriptor.default_fields.contains("profilePicture(displayImage~:playableStreams)")
		);
	}
}
