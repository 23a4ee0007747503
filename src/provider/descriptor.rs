//! Provider descriptor data structures consumed by the resolution pipeline.
//!
//! The module exposes validated metadata and the supporting builder so a provider's profile
//! surface—endpoints, schema generation, artifact path, default field selection—can be
//! described as a plain value instead of a type hierarchy.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, fields::FieldSelection, provider::ProviderId};

/// Schema generations the provider has shipped for its profile surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaGeneration {
	/// Legacy generation: flat profile documents, `fields` query parameter.
	V1,
	#[default]
	/// Current generation: localized name fields, nested media artifacts, `projection`
	/// query parameter.
	V2,
}
impl SchemaGeneration {
	/// Query parameter name carrying the field selection for this generation.
	pub fn projection_parameter(self) -> &'static str {
		match self {
			SchemaGeneration::V1 => "fields",
			SchemaGeneration::V2 => "projection",
		}
	}
}
impl Display for SchemaGeneration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			SchemaGeneration::V1 => f.write_str("v1"),
			SchemaGeneration::V2 => f.write_str("v2"),
		}
	}
}

/// Endpoint set declared by a provider descriptor.
///
/// The email endpoint carries its fixed query verbatim (the member-handle projection never
/// varies per call); descriptors for providers that fold email into the profile response
/// simply omit it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Profile ("me") endpoint queried on every resolution.
	pub profile: Url,
	/// Optional member-handle endpoint queried when email is desired.
	pub email: Option<Url>,
}

/// Immutable provider descriptor consumed by the resolution pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Schema generation in effect for this descriptor.
	pub generation: SchemaGeneration,
	/// Dot-path to the profile-picture artifact list inside profile documents.
	pub artifact_path: String,
	/// Field selection requested when the caller does not override it.
	pub default_fields: FieldSelection,
}
impl ProviderDescriptor {
	/// Default artifact path for generation-two profile documents.
	pub const DEFAULT_ARTIFACT_PATH: &'static str = "profilePicture.displayImage~.elements";
	/// Default field list requested from LinkedIn's member endpoint.
	pub const LINKEDIN_DEFAULT_FIELDS: [&'static str; 6] = [
		"id",
		"firstName",
		"lastName",
		"localizedFirstName",
		"localizedLastName",
		"profilePicture(displayImage~:playableStreams)",
	];

	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Ready-made descriptor for LinkedIn's v2 member surface.
	pub fn linkedin() -> Result<Self, ProviderDescriptorError> {
		let profile = Url::parse("https://api.linkedin.com/v2/me")
			.map_err(|source| ProviderDescriptorError::InvalidUrl { source })?;
		let email = Url::parse(
			"https://api.linkedin.com/v2/clientAwareMemberHandles?q=members&projection=(elements*(state,primary,type,handle~))",
		)
		.map_err(|source| ProviderDescriptorError::InvalidUrl { source })?;

		Self::builder(ProviderId::new("linkedin")?)
			.profile_endpoint(profile)
			.email_endpoint(email)
			.generation(SchemaGeneration::V2)
			.default_fields(FieldSelection::new(Self::LINKEDIN_DEFAULT_FIELDS)?)
			.build()
	}
}
