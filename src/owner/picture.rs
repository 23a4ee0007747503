//! Profile-picture selection over the provider's nested media-artifact list.

// self
use crate::{_prelude::*, fields};

const STILL_IMAGE_KEY: &str = "com.linkedin.digitalmedia.mediaartifact.StillImage";
const PUBLIC_AUTHORIZATION: &str = "PUBLIC";

/// One normalized profile-picture rendition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
	/// Rendition width in pixels.
	pub width: u64,
	/// Download URL taken from the artifact's first identifier.
	pub url: String,
	/// Content type advertised alongside the identifier, when present.
	pub content_type: Option<String>,
}

/// Filters, sorts, and projects the artifact list at `artifact_path` into normalized images.
///
/// A missing path or a non-array value produces an empty list—evolving provider schemas are
/// the common case, not an error. Surviving artifacts are publicly authorized still images
/// carrying an integer width and at least one identifier; the output is sorted ascending by
/// width, ties keeping their encounter order. When an artifact advertises several identifiers
/// the first one wins; the provider never documents how to choose between them.
pub fn select(document: &Value, artifact_path: &str) -> Vec<ProfileImage> {
	let Some(artifacts) = fields::lookup(document, artifact_path).and_then(Value::as_array) else {
		return Vec::new();
	};
	let mut images: Vec<ProfileImage> = artifacts.iter().filter_map(normalize_artifact).collect();

	images.sort_by_key(|image| image.width);

	images
}

fn normalize_artifact(artifact: &Value) -> Option<ProfileImage> {
	let authorization = artifact.get("authorizationMethod")?.as_str()?;

	if !authorization.eq_ignore_ascii_case(PUBLIC_AUTHORIZATION) {
		return None;
	}

	// The discriminator key itself contains dots, so this descent must not go through
	// the dot-path accessor.
	let width = artifact
		.get("data")?
		.get(STILL_IMAGE_KEY)?
		.get("storageSize")?
		.get("width")?
		.as_u64()?;
	let identifier = artifact.get("identifiers")?.get(0)?;
	let url = identifier.get("identifier")?.as_str()?.to_owned();
	let content_type = identifier.get("mediaType").and_then(Value::as_str).map(str::to_owned);

	Some(ProfileImage { width, url, content_type })
}
