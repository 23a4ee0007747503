//! Normalized, read-only view over a raw profile document.
//!
//! `picture` turns the provider's nested media-artifact list into an ordered image set;
//! `email` pulls the confirmed, primary address out of the member-handle response. Both feed
//! [`ResourceOwner`], the accessor facade the resolution pipeline hands back to callers.

pub mod email;
pub mod picture;

pub use picture::ProfileImage;

// self
use crate::{_prelude::*, fields};

/// Normalized resource owner constructed from the merged profile + email documents.
///
/// The raw document is owned for the lifetime of the value and never mutated after
/// construction, so a resolved owner can be shared read-only across threads. Every accessor
/// is a dot-path lookup that degrades to `None` when the provider omitted a field—unknown
/// keys remain reachable verbatim through [`attribute`](Self::attribute) and round-trip
/// through [`as_raw`](Self::as_raw).
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceOwner {
	raw: Value,
	artifact_path: String,
}
impl ResourceOwner {
	/// Wraps a merged profile document, using `artifact_path` to locate picture artifacts.
	pub fn new(document: Value, artifact_path: impl Into<String>) -> Self {
		Self { raw: document, artifact_path: artifact_path.into() }
	}

	/// Provider-assigned opaque identifier. Uniqueness is the provider's promise, not ours.
	pub fn id(&self) -> Option<&str> {
		self.string_attribute("id")
	}

	/// Localized first name.
	pub fn first_name(&self) -> Option<&str> {
		self.string_attribute("localizedFirstName")
	}

	/// Localized last name.
	pub fn last_name(&self) -> Option<&str> {
		self.string_attribute("localizedLastName")
	}

	/// Confirmed primary email address, when the email scope was granted and one exists.
	pub fn email(&self) -> Option<&str> {
		self.string_attribute("email")
	}

	/// Arbitrary dot-path access into the raw document, unknown keys included.
	pub fn attribute(&self, path: &str) -> Option<&Value> {
		fields::lookup(&self.raw, path)
	}

	/// Profile pictures sorted ascending by width.
	pub fn sorted_profile_pictures(&self) -> Vec<ProfileImage> {
		picture::select(&self.raw, &self.artifact_path)
	}

	/// URL of the largest available profile picture.
	pub fn image_url(&self) -> Option<String> {
		self.sorted_profile_pictures().pop().map(|image| image.url)
	}

	/// Widths of every available picture rendition, ascending.
	pub fn picture_widths(&self) -> Vec<u64> {
		self.sorted_profile_pictures().into_iter().map(|image| image.width).collect()
	}

	/// Picture rendition of exactly `width` pixels, or `None` when no rendition matches.
	pub fn picture_with_width(&self, width: u64) -> Option<ProfileImage> {
		self.sorted_profile_pictures().into_iter().find(|image| image.width == width)
	}

	/// Borrows the merged raw document.
	pub fn as_raw(&self) -> &Value {
		&self.raw
	}

	/// Consumes the owner, returning the merged raw document.
	pub fn into_raw(self) -> Value {
		self.raw
	}

	fn string_attribute(&self, path: &str) -> Option<&str> {
		self.attribute(path)?.as_str()
	}
}
