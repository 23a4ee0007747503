//! Field access and selection primitives shared across the resolver.
//!
//! [`lookup`] is the dot-path accessor every profile getter is built on; [`FieldSelection`]
//! models the immutable, validated list of fields requested from the profile endpoint and
//! renders the provider's parenthesized projection syntax.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Walks `document` along a `.`-separated path, returning the value at the end of the walk.
///
/// Object steps match keys verbatim, so provider keys carrying decoration suffixes (e.g.
/// `handle~`) are addressed literally. Array steps require the segment to parse as a decimal
/// index. Any mismatch—missing key, non-numeric index, scalar in the middle of the path—yields
/// `None`. A present JSON `null` is returned as `Some(&Value::Null)`, keeping absence
/// observable as a distinct outcome.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
	let mut current = document;

	for segment in path.split('.') {
		current = match current {
			Value::Object(map) => map.get(segment)?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}

	Some(current)
}

/// Errors emitted when validating requested profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum FieldSelectionError {
	/// Empty field entries are not allowed.
	#[error("Field entries cannot be empty.")]
	Empty,
	/// Fields cannot contain embedded whitespace characters.
	#[error("Field contains whitespace: {field}.")]
	ContainsWhitespace {
		/// The offending field expression.
		field: String,
	},
	/// Sub-selector parentheses must balance within a single field expression.
	#[error("Field has an unbalanced sub-selector: {field}.")]
	UnbalancedSelector {
		/// The offending field expression.
		field: String,
	},
}

/// Immutable, validated list of profile fields to request.
///
/// Entries are either plain field names (`id`) or sub-selector expressions
/// (`profilePicture(displayImage~:playableStreams)`). Order is preserved—the provider treats
/// projection order as meaningful—and repeated entries are dropped. The selection is a pure
/// value: deriving a different selection returns a new instance instead of mutating in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSelection {
	fields: Arc<[String]>,
}
impl FieldSelection {
	/// Creates a validated selection from any iterator of field expressions.
	pub fn new<I, S>(fields: I) -> Result<Self, FieldSelectionError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Ok(Self { fields: validate(fields)? })
	}

	/// Number of distinct fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns true if no fields are selected.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Returns true if the selection contains the provided field expression.
	pub fn contains(&self, field: &str) -> bool {
		self.fields.iter().any(|candidate| candidate == field)
	}

	/// Iterator over field expressions in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|s| s.as_str())
	}

	/// Returns the comma-joined field list without the surrounding parentheses.
	pub fn normalized(&self) -> String {
		self.fields.join(",")
	}

	/// Renders the parenthesized projection value sent on the wire, e.g. `(id,firstName)`.
	pub fn projection_value(&self) -> String {
		format!("({})", self.normalized())
	}

	/// Returns the underlying slice of field expressions.
	pub fn as_slice(&self) -> &[String] {
		&self.fields
	}
}

/// Iterator over field expressions.
pub struct FieldIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for FieldIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a FieldSelection {
	type IntoIter = FieldIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		FieldIter { inner: self.fields.iter() }
	}
}
impl TryFrom<Vec<String>> for FieldSelection {
	type Error = FieldSelectionError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl TryFrom<&[String]> for FieldSelection {
	type Error = FieldSelectionError;

	fn try_from(value: &[String]) -> Result<Self, Self::Error> {
		Self::new(value.to_vec())
	}
}
impl FromStr for FieldSelection {
	type Err = FieldSelectionError;

	/// Parses a comma-joined field list, honoring commas nested inside sub-selectors.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}

		Self::new(split_top_level(s))
	}
}
impl Display for FieldSelection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl Serialize for FieldSelection {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.fields.len()))?;

		for field in self.fields.iter() {
			seq.serialize_element(field)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for FieldSelection {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		FieldSelection::new(values).map_err(DeError::custom)
	}
}

fn validate<I, S>(fields: I) -> Result<Arc<[String]>, FieldSelectionError>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut ordered = Vec::new();

	for field in fields {
		let owned: String = field.into();

		if owned.is_empty() {
			return Err(FieldSelectionError::Empty);
		}
		if owned.chars().any(char::is_whitespace) {
			return Err(FieldSelectionError::ContainsWhitespace { field: owned });
		}
		if !selector_balanced(&owned) {
			return Err(FieldSelectionError::UnbalancedSelector { field: owned });
		}
		if !ordered.contains(&owned) {
			ordered.push(owned);
		}
	}

	Ok(Arc::from(ordered))
}

fn selector_balanced(field: &str) -> bool {
	let mut depth = 0_i32;

	for ch in field.chars() {
		match ch {
			'(' => depth += 1,
			')' => {
				depth -= 1;

				if depth < 0 {
					return false;
				}
			},
			_ => {},
		}
	}

	depth == 0
}

fn split_top_level(list: &str) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut depth = 0_i32;
	let mut start = 0;

	for (idx, ch) in list.char_indices() {
		match ch {
			'(' => depth += 1,
			')' => depth -= 1,
			',' if depth == 0 => {
				parts.push(&list[start..idx]);
				start = idx + 1;
			},
			_ => {},
		}
	}

	parts.push(&list[start..]);

	parts
}
