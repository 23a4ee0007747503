//! Confirmed-primary email extraction from the member-handle endpoint response.

// self
use crate::{_prelude::*, fields};

/// Extracts the single confirmed, primary email address from an email-endpoint response.
///
/// Qualifying elements have a `type` that uppercases to `EMAIL`, a `state` that uppercases to
/// `CONFIRMED`, `primary` exactly boolean `true`, and a `handle~.emailAddress` string. The
/// first qualifying element in list order wins. Malformed input of any shape degrades to
/// `None`; callers read absence as "no email available", which is deliberately
/// indistinguishable from "email scope not granted".
pub fn extract(response: Option<&Value>) -> Option<String> {
	response?.get("elements")?.as_array()?.iter().find_map(qualifying_address)
}

fn qualifying_address(element: &Value) -> Option<String> {
	let kind = element.get("type")?.as_str()?;
	let state = element.get("state")?.as_str()?;

	if !kind.eq_ignore_ascii_case("EMAIL") || !state.eq_ignore_ascii_case("CONFIRMED") {
		return None;
	}
	if element.get("primary")? != &Value::Bool(true) {
		return None;
	}

	fields::lookup(element, "handle~.emailAddress")?.as_str().map(str::to_owned)
}
