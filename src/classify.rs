//! Response classification for identity-endpoint failures.
//!
//! The provider reports failures in two body shapes: API-style `{status, message}` documents
//! and OAuth-style `{error, error_description}` documents. Classification is two-tier so the
//! resolution pipeline can treat a scope denial differently from every other failure: a body
//! whose `status` field is `403` is an access denial, anything else that looks like an error
//! is a generic provider failure.

// self
use crate::{_prelude::*, error::ProviderFailure};

const FORBIDDEN: u64 = 403;

/// Failure categories produced by [`classify`].
///
/// The split exists so callers can catch [`AccessDenied`](ClassifiedError::AccessDenied)
/// independently—the email fetch converts it into an absent result instead of failing the
/// resolution—while generic failures stay fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassifiedError {
	/// Provider refused the request because a required scope was not granted.
	AccessDenied(ProviderFailure),
	/// Any other provider-reported failure.
	Provider(ProviderFailure),
}
impl From<ClassifiedError> for Error {
	fn from(e: ClassifiedError) -> Self {
		match e {
			ClassifiedError::AccessDenied(failure) => Error::AccessDenied(failure),
			ClassifiedError::Provider(failure) => Error::Provider(failure),
		}
	}
}

/// Inspects a response and decides whether it carries a provider failure.
///
/// Rules, in priority order:
///
/// 1. Body `status` field equals `403` → [`ClassifiedError::AccessDenied`].
/// 2. HTTP status is `>= 400`, or the body carries an `error`/`error_description` field →
///    [`ClassifiedError::Provider`].
/// 3. Otherwise the response is healthy.
///
/// The failure message prefers the body (`message`, then `error_description`, then `error`)
/// and falls back to the HTTP reason phrase; the failure status prefers the body's `status`
/// field over the HTTP status line.
pub fn classify(http_status: u16, reason: Option<&str>, body: &Value) -> Result<(), ClassifiedError> {
	if body_status(body) == Some(FORBIDDEN) {
		return Err(ClassifiedError::AccessDenied(failure(http_status, reason, body)));
	}
	if http_status >= 400 || has_error_fields(body) {
		return Err(ClassifiedError::Provider(failure(http_status, reason, body)));
	}

	Ok(())
}

fn body_status(body: &Value) -> Option<u64> {
	body.get("status")?.as_u64()
}

fn has_error_fields(body: &Value) -> bool {
	body.get("error").is_some() || body.get("error_description").is_some()
}

fn failure(http_status: u16, reason: Option<&str>, body: &Value) -> ProviderFailure {
	let message = select_message(reason, body);
	let status = body_status(body).and_then(|v| u16::try_from(v).ok()).unwrap_or(http_status);

	ProviderFailure { message, status, body: body.clone() }
}

fn select_message(reason: Option<&str>, body: &Value) -> String {
	["message", "error_description", "error"]
		.iter()
		.find_map(|key| body.get(key).and_then(Value::as_str))
		.unwrap_or_else(|| reason.unwrap_or("Unknown provider failure"))
		.to_owned()
}
