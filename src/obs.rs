//! Optional observability helpers for resolution fetches.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `identity_resolver.fetch` with the
//!   `step` (profile or email) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `identity_resolver_fetch_total` counter for every
//!   attempt/success/denial/failure, labeled by `step` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Fetch steps observed by the resolution pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchStep {
	/// Profile ("me") endpoint fetch.
	Profile,
	/// Member-handle (email) endpoint fetch.
	Email,
}
impl FetchStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchStep::Profile => "profile",
			FetchStep::Email => "email",
		}
	}
}
impl Display for FetchStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// Entry to a fetch helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Scope denial converted into an absent result.
	Denied,
	/// Failure propagated back to the caller.
	Failure,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::Attempt => "attempt",
			FetchOutcome::Success => "success",
			FetchOutcome::Denied => "denied",
			FetchOutcome::Failure => "failure",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
