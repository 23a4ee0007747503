//! Provider-facing descriptors for identity-profile surfaces.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering HTTPS-only
//! profile/email endpoints, the schema generation in effect, the dot-path to the
//! profile-picture artifact list, and the default field selection. Providers that shipped
//! several schema generations are described by different descriptor values rather than
//! different types.

pub mod descriptor;
pub mod id;

pub use descriptor::*;
pub use id::*;
