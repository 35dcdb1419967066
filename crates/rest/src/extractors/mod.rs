//! Axum extractors for access-control inputs.
//!
//! - [`CurrentPrincipal`] - Resolve the bearer token into a principal
//! - [`RequestedTenant`] - Collect tenant claims from query and headers
//! - [`JsonBody`] - Parse a JSON payload, rejecting with a `RestError`

mod json_body;
mod principal;
mod tenant;

pub use json_body::JsonBody;
pub use principal::CurrentPrincipal;
pub use tenant::{RequestedTenant, X_TENANT_ID, body_claim};
