//! Authenticated principal extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use medgate_authz::Principal;
use tracing::{debug, warn};

use crate::auth::bearer_token;
use crate::error::RestError;
use crate::state::AppState;
use crate::store::ClinicalStore;

/// The principal behind the request's bearer token.
///
/// Extraction fails with `401` when the token is missing, unknown, or names
/// an account that no longer exists. A handler taking this extractor never
/// runs for an unauthenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<AppState<S>> for CurrentPrincipal
where
    S: ClinicalStore + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);

        match state.resolver().resolve(token).await {
            Ok(principal) => {
                debug!(
                    identity = %principal.identity(),
                    role = %principal.role(),
                    path = %parts.uri.path(),
                    "Authenticated request"
                );
                Ok(CurrentPrincipal(principal))
            }
            Err(err) => {
                warn!(error = %err, path = %parts.uri.path(), "Authentication failed");
                Err(err.into())
            }
        }
    }
}
