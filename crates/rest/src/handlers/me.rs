//! Current principal handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::CurrentPrincipal;
use crate::models::{Tenant, UserAccount};
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Response body of `GET /api/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The caller's account.
    pub user: UserAccount,
    /// The caller's home tenant, if it is registered.
    pub tenant: Option<Tenant>,
}

/// Returns the caller's own account and home tenant.
///
/// Every authenticated principal may read itself; no policy entry is
/// consulted.
///
/// # HTTP Request
///
/// `GET [base]/api/auth/me`
pub async fn me_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> RestResult<Json<MeResponse>>
where
    S: ClinicalStore + 'static,
{
    debug!(identity = %principal.identity(), "Processing me request");

    let user = state
        .store()
        .get_user(principal.identity())
        .await?
        .ok_or_else(|| RestError::NotFound {
            resource: format!("User/{}", principal.identity()),
        })?;
    let tenant = state.store().get_tenant(principal.home_tenant()).await?;

    Ok(Json(MeResponse { user, tenant }))
}
