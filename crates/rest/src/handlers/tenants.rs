//! Tenant handlers.
//!
//! Only `SUPER_ADMIN` manages tenants; the role policy denies every other
//! role outright.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use medgate_authz::{Action, Operation, ResourceKind, TenantId};
use tracing::{debug, info};

use crate::access::{authorize, authorize_record};
use crate::error::{RestError, RestResult};
use crate::extractors::{CurrentPrincipal, JsonBody, RequestedTenant};
use crate::models::{NewTenant, Tenant, new_record_id, non_blank};
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Lists every tenant, newest first.
///
/// `GET [base]/api/tenants`
pub async fn list_tenants_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
) -> RestResult<Json<Vec<Tenant>>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant.apply(Operation::new(Action::List, ResourceKind::Tenant));
    debug!(identity = %principal.identity(), "Processing list tenants request");
    authorize(&principal, &operation)?;

    Ok(Json(state.store().list_tenants().await?))
}

/// Reads one tenant.
///
/// `GET [base]/api/tenants/{id}`
pub async fn read_tenant_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Tenant>>
where
    S: ClinicalStore + 'static,
{
    let operation =
        tenant.apply(Operation::new(Action::Read, ResourceKind::Tenant).with_record_id(&id));
    debug!(identity = %principal.identity(), id = %id, "Processing read tenant request");

    let found = state.store().get_tenant(&TenantId::new(id.as_str())).await?;
    let found = authorize_record(&principal, &operation, found)?;

    Ok(Json(found))
}

/// Registers a new tenant.
///
/// `POST [base]/api/tenants`
///
/// # Response
///
/// - `201 Created` - Tenant created
/// - `400 Bad Request` - Name missing
/// - `403 Forbidden` - Caller is not `SUPER_ADMIN`
pub async fn create_tenant_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    JsonBody(input): JsonBody<NewTenant>,
) -> RestResult<(StatusCode, Json<Tenant>)>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant.apply(Operation::new(Action::Create, ResourceKind::Tenant));
    authorize(&principal, &operation)?;

    let name = non_blank(input.name).ok_or_else(|| RestError::bad_request("Tenant name is required"))?;

    let created = state
        .store()
        .insert_tenant(Tenant {
            id: TenantId::new(new_record_id()),
            name,
            created_at: Utc::now(),
        })
        .await?;

    info!(tenant = %created.id, name = %created.name, by = %principal.identity(), "Tenant created");
    Ok((StatusCode::CREATED, Json(created)))
}
