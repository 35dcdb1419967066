//! Staff account handlers.
//!
//! Accounts are managed by hospital administrators within their hospital.
//! No account may delete itself, and `SUPER_ADMIN` can never be assigned
//! through these endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use medgate_authz::tenant::{acting_tenant, list_scope};
use medgate_authz::{Action, IdentityId, Operation, ResourceKind, Role};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::require_tenant;
use crate::access::{authorize, authorize_record};
use crate::error::{RestError, RestResult};
use crate::extractors::{CurrentPrincipal, JsonBody, RequestedTenant, body_claim};
use crate::models::{NewUser, UserAccount, UserUpdate, new_record_id, non_blank};
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Parses a role name supplied by a client.
fn assignable_role(raw: &str) -> RestResult<Role> {
    raw.trim()
        .parse::<Role>()
        .ok()
        .filter(|role| role.is_assignable())
        .ok_or_else(|| RestError::bad_request("Invalid role"))
}

/// Lists accounts in the caller's scope, newest first.
///
/// `GET [base]/api/users`
pub async fn list_users_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
) -> RestResult<Json<Vec<UserAccount>>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant.apply(Operation::new(Action::List, ResourceKind::User));
    debug!(identity = %principal.identity(), "Processing list users request");
    authorize(&principal, &operation)?;

    let scope = list_scope(&principal, operation.target_tenant());
    Ok(Json(state.store().list_users(&scope).await?))
}

/// Reads one account.
///
/// `GET [base]/api/users/{id}`
pub async fn read_user_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<UserAccount>>
where
    S: ClinicalStore + 'static,
{
    let operation =
        tenant.apply(Operation::new(Action::Read, ResourceKind::User).with_record_id(&id));

    let found = state.store().get_user(&IdentityId::new(id)).await?;
    Ok(Json(authorize_record(&principal, &operation, found)?))
}

/// Creates a staff account.
///
/// `POST [base]/api/users`
///
/// # Response
///
/// - `201 Created` - Account created
/// - `400 Bad Request` - Field missing, invalid role, or email already registered
/// - `403 Forbidden` - Role or tenant denied
pub async fn create_user_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    JsonBody(input): JsonBody<NewUser>,
) -> RestResult<(StatusCode, Json<UserAccount>)>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Create, ResourceKind::User))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);
    authorize(&principal, &operation)?;

    let missing = || RestError::bad_request("All fields are required");
    let email = non_blank(input.email).ok_or_else(missing)?;
    let name = non_blank(input.name).ok_or_else(missing)?;
    let role = assignable_role(&non_blank(input.role).ok_or_else(missing)?)?;

    let tenant_id = acting_tenant(&principal, operation.target_tenant());
    require_tenant(state.store(), &tenant_id).await?;

    let created = state
        .store()
        .insert_user(UserAccount {
            id: IdentityId::new(new_record_id()),
            tenant_id,
            email,
            name,
            role,
            created_at: Utc::now(),
        })
        .await?;

    info!(
        user = %created.id,
        tenant = %created.tenant_id,
        role = %created.role,
        by = %principal.identity(),
        "User created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Updates an account. Absent fields are left unchanged.
///
/// `PUT [base]/api/users/{id}`
pub async fn update_user_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UserUpdate>,
) -> RestResult<Json<UserAccount>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Update, ResourceKind::User).with_record_id(&id))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);

    let found = state.store().get_user(&IdentityId::new(id)).await?;
    let mut user = authorize_record(&principal, &operation, found)?;

    if let Some(role) = non_blank(input.role) {
        user.role = assignable_role(&role)?;
    }
    if let Some(email) = non_blank(input.email) {
        user.email = email;
    }
    if let Some(name) = non_blank(input.name) {
        user.name = name;
    }

    let updated = state.store().update_user(user).await?;
    debug!(user = %updated.id, "User updated");
    Ok(Json(updated))
}

/// Deletes an account and revokes its bearer tokens.
///
/// `DELETE [base]/api/users/{id}`
///
/// # Response
///
/// - `200 OK` - Account deleted
/// - `403 Forbidden` - Role or tenant denied, or the account is the caller's own
/// - `404 Not Found` - No such account
pub async fn delete_user_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Value>>
where
    S: ClinicalStore + 'static,
{
    let operation =
        tenant.apply(Operation::new(Action::Delete, ResourceKind::User).with_record_id(&id));

    let found = state.store().get_user(&IdentityId::new(id)).await?;
    let user = authorize_record(&principal, &operation, found)?;
    state.store().delete_user(&user.id).await?;
    let revoked = state.verifier().revoke_identity(&user.id);

    info!(user = %user.id, revoked, by = %principal.identity(), "User deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
