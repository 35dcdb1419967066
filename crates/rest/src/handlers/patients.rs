//! Patient handlers.
//!
//! Patients are managed by front-desk staff and hospital administrators.
//! Doctors may read them.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use medgate_authz::tenant::{acting_tenant, list_scope};
use medgate_authz::{Action, Operation, ResourceKind};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::require_tenant;
use crate::access::{authorize, authorize_record};
use crate::error::{RestError, RestResult};
use crate::extractors::{CurrentPrincipal, JsonBody, RequestedTenant, body_claim};
use crate::models::{NewPatient, Patient, PatientUpdate, new_record_id, non_blank};
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Lists patients in the caller's scope, newest first.
///
/// `GET [base]/api/patients`
pub async fn list_patients_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
) -> RestResult<Json<Vec<Patient>>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant.apply(Operation::new(Action::List, ResourceKind::Patient));
    debug!(identity = %principal.identity(), "Processing list patients request");
    authorize(&principal, &operation)?;

    let scope = list_scope(&principal, operation.target_tenant());
    Ok(Json(state.store().list_patients(&scope).await?))
}

/// Reads one patient.
///
/// `GET [base]/api/patients/{id}`
pub async fn read_patient_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Patient>>
where
    S: ClinicalStore + 'static,
{
    let operation =
        tenant.apply(Operation::new(Action::Read, ResourceKind::Patient).with_record_id(&id));
    debug!(identity = %principal.identity(), id = %id, "Processing read patient request");

    let found = state.store().get_patient(&id).await?;
    Ok(Json(authorize_record(&principal, &operation, found)?))
}

/// Admits a new patient.
///
/// `POST [base]/api/patients`
///
/// The patient is stored under the caller's home tenant unless the caller
/// is `SUPER_ADMIN` and names another one.
///
/// # Response
///
/// - `201 Created` - Patient created
/// - `400 Bad Request` - Required field missing or unknown tenant
/// - `403 Forbidden` - Role or tenant denied
pub async fn create_patient_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    JsonBody(input): JsonBody<NewPatient>,
) -> RestResult<(StatusCode, Json<Patient>)>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Create, ResourceKind::Patient))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);
    authorize(&principal, &operation)?;

    let missing = || RestError::bad_request("All required fields must be provided");
    let name = non_blank(input.name).ok_or_else(missing)?;
    let age = input.age.ok_or_else(missing)?;
    let gender = input.gender.ok_or_else(missing)?;
    let patient_type = input.patient_type.ok_or_else(missing)?;
    let phone_number = non_blank(input.phone_number).ok_or_else(missing)?;
    let address = non_blank(input.address).ok_or_else(missing)?;

    let tenant_id = acting_tenant(&principal, operation.target_tenant());
    require_tenant(state.store(), &tenant_id).await?;

    let now = Utc::now();
    let created = state
        .store()
        .insert_patient(Patient {
            id: new_record_id(),
            tenant_id,
            name,
            age,
            gender,
            patient_type,
            phone_number,
            address,
            admission_date: input.admission_date.unwrap_or(now),
            status: input.status.unwrap_or_default(),
            created_at: now,
        })
        .await?;

    info!(patient = %created.id, tenant = %created.tenant_id, by = %principal.identity(), "Patient created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Updates a patient. Absent fields are left unchanged.
///
/// `PUT [base]/api/patients/{id}`
pub async fn update_patient_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<PatientUpdate>,
) -> RestResult<Json<Patient>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Update, ResourceKind::Patient).with_record_id(&id))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);

    let found = state.store().get_patient(&id).await?;
    let mut patient = authorize_record(&principal, &operation, found)?;

    input.apply_to(&mut patient);
    let updated = state.store().update_patient(patient).await?;

    debug!(patient = %updated.id, "Patient updated");
    Ok(Json(updated))
}

/// Deletes a patient.
///
/// `DELETE [base]/api/patients/{id}`
pub async fn delete_patient_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Value>>
where
    S: ClinicalStore + 'static,
{
    let operation =
        tenant.apply(Operation::new(Action::Delete, ResourceKind::Patient).with_record_id(&id));

    let found = state.store().get_patient(&id).await?;
    let patient = authorize_record(&principal, &operation, found)?;
    state.store().delete_patient(&patient.id).await?;

    info!(patient = %patient.id, by = %principal.identity(), "Patient deleted");
    Ok(Json(json!({ "message": "Patient deleted successfully" })))
}
