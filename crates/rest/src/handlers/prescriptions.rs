//! Prescription handlers.
//!
//! Doctors author prescriptions and may only change or remove their own.
//! Hospital administrators may remove any prescription in their hospital
//! but cannot read them.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use medgate_authz::tenant::{acting_tenant, authoring_identity, list_scope};
use medgate_authz::{Action, Operation, ResourceKind, Role};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::require_tenant;
use crate::access::{authorize, authorize_record};
use crate::error::{RestError, RestResult};
use crate::extractors::{CurrentPrincipal, JsonBody, RequestedTenant, body_claim};
use crate::models::{
    NewPrescription, Prescription, PrescriptionFilter, PrescriptionUpdate, new_record_id, non_blank,
};
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Lists prescriptions in the caller's scope, newest first.
///
/// `GET [base]/api/prescriptions?patientId=..&doctorId=..`
pub async fn list_prescriptions_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Query(filter): Query<PrescriptionFilter>,
) -> RestResult<Json<Vec<Prescription>>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant.apply(Operation::new(Action::List, ResourceKind::Prescription));
    debug!(identity = %principal.identity(), filter = ?filter, "Processing list prescriptions request");
    authorize(&principal, &operation)?;

    let scope = list_scope(&principal, operation.target_tenant());
    Ok(Json(state.store().list_prescriptions(&scope, &filter).await?))
}

/// Reads one prescription.
///
/// `GET [base]/api/prescriptions/{id}`
pub async fn read_prescription_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Prescription>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Read, ResourceKind::Prescription).with_record_id(&id));

    let found = state.store().get_prescription(&id).await?;
    Ok(Json(authorize_record(&principal, &operation, found)?))
}

/// Writes a new prescription.
///
/// `POST [base]/api/prescriptions`
///
/// The author is the caller. A `SUPER_ADMIN` may instead name a `doctorId`,
/// which must be a `DOCTOR` account in the target tenant. The patient must belong to
/// the same tenant as the prescription.
///
/// # Response
///
/// - `201 Created` - Prescription created
/// - `400 Bad Request` - Required field missing, unknown patient or doctor
/// - `403 Forbidden` - Role or tenant denied
pub async fn create_prescription_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    JsonBody(input): JsonBody<NewPrescription>,
) -> RestResult<(StatusCode, Json<Prescription>)>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Create, ResourceKind::Prescription))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);
    authorize(&principal, &operation)?;

    let missing = || RestError::bad_request("Patient ID, medications, and diagnosis are required");
    let patient_id = non_blank(input.patient_id).ok_or_else(missing)?;
    let medications = non_blank(input.medications).ok_or_else(missing)?;
    let diagnosis = non_blank(input.diagnosis).ok_or_else(missing)?;

    let tenant_id = acting_tenant(&principal, operation.target_tenant());
    require_tenant(state.store(), &tenant_id).await?;

    let in_tenant = state
        .store()
        .get_patient(&patient_id)
        .await?
        .is_some_and(|patient| patient.tenant_id == tenant_id);
    if !in_tenant {
        return Err(RestError::bad_request(format!(
            "Patient {} not found in tenant {}",
            patient_id, tenant_id
        )));
    }

    let doctor_id = authoring_identity(&principal, input.doctor_id.as_ref());
    if !principal.is(&doctor_id) {
        let is_doctor = state
            .store()
            .get_user(&doctor_id)
            .await?
            .is_some_and(|user| user.tenant_id == tenant_id && user.role == Role::Doctor);
        if !is_doctor {
            return Err(RestError::bad_request(format!(
                "Doctor {} not found in tenant {}",
                doctor_id, tenant_id
            )));
        }
    }

    let created = state
        .store()
        .insert_prescription(Prescription {
            id: new_record_id(),
            tenant_id,
            patient_id,
            doctor_id,
            medications,
            diagnosis,
            notes: input.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: Utc::now(),
        })
        .await?;

    info!(
        prescription = %created.id,
        tenant = %created.tenant_id,
        doctor = %created.doctor_id,
        "Prescription created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Updates a prescription. Doctors may only update their own.
///
/// `PUT [base]/api/prescriptions/{id}`
pub async fn update_prescription_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<PrescriptionUpdate>,
) -> RestResult<Json<Prescription>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Update, ResourceKind::Prescription).with_record_id(&id))
        .with_target_tenant(body_claim(input.tenant_id.clone())?);

    let found = state.store().get_prescription(&id).await?;
    let mut prescription = authorize_record(&principal, &operation, found)?;

    input.apply_to(&mut prescription);
    let updated = state.store().update_prescription(prescription).await?;

    debug!(prescription = %updated.id, "Prescription updated");
    Ok(Json(updated))
}

/// Deletes a prescription.
///
/// `DELETE [base]/api/prescriptions/{id}`
pub async fn delete_prescription_handler<S>(
    State(state): State<AppState<S>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    tenant: RequestedTenant,
    Path(id): Path<String>,
) -> RestResult<Json<Value>>
where
    S: ClinicalStore + 'static,
{
    let operation = tenant
        .apply(Operation::new(Action::Delete, ResourceKind::Prescription).with_record_id(&id));

    let found = state.store().get_prescription(&id).await?;
    let prescription = authorize_record(&principal, &operation, found)?;
    state.store().delete_prescription(&prescription.id).await?;

    info!(prescription = %prescription.id, by = %principal.identity(), "Prescription deleted");
    Ok(Json(json!({ "message": "Prescription deleted successfully" })))
}
