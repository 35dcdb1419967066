//! Record types exposed over the API.
//!
//! Records serialize with camelCase field names. Write payloads
//! (`New*`, `*Update`) deserialize every field as optional so that missing
//! fields are reported as a `400` with a readable message rather than a
//! generic body rejection.

use chrono::{DateTime, Utc};
use medgate_authz::{IdentityId, IdentityRecord, ResourceKind, ResourceRef, Role, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::Protected;

/// Generates a new record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Tenants
// ============================================================================

/// A hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Tenant id. Also the partition key of every record in the hospital.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A tenant is owned by itself.
impl Protected for Tenant {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Tenant, self.id.clone()).with_record_id(self.id.as_str())
    }
}

/// Payload for `POST /api/tenants`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    /// Display name.
    pub name: Option<String>,
}

// ============================================================================
// Patients
// ============================================================================

/// Patient gender as recorded at admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

/// Outpatient or inpatient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatientType {
    /// Outpatient department.
    Opd,
    /// Inpatient department.
    Ipd,
}

/// Admission status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    /// Currently under care.
    #[default]
    Active,
    /// Discharged.
    Discharged,
}

/// A patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Record id.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Outpatient or inpatient.
    #[serde(rename = "type")]
    pub patient_type: PatientType,
    /// Contact number.
    pub phone_number: String,
    /// Postal address.
    pub address: String,
    /// Admission time.
    pub admission_date: DateTime<Utc>,
    /// Admission status.
    pub status: PatientStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Protected for Patient {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Patient, self.tenant_id.clone()).with_record_id(&self.id)
    }
}

/// Payload for `POST /api/patients`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    /// Target tenant. Honored for `SUPER_ADMIN` only.
    pub tenant_id: Option<TenantId>,
    /// Full name.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<u32>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Outpatient or inpatient.
    #[serde(rename = "type")]
    pub patient_type: Option<PatientType>,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Admission time. Defaults to now on create.
    pub admission_date: Option<DateTime<Utc>>,
    /// Admission status. Defaults to `Active` on create.
    pub status: Option<PatientStatus>,
}

/// Payload for `PUT /api/patients/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    /// Only checked against the caller's scope; a patient never moves
    /// between tenants.
    pub tenant_id: Option<TenantId>,
    /// Full name.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<u32>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Outpatient or inpatient.
    #[serde(rename = "type")]
    pub patient_type: Option<PatientType>,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Admission time. Defaults to now on create.
    pub admission_date: Option<DateTime<Utc>>,
    /// Admission status. Defaults to `Active` on create.
    pub status: Option<PatientStatus>,
}

impl PatientUpdate {
    /// Applies the supplied fields to `patient`.
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(name) = non_blank(self.name) {
            patient.name = name;
        }
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(gender) = self.gender {
            patient.gender = gender;
        }
        if let Some(patient_type) = self.patient_type {
            patient.patient_type = patient_type;
        }
        if let Some(phone_number) = non_blank(self.phone_number) {
            patient.phone_number = phone_number;
        }
        if let Some(address) = non_blank(self.address) {
            patient.address = address;
        }
        if let Some(admission_date) = self.admission_date {
            patient.admission_date = admission_date;
        }
        if let Some(status) = self.status {
            patient.status = status;
        }
    }
}

// ============================================================================
// Prescriptions
// ============================================================================

/// A prescription authored by a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Record id.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The patient the prescription is for.
    pub patient_id: String,
    /// The authoring doctor.
    pub doctor_id: IdentityId,
    /// Prescribed medications.
    pub medications: String,
    /// Diagnosis.
    pub diagnosis: String,
    /// Free-text notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The authoring doctor owns the prescription.
impl Protected for Prescription {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Prescription, self.tenant_id.clone())
            .with_owner(self.doctor_id.clone())
            .with_record_id(&self.id)
    }
}

/// Payload for `POST /api/prescriptions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
    /// Target tenant. Honored for `SUPER_ADMIN` only.
    pub tenant_id: Option<TenantId>,
    /// Authoring doctor. Honored for `SUPER_ADMIN` only.
    pub doctor_id: Option<IdentityId>,
    /// The patient the prescription is for. Required.
    pub patient_id: Option<String>,
    /// Prescribed medications. Required.
    pub medications: Option<String>,
    /// Diagnosis. Required.
    pub diagnosis: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Payload for `PUT /api/prescriptions/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionUpdate {
    /// Only checked against the caller's scope.
    pub tenant_id: Option<TenantId>,
    /// Prescribed medications.
    pub medications: Option<String>,
    /// Diagnosis.
    pub diagnosis: Option<String>,
    /// Replaces the notes when present, including with an empty string.
    pub notes: Option<String>,
}

impl PrescriptionUpdate {
    /// Applies the supplied fields to `prescription`.
    pub fn apply_to(self, prescription: &mut Prescription) {
        if let Some(medications) = non_blank(self.medications) {
            prescription.medications = medications;
        }
        if let Some(diagnosis) = non_blank(self.diagnosis) {
            prescription.diagnosis = diagnosis;
        }
        if let Some(notes) = self.notes {
            prescription.notes = notes.trim().to_string();
        }
    }
}

/// Query filters for `GET /api/prescriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionFilter {
    /// Only prescriptions for this patient.
    pub patient_id: Option<String>,
    /// Only prescriptions by this doctor.
    pub doctor_id: Option<IdentityId>,
}

impl PrescriptionFilter {
    /// Returns `true` if `prescription` passes every supplied filter.
    pub fn matches(&self, prescription: &Prescription) -> bool {
        self.patient_id
            .as_ref()
            .is_none_or(|id| &prescription.patient_id == id)
            && self
                .doctor_id
                .as_ref()
                .is_none_or(|id| &prescription.doctor_id == id)
    }
}

// ============================================================================
// Users
// ============================================================================

/// A staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Account identity.
    pub id: IdentityId,
    /// Home tenant.
    pub tenant_id: TenantId,
    /// Login email. Unique across all tenants.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The account id is the record id, so deleting it is recognized as a
/// self-delete.
impl Protected for UserAccount {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::User, self.tenant_id.clone())
            .with_record_id(self.id.as_str())
    }
}

impl UserAccount {
    /// Returns the identity-store view of this account.
    pub fn identity_record(&self) -> IdentityRecord {
        IdentityRecord {
            identity: self.id.clone(),
            role: self.role,
            home_tenant: self.tenant_id.clone(),
        }
    }
}

/// Payload for `POST /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Target tenant. Honored for `SUPER_ADMIN` only.
    pub tenant_id: Option<TenantId>,
    /// Login email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role name; must be an assignable role.
    pub role: Option<String>,
}

/// Payload for `PUT /api/users/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Only checked against the caller's scope.
    pub tenant_id: Option<TenantId>,
    /// Login email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role name; must be an assignable role.
    pub role: Option<String>,
}

/// Returns the trimmed value, or `None` if it is absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient() -> Patient {
        Patient {
            id: "p1".to_string(),
            tenant_id: TenantId::new("t1"),
            name: "Asha Rao".to_string(),
            age: 42,
            gender: Gender::Female,
            patient_type: PatientType::Opd,
            phone_number: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            admission_date: Utc::now(),
            status: PatientStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patient_wire_format() {
        let value = serde_json::to_value(patient()).unwrap();
        assert_eq!(value["tenantId"], "t1");
        assert_eq!(value["type"], "OPD");
        assert_eq!(value["phoneNumber"], "555-0100");
        assert_eq!(value["status"], "Active");
    }

    #[test]
    fn test_patient_update_ignores_blank_fields() {
        let mut p = patient();
        let update: PatientUpdate = serde_json::from_value(json!({
            "name": "  ",
            "status": "Discharged",
            "type": "IPD"
        }))
        .unwrap();
        update.apply_to(&mut p);
        assert_eq!(p.name, "Asha Rao");
        assert_eq!(p.status, PatientStatus::Discharged);
        assert_eq!(p.patient_type, PatientType::Ipd);
    }

    #[test]
    fn test_prescription_ref_carries_owner() {
        let rx = Prescription {
            id: "rx1".to_string(),
            tenant_id: TenantId::new("t1"),
            patient_id: "p1".to_string(),
            doctor_id: IdentityId::new("d1"),
            medications: "amoxicillin".to_string(),
            diagnosis: "otitis".to_string(),
            notes: String::new(),
            created_at: Utc::now(),
        };
        let r = rx.resource_ref();
        assert_eq!(r.owner, Some(IdentityId::new("d1")));
        assert_eq!(r.owning_tenant, TenantId::new("t1"));
        assert_eq!(r.record_id.as_deref(), Some("rx1"));

        let filter = PrescriptionFilter {
            doctor_id: Some(IdentityId::new("d2")),
            ..Default::default()
        };
        assert!(!filter.matches(&rx));
        assert!(PrescriptionFilter::default().matches(&rx));
    }

    #[test]
    fn test_user_wire_format() {
        let user = UserAccount {
            id: IdentityId::new("u1"),
            tenant_id: TenantId::new("t1"),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            role: Role::HospitalAdmin,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "HOSPITAL_ADMIN");
        assert_eq!(value["tenantId"], "t1");
        assert!(value.get("createdAt").is_some());
    }
}
