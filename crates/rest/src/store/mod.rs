//! Clinical record storage.
//!
//! The [`ClinicalStore`] trait is the only way handlers touch records. It
//! performs no access control of its own: every call is made after the
//! decision engine has allowed the operation, and list calls take the
//! [`ListScope`] the engine computed.
//!
//! Because staff accounts live in the same store, every `ClinicalStore` is
//! also the [`IdentityStore`] that principals are resolved against.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use medgate_authz::{IdentityId, IdentityStore, ListScope, TenantId};
use thiserror::Error;

use crate::models::{Patient, Prescription, PrescriptionFilter, Tenant, UserAccount};

/// Errors returned by a [`ClinicalStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record to update or delete does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind, e.g. "Patient".
        kind: &'static str,
        /// Record id.
        id: String,
    },

    /// The write would violate a uniqueness constraint.
    #[error("{message}")]
    Conflict {
        /// What conflicted.
        message: String,
    },

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for tenants, patients, prescriptions and staff accounts.
///
/// List methods return records newest first.
#[async_trait]
pub trait ClinicalStore: IdentityStore + Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    // ------------------------------------------------------------------
    // Tenants
    // ------------------------------------------------------------------

    /// Lists every tenant.
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>>;

    /// Reads a tenant.
    async fn get_tenant(&self, id: &TenantId) -> StoreResult<Option<Tenant>>;

    /// Inserts a tenant. Fails with [`StoreError::Conflict`] if the id is
    /// taken.
    async fn insert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant>;

    // ------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------

    /// Lists patients within `scope`.
    async fn list_patients(&self, scope: &ListScope) -> StoreResult<Vec<Patient>>;

    /// Reads a patient from any tenant.
    async fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>>;

    /// Inserts a patient.
    async fn insert_patient(&self, patient: Patient) -> StoreResult<Patient>;

    /// Replaces a stored patient.
    async fn update_patient(&self, patient: Patient) -> StoreResult<Patient>;

    /// Removes a patient.
    async fn delete_patient(&self, id: &str) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Prescriptions
    // ------------------------------------------------------------------

    /// Lists prescriptions within `scope` that pass `filter`.
    async fn list_prescriptions(
        &self,
        scope: &ListScope,
        filter: &PrescriptionFilter,
    ) -> StoreResult<Vec<Prescription>>;

    /// Reads a prescription from any tenant.
    async fn get_prescription(&self, id: &str) -> StoreResult<Option<Prescription>>;

    /// Inserts a prescription.
    async fn insert_prescription(&self, prescription: Prescription) -> StoreResult<Prescription>;

    /// Replaces a stored prescription.
    async fn update_prescription(&self, prescription: Prescription) -> StoreResult<Prescription>;

    /// Removes a prescription.
    async fn delete_prescription(&self, id: &str) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Staff accounts
    // ------------------------------------------------------------------

    /// Lists accounts within `scope`.
    async fn list_users(&self, scope: &ListScope) -> StoreResult<Vec<UserAccount>>;

    /// Reads an account from any tenant.
    async fn get_user(&self, id: &IdentityId) -> StoreResult<Option<UserAccount>>;

    /// Inserts an account. Fails with [`StoreError::Conflict`] if the email
    /// is already registered in any tenant.
    async fn insert_user(&self, user: UserAccount) -> StoreResult<UserAccount>;

    /// Replaces a stored account. Fails with [`StoreError::Conflict`] if the
    /// new email belongs to another account.
    async fn update_user(&self, user: UserAccount) -> StoreResult<UserAccount>;

    /// Removes an account.
    async fn delete_user(&self, id: &IdentityId) -> StoreResult<()>;
}
