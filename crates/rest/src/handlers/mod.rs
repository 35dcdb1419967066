//! HTTP request handlers.
//!
//! - [`health`] - Liveness probe
//! - [`me`] - The caller's own account
//! - [`tenants`] - Hospital tenants
//! - [`patients`] - Patient CRUD
//! - [`prescriptions`] - Prescription CRUD
//! - [`users`] - Staff account CRUD

pub mod health;
pub mod me;
pub mod patients;
pub mod prescriptions;
pub mod tenants;
pub mod users;

use medgate_authz::TenantId;

use crate::error::{RestError, RestResult};
use crate::store::ClinicalStore;

// Re-export handlers for convenience
pub use health::health_handler;
pub use me::me_handler;
pub use patients::{
    create_patient_handler, delete_patient_handler, list_patients_handler, read_patient_handler,
    update_patient_handler,
};
pub use prescriptions::{
    create_prescription_handler, delete_prescription_handler, list_prescriptions_handler,
    read_prescription_handler, update_prescription_handler,
};
pub use tenants::{create_tenant_handler, list_tenants_handler, read_tenant_handler};
pub use users::{
    create_user_handler, delete_user_handler, list_users_handler, read_user_handler,
    update_user_handler,
};

/// Fails with `400` unless `tenant` is registered.
async fn require_tenant<S>(store: &S, tenant: &TenantId) -> RestResult<()>
where
    S: ClinicalStore + ?Sized,
{
    match store.get_tenant(tenant).await? {
        Some(_) => Ok(()),
        None => Err(RestError::bad_request(format!("Tenant {} not found", tenant))),
    }
}
