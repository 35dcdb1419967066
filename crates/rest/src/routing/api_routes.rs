//! API route configuration.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;
use crate::store::ClinicalStore;

/// Creates all API routes.
///
/// # Routes
///
/// ## Unauthenticated
/// - `GET /health` - Health check
///
/// ## Bearer token required
/// - `GET /api/auth/me` - Current account and tenant
/// - `GET|POST /api/tenants`, `GET /api/tenants/{id}`
/// - `GET|POST /api/patients`, `GET|PUT|DELETE /api/patients/{id}`
/// - `GET|POST /api/prescriptions`, `GET|PUT|DELETE /api/prescriptions/{id}`
/// - `GET|POST /api/users`, `GET|PUT|DELETE /api/users/{id}`
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ClinicalStore + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/api/auth/me", get(handlers::me_handler::<S>))
        // Tenants
        .route(
            "/api/tenants",
            get(handlers::list_tenants_handler::<S>).post(handlers::create_tenant_handler::<S>),
        )
        .route("/api/tenants/{id}", get(handlers::read_tenant_handler::<S>))
        // Patients
        .route(
            "/api/patients",
            get(handlers::list_patients_handler::<S>).post(handlers::create_patient_handler::<S>),
        )
        .route(
            "/api/patients/{id}",
            get(handlers::read_patient_handler::<S>)
                .put(handlers::update_patient_handler::<S>)
                .delete(handlers::delete_patient_handler::<S>),
        )
        // Prescriptions
        .route(
            "/api/prescriptions",
            get(handlers::list_prescriptions_handler::<S>)
                .post(handlers::create_prescription_handler::<S>),
        )
        .route(
            "/api/prescriptions/{id}",
            get(handlers::read_prescription_handler::<S>)
                .put(handlers::update_prescription_handler::<S>)
                .delete(handlers::delete_prescription_handler::<S>),
        )
        // Users
        .route(
            "/api/users",
            get(handlers::list_users_handler::<S>).post(handlers::create_user_handler::<S>),
        )
        .route(
            "/api/users/{id}",
            get(handlers::read_user_handler::<S>)
                .put(handlers::update_user_handler::<S>)
                .delete(handlers::delete_user_handler::<S>),
        )
        // State
        .with_state(state)
}
