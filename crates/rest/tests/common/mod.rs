//! Common test utilities for REST API testing.
//!
//! [`TestApp`] wires a [`MemoryStore`] and a token registry into the real
//! router and seeds two hospitals with staff in every role. Each account's
//! bearer token is `"<id>-token"`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::{TestRequest, TestServer};
use chrono::{Duration, Utc};
use medgate_authz::{IdentityId, Role, TenantId};
use serde_json::Value;

use medgate_rest::models::{
    Gender, Patient, PatientStatus, PatientType, Prescription, Tenant, UserAccount,
};
use medgate_rest::store::{ClinicalStore, MemoryStore};
use medgate_rest::{AppState, ServerConfig, StaticTokenVerifier, routing};

pub const X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

/// First hospital.
pub const T1: &str = "st-marys";
/// Second hospital.
pub const T2: &str = "st-judes";
/// Home tenant of the platform operator.
pub const PLATFORM: &str = "platform";

pub const ROOT: &str = "root";
pub const ADMIN1: &str = "admin1";
pub const DOC1: &str = "doc1";
pub const DOC2: &str = "doc2";
pub const DESK1: &str = "desk1";
pub const ADMIN2: &str = "admin2";
pub const DOC3: &str = "doc3";
pub const DESK2: &str = "desk2";

const STAFF: [(&str, Role, &str); 8] = [
    (ROOT, Role::SuperAdmin, PLATFORM),
    (ADMIN1, Role::HospitalAdmin, T1),
    (DOC1, Role::Doctor, T1),
    (DOC2, Role::Doctor, T1),
    (DESK1, Role::Receptionist, T1),
    (ADMIN2, Role::HospitalAdmin, T2),
    (DOC3, Role::Doctor, T2),
    (DESK2, Role::Receptionist, T2),
];

/// Returns the bearer token seeded for `identity`.
pub fn token(identity: &str) -> String {
    format!("{identity}-token")
}

/// A running test server over a seeded in-memory store.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub verifier: Arc<StaticTokenVerifier>,
}

impl TestApp {
    /// Creates a server seeded with the three tenants and every staff account.
    pub async fn seeded() -> Self {
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(StaticTokenVerifier::new());

        // Seed rows a second apart so list order is deterministic.
        let base = Utc::now() - Duration::hours(1);
        for (i, (id, name)) in [(PLATFORM, "Platform"), (T1, "St Mary's"), (T2, "St Jude's")]
            .into_iter()
            .enumerate()
        {
            store
                .insert_tenant(Tenant {
                    id: TenantId::new(id),
                    name: name.to_string(),
                    created_at: base + Duration::seconds(i as i64),
                })
                .await
                .expect("Failed to seed tenant");
        }

        for (i, (id, role, tenant)) in STAFF.into_iter().enumerate() {
            store
                .insert_user(UserAccount {
                    id: IdentityId::new(id),
                    tenant_id: TenantId::new(tenant),
                    email: format!("{id}@example.org"),
                    name: id.to_string(),
                    role,
                    created_at: base + Duration::seconds(i as i64),
                })
                .await
                .expect("Failed to seed user");
            verifier.register(token(id), id);
        }

        let state = AppState::new(
            Arc::clone(&store),
            Arc::clone(&verifier),
            ServerConfig::for_testing(),
        );
        let server =
            TestServer::new(routing::create_routes(state)).expect("Failed to create test server");

        Self {
            server,
            store,
            verifier,
        }
    }

    fn authorized(request: TestRequest, identity: &str) -> TestRequest {
        let value = HeaderValue::from_str(&format!("Bearer {}", token(identity)))
            .expect("token is a valid header value");
        request.add_header(AUTHORIZATION, value)
    }

    /// `GET` as `identity`.
    pub fn get(&self, path: &str, identity: &str) -> TestRequest {
        Self::authorized(self.server.get(path), identity)
    }

    /// `POST` a JSON body as `identity`.
    pub fn post(&self, path: &str, identity: &str, body: &Value) -> TestRequest {
        Self::authorized(self.server.post(path), identity).json(body)
    }

    /// `POST` a plain-text body as `identity`.
    pub fn post_text(&self, path: &str, identity: &str, body: &str) -> TestRequest {
        Self::authorized(self.server.post(path), identity).text(body)
    }

    /// `PUT` a JSON body as `identity`.
    pub fn put(&self, path: &str, identity: &str, body: &Value) -> TestRequest {
        Self::authorized(self.server.put(path), identity).json(body)
    }

    /// `DELETE` as `identity`.
    pub fn delete(&self, path: &str, identity: &str) -> TestRequest {
        Self::authorized(self.server.delete(path), identity)
    }

    /// Stores a patient directly, bypassing the API.
    pub async fn seed_patient(&self, id: &str, tenant: &str) -> Patient {
        self.store
            .insert_patient(Patient {
                id: id.to_string(),
                tenant_id: TenantId::new(tenant),
                name: format!("Patient {id}"),
                age: 40,
                gender: Gender::Other,
                patient_type: PatientType::Opd,
                phone_number: "555-0100".to_string(),
                address: "1 Main St".to_string(),
                admission_date: Utc::now(),
                status: PatientStatus::Active,
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to seed patient")
    }

    /// Stores a prescription directly, bypassing the API.
    pub async fn seed_prescription(
        &self,
        id: &str,
        tenant: &str,
        patient: &str,
        doctor: &str,
    ) -> Prescription {
        self.store
            .insert_prescription(Prescription {
                id: id.to_string(),
                tenant_id: TenantId::new(tenant),
                patient_id: patient.to_string(),
                doctor_id: IdentityId::new(doctor),
                medications: "amoxicillin 500mg".to_string(),
                diagnosis: "otitis media".to_string(),
                notes: String::new(),
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to seed prescription")
    }
}

/// Returns the `id` field of every element of a JSON array body.
pub fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("body is an array")
        .iter()
        .map(|item| item["id"].as_str().expect("id is a string").to_string())
        .collect()
}
