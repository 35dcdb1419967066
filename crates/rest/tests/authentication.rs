//! Integration tests for principal resolution and the unauthenticated
//! surface.

mod common;

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use serde_json::Value;

use common::*;
use medgate_rest::store::MemoryStore;
use medgate_rest::{ServerConfig, StaticTokenVerifier, bootstrap_super_admin, create_app_with_config};

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::seeded().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::seeded().await;

    for path in ["/api/patients", "/api/auth/me", "/api/users", "/api/tenants"] {
        let response = app.server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(response.json::<Value>()["reason"], "NotAuthenticated");
    }
}

#[tokio::test]
async fn test_unknown_token_is_401() {
    let app = TestApp::seeded().await;

    let response = app
        .server
        .get("/api/patients")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_401() {
    let app = TestApp::seeded().await;

    let response = app
        .server
        .get("/api/patients")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic desk1-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_create_writes_nothing() {
    let app = TestApp::seeded().await;

    let response = app
        .server
        .post("/api/patients")
        .json(&serde_json::json!({ "name": "Nobody" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let listed = app.get("/api/patients", ROOT).await;
    assert!(ids(&listed.json::<Value>()).is_empty());
}

#[tokio::test]
async fn test_me_returns_account_and_tenant() {
    let app = TestApp::seeded().await;

    let response = app.get("/api/auth/me", DOC1).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], DOC1);
    assert_eq!(body["user"]["role"], "DOCTOR");
    assert_eq!(body["tenant"]["id"], T1);
    assert_eq!(body["tenant"]["name"], "St Mary's");
}

#[tokio::test]
async fn test_bootstrap_token_reaches_api() {
    let store = MemoryStore::new();
    let verifier = Arc::new(StaticTokenVerifier::new());
    let config = ServerConfig {
        bootstrap_token: Some("boot-token".to_string()),
        ..ServerConfig::for_testing()
    };

    let account = bootstrap_super_admin(&store, &verifier, &config)
        .await
        .expect("bootstrap succeeds")
        .expect("token configured");

    let app = create_app_with_config(store, Arc::clone(&verifier), config);
    let server = TestServer::new(app).expect("Failed to create test server");

    let response = server
        .get("/api/tenants")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer boot-token"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body[0]["id"], account.tenant_id.as_str());
}
