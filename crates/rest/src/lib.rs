//! # medgate-rest - Tenant-isolated clinical records API
//!
//! This crate serves the MedGate HTTP API on top of the
//! [`medgate_authz`] decision engine. Every `/api` request is resolved to a
//! principal from its bearer token, described as an operation, and checked
//! by the engine before any record is returned or written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use medgate_rest::{ServerConfig, create_app_with_config};
//! use medgate_rest::auth::StaticTokenVerifier;
//! use medgate_rest::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let verifier = Arc::new(StaticTokenVerifier::new());
//!
//!     let app = create_app_with_config(MemoryStore::new(), verifier, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Resource | Methods | URL Pattern |
//! |----------|---------|-------------|
//! | health | GET | `/health` |
//! | current account | GET | `/api/auth/me` |
//! | tenants | GET, POST | `/api/tenants` |
//! | tenant | GET | `/api/tenants/{id}` |
//! | patients | GET, POST | `/api/patients` |
//! | patient | GET, PUT, DELETE | `/api/patients/{id}` |
//! | prescriptions | GET, POST | `/api/prescriptions` |
//! | prescription | GET, PUT, DELETE | `/api/prescriptions/{id}` |
//! | users | GET, POST | `/api/users` |
//! | user | GET, PUT, DELETE | `/api/users/{id}` |
//!
//! ## Tenant Selection
//!
//! A request may name a tenant with the `tenantId` query parameter, the
//! `X-Tenant-ID` header or a `tenantId` body field. Only `SUPER_ADMIN` may
//! name a tenant other than its own; for every other role a foreign tenant
//! is refused with `403`, never narrowed silently.
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": <message>, "reason": <code>}`:
//!
//! | HTTP Status | Reason | Description |
//! |-------------|--------|-------------|
//! | 400 | `BadRequest` | Malformed JSON body, missing field, invalid role, duplicate email |
//! | 401 | `NotAuthenticated` | Missing or unknown bearer token |
//! | 403 | `RoleNotPermitted`, `CrossTenantDenied`, `NotOwner`, `SelfDeleteDenied` | Denied by policy |
//! | 404 | `ResourceNotFound` | No such record |
//! | 500 | `InternalError` | Storage failure |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error type and HTTP mapping
//! - [`state`] - Application state (store, token registry, configuration)
//! - [`auth`] - Bearer token verification
//! - [`access`] - Enforcement of access decisions
//! - [`extractors`] - Principal, tenant and JSON body extractors
//! - [`handlers`] - HTTP request handlers
//! - [`models`] - Records and request payloads
//! - [`store`] - Record storage
//! - [`bootstrap`] - Startup provisioning
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod access;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routing;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use auth::StaticTokenVerifier;
pub use bootstrap::bootstrap_super_admin;
pub use config::{AllowList, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;
pub use store::{ClinicalStore, MemoryStore};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `store` - The record store to use
/// * `verifier` - The bearer token registry
pub fn create_app<S>(store: S, verifier: Arc<StaticTokenVerifier>) -> Router
where
    S: ClinicalStore + 'static,
{
    create_app_with_config(store, verifier, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `store` - The record store to use
/// * `verifier` - The bearer token registry; tokens registered after the
///   app is built are honored
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use medgate_rest::{MemoryStore, ServerConfig, StaticTokenVerifier, create_app_with_config};
///
/// let config = ServerConfig {
///     port: 3000,
///     cors_origins: "https://clinic.example".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(MemoryStore::new(), Arc::new(StaticTokenVerifier::new()), config);
/// ```
pub fn create_app_with_config<S>(
    store: S,
    verifier: Arc<StaticTokenVerifier>,
    config: ServerConfig,
) -> Router
where
    S: ClinicalStore + 'static,
{
    info!(
        backend = store.backend_name(),
        cors = config.enable_cors,
        timeout_secs = config.request_timeout,
        "Building MedGate router"
    );

    let timeout = Duration::from_secs(config.request_timeout);
    let cors = config.enable_cors.then(|| build_cors_layer(&config));
    let router = routing::create_routes(AppState::new(Arc::new(store), verifier, config));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)),
    )
}

/// Builds the CORS layer from the `cors_*` settings.
///
/// A setting that does not parse allows nothing for that part of the
/// policy; [`ServerConfig::validate`] reports it before startup.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new();

    let cors = match AllowList::<HeaderValue>::parse(&config.cors_origins) {
        Ok(AllowList::Any) => cors.allow_origin(Any),
        Ok(AllowList::Only(origins)) => cors.allow_origin(origins),
        Err(entry) => {
            warn!(entry = %entry, "Invalid CORS origin, cross-origin requests refused");
            cors
        }
    };

    let cors = match AllowList::<Method>::parse(&config.cors_methods) {
        Ok(AllowList::Any) => cors.allow_methods(Any),
        Ok(AllowList::Only(methods)) => cors.allow_methods(methods),
        Err(entry) => {
            warn!(entry = %entry, "Invalid CORS method, no methods allowed");
            cors
        }
    };

    match AllowList::<HeaderName>::parse(&config.cors_headers) {
        Ok(AllowList::Any) => cors.allow_headers(Any),
        Ok(AllowList::Only(headers)) => cors.allow_headers(headers),
        Err(entry) => {
            warn!(entry = %entry, "Invalid CORS header, no headers allowed");
            cors
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medgate_rest={level},medgate_authz={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
