//! Server configuration for the MedGate REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDGATE_SERVER_PORT` | 8080 | Server port |
//! | `MEDGATE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `MEDGATE_LOG_LEVEL` | info | Log level |
//! | `MEDGATE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `MEDGATE_ENABLE_CORS` | true | Enable CORS |
//! | `MEDGATE_CORS_ORIGINS` | * | Allowed origins |
//! | `MEDGATE_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `MEDGATE_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Tenant-ID | Allowed headers |
//! | `MEDGATE_BOOTSTRAP_TOKEN` | (unset) | Bearer token for the bootstrap super admin |
//! | `MEDGATE_BOOTSTRAP_TENANT` | system | Home tenant of the bootstrap super admin |
//! | `MEDGATE_BOOTSTRAP_EMAIL` | admin@medgate.local | Email of the bootstrap super admin |
//!
//! # Example
//!
//! ```rust
//! use medgate_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use std::str::FromStr;

use axum::http::{HeaderName, HeaderValue, Method};
use clap::Parser;
use medgate_authz::TenantId;

/// Server configuration for the MedGate REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "medgate")]
#[command(about = "Multi-tenant clinical records API")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "MEDGATE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "MEDGATE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDGATE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "MEDGATE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "MEDGATE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "MEDGATE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDGATE_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDGATE_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Tenant-ID"
    )]
    pub cors_headers: String,

    /// Bearer token granted to the bootstrap super admin. No account is
    /// provisioned when unset.
    #[arg(long, env = "MEDGATE_BOOTSTRAP_TOKEN")]
    pub bootstrap_token: Option<String>,

    /// Home tenant of the bootstrap super admin.
    #[arg(long, env = "MEDGATE_BOOTSTRAP_TENANT", default_value = "system")]
    pub bootstrap_tenant: String,

    /// Email of the bootstrap super admin.
    #[arg(
        long,
        env = "MEDGATE_BOOTSTRAP_EMAIL",
        default_value = "admin@medgate.local"
    )]
    pub bootstrap_email: String,
}

/// A comma-separated CORS setting: `*` or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList<T> {
    /// Every value is allowed.
    Any,
    /// Only the listed values are allowed.
    Only(Vec<T>),
}

impl<T: FromStr> AllowList<T> {
    /// Parses a setting. A `*` entry anywhere allows everything. On failure
    /// the first entry that does not parse is returned.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.split(',').any(|entry| entry.trim() == "*") {
            return Ok(AllowList::Any);
        }
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.parse().map_err(|_| entry.to_string()))
            .collect::<Result<Vec<T>, String>>()
            .map(AllowList::Only)
    }
}

fn check_allow_list<T: FromStr>(kind: &str, raw: &str, errors: &mut Vec<String>) {
    if let Err(entry) = AllowList::<T>::parse(raw) {
        errors.push(format!("Invalid CORS {} '{}'", kind, entry));
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Tenant-ID".to_string(),
            bootstrap_token: None,
            bootstrap_tenant: "system".to_string(),
            bootstrap_email: "admin@medgate.local".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Some(token) = &self.bootstrap_token {
            if token.trim().is_empty() {
                errors.push("Bootstrap token cannot be blank".to_string());
            }
        }

        if !TenantId::new(self.bootstrap_tenant.as_str()).is_well_formed() {
            errors.push(format!(
                "Bootstrap tenant '{}' is not a valid tenant ID",
                self.bootstrap_tenant
            ));
        }

        if !self.bootstrap_email.contains('@') {
            errors.push("Bootstrap email must be an email address".to_string());
        }

        if self.enable_cors {
            check_allow_list::<HeaderValue>("origin", &self.cors_origins, &mut errors);
            check_allow_list::<Method>("method", &self.cors_methods, &mut errors);
            check_allow_list::<HeaderName>("header", &self.cors_headers, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            bootstrap_token: None,
            bootstrap_tenant: "test-system".to_string(),
            ..Default::default()
        }
    }
}
