//! Error types for the MedGate REST API.
//!
//! Every error is returned as a JSON body of the form
//! `{"error": <message>, "reason": <code>}` with a matching status code.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status | Reason |
//! |--------|-------------|--------|
//! | any `AuthError` | 401 | `NotAuthenticated` |
//! | `DenyReason::NotAuthenticated` | 401 | `NotAuthenticated` |
//! | `DenyReason::ResourceNotFound` | 404 | `ResourceNotFound` |
//! | any other `DenyReason` | 403 | the deny reason code |
//! | `StoreError::NotFound` | 404 | `ResourceNotFound` |
//! | `StoreError::Conflict` | 400 | `BadRequest` |
//! | `StoreError::Backend` | 500 | `InternalError` |

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medgate_authz::{AuthError, DenyReason, Outcome};

use crate::store::StoreError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// No principal could be established (HTTP 401).
    Unauthenticated {
        /// Why authentication failed.
        message: String,
    },

    /// The principal was refused by the decision engine (HTTP 403).
    Forbidden {
        /// The deny reason.
        reason: DenyReason,
    },

    /// Record not found (HTTP 404).
    NotFound {
        /// What was looked up, e.g. "Patient/123".
        resource: String,
    },

    /// Bad request - validation error (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for [`RestError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            RestError::Unauthenticated { .. } => DenyReason::NotAuthenticated.code(),
            RestError::Forbidden { reason } => reason.code(),
            RestError::NotFound { .. } => DenyReason::ResourceNotFound.code(),
            RestError::BadRequest { .. } => "BadRequest",
            RestError::InternalError { .. } => "InternalError",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Unauthenticated { message } => {
                write!(f, "Authentication required: {}", message)
            }
            RestError::Forbidden { reason } => write!(f, "Forbidden: {}", reason),
            RestError::NotFound { resource } => write!(f, "Not found: {}", resource),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = self.reason();
        let message = match &self {
            RestError::Unauthenticated { .. } => "Authentication required".to_string(),
            RestError::Forbidden { reason } => reason.to_string(),
            RestError::NotFound { resource } => format!("{} not found", resource),
            RestError::BadRequest { message } => message.clone(),
            // Backend detail stays in the logs.
            RestError::InternalError { .. } => "Internal server error".to_string(),
        };

        let body = serde_json::json!({
            "error": message,
            "reason": reason,
        });
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        RestError::Unauthenticated {
            message: err.to_string(),
        }
    }
}

impl From<DenyReason> for RestError {
    fn from(reason: DenyReason) -> Self {
        match reason.outcome() {
            Outcome::Unauthenticated => RestError::Unauthenticated {
                message: reason.to_string(),
            },
            Outcome::NotFound => RestError::NotFound {
                resource: "Resource".to_string(),
            },
            Outcome::Forbidden => RestError::Forbidden { reason },
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => RestError::NotFound {
                resource: format!("{}/{}", kind, id),
            },
            StoreError::Conflict { message } => RestError::BadRequest { message },
            StoreError::Backend(message) => RestError::InternalError { message },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
