//! Error types for the access-control layer.
//!
//! Authentication failures ([`AuthError`]) are kept apart from authorization
//! denials ([`DenyReason`](crate::decision::DenyReason)): the former means no
//! principal could be established, the latter means a principal was
//! established and then refused.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::principal::IdentityId;

/// Failure to establish who is calling.
///
/// Every variant is terminal for the request and maps to
/// [`Outcome::Unauthenticated`](crate::decision::Outcome::Unauthenticated).
#[derive(Error, Debug)]
pub enum AuthError {
    /// No identity assertion accompanied the request.
    #[error("no identity assertion provided")]
    Unauthenticated,

    /// The assertion could not be verified.
    #[error("identity assertion failed verification")]
    InvalidAssertion,

    /// The assertion verified but its subject no longer exists.
    #[error("principal not found: {identity}")]
    PrincipalNotFound { identity: IdentityId },

    /// The identity store could not answer.
    #[error(transparent)]
    IdentityLookup(#[from] IdentityStoreError),
}

/// The identity store failed to complete a lookup.
#[derive(Error, Debug, Clone)]
#[error("identity store error: {message}")]
pub struct IdentityStoreError {
    pub message: String,
}

impl IdentityStoreError {
    /// Creates a store error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A role name outside the closed role set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {value}")]
pub struct UnknownRole {
    pub value: String,
}
